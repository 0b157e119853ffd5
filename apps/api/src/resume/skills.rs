//! Skill extraction: a fixed bank of per-category patterns plus labelled
//! comma lists ("Skills: Rust, Go, SQL").

use once_cell::sync::Lazy;
use regex::Regex;

use crate::resume::sections::{extract_section, SKILLS};

/// (canonical name, pattern body). Patterns are matched case-insensitively
/// between non-identifier characters.
type SkillPattern = (&'static str, &'static str);

const LANGUAGES: &[SkillPattern] = &[
    ("Python", "python"),
    ("JavaScript", "javascript"),
    ("TypeScript", "typescript"),
    ("Java", "java"),
    ("C++", r"c\+\+"),
    ("C#", "c#"),
    ("Go", "(?-i:Go)|golang"),
    ("Rust", "rust"),
    ("Ruby", "ruby"),
    ("PHP", "php"),
    ("Swift", "swift"),
    ("Kotlin", "kotlin"),
    ("Scala", "scala"),
    ("Dart", "dart"),
];

const WEB_FRAMEWORKS: &[SkillPattern] = &[
    ("React", r"react(?:\.?js)?"),
    ("Angular", "angular(?:js)?"),
    ("Vue.js", r"vue(?:\.?js)?"),
    ("Next.js", r"next\.?js"),
    ("Node.js", r"node\.?js"),
    ("Express", r"express\.?js"),
    ("Django", "django"),
    ("Flask", "flask"),
    ("Spring Boot", r"spring\s*boot"),
    ("Ruby on Rails", r"ruby\s+on\s+rails|rails"),
    ("ASP.NET", r"asp\.net"),
    ("HTML", "html5?"),
    ("CSS", "css3?"),
    ("Tailwind CSS", r"tailwind(?:\s*css)?"),
    ("GraphQL", "graphql"),
    ("REST APIs", r"rest(?:ful)?\s*apis?"),
];

const DATABASES: &[SkillPattern] = &[
    ("SQL", "sql"),
    ("MySQL", "mysql"),
    ("PostgreSQL", "postgres(?:ql)?"),
    ("MongoDB", "mongo(?:db)?"),
    ("Redis", "redis"),
    ("SQLite", "sqlite"),
    ("DynamoDB", "dynamodb"),
    ("Cassandra", "cassandra"),
    ("Elasticsearch", "elasticsearch"),
    ("Firebase", "firebase"),
    ("Supabase", "supabase"),
];

const CLOUD_DEVOPS: &[SkillPattern] = &[
    ("AWS", r"aws|amazon\s+web\s+services"),
    ("Azure", "azure"),
    ("GCP", r"gcp|google\s+cloud(?:\s+platform)?"),
    ("Docker", "docker"),
    ("Kubernetes", "kubernetes|k8s"),
    ("Terraform", "terraform"),
    ("Jenkins", "jenkins"),
    ("CI/CD", r"ci\s*/\s*cd"),
    ("Git", "git"),
    ("Linux", "linux"),
    ("Ansible", "ansible"),
];

const DATA_ANALYTICS: &[SkillPattern] = &[
    ("Pandas", "pandas"),
    ("NumPy", "numpy"),
    ("TensorFlow", "tensorflow"),
    ("PyTorch", "pytorch"),
    ("scikit-learn", "scikit-learn|sklearn"),
    ("Machine Learning", r"machine\s+learning"),
    ("Deep Learning", r"deep\s+learning"),
    ("Data Analysis", r"data\s+analy(?:sis|tics)"),
    ("Power BI", r"power\s*bi"),
    ("Tableau", "tableau"),
    ("Excel", r"(?:ms\s+|microsoft\s+)?excel"),
    ("Apache Spark", r"(?:apache\s+)?spark"),
    ("Hadoop", "hadoop"),
    ("NLP", "nlp"),
];

const DESIGN: &[SkillPattern] = &[
    ("Figma", "figma"),
    ("Adobe XD", r"adobe\s*xd"),
    ("Photoshop", r"(?:adobe\s+)?photoshop"),
    ("Illustrator", r"(?:adobe\s+)?illustrator"),
    ("UI/UX", r"ui\s*/\s*ux|ux\s*/\s*ui"),
    ("Wireframing", "wireframing"),
    ("Prototyping", "prototyping"),
];

const PROJECT_MANAGEMENT: &[SkillPattern] = &[
    ("Agile", "agile"),
    ("Scrum", "scrum"),
    ("Kanban", "kanban"),
    ("Jira", "jira"),
    ("Confluence", "confluence"),
    ("Trello", "trello"),
    ("Project Management", r"project\s+management"),
    ("Stakeholder Management", r"stakeholder\s+management"),
];

const CATEGORIES: &[(&str, &[SkillPattern])] = &[
    ("languages", LANGUAGES),
    ("web_frameworks", WEB_FRAMEWORKS),
    ("databases", DATABASES),
    ("cloud_devops", CLOUD_DEVOPS),
    ("data_analytics", DATA_ANALYTICS),
    ("design", DESIGN),
    ("project_management", PROJECT_MANAGEMENT),
];

/// Label endings that introduce a comma list of skills.
const LIST_LABELS: &[&str] = &[
    "skills",
    "technologies",
    "tools",
    "languages",
    "frameworks",
    "stack",
    "competencies",
];

const STOP_WORDS: &[&str] = &[
    "and", "or", "etc", "others", "other", "various", "including", "the", "with", "more", "misc",
    "n/a", "skills",
];

struct CompiledSkill {
    name: &'static str,
    category: &'static str,
    regex: Regex,
}

static SKILL_BANK: Lazy<Vec<CompiledSkill>> = Lazy::new(|| {
    CATEGORIES
        .iter()
        .flat_map(|&(category, patterns)| {
            patterns.iter().map(move |&(name, pattern)| CompiledSkill {
                name,
                category,
                regex: Regex::new(&format!(
                    r"(?i)(?:^|[^A-Za-z0-9+#])(?:{pattern})(?:$|[^A-Za-z0-9+#])"
                ))
                .unwrap(),
            })
        })
        .collect()
});

static LIST_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;|•·]").unwrap());

/// Extracts up to `max_skills` distinct skills, in first-seen order.
pub fn extract_skills(text: &str, max_skills: usize) -> Vec<String> {
    let section = extract_section(text, &SKILLS);
    let scope = section.as_deref().unwrap_or(text);

    let mut skills = SkillSet::new(max_skills);

    for skill in SKILL_BANK.iter() {
        if skills.is_full() {
            break;
        }
        if skill.regex.is_match(scope) {
            tracing::trace!(category = skill.category, skill = skill.name, "matched skill pattern");
            skills.insert(skill.name);
        }
    }

    for line in scope.lines() {
        let list = match line.split_once(':') {
            Some((label, rest)) if is_list_label(label) => rest,
            // Inside a skills section every comma-separated line is a list.
            _ if section.is_some() && line.contains(',') => line,
            _ => continue,
        };
        for item in LIST_SPLIT_RE.split(list) {
            if let Some(item) = clean_list_item(item) {
                skills.insert(item);
            }
        }
    }

    skills.into_vec()
}

fn is_list_label(label: &str) -> bool {
    let label = label.trim().to_lowercase();
    label.len() <= 40 && LIST_LABELS.iter().any(|suffix| label.ends_with(suffix))
}

fn clean_list_item(raw: &str) -> Option<&str> {
    let item = raw.trim_matches(|c: char| c.is_whitespace() || matches!(c, '.' | '-' | '*' | '•'));
    let item = item.strip_prefix("and ").unwrap_or(item).trim();

    let lower = item.to_lowercase();
    let usable = (2..=40).contains(&item.chars().count())
        && item.split_whitespace().count() <= 4
        && !item.chars().all(|c| c.is_ascii_digit() || c.is_whitespace())
        && !item.contains('@')
        && !lower.contains("http")
        && !STOP_WORDS.contains(&lower.as_str());
    usable.then_some(item)
}

/// Ordered, case-insensitively deduplicated, capped skill list.
struct SkillSet {
    skills: Vec<String>,
    max: usize,
}

impl SkillSet {
    fn new(max: usize) -> Self {
        Self {
            skills: Vec::new(),
            max,
        }
    }

    fn is_full(&self) -> bool {
        self.skills.len() >= self.max
    }

    fn insert(&mut self, skill: &str) {
        if self.is_full() || self.skills.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
            return;
        }
        self.skills.push(skill.to_string());
    }

    fn into_vec(self) -> Vec<String> {
        self.skills
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_list_dedup() {
        assert_eq!(
            extract_skills("Skills: Python, SQL, Python", 20),
            vec!["Python", "SQL"]
        );
    }

    #[test]
    fn test_bank_matches_across_categories() {
        let text = "Built services in Rust and TypeScript on AWS with PostgreSQL, designed in Figma, ran Scrum.";
        let skills = extract_skills(text, 20);
        assert_eq!(
            skills,
            vec!["TypeScript", "Rust", "PostgreSQL", "AWS", "Figma", "Scrum"]
        );
    }

    #[test]
    fn test_java_does_not_match_javascript() {
        let skills = extract_skills("Frontend work in JavaScript", 20);
        assert_eq!(skills, vec!["JavaScript"]);
    }

    #[test]
    fn test_restricted_to_skills_section() {
        let text = "EXPERIENCE\nEngineer at Acme\nMaintained a legacy Java monolith\n\
                    TECHNICAL SKILLS\nRust, Kubernetes, Leadership\nEDUCATION\nB.S. Physics";
        let skills = extract_skills(text, 20);
        assert_eq!(skills, vec!["Rust", "Kubernetes", "Leadership"]);
    }

    #[test]
    fn test_labelled_lists_outside_skills_section() {
        let text = "Tools: Vim, Make\nFrameworks: Actix and more";
        assert_eq!(extract_skills(text, 20), vec!["Vim", "Make", "Actix and more"]);
    }

    #[test]
    fn test_stop_words_and_noise_are_dropped() {
        let text = "Skills: Terraform, etc, and Helm, 2020, x";
        assert_eq!(extract_skills(text, 20), vec!["Terraform", "Helm"]);
    }

    #[test]
    fn test_capped_and_unique() {
        let items: Vec<String> = (0..40).map(|i| format!("Tool{i}")).collect();
        let text = format!("Skills: {}", items.join(", "));
        let skills = extract_skills(&text, 20);
        assert_eq!(skills.len(), 20);
        let mut unique = skills.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), skills.len());
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_skills("", 20).is_empty());
    }
}
