//! Section scoping: slices a résumé down to the block under a given heading.

use once_cell::sync::Lazy;
use regex::Regex;

/// A bullet, or a line that opens with a year or carries a year range.
static ENTRY_DETAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:[-•*▪◦●–·]|\d{1,2}/\d{4}|(?:19|20)\d{2}\b)|(?:19|20)\d{2}\s*(?:-|–|—|to)\s*(?:(?:19|20)\d{2}|present|current|now)",
    )
    .unwrap()
});

pub const SUMMARY_HEADERS: &[&str] = &[
    "summary",
    "profile",
    "objective",
    "about",
    "about me",
    "overview",
];

pub const EXPERIENCE_HEADERS: &[&str] = &[
    "experience",
    "employment",
    "employment history",
    "work history",
    "career history",
];

pub const EDUCATION_HEADERS: &[&str] = &[
    "education",
    "academic background",
    "academics",
    "qualifications",
];

pub const SKILLS_HEADERS: &[&str] = &["skills", "technologies", "competencies", "tech stack"];

pub const CERTIFICATION_HEADERS: &[&str] = &[
    "certifications",
    "certification",
    "certificates",
    "licenses",
    "licences",
    "accreditations",
];

/// Headings that only ever terminate another section.
pub const OTHER_HEADERS: &[&str] = &[
    "projects",
    "awards",
    "achievements",
    "publications",
    "languages",
    "interests",
    "hobbies",
    "references",
    "volunteer",
    "volunteering",
    "activities",
    "honors",
    "contact",
];

const ALL_HEADERS: &[&[&str]] = &[
    SUMMARY_HEADERS,
    EXPERIENCE_HEADERS,
    EDUCATION_HEADERS,
    SKILLS_HEADERS,
    CERTIFICATION_HEADERS,
    OTHER_HEADERS,
];

/// Describes one section: the heading synonyms that open it and the heading
/// groups that close it.
#[derive(Debug, Clone, Copy)]
pub struct SectionKind {
    pub headers: &'static [&'static str],
    pub terminators: &'static [&'static [&'static str]],
    /// Also close the section at an ALL-CAPS heading line, unless the next
    /// line is a bullet or a dated line (then it is an employer name).
    pub stop_at_caps: bool,
}

pub const SUMMARY: SectionKind = SectionKind {
    headers: SUMMARY_HEADERS,
    terminators: &[
        EXPERIENCE_HEADERS,
        EDUCATION_HEADERS,
        SKILLS_HEADERS,
        CERTIFICATION_HEADERS,
        OTHER_HEADERS,
    ],
    stop_at_caps: true,
};

pub const EXPERIENCE: SectionKind = SectionKind {
    headers: EXPERIENCE_HEADERS,
    terminators: &[
        SUMMARY_HEADERS,
        EDUCATION_HEADERS,
        SKILLS_HEADERS,
        CERTIFICATION_HEADERS,
        OTHER_HEADERS,
    ],
    stop_at_caps: true,
};

pub const EDUCATION: SectionKind = SectionKind {
    headers: EDUCATION_HEADERS,
    terminators: &[
        SUMMARY_HEADERS,
        EXPERIENCE_HEADERS,
        SKILLS_HEADERS,
        CERTIFICATION_HEADERS,
        OTHER_HEADERS,
    ],
    stop_at_caps: false,
};

pub const SKILLS: SectionKind = SectionKind {
    headers: SKILLS_HEADERS,
    terminators: &[
        SUMMARY_HEADERS,
        EXPERIENCE_HEADERS,
        EDUCATION_HEADERS,
        CERTIFICATION_HEADERS,
        OTHER_HEADERS,
    ],
    stop_at_caps: false,
};

pub const CERTIFICATIONS: SectionKind = SectionKind {
    headers: CERTIFICATION_HEADERS,
    terminators: &[
        SUMMARY_HEADERS,
        EXPERIENCE_HEADERS,
        EDUCATION_HEADERS,
        SKILLS_HEADERS,
        OTHER_HEADERS,
    ],
    stop_at_caps: false,
};

/// Returns the body of the first section opened by one of `section.headers`,
/// or `None` when no such heading exists. Content written on the heading
/// line itself ("Skills: Rust, Go") is kept as the first body line.
pub fn extract_section(text: &str, section: &SectionKind) -> Option<String> {
    let mut lines = text.lines();
    let mut body = Vec::new();

    loop {
        let line = lines.next()?;
        if let Some(inline) = match_heading(line, section.headers) {
            if !inline.is_empty() {
                body.push(inline);
            }
            break;
        }
    }

    let rest: Vec<&str> = lines.collect();
    for (i, line) in rest.iter().enumerate() {
        let next = rest[i + 1..].iter().copied().find(|l| !l.trim().is_empty());
        if is_terminator(line, next, section) {
            break;
        }
        body.push(line.trim());
    }

    Some(body.join("\n"))
}

/// Lines that come before the first recognised section heading of any kind.
pub fn lines_before_first_section(text: &str) -> Vec<&str> {
    text.lines()
        .take_while(|line| !is_any_heading(line))
        .collect()
}

/// True for a bare heading line from any known section.
pub fn is_any_heading(line: &str) -> bool {
    ALL_HEADERS
        .iter()
        .any(|group| match_heading(line, group).is_some_and(str::is_empty))
}

fn is_terminator(line: &str, next: Option<&str>, section: &SectionKind) -> bool {
    let closes = section
        .terminators
        .iter()
        .any(|group| match_heading(line, group).is_some_and(str::is_empty));
    closes
        || (section.stop_at_caps
            && is_caps_heading(line)
            && !next.is_some_and(|next| ENTRY_DETAIL_RE.is_match(next.trim())))
}

/// Matches a heading line against `keywords`. Returns the text written after
/// a colon on the same line (empty for a bare heading).
pub fn match_heading<'a>(line: &'a str, keywords: &[&str]) -> Option<&'a str> {
    let trimmed = line
        .trim()
        .trim_start_matches(|c: char| !c.is_alphanumeric());
    let (label, inline) = match trimmed.split_once(':') {
        Some((label, rest)) => (label, rest.trim()),
        None => (trimmed, ""),
    };

    if label.is_empty()
        || label.len() > 40
        || label.chars().any(|c| c.is_ascii_digit())
        || !label.starts_with(|c: char| c.is_uppercase())
    {
        return None;
    }

    let normalized = normalize_label(label);
    if normalized.is_empty() || normalized.split(' ').count() > 4 {
        return None;
    }

    keywords
        .iter()
        .any(|keyword| contains_phrase(&normalized, keyword))
        .then_some(inline)
}

/// An ALL-CAPS line such as "WORK HISTORY" or "PROJECTS".
pub fn is_caps_heading(line: &str) -> bool {
    let trimmed = line
        .trim()
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim_end_matches(':');
    if trimmed.len() > 40 || trimmed.contains('@') || trimmed.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    let letters: Vec<char> = trimmed.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 5
        && letters.iter().all(|c| c.is_uppercase())
        && trimmed.split_whitespace().count() <= 4
}

fn normalize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_alphabetic() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    haystack == phrase
        || haystack.starts_with(&format!("{phrase} "))
        || haystack.ends_with(&format!(" {phrase}"))
        || haystack.contains(&format!(" {phrase} "))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Jane Smith\n\
        jane@example.com\n\
        WORK EXPERIENCE\n\
        Engineer at Acme\n\
        Built things\n\
        EDUCATION\n\
        B.S. Computer Science, MIT, 2015\n\
        Skills: Rust, Go\n\
        Projects\n\
        Side project";

    #[test]
    fn test_heading_variants_match() {
        assert_eq!(match_heading("WORK EXPERIENCE", EXPERIENCE_HEADERS), Some(""));
        assert_eq!(match_heading("Professional Experience:", EXPERIENCE_HEADERS), Some(""));
        assert_eq!(match_heading("• Technical Skills", SKILLS_HEADERS), Some(""));
        assert_eq!(match_heading("Skills & Technologies", SKILLS_HEADERS), Some(""));
        assert_eq!(
            match_heading("Skills: Python, SQL", SKILLS_HEADERS),
            Some("Python, SQL")
        );
    }

    #[test]
    fn test_prose_is_not_a_heading() {
        assert_eq!(match_heading("5 years experience", EXPERIENCE_HEADERS), None);
        assert_eq!(
            match_heading("Gained broad experience across many backend teams", EXPERIENCE_HEADERS),
            None
        );
        assert_eq!(match_heading("experience", EXPERIENCE_HEADERS), None);
    }

    #[test]
    fn test_extract_experience_stops_at_next_heading() {
        let section = extract_section(RESUME, &EXPERIENCE).unwrap();
        assert_eq!(section, "Engineer at Acme\nBuilt things");
    }

    #[test]
    fn test_extract_education_runs_past_inline_skills_line() {
        let section = extract_section(RESUME, &EDUCATION).unwrap();
        assert_eq!(section, "B.S. Computer Science, MIT, 2015\nSkills: Rust, Go");
    }

    #[test]
    fn test_caps_employer_line_does_not_close_experience() {
        let text = "EXPERIENCE\n\
            GOOGLE\n\
            Software Engineer, 2019 - 2021\n\
            ACCENTURE\n\
            • Delivered cloud migrations\n\
            OPEN SOURCE\n\
            Maintainer of a parser crate";
        let section = extract_section(text, &EXPERIENCE).unwrap();
        assert_eq!(
            section,
            "GOOGLE\nSoftware Engineer, 2019 - 2021\nACCENTURE\n• Delivered cloud migrations"
        );
    }

    #[test]
    fn test_extract_skills_keeps_inline_content() {
        let section = extract_section(RESUME, &SKILLS).unwrap();
        assert_eq!(section, "Rust, Go");
    }

    #[test]
    fn test_missing_section_is_none() {
        assert!(extract_section(RESUME, &CERTIFICATIONS).is_none());
        assert!(extract_section("", &SUMMARY).is_none());
    }

    #[test]
    fn test_caps_heading_detection() {
        assert!(is_caps_heading("PROJECTS"));
        assert!(is_caps_heading("  VOLUNTEER WORK:"));
        assert!(!is_caps_heading("MIT"));
        assert!(!is_caps_heading("ACME 2019"));
        assert!(!is_caps_heading("Projects"));
    }

    #[test]
    fn test_lines_before_first_section() {
        assert_eq!(
            lines_before_first_section(RESUME),
            vec!["Jane Smith", "jane@example.com"]
        );
    }
}
