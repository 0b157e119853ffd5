use once_cell::sync::Lazy;
use regex::Regex;

use crate::resume::profile::Certification;
use crate::resume::rules::{first_match, PatternRule};
use crate::resume::sections::{
    extract_section, CERTIFICATIONS, CERTIFICATION_HEADERS, EDUCATION_HEADERS, EXPERIENCE_HEADERS,
    OTHER_HEADERS, SKILLS_HEADERS, SUMMARY_HEADERS,
};

const MAX_NAME_CHARS: usize = 100;
const MIN_NAME_CHARS: usize = 3;

// "Name - Issuer - Date", also with pipes.
static NAME_ISSUER_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>.+?)\s+[-–—|]\s+(?P<issuer>.+?)\s+[-–—|]\s+(?P<date>.+)$").unwrap()
});
// "Name (Issuer, Date)"
static PARENTHESISED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>.+?)\s*\((?P<issuer>[^,()]+?)(?:,\s*(?P<date>[^()]+))?\)\s*$").unwrap()
});
// "Name - Issuer, Date" or "Name, Issuer, Date"
static NAME_ISSUER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<name>.+?)(?:\s+[-–—|]\s+|,\s*)(?P<issuer>[^,]+?)(?:,\s*(?P<date>.+))?$").unwrap()
});

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

const CERTIFICATION_RULES: &[PatternRule<Certification>] = &[
    PatternRule::new("name_issuer_date", name_issuer_date),
    PatternRule::new("parenthesised", parenthesised),
    PatternRule::new("name_issuer", name_issuer),
];

const HEADING_GROUPS: &[&[&str]] = &[
    SUMMARY_HEADERS,
    EXPERIENCE_HEADERS,
    EDUCATION_HEADERS,
    SKILLS_HEADERS,
    CERTIFICATION_HEADERS,
    OTHER_HEADERS,
];

/// Parses up to `max_entries` certifications, one per line of the
/// certifications section. A line matching none of the layouts is kept as a
/// bare name.
pub fn extract_certifications(text: &str, max_entries: usize) -> Vec<Certification> {
    let Some(section) = extract_section(text, &CERTIFICATIONS) else {
        return Vec::new();
    };

    section
        .lines()
        .map(|line| line.trim().trim_start_matches(|c: char| !c.is_alphanumeric()))
        .filter(|line| !line.is_empty())
        .filter_map(parse_line)
        .take(max_entries)
        .collect()
}

fn parse_line(line: &str) -> Option<Certification> {
    let certification = first_match(CERTIFICATION_RULES, line).unwrap_or_else(|| Certification {
        name: line.trim().to_string(),
        ..Default::default()
    });

    let name_chars = certification.name.chars().count();
    if !(MIN_NAME_CHARS..=MAX_NAME_CHARS).contains(&name_chars) || looks_like_heading(&certification.name) {
        return None;
    }
    Some(certification)
}

fn name_issuer_date(line: &str) -> Option<Certification> {
    from_captures(&NAME_ISSUER_DATE_RE, line)
}

fn parenthesised(line: &str) -> Option<Certification> {
    from_captures(&PARENTHESISED_RE, line)
}

fn name_issuer(line: &str) -> Option<Certification> {
    from_captures(&NAME_ISSUER_RE, line)
}

/// A name that is nothing but a section label ("Licenses", "Awards:").
/// "AWS Certification" is still a certification.
fn looks_like_heading(name: &str) -> bool {
    let normalized = name
        .split(|c: char| !c.is_alphabetic())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ");
    HEADING_GROUPS
        .iter()
        .flat_map(|group| group.iter())
        .any(|heading| *heading == normalized)
}

fn from_captures(re: &Regex, line: &str) -> Option<Certification> {
    let caps = re.captures(line)?;
    let part = |name: &str| {
        caps.name(name)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default()
    };

    let mut certification = Certification {
        name: part("name"),
        issuer: part("issuer"),
        date: part("date"),
    };
    // "PMP - 2019": the only trailing part is a date, not an issuer.
    if certification.date.is_empty() && is_date(&certification.issuer) {
        certification.date = std::mem::take(&mut certification.issuer);
    }
    Some(certification)
}

fn is_date(part: &str) -> bool {
    YEAR_RE.is_match(part) && part.split_whitespace().count() <= 3
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cert(name: &str, issuer: &str, date: &str) -> Certification {
        Certification {
            name: name.to_string(),
            issuer: issuer.to_string(),
            date: date.to_string(),
        }
    }

    #[test]
    fn test_layout_variants() {
        let text = "CERTIFICATIONS\n\
            AWS Certified Solutions Architect - Amazon - 2021\n\
            Certified Kubernetes Administrator (CNCF, 2022)\n\
            PMP - Project Management Institute, Mar 2019\n\
            CKAD | CNCF | 2023\n\
            • Google Data Analytics Certificate";
        assert_eq!(
            extract_certifications(text, 10),
            vec![
                cert("AWS Certified Solutions Architect", "Amazon", "2021"),
                cert("Certified Kubernetes Administrator", "CNCF", "2022"),
                cert("PMP", "Project Management Institute", "Mar 2019"),
                cert("CKAD", "CNCF", "2023"),
                cert("Google Data Analytics Certificate", "", ""),
            ]
        );
    }

    #[test]
    fn test_trailing_year_is_a_date() {
        let certs = extract_certifications("Certifications\nScrum Master - 2019", 10);
        assert_eq!(certs, vec![cert("Scrum Master", "", "2019")]);
    }

    #[test]
    fn test_heading_like_and_overlong_lines_skipped() {
        let long_name = "x".repeat(120);
        let text = format!(
            "Certifications\nLicenses\n{long_name}\nOK\nCISSP - ISC2, 2020\nAWS Certification"
        );
        let certs = extract_certifications(&text, 10);
        assert_eq!(
            certs,
            vec![cert("CISSP", "ISC2", "2020"), cert("AWS Certification", "", "")]
        );
    }

    #[test]
    fn test_capped() {
        let lines: Vec<String> = (0..15).map(|i| format!("Cert {i} - Issuer - 2020")).collect();
        let text = format!("CERTIFICATIONS\n{}", lines.join("\n"));
        assert_eq!(extract_certifications(&text, 10).len(), 10);
    }

    #[test]
    fn test_no_section() {
        assert!(extract_certifications("AWS Certified - Amazon - 2021", 10).is_empty());
        assert!(extract_certifications("", 10).is_empty());
    }
}
