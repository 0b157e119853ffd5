//! Education entries, read one line at a time from the education section.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::resume::profile::EducationEntry;
use crate::resume::rules::{first_match, PatternRule};
use crate::resume::sections::{extract_section, EDUCATION};

/// First-token spellings of a degree, normalised to lowercase letters only
/// ("B.S." → "bs", "Bachelor's" → "bachelors").
const DEGREE_KEYWORDS: &[&str] = &[
    "bachelor", "bachelors", "master", "masters", "phd", "doctor", "doctorate", "mba", "bs", "bsc",
    "ba", "bfa", "ms", "msc", "ma", "mfa", "btech", "mtech", "be", "me", "bba", "bcom", "mcom",
    "llb", "llm", "md", "diploma", "associate", "associates",
];

const INSTITUTION_WORDS: &[&str] = &["university", "college", "institute", "school", "academy"];

const MAX_DEGREE_CHARS: usize = 60;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

static PART_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*(?:[,|]|\s[-–—]\s|\sfrom\s)\s*").unwrap());

static FROM_CLAUSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?P<degree>.+?)\s+from\s+(?P<institution>.+?)(?:[,\s]+\(?(?P<year>(?:19|20)\d{2})\)?)?\s*$",
    )
    .unwrap()
});

const EDUCATION_RULES: &[PatternRule<EducationEntry>] = &[
    PatternRule::new("degree_keyword", degree_keyword),
    PatternRule::new("from_clause", from_clause),
];

/// Parses up to `max_entries` entries from the education section. A line
/// that only names an institution is remembered and attached to the degree
/// line that follows it.
pub fn extract_education(text: &str, max_entries: usize) -> Vec<EducationEntry> {
    let Some(section) = extract_section(text, &EDUCATION) else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    let mut previous: Option<&str> = None;

    for line in section.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if entries.len() >= max_entries {
            break;
        }
        match first_match(EDUCATION_RULES, line) {
            Some(mut entry) => {
                if entry.institution.is_empty() {
                    if let Some(institution) = previous.filter(|p| looks_like_institution(p)) {
                        entry.institution = strip_years(institution);
                    }
                }
                entries.push(swap_if_reversed(entry));
                previous = None;
            }
            None => previous = Some(line),
        }
    }

    entries
}

fn degree_keyword(line: &str) -> Option<EducationEntry> {
    let parts: Vec<&str> = PART_SPLIT_RE
        .split(line)
        .map(str::trim)
        .filter(|part| !part.is_empty() && !is_date_part(part))
        .collect();

    let degree = parts.iter().copied().find(|part| starts_with_degree(part))?;
    let institution = parts
        .iter()
        .copied()
        .find(|part| *part != degree)
        .map(strip_years)
        .unwrap_or_default();

    Some(EducationEntry {
        degree: strip_years(degree),
        institution,
        year: last_year(line),
    })
}

fn from_clause(line: &str) -> Option<EducationEntry> {
    let caps = FROM_CLAUSE_RE.captures(line)?;
    let degree = clean_part(&caps["degree"]);
    if degree.is_empty() {
        return None;
    }
    Some(EducationEntry {
        degree: degree.to_string(),
        institution: strip_years(&caps["institution"]),
        year: caps
            .name("year")
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| last_year(line)),
    })
}

/// Swaps the two fields when the degree reads like a school name, or is too
/// long to be a degree and an institution was found alongside it.
fn swap_if_reversed(mut entry: EducationEntry) -> EducationEntry {
    let misplaced_school =
        looks_like_institution(&entry.degree) && !looks_like_institution(&entry.institution);
    let overlong = entry.degree.chars().count() > MAX_DEGREE_CHARS && !entry.institution.is_empty();
    if misplaced_school || overlong {
        std::mem::swap(&mut entry.degree, &mut entry.institution);
    }
    entry
}

fn starts_with_degree(part: &str) -> bool {
    let Some(first) = part.split_whitespace().next() else {
        return false;
    };
    let token: String = first
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();
    DEGREE_KEYWORDS.contains(&token.as_str())
}

fn looks_like_institution(text: &str) -> bool {
    let lower = text.to_lowercase();
    INSTITUTION_WORDS.iter().any(|word| lower.contains(word))
}

/// "2015", "May 2015", "Expected 2025".
fn is_date_part(part: &str) -> bool {
    YEAR_RE.is_match(part) && part.split_whitespace().count() <= 3
}

fn last_year(line: &str) -> String {
    YEAR_RE
        .find_iter(line)
        .last()
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn strip_years(part: &str) -> String {
    clean_part(&YEAR_RE.replace_all(part, "")).to_string()
}

fn clean_part(part: &str) -> &str {
    part.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '|' | '(' | ')' | '-' | '–' | '—'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degree_institution_year_comma_line() {
        let entries = extract_education(
            "EDUCATION\nB.S. Computer Science, Stanford University, 2015",
            3,
        );
        assert_eq!(
            entries,
            vec![EducationEntry {
                degree: "B.S. Computer Science".to_string(),
                institution: "Stanford University".to_string(),
                year: "2015".to_string(),
            }]
        );
    }

    #[test]
    fn test_degree_from_institution_with_parenthesised_year() {
        let entries = extract_education(
            "Education\nMaster of Science in Computer Science from Carnegie Mellon University (2019)",
            3,
        );
        assert_eq!(entries[0].degree, "Master of Science in Computer Science");
        assert_eq!(entries[0].institution, "Carnegie Mellon University");
        assert_eq!(entries[0].year, "2019");
    }

    #[test]
    fn test_institution_first_in_line() {
        let entries = extract_education("EDUCATION\nHarvard University | MBA | 2008 - 2010", 3);
        assert_eq!(entries[0].degree, "MBA");
        assert_eq!(entries[0].institution, "Harvard University");
        assert_eq!(entries[0].year, "2010");
    }

    #[test]
    fn test_institution_taken_from_previous_line() {
        let text = "Education\nMassachusetts Institute of Technology\nPh.D. in Physics, 2012";
        let entries = extract_education(text, 3);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].degree, "Ph.D. in Physics");
        assert_eq!(entries[0].institution, "Massachusetts Institute of Technology");
        assert_eq!(entries[0].year, "2012");
    }

    #[test]
    fn test_campus_suffix_stays_in_institution() {
        let entries = extract_education(
            "EDUCATION\nB.S. Computer Science, University of Texas at Austin, 2016\n\
             M.S. Statistics | University of Illinois at Urbana-Champaign | 2018",
            3,
        );
        assert_eq!(entries[0].institution, "University of Texas at Austin");
        assert_eq!(entries[1].degree, "M.S. Statistics");
        assert_eq!(entries[1].institution, "University of Illinois at Urbana-Champaign");
        assert_eq!(entries[1].year, "2018");
    }

    #[test]
    fn test_generic_from_clause() {
        let entries = extract_education(
            "EDUCATION\nCertificate in UX from General Assembly, 2020",
            3,
        );
        assert_eq!(entries[0].degree, "Certificate in UX");
        assert_eq!(entries[0].institution, "General Assembly");
        assert_eq!(entries[0].year, "2020");
    }

    #[test]
    fn test_swap_when_degree_is_a_school() {
        let entry = swap_if_reversed(EducationEntry {
            degree: "University of Waterloo".to_string(),
            institution: "Mathematics".to_string(),
            year: String::new(),
        });
        assert_eq!(entry.degree, "Mathematics");
        assert_eq!(entry.institution, "University of Waterloo");
    }

    #[test]
    fn test_entries_capped() {
        let text = (0..6)
            .map(|i| format!("BSc Physics, College {i}, 2010"))
            .collect::<Vec<_>>()
            .join("\n");
        let entries = extract_education(&format!("EDUCATION\n{text}"), 3);
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn test_no_section_or_no_degree() {
        assert!(extract_education("B.S. Physics, MIT, 2015", 3).is_empty());
        assert!(extract_education("EDUCATION\nSelf taught", 3).is_empty());
        assert!(extract_education("", 3).is_empty());
    }
}
