use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::resume::rules::{first_match, PatternRule};
use crate::resume::sections::lines_before_first_section;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

static PHONE_SHAPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d[\d\s().-]{5,}\d").unwrap());

static NORTH_AMERICAN_PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?1[\s.-]?)?(?:\(\d{3}\)|\d{3})[\s.-]?\d{3}[\s.-]?\d{4}\b").unwrap()
});
static INDIAN_MOBILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\+91[\s-]?|\b0)?[6-9]\d{4}[\s-]?\d{5}\b").unwrap());
static UK_PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+44\s?\(?0?\)?\s?|\b0)(?:7\d{3}|\d{4})\s?\d{3}\s?\d{3}\b").unwrap()
});
static INTERNATIONAL_PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+\d{1,3}(?:[\s.-]?\(?\d{1,4}\)?){2,5}").unwrap());

static CITY_STATE_ZIP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z][A-Za-z.' ]+?),\s*([A-Z]{2})\s+\d{5}(?:-\d{4})?$").unwrap()
});
static CITY_STATE_COUNTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Z][A-Za-z.' ]+?),\s*([A-Z][A-Za-z.' ]+?),\s*([A-Z][A-Za-z.' ]+)$").unwrap()
});
static CITY_STATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z][A-Za-z.' ]+?),\s*([A-Z][A-Za-z.' ]+)$").unwrap());

const NAME_SCAN_LINES: usize = 5;
const LOCATION_SCAN_LINES: usize = 15;
const NOT_A_NAME: &[&str] = &["resume", "résumé", "cv", "curriculum", "vitae"];
/// Country assumed when the state part is a two-letter code.
pub const DEFAULT_COUNTRY: &str = "USA";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub state: String,
    pub country: String,
}

const PHONE_RULES: &[PatternRule<String>] = &[
    PatternRule::new("north_american", north_american_phone),
    PatternRule::new("indian_mobile", indian_mobile_phone),
    PatternRule::new("uk", uk_phone),
    PatternRule::new("international", international_phone),
];

const LOCATION_RULES: &[PatternRule<Location>] = &[
    PatternRule::new("city_state_zip", city_state_zip),
    PatternRule::new("city_state_country", city_state_country),
    PatternRule::new("city_state", city_state),
];

/// Guesses the candidate's name from the first few non-empty lines.
pub fn extract_name(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(NAME_SCAN_LINES)
        .find(|line| looks_like_name(line))
        .map(String::from)
        .unwrap_or_default()
}

fn looks_like_name(line: &str) -> bool {
    if is_contact_line(line) {
        return false;
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    if !(2..=4).contains(&words.len()) {
        return false;
    }
    if words.iter().any(|w| {
        let w = w.trim_matches(|c: char| !c.is_alphabetic()).to_lowercase();
        NOT_A_NAME.contains(&w.as_str())
    }) {
        return false;
    }

    words.iter().all(|word| is_capitalized_word(word))
}

fn is_capitalized_word(word: &str) -> bool {
    word.starts_with(|c: char| c.is_uppercase())
        && word.chars().any(|c| c.is_alphabetic())
        && word
            .chars()
            .all(|c| c.is_alphabetic() || matches!(c, '.' | '-' | '\''))
}

pub fn extract_email(text: &str) -> String {
    find_str(&EMAIL_RE, text).unwrap_or_default()
}

pub fn extract_phone(text: &str) -> String {
    first_match(PHONE_RULES, text)
        .map(|phone| phone.trim().to_string())
        .unwrap_or_default()
}

/// Looks for a "City, ST 12345" / "City, State, Country" / "City, State"
/// fragment in the contact block above the first section heading. Lines are
/// split on the usual contact-bar separators first.
pub fn extract_location(text: &str) -> Location {
    lines_before_first_section(text)
        .into_iter()
        .take(LOCATION_SCAN_LINES)
        .flat_map(|line| line.split(['|', '•', '·', '\t']))
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty() && fragment.len() <= 60)
        .find_map(|fragment| first_match(LOCATION_RULES, fragment))
        .unwrap_or_default()
}

/// Lines carrying an email, a link or a phone number.
pub fn is_contact_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    line.contains('@') || lower.contains("http") || lower.contains("www.") || PHONE_SHAPE_RE.is_match(line)
}

fn north_american_phone(text: &str) -> Option<String> {
    find_str(&NORTH_AMERICAN_PHONE_RE, text)
}

fn indian_mobile_phone(text: &str) -> Option<String> {
    find_str(&INDIAN_MOBILE_RE, text)
}

fn uk_phone(text: &str) -> Option<String> {
    find_str(&UK_PHONE_RE, text)
}

fn international_phone(text: &str) -> Option<String> {
    find_str(&INTERNATIONAL_PHONE_RE, text)
}

fn city_state_zip(fragment: &str) -> Option<Location> {
    let caps = CITY_STATE_ZIP_RE.captures(fragment)?;
    Some(Location {
        city: caps[1].trim().to_string(),
        state: caps[2].to_string(),
        country: DEFAULT_COUNTRY.to_string(),
    })
}

fn city_state_country(fragment: &str) -> Option<Location> {
    let caps = CITY_STATE_COUNTRY_RE.captures(fragment)?;
    Some(Location {
        city: caps[1].trim().to_string(),
        state: caps[2].trim().to_string(),
        country: caps[3].trim().to_string(),
    })
}

fn city_state(fragment: &str) -> Option<Location> {
    let caps = CITY_STATE_RE.captures(fragment)?;
    let state = caps[2].trim().to_string();
    if state.split_whitespace().count() > 3 {
        return None;
    }
    let country = if is_state_code(&state) {
        DEFAULT_COUNTRY.to_string()
    } else {
        String::new()
    };
    Some(Location {
        city: caps[1].trim().to_string(),
        state,
        country,
    })
}

fn is_state_code(part: &str) -> bool {
    part.len() == 2 && part.chars().all(|c| c.is_ascii_uppercase())
}

fn find_str(re: &Regex, text: &str) -> Option<String> {
    re.find(text).map(|m| m.as_str().to_string())
}
