//! Work history: entries, total years and current role.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::resume::profile::{ExperienceEntry, MAX_YEARS_OF_EXPERIENCE};
use crate::resume::rules::{first_match, PatternRule};
use crate::resume::sections::{extract_section, EXPERIENCE};

const MONTH: &str = r"\b(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\b\.?";

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    let point = format!(r"(?:{MONTH}\s+)?(?:\d{{1,2}}/)?\d{{4}}");
    Regex::new(&format!(
        r"(?i)(?:{point}\s*(?:-|–|—|to)\s*(?:{point}|present|current|now)|\b\d{{1,2}}\+?\s*(?:years?|yrs?)\b)"
    ))
    .unwrap()
});

static BARE_DATE_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    let point = format!(r"(?:{MONTH}\s+)?(?:\d{{1,2}}/)?\d{{4}}");
    Regex::new(&format!(
        r"(?i)^[\s(]*(?:{point}(?:\s*(?:-|–|—|to)\s*(?:{point}|present|current|now))?|{MONTH})[\s)]*$"
    ))
    .unwrap()
});

static ENTRY_START_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<title>[^|@]{2,80}?)(?:\s+at\s+|\s*@\s*|\s*\|\s*|\s+[-–—]\s+)(?P<rest>\S.*)$")
        .unwrap()
});

static AT_COMPANY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<title>.+?)(?:\s+at\s+|\s*@\s*)(?P<company>.+)$").unwrap());
static PIPE_DELIMITED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<title>[^|]+?)\s*\|\s*(?P<company>[^|]+?)(?:\s*\|\s*(?P<duration>.+))?$").unwrap()
});
static COMMA_WITH_DATES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<title>[^,]+?),\s*(?P<company>[^,]+?),\s*(?P<duration>.*\d{4}.*)$").unwrap()
});
static DASH_DELIMITED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<title>.+?)\s+[-–—]\s+(?P<company>.+)$").unwrap());

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());
static YEARS_MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})\+?\s*(?:years?|yrs?)\b").unwrap());

const BULLETS: &[char] = &['-', '•', '*', '▪', '◦', '●', '–', '·'];
const MAX_TITLE_WORDS: usize = 6;
const TITLE_CONNECTIVES: &[&str] = &["of", "and", "for", "the", "in", "to", "&"];

/// Title / company / duration read from an entry's first line.
#[derive(Debug, Default, PartialEq)]
struct EntryHeader {
    title: String,
    company: String,
    duration: String,
}

const HEADER_RULES: &[PatternRule<EntryHeader>] = &[
    PatternRule::new("at_company", at_company),
    PatternRule::new("pipe_delimited", pipe_delimited),
    PatternRule::new("comma_with_dates", comma_with_dates),
    PatternRule::new("dash_delimited", dash_delimited),
];

/// Parses up to `max_entries` entries from the experience section. Without an
/// experience heading there is nothing to scope to and the result is empty.
pub fn extract_experience(text: &str, max_entries: usize) -> Vec<ExperienceEntry> {
    let Some(section) = extract_section(text, &EXPERIENCE) else {
        return Vec::new();
    };

    split_entries(&section)
        .iter()
        .filter_map(|block| parse_entry(block))
        .take(max_entries)
        .collect()
}

/// Sums the years covered by each entry, clamped to `[0, 50]`. Identical
/// ranges on different entries are counted once per entry.
pub fn total_years_of_experience(entries: &[ExperienceEntry], current_year: i32) -> u32 {
    let total: i64 = entries
        .iter()
        .map(|entry| duration_years(&entry.duration, current_year))
        .sum();
    total.clamp(0, i64::from(MAX_YEARS_OF_EXPERIENCE)) as u32
}

/// Title of the ongoing role, else the most recent (first listed) title.
pub fn current_role(entries: &[ExperienceEntry]) -> String {
    entries
        .iter()
        .find(|entry| is_ongoing(&entry.duration))
        .or_else(|| entries.first())
        .map(|entry| entry.title.clone())
        .unwrap_or_default()
}

fn duration_years(duration: &str, current_year: i32) -> i64 {
    let years: Vec<i64> = YEAR_RE
        .find_iter(duration)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();

    match years.as_slice() {
        [start, end, ..] => (end - start).max(0),
        [start] if is_ongoing(duration) => (i64::from(current_year) - start).max(0),
        _ => YEARS_MENTION_RE
            .captures(duration)
            .and_then(|caps| caps[1].parse().ok())
            .unwrap_or(0),
    }
}

fn is_ongoing(duration: &str) -> bool {
    let lower = duration.to_lowercase();
    lower.contains("present") || lower.contains("current") || lower.contains("now")
}

fn split_entries(section: &str) -> Vec<Vec<&str>> {
    let lines: Vec<&str> = section.lines().map(str::trim).collect();

    if lines.iter().any(|line| is_entry_start(line)) {
        let mut blocks: Vec<Vec<&str>> = Vec::new();
        for line in lines.into_iter().filter(|line| !line.is_empty()) {
            if is_entry_start(line) {
                blocks.push(vec![line]);
            } else if let Some(block) = blocks.last_mut() {
                block.push(line);
            }
        }
        return blocks;
    }

    lines
        .split(|line| line.is_empty())
        .filter(|block| !block.is_empty())
        .map(<[&str]>::to_vec)
        .collect()
}

/// "Title at/@/|/- Company" or "Title, Company, dates". The title part must
/// be short, digit-free and capitalised word by word, so neither
/// "Acme, 2017 - 2018" nor "Worked with the team at HQ" starts an entry.
fn is_entry_start(line: &str) -> bool {
    if line.len() > 120 || line.ends_with('.') || !line.starts_with(|c: char| c.is_uppercase()) {
        return false;
    }
    let short_title = |title: &str| {
        title.split_whitespace().count() <= MAX_TITLE_WORDS
            && !title.chars().any(|c| c.is_ascii_digit())
            && is_title_case(title)
    };
    ENTRY_START_RE
        .captures(line)
        .is_some_and(|caps| short_title(&caps["title"]))
        || COMMA_WITH_DATES_RE
            .captures(line)
            .is_some_and(|caps| short_title(&caps["title"]) && short_title(&caps["company"]))
}

/// No all-lowercase words apart from connectives ("Head of Data", "Senior iOS Developer").
fn is_title_case(title: &str) -> bool {
    title.split_whitespace().all(|word| {
        TITLE_CONNECTIVES.contains(&word.to_lowercase().as_str())
            || !word.chars().any(char::is_lowercase)
            || word.chars().any(char::is_uppercase)
    })
}

fn parse_entry(block: &[&str]) -> Option<ExperienceEntry> {
    let (first, rest) = block.split_first()?;

    let (mut header, consumed) = match first_match(HEADER_RULES, first) {
        Some(header) => (header, 1),
        None => two_line_header(block),
    };
    if header.title.is_empty() {
        return None;
    }

    if header.duration.is_empty() {
        if let Some(found) = rest.iter().find_map(|line| DURATION_RE.find(line)) {
            header.duration = found.as_str().trim().to_string();
        }
    }

    let description = block[consumed..]
        .iter()
        .filter(|line| !BARE_DATE_LINE_RE.is_match(line))
        .copied()
        .collect::<Vec<_>>()
        .join("\n");

    Some(ExperienceEntry {
        title: header.title,
        company: header.company,
        duration: header.duration,
        description,
    })
}

/// Title on the first line, company on the second unless it is a bullet or
/// a bare date.
fn two_line_header(block: &[&str]) -> (EntryHeader, usize) {
    let title = clean_part(block[0]).to_string();
    match block.get(1) {
        Some(line) if !line.starts_with(BULLETS) && !BARE_DATE_LINE_RE.is_match(line) => {
            let (company, duration) = split_trailing_duration(line);
            (
                EntryHeader {
                    title,
                    company,
                    duration,
                },
                2,
            )
        }
        _ => (
            EntryHeader {
                title,
                ..Default::default()
            },
            1,
        ),
    }
}

fn at_company(line: &str) -> Option<EntryHeader> {
    header_with_trailing_duration(AT_COMPANY_RE.captures(line)?)
}

fn pipe_delimited(line: &str) -> Option<EntryHeader> {
    let caps = PIPE_DELIMITED_RE.captures(line)?;
    let (company, trailing) = split_trailing_duration(&caps["company"]);
    let duration = caps
        .name("duration")
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or(trailing);
    build_header(&caps["title"], company, duration)
}

fn comma_with_dates(line: &str) -> Option<EntryHeader> {
    let caps = COMMA_WITH_DATES_RE.captures(line)?;
    let duration = DURATION_RE.find(&caps["duration"])?.as_str().trim().to_string();
    build_header(&caps["title"], clean_part(&caps["company"]).to_string(), duration)
}

fn dash_delimited(line: &str) -> Option<EntryHeader> {
    header_with_trailing_duration(DASH_DELIMITED_RE.captures(line)?)
}

fn header_with_trailing_duration(caps: Captures<'_>) -> Option<EntryHeader> {
    let (company, duration) = split_trailing_duration(&caps["company"]);
    build_header(&caps["title"], company, duration)
}

fn build_header(title: &str, company: String, duration: String) -> Option<EntryHeader> {
    let title = clean_part(title);
    if title.is_empty() || title.starts_with(BULLETS) {
        return None;
    }
    Some(EntryHeader {
        title: title.to_string(),
        company,
        duration,
    })
}

/// Splits "Google | Jan 2019 - Present" into ("Google", "Jan 2019 - Present").
fn split_trailing_duration(part: &str) -> (String, String) {
    match DURATION_RE.find(part) {
        Some(found) => (
            clean_part(&part[..found.start()]).to_string(),
            found.as_str().trim().to_string(),
        ),
        None => (clean_part(part).to_string(), String::new()),
    }
}

fn clean_part(part: &str) -> &str {
    part.trim()
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '|' | '(' | ')' | '-' | '–' | '—'))
}
