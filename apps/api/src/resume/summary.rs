use crate::resume::contact::is_contact_line;
use crate::resume::sections::{extract_section, lines_before_first_section, SUMMARY};

const MIN_SUMMARY_CHARS: usize = 50;
const MAX_SUMMARY_CHARS: usize = 1000;
const MIN_PROSE_WORDS: usize = 5;
const PROSE_PUNCTUATION: &str = ".,;:'\"!?()-&/%+";

/// The summary block, or the first prose paragraph above the first section
/// when there is no summary heading. Empty unless the cleaned text is at least
/// 50 and under 1000 characters.
pub fn extract_summary(text: &str) -> String {
    let block = extract_section(text, &SUMMARY).unwrap_or_else(|| leading_prose(text));
    let cleaned = clean_prose(&block);

    if (MIN_SUMMARY_CHARS..MAX_SUMMARY_CHARS).contains(&cleaned.chars().count()) {
        cleaned
    } else {
        String::new()
    }
}

fn leading_prose(text: &str) -> String {
    lines_before_first_section(text)
        .into_iter()
        .map(str::trim)
        .skip_while(|line| is_contact_line(line) || line.split_whitespace().count() < MIN_PROSE_WORDS)
        .take_while(|line| !line.is_empty() && !is_contact_line(line))
        .collect::<Vec<_>>()
        .join(" ")
}

fn clean_prose(block: &str) -> String {
    block
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() || PROSE_PUNCTUATION.contains(c) {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
