use crate::llm_client::prompts::NO_INVENTION_INSTRUCTION;
use crate::resume::ExtractionLimits;

/// Résumé text beyond this many characters is not sent to the model.
pub const MAX_PROMPT_RESUME_CHARS: usize = 15_000;

pub fn build_profile_prompt(resume_text: &str, limits: &ExtractionLimits) -> String {
    let text = truncate_chars(resume_text, MAX_PROMPT_RESUME_CHARS);
    format!(
        r#"Extract a structured candidate profile from the résumé below.

Return a JSON object with exactly these fields:
{{
  "full_name": string,
  "email": string,
  "phone": string,
  "city": string,
  "state": string,
  "country": string,
  "skills": [string],
  "experience": [{{"title": string, "company": string, "duration": string, "description": string}}],
  "education": [{{"degree": string, "institution": string, "year": string}}],
  "certifications": [{{"name": string, "issuer": string, "date": string}}],
  "years_of_experience": integer,
  "summary": string,
  "current_role": string
}}

Rules:
- At most {max_skills} skills, {max_experience} experience entries, {max_education} education entries and {max_certifications} certifications.
- List experience most recent first. "duration" keeps the document's wording, e.g. "Jan 2020 - Present".
- "years_of_experience" is the total professional experience in whole years, between 0 and 50.
- "current_role" is the title of the ongoing position, else the most recent one.
- {NO_INVENTION_INSTRUCTION}

RÉSUMÉ:
{text}"#,
        max_skills = limits.max_skills,
        max_experience = limits.max_experience,
        max_education = limits.max_education,
        max_certifications = limits.max_certifications,
    )
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_carries_limits_and_text() {
        let prompt = build_profile_prompt("Jane Smith\nRust engineer", &ExtractionLimits::default());
        assert!(prompt.contains("At most 20 skills, 5 experience entries"));
        assert!(prompt.ends_with("Jane Smith\nRust engineer"));
    }

    #[test]
    fn test_truncate_chars_on_char_boundary() {
        assert_eq!(truncate_chars("résumé", 2), "ré");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
