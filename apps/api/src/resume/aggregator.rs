use chrono::Datelike;

use crate::resume::certifications::extract_certifications;
use crate::resume::contact::{extract_email, extract_location, extract_name, extract_phone};
use crate::resume::education::extract_education;
use crate::resume::experience::{current_role, extract_experience, total_years_of_experience};
use crate::resume::profile::{CandidateProfile, ExtractionLimits};
use crate::resume::skills::extract_skills;
use crate::resume::summary::extract_summary;

/// Runs every field extractor over flattened résumé text.
///
/// Never fails: fields with no match keep their empty defaults. The
/// image-based marker must not be passed here.
pub fn extract_profile(text: &str, limits: &ExtractionLimits) -> CandidateProfile {
    build_profile(text, limits, chrono::Utc::now().year())
}

/// [`extract_profile`] with an explicit year for "Present" durations.
pub fn build_profile(text: &str, limits: &ExtractionLimits, current_year: i32) -> CandidateProfile {
    let location = extract_location(text);
    let experience = extract_experience(text, limits.max_experience);
    let years_of_experience = total_years_of_experience(&experience, current_year);
    let current_role = current_role(&experience);

    let profile = CandidateProfile {
        full_name: extract_name(text),
        email: extract_email(text),
        phone: extract_phone(text),
        city: location.city,
        state: location.state,
        country: location.country,
        skills: extract_skills(text, limits.max_skills),
        experience,
        education: extract_education(text, limits.max_education),
        certifications: extract_certifications(text, limits.max_certifications),
        years_of_experience,
        summary: extract_summary(text),
        current_role,
    };

    tracing::debug!(
        has_name = !profile.full_name.is_empty(),
        has_email = !profile.email.is_empty(),
        skills = profile.skills.len(),
        experience = profile.experience.len(),
        education = profile.education.len(),
        certifications = profile.certifications.len(),
        years = profile.years_of_experience,
        "heuristic profile extracted"
    );

    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "\
Jane Smith
jane.smith@example.com | (555) 123-4567 | Austin, TX 78701

SUMMARY
Backend engineer with eight years of experience building payment platforms in Rust and Go.

EXPERIENCE
Senior Engineer at Globex | Jan 2020 - Present
- Led the payments platform team
Software Engineer | Initech | 2016 - 2019
Built reporting pipelines in Python

EDUCATION
B.S. Computer Science, University of Texas at Austin, 2016

SKILLS
Rust, Go, PostgreSQL, Kubernetes

CERTIFICATIONS
AWS Certified Developer - Amazon - 2021
";

    #[test]
    fn test_full_resume() {
        let profile = build_profile(RESUME, &ExtractionLimits::default(), 2026);

        assert_eq!(profile.full_name, "Jane Smith");
        assert_eq!(profile.email, "jane.smith@example.com");
        assert_eq!(profile.phone, "(555) 123-4567");
        assert_eq!(profile.city, "Austin");
        assert_eq!(profile.state, "TX");
        assert_eq!(profile.country, "USA");

        assert_eq!(profile.skills, vec!["Go", "Rust", "PostgreSQL", "Kubernetes"]);

        assert_eq!(profile.experience.len(), 2);
        assert_eq!(profile.experience[0].company, "Globex");
        assert_eq!(profile.experience[1].title, "Software Engineer");
        assert_eq!(profile.years_of_experience, 9);
        assert_eq!(profile.current_role, "Senior Engineer");

        assert_eq!(profile.education.len(), 1);
        assert_eq!(profile.education[0].degree, "B.S. Computer Science");
        assert_eq!(profile.education[0].institution, "University of Texas at Austin");
        assert_eq!(profile.education[0].year, "2016");

        assert_eq!(profile.certifications.len(), 1);
        assert_eq!(profile.certifications[0].issuer, "Amazon");

        assert!(profile.summary.starts_with("Backend engineer"));
    }

    #[test]
    fn test_empty_text_yields_defaults() {
        let profile = build_profile("", &ExtractionLimits::default(), 2026);
        assert_eq!(profile, CandidateProfile::default());
    }

    fn assert_within_bounds(profile: &CandidateProfile) {
        let limits = ExtractionLimits::default();
        assert!(profile.skills.len() <= limits.max_skills);
        assert!(profile.experience.len() <= limits.max_experience);
        assert!(profile.education.len() <= limits.max_education);
        assert!(profile.certifications.len() <= limits.max_certifications);
        assert!(profile.years_of_experience <= 50);

        let mut lowered: Vec<String> = profile.skills.iter().map(|s| s.to_lowercase()).collect();
        lowered.sort();
        lowered.dedup();
        assert_eq!(lowered.len(), profile.skills.len());

        let summary_len = profile.summary.chars().count();
        assert!(summary_len == 0 || (50..1000).contains(&summary_len));
    }

    #[test]
    fn test_hostile_text_keeps_declared_shape() {
        let long_line = format!("{}{}", "Engineer at Acme ".repeat(6_000), "x".repeat(100_000));
        let many_jobs = format!(
            "EXPERIENCE\n{}",
            "Engineer at Acme | 1950 - 2020\n".repeat(8)
        );
        let inputs = [
            "ééé ñññ\n日本語のテキスト\n🦀🦀🦀\nÅ, Ø, Ü".to_string(),
            long_line,
            "EXPERIENCE\nEDUCATION\nSKILLS\nCERTIFICATIONS\nSUMMARY".to_string(),
            "----\n====\n|||\n•••\n, , ,\n- - -".to_string(),
            "Skills:".to_string(),
            "Skills: ,,,;;; | •".to_string(),
            many_jobs,
            "Rust, ".repeat(20_000),
        ];

        for input in &inputs {
            assert_within_bounds(&build_profile(input, &ExtractionLimits::default(), 2026));
        }
    }

    #[test]
    fn test_structure_without_content_yields_empty_fields() {
        for input in [
            "EXPERIENCE\nEDUCATION\nSKILLS\nCERTIFICATIONS\nSUMMARY",
            "----\n====\n|||\n•••\n, , ,",
            "Skills:",
        ] {
            let profile = build_profile(input, &ExtractionLimits::default(), 2026);
            assert!(profile.skills.is_empty(), "{input:?}");
            assert!(profile.experience.is_empty(), "{input:?}");
            assert!(profile.education.is_empty(), "{input:?}");
            assert!(profile.certifications.is_empty(), "{input:?}");
            assert_eq!(profile.years_of_experience, 0);
            assert_eq!(profile.summary, "");
        }
    }

    #[test]
    fn test_years_clamped_across_many_entries() {
        let text = format!("EXPERIENCE\n{}", "Engineer at Acme | 1950 - 2020\n".repeat(8));
        let profile = build_profile(&text, &ExtractionLimits::default(), 2026);
        assert_eq!(profile.experience.len(), 5);
        assert_eq!(profile.years_of_experience, 50);
    }

    #[test]
    fn test_limits_are_applied() {
        let limits = ExtractionLimits {
            max_skills: 2,
            max_experience: 1,
            ..Default::default()
        };
        let profile = build_profile(RESUME, &limits, 2026);
        assert_eq!(profile.skills.len(), 2);
        assert_eq!(profile.experience.len(), 1);
        assert_eq!(profile.years_of_experience, 6);
    }
}
