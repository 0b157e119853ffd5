use serde::{Deserialize, Serialize};

/// Upper bound for `years_of_experience`.
pub const MAX_YEARS_OF_EXPERIENCE: u32 = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub date: String,
}

/// Structured candidate profile produced from one résumé.
///
/// Every field has an empty default so a sparse document still yields a
/// complete record the user can correct by hand. `#[serde(default)]` lets the
/// same type absorb partial JSON from the AI analyzer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateProfile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub certifications: Vec<Certification>,
    pub years_of_experience: u32,
    pub summary: String,
    pub current_role: String,
}

impl CandidateProfile {
    /// Truncates list fields to `limits`, drops duplicate skills and clamps
    /// the experience total. Heuristic output already satisfies this; AI
    /// output and user edits are passed through it before use.
    pub fn within_limits(mut self, limits: &ExtractionLimits) -> Self {
        let mut seen: Vec<String> = Vec::new();
        self.skills.retain(|skill| {
            let skill = skill.trim();
            if skill.is_empty() || seen.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
                return false;
            }
            seen.push(skill.to_string());
            true
        });
        self.skills.truncate(limits.max_skills);
        self.experience.truncate(limits.max_experience);
        self.education.truncate(limits.max_education);
        self.certifications.truncate(limits.max_certifications);
        self.years_of_experience = self.years_of_experience.min(MAX_YEARS_OF_EXPERIENCE);
        self
    }
}

/// Caps applied to the list fields of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionLimits {
    pub max_skills: usize,
    pub max_experience: usize,
    pub max_education: usize,
    pub max_certifications: usize,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            max_skills: 20,
            max_experience: 5,
            max_education: 3,
            max_certifications: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = ExtractionLimits::default();
        assert_eq!(limits.max_skills, 20);
        assert_eq!(limits.max_experience, 5);
        assert_eq!(limits.max_education, 3);
        assert_eq!(limits.max_certifications, 10);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let profile: CandidateProfile =
            serde_json::from_str(r#"{"full_name": "Jane Smith", "experience": [{"title": "Engineer"}]}"#)
                .unwrap();
        assert_eq!(profile.full_name, "Jane Smith");
        assert_eq!(profile.experience[0].title, "Engineer");
        assert_eq!(profile.experience[0].company, "");
        assert!(profile.skills.is_empty());
        assert_eq!(profile.years_of_experience, 0);
    }

    #[test]
    fn test_within_limits_truncates_and_dedups() {
        let profile = CandidateProfile {
            skills: vec!["Rust".into(), "rust".into(), " ".into(), "Go".into(), "SQL".into()],
            education: vec![EducationEntry::default(); 6],
            years_of_experience: 73,
            ..Default::default()
        };
        let limits = ExtractionLimits {
            max_skills: 2,
            ..Default::default()
        };
        let profile = profile.within_limits(&limits);
        assert_eq!(profile.skills, vec!["Rust", "Go"]);
        assert_eq!(profile.education.len(), 3);
        assert_eq!(profile.years_of_experience, MAX_YEARS_OF_EXPERIENCE);
    }
}
