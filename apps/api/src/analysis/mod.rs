//! Résumé analysis: an AI analyzer first, the heuristic field extractors as
//! the fallback, and a fixed answer for image-based documents.
//!
//! `AppState` holds a [`ResumeAnalyzer`]; the AI backend is an
//! `Arc<dyn ProfileAnalyzer>` chosen at startup from config.

pub mod handlers;
pub mod prompts;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};
use crate::resume::{extract_profile, CandidateProfile, ExtractionLimits, PdfText};

pub const IMAGE_BASED_NOTE: &str =
    "This document appears to be image-based. Please upload a text-based CV.";
pub const FALLBACK_NOTE: &str =
    "AI analysis was unavailable, so fields were filled in by pattern matching. Please review them.";

// ────────────────────────────────────────────────────────────────────────────
// Output model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisSource {
    Ai,
    Heuristic,
    ImageBased,
    /// Typed in or corrected by the user.
    Manual,
}

impl AnalysisSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisSource::Ai => "ai",
            AnalysisSource::Heuristic => "heuristic",
            AnalysisSource::ImageBased => "image_based",
            AnalysisSource::Manual => "manual",
        }
    }
}

/// A profile plus where it came from. `note` is shown to the user above the
/// pre-filled form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileAnalysis {
    pub profile: CandidateProfile,
    pub source: AnalysisSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ProfileAnalysis {
    pub fn image_based() -> Self {
        Self {
            profile: CandidateProfile::default(),
            source: AnalysisSource::ImageBased,
            note: Some(IMAGE_BASED_NOTE.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("analysis timed out after {0:?}")]
    Timeout(Duration),
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// One way of turning flattened résumé text into a profile.
#[async_trait]
pub trait ProfileAnalyzer: Send + Sync {
    fn source(&self) -> AnalysisSource;

    async fn analyze(&self, text: &str) -> Result<CandidateProfile, AnalyzerError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmProfileAnalyzer
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmProfileAnalyzer {
    llm: LlmClient,
    limits: ExtractionLimits,
}

impl LlmProfileAnalyzer {
    pub fn new(llm: LlmClient, limits: ExtractionLimits) -> Self {
        Self { llm, limits }
    }
}

#[async_trait]
impl ProfileAnalyzer for LlmProfileAnalyzer {
    fn source(&self) -> AnalysisSource {
        AnalysisSource::Ai
    }

    async fn analyze(&self, text: &str) -> Result<CandidateProfile, AnalyzerError> {
        let prompt = prompts::build_profile_prompt(text, &self.limits);
        Ok(self.llm.call_json(&prompt, JSON_ONLY_SYSTEM).await?)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// HeuristicProfileAnalyzer
// ────────────────────────────────────────────────────────────────────────────

/// The regex field extractors. Never fails.
pub struct HeuristicProfileAnalyzer {
    limits: ExtractionLimits,
}

impl HeuristicProfileAnalyzer {
    pub fn new(limits: ExtractionLimits) -> Self {
        Self { limits }
    }

    pub fn extract(&self, text: &str) -> CandidateProfile {
        extract_profile(text, &self.limits)
    }
}

#[async_trait]
impl ProfileAnalyzer for HeuristicProfileAnalyzer {
    fn source(&self) -> AnalysisSource {
        AnalysisSource::Heuristic
    }

    async fn analyze(&self, text: &str) -> Result<CandidateProfile, AnalyzerError> {
        Ok(self.extract(text))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestration
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ResumeAnalyzer {
    primary: Option<Arc<dyn ProfileAnalyzer>>,
    fallback: Arc<HeuristicProfileAnalyzer>,
    limits: ExtractionLimits,
    timeout: Duration,
}

impl ResumeAnalyzer {
    /// `primary` is `None` when no AI backend is configured; every request
    /// then goes straight to the heuristic extractors.
    pub fn new(
        primary: Option<Arc<dyn ProfileAnalyzer>>,
        limits: ExtractionLimits,
        timeout: Duration,
    ) -> Self {
        Self {
            primary,
            fallback: Arc::new(HeuristicProfileAnalyzer::new(limits)),
            limits,
            timeout,
        }
    }

    pub fn limits(&self) -> &ExtractionLimits {
        &self.limits
    }

    /// Always produces an analysis. Image-based documents get an empty
    /// profile with a note; AI failures and timeouts fall back to the
    /// heuristic extractors.
    pub async fn analyze(&self, text: &PdfText) -> ProfileAnalysis {
        if text.is_image_based() {
            info!("document is image-based, returning empty profile");
            return ProfileAnalysis::image_based();
        }
        let text = text.as_str();

        let Some(primary) = &self.primary else {
            return self.heuristic(text, None);
        };

        match self.run_primary(primary.as_ref(), text).await {
            Ok(profile) => ProfileAnalysis {
                profile: profile.within_limits(&self.limits),
                source: primary.source(),
                note: None,
            },
            Err(e) => {
                warn!(error = %e, "AI analysis failed, falling back to heuristic extraction");
                self.heuristic(text, Some(FALLBACK_NOTE.to_string()))
            }
        }
    }

    async fn run_primary(
        &self,
        primary: &dyn ProfileAnalyzer,
        text: &str,
    ) -> Result<CandidateProfile, AnalyzerError> {
        tokio::time::timeout(self.timeout, primary.analyze(text))
            .await
            .map_err(|_| AnalyzerError::Timeout(self.timeout))?
    }

    fn heuristic(&self, text: &str, note: Option<String>) -> ProfileAnalysis {
        ProfileAnalysis {
            profile: self.fallback.extract(text),
            source: self.fallback.source(),
            note,
        }
    }
}
