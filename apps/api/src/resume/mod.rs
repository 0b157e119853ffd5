//! Heuristic résumé parsing: PDF text extraction and the field extractors
//! that turn flattened text into a [`CandidateProfile`].

pub mod aggregator;
pub mod certifications;
pub mod contact;
pub mod education;
pub mod experience;
pub mod pdf_text;
pub mod profile;
pub mod rules;
pub mod sections;
pub mod skills;
pub mod summary;

pub use aggregator::extract_profile;
pub use pdf_text::{extract_pdf_text, PdfError, PdfText};
pub use profile::{CandidateProfile, ExtractionLimits};
