//! Flattened text from an uploaded PDF.
//!
//! Pages are read one at a time so that a single malformed page (or a panic
//! inside the PDF library) costs that page only. A document with no
//! extractable text at all is reported as [`PdfText::ImageBased`].

use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use thiserror::Error;

const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// Marker text standing in for an image-based (scanned) document.
pub const IMAGE_BASED_MARKER: &str = "[image-based PDF]";

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("file is not a PDF document")]
    InvalidDocument,

    #[error("failed to read PDF: {0}")]
    Read(String),

    #[error("failed to extract text from page {page}: {reason}")]
    PageExtraction { page: u32, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfText {
    Text(String),
    /// Zero extractable characters across all pages. Never fed to the
    /// field extractors.
    ImageBased,
}

impl PdfText {
    pub fn from_text(text: String) -> Self {
        if text.trim().is_empty() {
            PdfText::ImageBased
        } else {
            PdfText::Text(text)
        }
    }

    pub fn is_image_based(&self) -> bool {
        matches!(self, PdfText::ImageBased)
    }

    pub fn as_str(&self) -> &str {
        match self {
            PdfText::Text(text) => text,
            PdfText::ImageBased => IMAGE_BASED_MARKER,
        }
    }
}

fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_SIGNATURE)
}

/// Extracts the text of every page in page order. Lines within a page are
/// newline separated; pages are separated by a blank line.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<PdfText, PdfError> {
    if !is_pdf(bytes) {
        return Err(PdfError::InvalidDocument);
    }

    let document = match panic::catch_unwind(AssertUnwindSafe(|| Document::load_mem(bytes))) {
        Ok(Ok(document)) => document,
        Ok(Err(e)) => return Err(PdfError::Read(e.to_string())),
        Err(_) => return Err(PdfError::Read("PDF parser panicked".to_string())),
    };

    let pages = document.get_pages();
    let mut texts = Vec::with_capacity(pages.len());

    for &page in pages.keys() {
        match extract_page(&document, page) {
            Ok(text) if !text.is_empty() => texts.push(text),
            Ok(_) => tracing::debug!(page, "page has no text"),
            Err(e) => tracing::warn!(page, error = %e, "skipping page"),
        }
    }

    tracing::debug!(pages = pages.len(), pages_with_text = texts.len(), "extracted PDF text");
    Ok(PdfText::from_text(texts.join("\n\n")))
}

fn extract_page(document: &Document, page: u32) -> Result<String, PdfError> {
    let raw = panic::catch_unwind(AssertUnwindSafe(|| document.extract_text(&[page])))
        .map_err(|_| PdfError::PageExtraction {
            page,
            reason: "PDF parser panicked".to_string(),
        })?
        .map_err(|e| PdfError::PageExtraction {
            page,
            reason: e.to_string(),
        })?;

    let text = raw
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    Ok(text.trim().to_string())
}
