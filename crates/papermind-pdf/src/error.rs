use thiserror::Error;

/// Errors emitted while turning a PDF into text.
#[derive(Debug, Error)]
pub enum PdfError {
    /// The bytes do not decode as a PDF document.
    #[error("failed to parse PDF: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, PdfError>;
