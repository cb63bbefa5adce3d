use lopdf::Document;

use crate::error::{PdfError, Result};

/// A PDF as received from the user, before extraction.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// A file whose text could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionFailure {
    pub file: String,
    pub message: String,
}

/// Combined text of a batch of uploads plus whatever went wrong on the way.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub text: String,
    pub files: usize,
    pub failures: Vec<ExtractionFailure>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// One-line summary for the shells.
    pub fn notice(&self) -> String {
        if self.is_empty() {
            "PDF processed but no text could be extracted".to_string()
        } else {
            format!(
                "PDF processed successfully ({} files, {} characters)",
                self.files,
                self.char_count()
            )
        }
    }
}

/// Text of every page in order, one page per line block.
///
/// Trailing whitespace of each page is dropped and pages with no text are
/// skipped. A page whose content cannot be decoded is skipped with a warning;
/// only a document that cannot be opened at all is an error.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let doc = Document::load_mem(bytes).map_err(|e| PdfError::Parse(e.to_string()))?;

    let mut pages = Vec::new();
    for page_number in doc.get_pages().into_keys() {
        match doc.extract_text(&[page_number]) {
            Ok(text) => {
                let text = text.trim_end();
                if !text.is_empty() {
                    pages.push(text.to_string());
                }
            }
            Err(error) => {
                log::warn!("Skipping page {}: {}", page_number, error);
            }
        }
    }

    Ok(pages.join("\n"))
}

/// Extracts every upload in order and joins the results with a blank line.
///
/// Never fails: a file that cannot be read contributes no text and is listed
/// in [`Extraction::failures`].
pub fn extract_documents(files: &[UploadedFile]) -> Extraction {
    let mut extraction = Extraction {
        files: files.len(),
        ..Extraction::default()
    };

    for file in files {
        match extract_text(&file.bytes) {
            Ok(text) if text.is_empty() => {
                log::warn!("[{}] No text found", file.name);
            }
            Ok(text) => {
                log::debug!("[{}] Extracted {} characters", file.name, text.chars().count());
                if !extraction.text.is_empty() {
                    extraction.text.push_str("\n\n");
                }
                extraction.text.push_str(&text);
            }
            Err(error) => {
                log::error!("[{}] {}", file.name, error);
                extraction.failures.push(ExtractionFailure {
                    file: file.name.clone(),
                    message: error.to_string(),
                });
            }
        }
    }

    extraction
}
