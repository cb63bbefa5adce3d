//! Plain-text extraction from uploaded PDFs.
//!
//! ```no_run
//! use papermind_pdf::{extract_documents, UploadedFile};
//!
//! let file = UploadedFile::new("paper.pdf", std::fs::read("paper.pdf").unwrap());
//! let extraction = extract_documents(&[file]);
//! for failure in &extraction.failures {
//!     eprintln!("{}: {}", failure.file, failure.message);
//! }
//! println!("{}", extraction.text);
//! ```

mod error;
mod extract;

pub use error::{PdfError, Result};
pub use extract::{
    extract_documents, extract_text, Extraction, ExtractionFailure, UploadedFile,
};
