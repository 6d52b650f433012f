//! Text extraction from input documents
//!
//! PDF documents are decoded with [`pdf_extract`]. The decoder can panic on
//! malformed input instead of returning an error, so decoding runs behind
//! [`std::panic::catch_unwind`] and a panic is reported as a decode failure.
//!
//! Plain-text documents are read verbatim, which is useful for text that has
//! already been extracted by another tool.

use std::{
    ffi::OsStr,
    io,
    panic::{self, AssertUnwindSafe},
    path::{Path, PathBuf},
};

use tracing::{debug, instrument, warn};

/// The kind of document being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// A PDF document, decoded to plain text.
    Pdf,
    /// A UTF-8 text document, used as-is.
    Text,
}

impl Source {
    /// Infers the source kind from a file extension.
    ///
    /// `.txt` and `.text` files are read as text; everything else is decoded
    /// as PDF.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("txt" | "text") => Self::Text,
            _ => Self::Pdf,
        }
    }
}

/// Reads the document at `path` and returns its plain text, with the line
/// breaks of the decoded stream preserved.
///
/// # Errors
///
/// Returns an error if the file cannot be read or cannot be decoded as text.
#[instrument(level = "debug")]
pub fn load_text(path: &Path, source: Source) -> Result<String, ExtractionError> {
    let bytes = std::fs::read(path).map_err(|source| ExtractionError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(bytes = bytes.len(), "read input document");

    let text = match source {
        Source::Pdf => decode_pdf(&bytes),
        Source::Text => String::from_utf8(bytes).map_err(|e| e.to_string()),
    }
    .map_err(|message| ExtractionError::Decode {
        path: path.to_path_buf(),
        message,
    })?;

    if text.trim().is_empty() {
        warn!(
            "No text extracted from {}; it may be a scanned document",
            path.display()
        );
    }

    Ok(text)
}

/// Decodes a PDF byte buffer to plain text.
fn decode_pdf(bytes: &[u8]) -> Result<String, String> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }));
    match result {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(format!("PDF extraction failed: {e}")),
        Err(_) => Err("PDF extraction panicked (malformed document)".to_string()),
    }
}

/// Errors that can occur while extracting text from an input document.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The input file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        /// The input path.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The input could not be decoded as text.
    #[error("Failed to extract text from {}: {message}", path.display())]
    Decode {
        /// The input path.
        path: PathBuf,
        /// The decoder's description of the failure.
        message: String,
    },
}
