//! PDF text extraction for bill classification.
//!
//! Strategy:
//! - Prefer external `pdftotext` (quiet, UTF-8) when enabled and installed; it
//!   separates pages with form feeds.
//! - Fall back to `pdf-extract` on the in-memory bytes. Parser panics on
//!   malformed files are caught and reported as [`ExtractionFailure`].
//! - Normalize into one lowercase string: whitespace collapsed within a page,
//!   pages joined by a single space.

use std::{
    io::Write,
    panic::{self, AssertUnwindSafe},
    process::{Command, Stdio},
};

use tempfile::NamedTempFile;

use crate::{config::Config, error::ExtractionFailure};

const PDF_SIGNATURE: &[u8] = b"%PDF-";

/// Turns raw PDF bytes into per-page text, in page order.
pub trait TextExtractor: Send + Sync {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionFailure>;
}

#[derive(Debug, Clone)]
pub struct PdfTextExtractor {
    prefer_pdftotext: bool,
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self { prefer_pdftotext: true }
    }
}

impl PdfTextExtractor {
    pub fn new(prefer_pdftotext: bool) -> Self {
        Self { prefer_pdftotext }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.get_bool("PREFER_PDFTOTEXT"))
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractionFailure> {
        if !bytes.starts_with(PDF_SIGNATURE) {
            return Err(ExtractionFailure::new("missing %PDF- header"));
        }

        if self.prefer_pdftotext {
            match run_pdftotext(bytes) {
                Ok(raw) => return Ok(split_pages(&raw)),
                Err(why) => tracing::debug!(%why, "pdftotext unavailable, using pdf-extract"),
            }
        }

        let raw = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes)))
            .map_err(|_| ExtractionFailure::new("pdf parser crashed on this file"))?
            .map_err(|e| ExtractionFailure::new(e.to_string()))?;
        Ok(split_pages(&raw))
    }
}

/// `-q` silences glyph warnings, `-enc UTF-8` fixes the output encoding and
/// `-` writes to stdout.
fn run_pdftotext(bytes: &[u8]) -> std::io::Result<String> {
    let mut tmp = NamedTempFile::new()?;
    tmp.write_all(bytes)?;
    tmp.flush()?;

    let output = Command::new("pdftotext")
        .arg("-q")
        .arg("-enc")
        .arg("UTF-8")
        .arg(tmp.path())
        .arg("-")
        .stderr(Stdio::null())
        .output()?;

    if !output.status.success() {
        return Err(std::io::Error::other(format!("pdftotext exited with {}", output.status)));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Page boundaries are form feeds (\x0C) when present; otherwise one page.
fn split_pages(raw: &str) -> Vec<String> {
    raw.split('\u{000C}').map(str::to_string).collect()
}

/// Collapse whitespace within each page, join pages with a space, lowercase.
pub fn document_text(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| page.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn extract_document_text(bytes: &[u8], extractor: &dyn TextExtractor) -> Result<String, ExtractionFailure> {
    let pages = extractor.extract_pages(bytes)?;
    Ok(document_text(&pages))
}
