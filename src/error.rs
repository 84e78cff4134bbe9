use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// PDF text could not be extracted (corrupt file, image-only scan, parser crash).
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("text extraction failed: {reason}")]
pub struct ExtractionFailure {
    pub reason: String,
}

impl ExtractionFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[derive(Debug, Error)]
pub enum IndicatorError {
    #[error("empty entry in {0}")]
    EmptyEntry(&'static str),

    #[error("'{0}' is listed as both a gas and an electricity indicator")]
    Overlap(String),

    #[error("reading indicator file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing indicator file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum BillError {
    #[error("bill file not found: {0}")]
    NotFound(PathBuf),

    #[error("'{0}' is not a file")]
    NotAFile(PathBuf),

    #[error("unsupported bill file type '.{extension}' for {path} (expected .pdf)")]
    Unsupported { path: PathBuf, extension: String },

    #[error("reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("backend rejected upload: {status} - {body}")]
    Upload { status: reqwest::StatusCode, body: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}
