//! Batch processing: every file is classified (and optionally uploaded) as an
//! independent task. One file failing never stops the others.

use std::{path::PathBuf, sync::Arc};

use futures::{stream, StreamExt};
use serde::Serialize;

use crate::{
    classifier::{classify_pdf, unknown_classification, Classification},
    error::ExtractionFailure,
    external::backend::{BackendClient, UploadReceipt},
    indicators::IndicatorSet,
    utils::{
        document::{read_bill_file, upload_file_name},
        pdf::TextExtractor,
    },
};

/// Where classified bills go when the batch uploads.
#[derive(Debug, Clone)]
pub struct Submission {
    pub client: BackendClient,
    pub hotel_id: String,
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Files in flight at once.
    pub concurrency: usize,
    /// Upload bills whose type could not be determined (after warning).
    pub allow_unknown: bool,
    /// `None` classifies only.
    pub submission: Option<Submission>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self { concurrency: 4, allow_unknown: false, submission: None }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// Classify-only run with a definite bill type.
    Classified { classification: Classification },
    /// Bill type unknown; held back from the backend.
    NeedsReview { classification: Classification },
    Uploaded { classification: Classification, receipt: UploadReceipt },
    UploadFailed { classification: Classification, reason: String },
    /// Never uploaded; classification is the Unknown/Unknown default.
    ExtractionFailed { classification: Classification, failure: ExtractionFailure },
    Unreadable { reason: String },
}

impl FileStatus {
    pub fn classification(&self) -> Option<&Classification> {
        match self {
            Self::Classified { classification }
            | Self::NeedsReview { classification }
            | Self::Uploaded { classification, .. }
            | Self::UploadFailed { classification, .. }
            | Self::ExtractionFailed { classification, .. } => Some(classification),
            Self::Unreadable { .. } => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::UploadFailed { .. } | Self::ExtractionFailed { .. } | Self::Unreadable { .. }
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Classified { .. } => "classified",
            Self::NeedsReview { .. } => "needs review",
            Self::Uploaded { .. } => "uploaded",
            Self::UploadFailed { .. } => "upload failed",
            Self::ExtractionFailed { .. } => "extraction failed",
            Self::Unreadable { .. } => "unreadable",
        }
    }

    /// One-line explanation for failures and warnings.
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::NeedsReview { classification } => Some(format!(
                "could not tell gas from electricity ({} gas / {} electricity indicators)",
                classification.gas_hits, classification.electricity_hits
            )),
            Self::UploadFailed { reason, .. } | Self::Unreadable { reason } => Some(reason.clone()),
            Self::ExtractionFailed { failure, .. } => Some(failure.to_string()),
            Self::Classified { .. } | Self::Uploaded { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub classified: usize,
    pub needs_review: usize,
    pub uploaded: usize,
    pub upload_failed: usize,
    pub extraction_failed: usize,
    pub unreadable: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn summary(&self) -> BatchSummary {
        let mut s = BatchSummary { total: self.files.len(), ..Default::default() };
        for f in &self.files {
            match f.status {
                FileStatus::Classified { .. } => s.classified += 1,
                FileStatus::NeedsReview { .. } => s.needs_review += 1,
                FileStatus::Uploaded { .. } => s.uploaded += 1,
                FileStatus::UploadFailed { .. } => s.upload_failed += 1,
                FileStatus::ExtractionFailed { .. } => s.extraction_failed += 1,
                FileStatus::Unreadable { .. } => s.unreadable += 1,
            }
        }
        s
    }

    pub fn has_failures(&self) -> bool {
        self.files.iter().any(|f| f.status.is_failure())
    }
}

struct BatchContext<'a> {
    options: &'a BatchOptions,
    indicators: Arc<IndicatorSet>,
    extractor: Arc<dyn TextExtractor>,
}

/// Process `files` with at most `options.concurrency` in flight. Reports come
/// back in input order.
pub async fn run_batch(
    files: Vec<PathBuf>,
    options: &BatchOptions,
    indicators: Arc<IndicatorSet>,
    extractor: Arc<dyn TextExtractor>,
) -> BatchReport {
    let ctx = BatchContext { options, indicators, extractor };
    let concurrency = options.concurrency.max(1);

    let files = stream::iter(files)
        .map(|path| process_file(path, &ctx))
        .buffered(concurrency)
        .collect::<Vec<_>>()
        .await;

    BatchReport { files }
}

async fn process_file(path: PathBuf, ctx: &BatchContext<'_>) -> FileReport {
    let status = file_status(&path, ctx).await;
    match &status {
        s if s.is_failure() => {
            tracing::warn!(file = %path.display(), status = s.label(), detail = ?s.detail(), "bill not processed")
        }
        FileStatus::NeedsReview { .. } => {
            tracing::warn!(file = %path.display(), "bill type is ambiguous, holding back")
        }
        s => tracing::info!(file = %path.display(), status = s.label(), "bill processed"),
    }
    FileReport { file: path, status }
}

async fn file_status(path: &std::path::Path, ctx: &BatchContext<'_>) -> FileStatus {
    let bytes = match read_bill_file(path).await {
        Ok(b) => b,
        Err(e) => return FileStatus::Unreadable { reason: e.to_string() },
    };

    // PDF parsing is CPU-bound; keep it off the async workers.
    let indicators = Arc::clone(&ctx.indicators);
    let extractor = Arc::clone(&ctx.extractor);
    let joined = tokio::task::spawn_blocking(move || {
        let result = classify_pdf(&bytes, &indicators, extractor.as_ref());
        (bytes, result)
    })
    .await;

    let (bytes, classification) = match joined {
        Ok((bytes, Ok(c))) => (bytes, c),
        Ok((_, Err(failure))) => return extraction_failed(failure),
        Err(e) => return extraction_failed(ExtractionFailure::new(format!("classification task failed: {e}"))),
    };
    tracing::debug!(
        file = %path.display(),
        supplier = %classification.supplier,
        bill_type = %classification.bill_type,
        gas_hits = classification.gas_hits,
        electricity_hits = classification.electricity_hits,
        "classified"
    );

    let Some(submission) = &ctx.options.submission else {
        return if classification.is_ambiguous() {
            FileStatus::NeedsReview { classification }
        } else {
            FileStatus::Classified { classification }
        };
    };

    if classification.is_ambiguous() {
        if !ctx.options.allow_unknown {
            return FileStatus::NeedsReview { classification };
        }
        tracing::warn!(file = %path.display(), "uploading bill with unknown utility type");
    }

    match submission
        .client
        .upload_bill(&submission.hotel_id, &upload_file_name(path), bytes, &classification)
        .await
    {
        Ok(receipt) => FileStatus::Uploaded { classification, receipt },
        Err(e) => FileStatus::UploadFailed { classification, reason: e.to_string() },
    }
}

fn extraction_failed(failure: ExtractionFailure) -> FileStatus {
    FileStatus::ExtractionFailed { classification: unknown_classification(), failure }
}
