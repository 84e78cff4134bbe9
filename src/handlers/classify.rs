//! Classify (and optionally upload) a batch of bills, then print the report.

use std::sync::Arc;

use anyhow::{Context, Result};
use billsort::{
    batch::{run_batch, BatchOptions, BatchReport, Submission},
    config::Config,
    external::backend::BackendClient,
    indicators::IndicatorSet,
    printer::{MarkdownPrinter, TextPrinter},
    utils::pdf::PdfTextExtractor,
};

use crate::cli::Cli;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Json,
    Markdown,
    Text { color: bool },
}

impl Output {
    /// `--json` wins, then `--md`. Otherwise Markdown only on a terminal with
    /// `PRETTIFY_MARKDOWN` on and no `--no-md`; colors only on a terminal.
    pub fn choose(args: &Cli, stdout_is_tty: bool, prettify_markdown: bool) -> Self {
        if args.json {
            Self::Json
        } else if args.md || (!args.no_md && stdout_is_tty && prettify_markdown) {
            Self::Markdown
        } else {
            Self::Text { color: stdout_is_tty }
        }
    }
}

pub async fn run(args: &Cli, cfg: &Config, indicators: IndicatorSet, output: Output) -> Result<BatchReport> {
    let submission = if args.upload {
        let hotel_id = args.hotel.clone().context("--upload needs --hotel")?;
        let client = BackendClient::from_config(cfg).context("building backend client")?;
        tracing::info!(url = %client.upload_url(), hotel = %hotel_id, "uploading bills");
        Some(Submission { client, hotel_id })
    } else {
        None
    };

    let options = BatchOptions {
        concurrency: args
            .concurrency
            .map(usize::from)
            .unwrap_or_else(|| cfg.upload_concurrency()),
        allow_unknown: args.allow_unknown,
        submission,
    };

    let report = run_batch(
        args.files.clone(),
        &options,
        Arc::new(indicators),
        Arc::new(PdfTextExtractor::from_config(cfg)),
    )
    .await;

    match output {
        Output::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Output::Markdown => MarkdownPrinter::default().print_report(&report),
        Output::Text { color } => TextPrinter { color }.print_report(&report),
    }
    Ok(report)
}
