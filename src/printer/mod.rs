//! Printers: colored status lines, markdown summary (termimad) and JSON.

use owo_colors::OwoColorize;
use termimad::MadSkin;

use crate::{
    batch::{BatchReport, FileReport, FileStatus},
    indicators::IndicatorSet,
};

pub struct TextPrinter {
    pub color: bool,
}

impl TextPrinter {
    pub fn print_report(&self, report: &BatchReport) {
        for f in &report.files {
            println!("{}", self.status_line(f));
        }
        let s = report.summary();
        println!(
            "\n{} files: {} uploaded, {} classified, {} need review, {} failed",
            s.total,
            s.uploaded,
            s.classified,
            s.needs_review,
            s.upload_failed + s.extraction_failed + s.unreadable
        );
    }

    pub fn status_line(&self, f: &FileReport) -> String {
        let name = f.file.display().to_string();
        let what = match f.status.classification() {
            Some(c) => format!("{} / {}", c.supplier, c.bill_type),
            None => "-".to_string(),
        };
        let label = f.status.label();
        let label = if !self.color {
            label.to_string()
        } else {
            match &f.status {
                FileStatus::Uploaded { .. } | FileStatus::Classified { .. } => label.green().to_string(),
                FileStatus::NeedsReview { .. } => label.yellow().to_string(),
                _ => label.red().to_string(),
            }
        };
        match f.status.detail() {
            Some(detail) => format!("{}  {}  [{}] {}", name, what, label, detail),
            None => format!("{}  {}  [{}]", name, what, label),
        }
    }
}

#[derive(Default)]
pub struct MarkdownPrinter {
    pub skin: MadSkin,
}

impl MarkdownPrinter {
    pub fn print(&self, text: &str) {
        self.skin.print_text(text);
        println!();
    }

    pub fn print_report(&self, report: &BatchReport) {
        self.print(&report_markdown(report));
    }
}

fn cell(s: &str) -> String {
    s.replace('|', "/")
}

pub fn report_markdown(report: &BatchReport) -> String {
    let mut md = String::from("|File|Supplier|Type|Status|Detail|\n|:-|:-|:-|:-|:-|\n");
    for f in &report.files {
        let (supplier, bill_type) = match f.status.classification() {
            Some(c) => (c.supplier.clone(), c.bill_type.to_string()),
            None => ("-".into(), "-".into()),
        };
        md.push_str(&format!(
            "|{}|{}|{}|{}|{}|\n",
            cell(&f.file.display().to_string()),
            cell(&supplier),
            bill_type,
            f.status.label(),
            cell(&f.status.detail().unwrap_or_default())
        ));
    }
    let s = report.summary();
    md.push_str(&format!(
        "\n**{}** files, **{}** uploaded, **{}** classified, **{}** need review, **{}** failed\n",
        s.total,
        s.uploaded,
        s.classified,
        s.needs_review,
        s.upload_failed + s.extraction_failed + s.unreadable
    ));
    md
}

pub fn indicators_markdown(set: &IndicatorSet) -> String {
    let mut md = String::from("## Gas indicators\n\n");
    for g in set.gas_indicators() {
        md.push_str(&format!("* `{}`\n", g));
    }
    md.push_str("\n## Electricity indicators\n\n");
    for e in set.electricity_indicators() {
        md.push_str(&format!("* `{}`\n", e));
    }
    md.push_str("\n## Supplier markers (in priority order)\n\n|Marker|Supplier|\n|:-|:-|\n");
    for m in set.supplier_markers() {
        md.push_str(&format!("|{}|{}|\n", cell(&m.marker), cell(&m.supplier)));
    }
    md
}
