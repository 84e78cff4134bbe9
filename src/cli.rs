use std::path::PathBuf;

use clap::{ArgGroup, Parser};

#[derive(Parser, Debug, Clone)]
#[command(name = "billsort", about = "Classify utility bill PDFs and upload them to the facilities backend", version)]
#[command(group(ArgGroup::new("md_switch").args(["md", "no_md"]).multiple(false)))]
#[command(group(ArgGroup::new("output").args(["json", "md"]).multiple(false)))]
pub struct Cli {
    /// Bill PDFs to process.
    #[arg(value_name = "FILES", required_unless_present = "show_indicators")]
    pub files: Vec<PathBuf>,

    /// Upload each classified bill to the backend.
    #[arg(long, requires = "hotel")]
    pub upload: bool,

    /// Hotel the bills belong to.
    #[arg(long, value_name = "ID")]
    pub hotel: Option<String>,

    /// Upload bills whose utility type could not be determined.
    ///
    /// They are still reported as warnings; without this flag they are held back.
    #[arg(long = "allow-unknown")]
    pub allow_unknown: bool,

    /// JSON file with gas/electricity indicators and supplier markers.
    #[arg(long, value_name = "PATH")]
    pub indicators: Option<PathBuf>,

    /// Print the indicator tables in effect and exit.
    #[arg(long = "show-indicators")]
    pub show_indicators: bool,

    /// Files processed at once (defaults to UPLOAD_CONCURRENCY).
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: Option<u16>,

    /// Print the batch report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Render the report as a Markdown table.
    #[arg(long)]
    pub md: bool,
    /// Plain status lines.
    #[arg(long = "no-md")]
    pub no_md: bool,

    /// More logging on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
