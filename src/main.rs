mod cli;
mod handlers;

use anyhow::{anyhow, Result};
use billsort::{
    config::Config,
    indicators::IndicatorSet,
    logging,
    printer::{indicators_markdown, MarkdownPrinter},
};
use handlers::classify::Output;
use is_terminal::IsTerminal;
use std::io;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    let mut cfg = Config::load();
    // CLI overrides config
    if let Some(path) = &args.indicators {
        cfg.set("INDICATORS_PATH", path.to_string_lossy());
    }

    logging::init(args.verbose, &cfg.get("LOG_LEVEL").unwrap_or_else(|| "warn".into()));
    tracing::debug!(config = %cfg.config_path.display(), "billsort v{}", env!("CARGO_PKG_VERSION"));

    let indicators = IndicatorSet::load(&cfg).map_err(|e| anyhow!("Indicator tables unusable: {}", e))?;

    if args.show_indicators {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&indicators)?);
        } else {
            MarkdownPrinter::default().print(&indicators_markdown(&indicators));
        }
        return Ok(());
    }

    let output = Output::choose(&args, io::stdout().is_terminal(), cfg.get_bool("PRETTIFY_MARKDOWN"));

    let report = handlers::classify::run(&args, &cfg, indicators, output).await?;
    if report.has_failures() {
        std::process::exit(1);
    }
    Ok(())
}
