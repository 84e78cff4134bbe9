//! Diagnostics go to stderr through `tracing`; stdout is reserved for reports.

use tracing_subscriber::EnvFilter;

/// `-v` raises the configured level one step per flag.
pub fn level_for(verbose: u8, configured: &str) -> String {
    match verbose {
        0 => configured.to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// `RUST_LOG` wins over everything else.
pub fn init(verbose: u8, configured: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("billsort={}", level_for(verbose, configured))));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_configured_level() {
        assert_eq!(level_for(0, "warn"), "warn");
        assert_eq!(level_for(1, "warn"), "info");
        assert_eq!(level_for(2, "error"), "debug");
        assert_eq!(level_for(9, "warn"), "trace");
    }
}
