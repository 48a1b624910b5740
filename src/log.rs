//! Diagnostic logging setup.
//!
//! Logs go to stderr through `tracing-subscriber`. The level follows the `-v`
//! count unless `RUST_LOG` is set.

use tracing_subscriber::EnvFilter;

/// Maps the `-v` count to a default filter directive.
pub fn filter_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

pub fn init_logging(verbose: u8) {
    let filter = filter_for_verbosity(verbose);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_for_verbosity() {
        assert_eq!(filter_for_verbosity(0), "warn");
        assert_eq!(filter_for_verbosity(1), "info");
        assert_eq!(filter_for_verbosity(2), "debug");
        assert_eq!(filter_for_verbosity(9), "debug");
    }
}
