//! Binary crate for the `citycast` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive city selection and configuration
//! - Log setup (stderr, so rendered cards on stdout stay clean)

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    init_tracing(cmd.verbose);
    cmd.run().await
}

fn init_tracing(verbose: bool) {
    let directive = log_directive(verbose, std::env::var(EnvFilter::DEFAULT_ENV).ok());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_writer(std::io::stderr)
        .init();
}

/// `--verbose` wins over `RUST_LOG`; without it `RUST_LOG` applies, then `warn`.
fn log_directive(verbose: bool, env: Option<String>) -> String {
    match env {
        _ if verbose => "debug".to_string(),
        Some(env) if !env.trim().is_empty() => env,
        _ => "warn".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_overrides_rust_log() {
        assert_eq!(log_directive(true, Some("error".into())), "debug");
        assert_eq!(log_directive(true, None), "debug");
    }

    #[test]
    fn rust_log_applies_without_verbose() {
        assert_eq!(log_directive(false, Some("citycast_core=trace".into())), "citycast_core=trace");
        assert_eq!(log_directive(false, Some("  ".into())), "warn");
        assert_eq!(log_directive(false, None), "warn");
    }
}
