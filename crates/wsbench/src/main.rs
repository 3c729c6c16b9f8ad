//! wsbench - workstation acceptance benchmark
//!
//! Runs the browser, network and video checks, writes
//! `benchmark_report_<YYYYMMDD_HHMMSS>.json` and exits 0 only if every
//! check met its threshold.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use libwsbench::clients::speed::DEFAULT_SPEED_SERVER;
use libwsbench::{BenchError, BenchmarkConfig, BenchmarkRunner, Result};

#[derive(Parser)]
#[command(name = "wsbench")]
#[command(about = "Workstation acceptance benchmark: browser, network and video checks against fixed thresholds")]
#[command(version)]
struct Cli {
    /// Directory for the JSON report
    #[arg(short = 'o', long, default_value = ".")]
    output_dir: PathBuf,

    /// Chrome binary to launch (default: an installed Chrome)
    #[arg(long, value_name = "PATH")]
    chrome: Option<PathBuf>,

    /// Run Chrome headless (Speedometer scores are usually lower)
    #[arg(long)]
    headless: bool,

    /// Maximum seconds to wait for the Speedometer score
    #[arg(long, default_value = "900")]
    browser_timeout: u64,

    /// Speed-test server base URL
    #[arg(long, default_value = DEFAULT_SPEED_SERVER)]
    speed_server: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&cli) {
        Ok(true) => {
            println!("\nAll benchmark tests passed successfully!");
        }
        Ok(false) => {
            println!("\nBenchmark tests failed to meet minimum requirements!");
            std::process::exit(1);
        }
        Err(e) => {
            error!(kind = e.kind(), "{}", e);
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let config = build_config(cli)?;
    info!(output_dir = %config.output_dir.display(), "starting benchmark run");

    let mut runner = BenchmarkRunner::with_default_clients(config);
    let summary = runner.run()?;
    Ok(summary.overall_pass)
}

fn build_config(cli: &Cli) -> Result<BenchmarkConfig> {
    if cli.browser_timeout == 0 {
        return Err(BenchError::Config(
            "browser timeout must be at least one second".to_string(),
        ));
    }
    if !cli.output_dir.is_dir() {
        return Err(BenchError::Config(format!(
            "output directory {} does not exist",
            cli.output_dir.display()
        )));
    }

    let mut config = BenchmarkConfig {
        output_dir: cli.output_dir.clone(),
        ..BenchmarkConfig::default()
    };
    config.browser.poll.timeout = Duration::from_secs(cli.browser_timeout);
    config.chrome.binary = cli.chrome.clone();
    config.chrome.headless = cli.headless;
    config.network.server = cli.speed_server.clone();

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_standard_run() {
        let cli = Cli::parse_from(["wsbench"]);
        let config = build_config(&cli).unwrap();
        let standard = BenchmarkConfig::default();

        assert_eq!(config, standard);
    }

    #[test]
    fn test_overrides_are_applied() {
        let cli = Cli::parse_from([
            "wsbench",
            "--chrome",
            "/opt/google/chrome/chrome",
            "--headless",
            "--browser-timeout",
            "120",
            "--speed-server",
            "http://speed.local",
        ]);
        let config = build_config(&cli).unwrap();

        assert_eq!(
            config.chrome.binary,
            Some(PathBuf::from("/opt/google/chrome/chrome"))
        );
        assert!(config.chrome.headless);
        assert_eq!(config.browser.poll.timeout, Duration::from_secs(120));
        assert_eq!(config.network.server, "http://speed.local");
        assert_eq!(config.thresholds, libwsbench::MIN_REQUIREMENTS);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let cli = Cli::parse_from(["wsbench", "--browser-timeout", "0"]);
        let err = build_config(&cli).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
