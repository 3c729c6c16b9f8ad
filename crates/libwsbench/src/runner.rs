//! Benchmark runner - runs the sub-tests in order and writes the report

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::time::Instant;

use chrono::Local;
use tracing::{info, warn};

use crate::checks::browser::{self, Browser};
use crate::checks::network::{self, SpeedProbe};
use crate::checks::video::{self, ImageCodec};
use crate::clients::{ChromeLauncher, HttpSpeedProbe, JpegCodec};
use crate::config::BenchmarkConfig;
use crate::error::{BenchError, Result};
use crate::poll::CancelToken;
use crate::report::{Metrics, Report, TestOutcome, TestResults};

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub overall_pass: bool,
    pub report: Report,
    pub report_path: PathBuf,
}

/// Runs Browser, Network and Video checks sequentially
pub struct BenchmarkRunner<B, P, C> {
    config: BenchmarkConfig,
    browser: B,
    probe: P,
    codec: C,
    cancel: CancelToken,
}

impl BenchmarkRunner<ChromeLauncher, HttpSpeedProbe, JpegCodec> {
    /// Runner wired to Chrome, the HTTP speed probe and the JPEG codec
    pub fn with_default_clients(config: BenchmarkConfig) -> Self {
        let browser = ChromeLauncher::new(config.chrome.clone());
        let probe = HttpSpeedProbe::new(config.network.clone());
        let codec = JpegCodec::new(config.jpeg_quality);
        Self::new(config, browser, probe, codec)
    }
}

impl<B, P, C> BenchmarkRunner<B, P, C>
where
    B: Browser,
    P: SpeedProbe,
    C: ImageCodec,
{
    pub fn new(config: BenchmarkConfig, browser: B, probe: P, codec: C) -> Self {
        Self {
            config,
            browser,
            probe,
            codec,
            cancel: CancelToken::new(),
        }
    }

    /// Token that aborts the browser wait from another thread
    ///
    /// Meant for library callers that embed the runner; the `wsbench` binary
    /// never fires it and relies on the browser timeout instead.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// Run all sub-tests, then save the report.
    ///
    /// Sub-test errors never escape; only a failed report write does.
    pub fn run(&mut self) -> Result<RunSummary> {
        let started_at = Local::now();
        let mut overall_pass = true;

        let browser_outcome = guarded("Browser", &self.config.thresholds.browser, || {
            browser::measure(&mut self.browser, &self.config.browser, &self.cancel)
        });
        overall_pass &= browser_outcome.passed();

        let network_outcome = guarded("Network", &self.config.thresholds.network, || {
            network::measure(&mut self.probe)
        });
        overall_pass &= network_outcome.passed();

        let video_outcome = guarded("Video", &self.config.thresholds.video, || {
            video::measure(&mut self.codec, &self.config.video)
        });
        overall_pass &= video_outcome.passed();

        let tests = TestResults {
            browser: browser_outcome,
            network: network_outcome,
            video: video_outcome,
        };
        let report = Report::new(&started_at, tests, overall_pass);
        let report_path = report.save(&self.config.output_dir)?;
        println!("\nBenchmark report saved to {}", report_path.display());

        Ok(RunSummary {
            overall_pass,
            report,
            report_path,
        })
    }
}

/// Run one sub-test, turning errors and panics into the failed shape
fn guarded<M, F>(title: &str, thresholds: &M::Thresholds, check: F) -> TestOutcome<M>
where
    M: Metrics,
    F: FnOnce() -> Result<M>,
{
    println!("\nRunning {title} benchmark test...");
    let start = Instant::now();

    let result = panic::catch_unwind(AssertUnwindSafe(check))
        .unwrap_or_else(|payload| Err(BenchError::Panicked(panic_message(payload.as_ref()))));

    if let Err(e) = &result {
        warn!(test = title, kind = e.kind(), error = %e, "sub-test raised an error");
    }

    let outcome = TestOutcome::evaluate(result, thresholds);
    info!(
        test = title,
        passed = outcome.passed(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "sub-test finished"
    );
    println!(
        "{title} test {}",
        if outcome.passed() { "passed" } else { "failed" }
    );
    outcome
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
