//! Per-test outcomes and the JSON report

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};

use crate::checks::browser::BrowserMetrics;
use crate::checks::network::NetworkMetrics;
use crate::checks::video::VideoMetrics;
use crate::error::{BenchError, Result};

/// Measurements of one sub-test, judged against its slice of the threshold table
pub trait Metrics: Serialize {
    type Thresholds;

    fn passes(&self, thresholds: &Self::Thresholds) -> bool;
}

/// Result of one sub-test
///
/// Serializes as `{<metric>: value, ..., passed}` or `{error, passed: false}`.
#[derive(Debug, Clone, PartialEq)]
pub enum TestOutcome<M> {
    Measured { metrics: M, passed: bool },
    Failed { error: String },
}

impl<M: Metrics> TestOutcome<M> {
    /// Judge a sub-test result, downgrading any error to the failed shape
    pub fn evaluate(result: Result<M>, thresholds: &M::Thresholds) -> Self {
        match result {
            Ok(metrics) => {
                let passed = metrics.passes(thresholds);
                TestOutcome::Measured { metrics, passed }
            }
            Err(e) => TestOutcome::failed(&e),
        }
    }
}

impl<M> TestOutcome<M> {
    pub fn failed(error: &BenchError) -> Self {
        TestOutcome::Failed {
            error: error.to_string(),
        }
    }

    pub fn passed(&self) -> bool {
        match self {
            TestOutcome::Measured { passed, .. } => *passed,
            TestOutcome::Failed { .. } => false,
        }
    }

    pub fn metrics(&self) -> Option<&M> {
        match self {
            TestOutcome::Measured { metrics, .. } => Some(metrics),
            TestOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            TestOutcome::Measured { .. } => None,
            TestOutcome::Failed { error } => Some(error),
        }
    }
}

impl<M: Serialize> Serialize for TestOutcome<M> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        #[serde(untagged)]
        enum Repr<'a, M> {
            Measured {
                #[serde(flatten)]
                metrics: &'a M,
                passed: bool,
            },
            Failed {
                error: &'a str,
                passed: bool,
            },
        }

        let repr = match self {
            TestOutcome::Measured { metrics, passed } => Repr::Measured {
                metrics,
                passed: *passed,
            },
            TestOutcome::Failed { error } => Repr::Failed {
                error,
                passed: false,
            },
        };
        repr.serialize(serializer)
    }
}

/// The `tests` section; one field per sub-test, so all three keys are always present
#[derive(Debug, Clone, Serialize)]
pub struct TestResults {
    pub browser: TestOutcome<BrowserMetrics>,
    pub network: TestOutcome<NetworkMetrics>,
    pub video: TestOutcome<VideoMetrics>,
}

impl TestResults {
    pub fn all_passed(&self) -> bool {
        self.browser.passed() && self.network.passed() && self.video.passed()
    }
}

/// Report for one run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Run start, local time, ISO-8601 with microseconds
    pub timestamp: String,
    pub tests: TestResults,
    pub overall_pass: bool,
}

impl Report {
    pub fn new(started_at: &DateTime<Local>, tests: TestResults, overall_pass: bool) -> Self {
        Self {
            timestamp: started_at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            tests,
            overall_pass,
        }
    }

    /// Write the report into `dir`, named after the current wall-clock time
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        self.save_at(dir, &Local::now())
    }

    pub fn save_at(&self, dir: &Path, at: &DateTime<Local>) -> Result<PathBuf> {
        let path = dir.join(report_file_name(at));
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        tracing::debug!(path = %path.display(), "report written");
        Ok(path)
    }
}

/// `benchmark_report_<YYYYMMDD_HHMMSS>.json`
pub fn report_file_name(at: &DateTime<Local>) -> String {
    format!("benchmark_report_{}.json", at.format("%Y%m%d_%H%M%S"))
}
