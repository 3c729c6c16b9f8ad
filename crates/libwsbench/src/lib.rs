//! libwsbench - workstation acceptance benchmark
//!
//! Runs three independent checks against a fixed threshold table:
//! - Browser: Speedometer 3.0 score in Chrome
//! - Network: download, upload and latency
//! - Video: JPEG encode/decode round-trips of a synthetic 1080p frame
//!
//! Results are collected into a [`Report`] and written as
//! `benchmark_report_<YYYYMMDD_HHMMSS>.json`.

pub mod checks;
pub mod clients;
pub mod config;
pub mod error;
pub mod poll;
pub mod report;
pub mod runner;
pub mod thresholds;

pub use config::BenchmarkConfig;
pub use error::{BenchError, Result};
pub use poll::{CancelToken, PollSettings};
pub use report::{report_file_name, Metrics, Report, TestOutcome, TestResults};
pub use runner::{BenchmarkRunner, RunSummary};
pub use thresholds::{Thresholds, MIN_REQUIREMENTS};
