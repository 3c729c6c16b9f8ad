//! Run configuration
//!
//! Everything except the threshold table can be overridden from the command
//! line. The defaults reproduce the standard acceptance run.

use std::path::PathBuf;

use crate::checks::browser::BrowserSettings;
use crate::checks::video::VideoSettings;
use crate::clients::codec::DEFAULT_JPEG_QUALITY;
use crate::clients::speed::SpeedSettings;
use crate::clients::chrome::ChromeSettings;
use crate::thresholds::{Thresholds, MIN_REQUIREMENTS};

/// Configuration for a benchmark run
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkConfig {
    pub thresholds: Thresholds,
    /// Directory the report is written to
    pub output_dir: PathBuf,
    pub browser: BrowserSettings,
    pub chrome: ChromeSettings,
    pub network: SpeedSettings,
    pub video: VideoSettings,
    pub jpeg_quality: u8,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            thresholds: MIN_REQUIREMENTS,
            output_dir: PathBuf::from("."),
            browser: BrowserSettings::default(),
            chrome: ChromeSettings::default(),
            network: SpeedSettings::default(),
            video: VideoSettings::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}
