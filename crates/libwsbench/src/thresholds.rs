//! Minimum acceptance levels
//!
//! The table is compiled in. There is no file or flag that changes it.

use serde::Serialize;

/// Browser benchmark bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BrowserThresholds {
    /// Minimum accepted Speedometer score
    pub speedometer_score: f64,
}

/// Network probe bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NetworkThresholds {
    /// Minimum download throughput in Mbps
    pub download_speed: f64,
    /// Minimum upload throughput in Mbps
    pub upload_speed: f64,
    /// Maximum latency in milliseconds
    pub ping: f64,
}

/// Codec loop bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VideoThresholds {
    /// Minimum frames per second
    pub fps: f64,
    /// Maximum seconds per frame
    pub decode_time: f64,
}

/// Threshold table, keyed by sub-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub browser: BrowserThresholds,
    pub network: NetworkThresholds,
    pub video: VideoThresholds,
}

pub const MIN_REQUIREMENTS: Thresholds = Thresholds {
    browser: BrowserThresholds {
        speedometer_score: 10.0,
    },
    network: NetworkThresholds {
        download_speed: 50.0,
        upload_speed: 10.0,
        ping: 50.0,
    },
    video: VideoThresholds {
        fps: 30.0,
        decode_time: 0.1,
    },
};

impl Default for Thresholds {
    fn default() -> Self {
        MIN_REQUIREMENTS
    }
}
