//! Network benchmark: download, upload and latency

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::report::Metrics;
use crate::thresholds::NetworkThresholds;

/// Raw throughput units per megabit
pub const BITS_PER_MEGABIT: f64 = 1_000_000.0;

/// Speed-test client
pub trait SpeedProbe {
    /// Measure download throughput, in bits per second
    fn download(&mut self) -> Result<f64>;

    /// Measure upload throughput, in bits per second
    fn upload(&mut self) -> Result<f64>;

    /// Latency from the most recent measurement, in milliseconds
    fn ping(&self) -> Result<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NetworkMetrics {
    /// Mbps
    pub download_speed: f64,
    /// Mbps
    pub upload_speed: f64,
    /// Milliseconds
    pub ping: f64,
}

impl Metrics for NetworkMetrics {
    type Thresholds = NetworkThresholds;

    fn passes(&self, thresholds: &NetworkThresholds) -> bool {
        self.download_speed >= thresholds.download_speed
            && self.upload_speed >= thresholds.upload_speed
            && self.ping <= thresholds.ping
    }
}

pub fn to_mbps(bits_per_second: f64) -> f64 {
    bits_per_second / BITS_PER_MEGABIT
}

/// Run download, then upload, then read the latency
pub fn measure<P: SpeedProbe>(probe: &mut P) -> Result<NetworkMetrics> {
    println!("Testing download speed...");
    let download_speed = to_mbps(probe.download()?);

    println!("Testing upload speed...");
    let upload_speed = to_mbps(probe.upload()?);

    println!("Testing ping...");
    let ping = probe.ping()?;

    info!(download_speed, upload_speed, ping, "network measured");
    Ok(NetworkMetrics {
        download_speed,
        upload_speed,
        ping,
    })
}
