//! HTTP speed probe against a Cloudflare-style `__down`/`__up` endpoint

use std::time::{Duration, Instant};

use reqwest::blocking::Client as HttpClient;
use tracing::debug;

use crate::checks::network::SpeedProbe;
use crate::error::{BenchError, Result};

pub const DEFAULT_SPEED_SERVER: &str = "https://speed.cloudflare.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeedSettings {
    pub server: String,
    pub download_bytes: u64,
    pub upload_bytes: usize,
    pub latency_samples: u32,
    pub request_timeout: Duration,
}

impl Default for SpeedSettings {
    fn default() -> Self {
        Self {
            server: DEFAULT_SPEED_SERVER.to_string(),
            download_bytes: 25_000_000,
            upload_bytes: 10_000_000,
            latency_samples: 5,
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Measures throughput with timed HTTP transfers
///
/// Latency is measured with the first download, the way speed-test clients
/// probe their server before transferring.
pub struct HttpSpeedProbe {
    settings: SpeedSettings,
    http: Option<HttpClient>,
    latency_ms: Option<f64>,
}

impl HttpSpeedProbe {
    pub fn new(settings: SpeedSettings) -> Self {
        Self {
            settings,
            http: None,
            latency_ms: None,
        }
    }

    fn client(&mut self) -> Result<HttpClient> {
        if let Some(http) = &self.http {
            return Ok(http.clone());
        }
        let http = HttpClient::builder()
            .user_agent(concat!("wsbench/", env!("CARGO_PKG_VERSION")))
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|e| probe_error("failed to create HTTP client", e))?;
        self.http = Some(http.clone());
        Ok(http)
    }

    fn down_url(&self, bytes: u64) -> String {
        format!("{}/__down?bytes={bytes}", self.settings.server.trim_end_matches('/'))
    }

    fn up_url(&self) -> String {
        format!("{}/__up", self.settings.server.trim_end_matches('/'))
    }

    /// Lowest round-trip of several empty downloads, in milliseconds
    fn measure_latency(&mut self) -> Result<f64> {
        let http = self.client()?;
        let url = self.down_url(0);
        let mut best = f64::INFINITY;

        for _ in 0..self.settings.latency_samples.max(1) {
            let start = Instant::now();
            http.get(&url)
                .send()
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.bytes())
                .map_err(|e| probe_error("latency request failed", e))?;
            best = best.min(start.elapsed().as_secs_f64() * 1000.0);
        }

        debug!(latency_ms = best, "latency measured");
        Ok(best)
    }
}

impl SpeedProbe for HttpSpeedProbe {
    fn download(&mut self) -> Result<f64> {
        let latency = self.measure_latency()?;
        self.latency_ms = Some(latency);

        let http = self.client()?;
        let url = self.down_url(self.settings.download_bytes);
        let start = Instant::now();
        let body = http
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.bytes())
            .map_err(|e| probe_error("download failed", e))?;

        let bits = body.len() as f64 * 8.0;
        Ok(bits_per_second(bits, start.elapsed()))
    }

    fn upload(&mut self) -> Result<f64> {
        let http = self.client()?;
        let payload = vec![0u8; self.settings.upload_bytes];
        let bits = payload.len() as f64 * 8.0;

        let start = Instant::now();
        http.post(self.up_url())
            .body(payload)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| probe_error("upload failed", e))?;

        Ok(bits_per_second(bits, start.elapsed()))
    }

    fn ping(&self) -> Result<f64> {
        self.latency_ms
            .ok_or_else(|| BenchError::NetworkProbe("no latency measured yet".to_string()))
    }
}

fn bits_per_second(bits: f64, elapsed: Duration) -> f64 {
    bits / elapsed.as_secs_f64().max(1e-9)
}

fn probe_error(context: &str, e: reqwest::Error) -> BenchError {
    BenchError::NetworkProbe(format!("{context}: {e}"))
}
