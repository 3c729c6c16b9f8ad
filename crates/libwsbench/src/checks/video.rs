//! Video benchmark: encode/decode round-trips of one synthetic frame
//!
//! This times the still-image codec on random noise. It is not a real video
//! decode, and the numbers say nothing about hardware video acceleration.

use std::time::{Duration, Instant};

use image::RgbImage;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{BenchError, Result};
use crate::report::Metrics;
use crate::thresholds::VideoThresholds;

/// Still-image codec used for the round-trips
pub trait ImageCodec {
    fn encode(&mut self, frame: &RgbImage) -> Result<Vec<u8>>;

    fn decode(&mut self, bytes: &[u8]) -> Result<RgbImage>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoSettings {
    pub width: u32,
    pub height: u32,
    pub frames: u32,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            frames: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VideoMetrics {
    pub fps: f64,
    /// Seconds per frame
    pub decode_time: f64,
}

impl VideoMetrics {
    /// Derive rates from the wall-clock time of the whole loop
    pub fn from_elapsed(frames: u32, elapsed: Duration) -> Self {
        // Clamp so a zero reading cannot produce an infinite fps
        let total = elapsed.as_secs_f64().max(1e-9);
        let frames = f64::from(frames);
        Self {
            fps: frames / total,
            decode_time: total / frames,
        }
    }
}

impl Metrics for VideoMetrics {
    type Thresholds = VideoThresholds;

    fn passes(&self, thresholds: &VideoThresholds) -> bool {
        self.fps >= thresholds.fps && self.decode_time <= thresholds.decode_time
    }
}

/// Random RGB8 frame, every channel in `0..255`
pub fn synthetic_frame<R: Rng>(rng: &mut R, width: u32, height: u32) -> Result<RgbImage> {
    let len = width as usize * height as usize * 3;
    let pixels: Vec<u8> = (0..len).map(|_| rng.gen_range(0..255)).collect();
    RgbImage::from_raw(width, height, pixels)
        .ok_or_else(|| BenchError::Codec(format!("cannot build a {width}x{height} frame")))
}

pub fn measure<C: ImageCodec>(codec: &mut C, settings: &VideoSettings) -> Result<VideoMetrics> {
    if settings.frames == 0 {
        return Err(BenchError::Config("video frame count must be positive".to_string()));
    }

    let frame = synthetic_frame(&mut rand::thread_rng(), settings.width, settings.height)?;
    debug!(width = settings.width, height = settings.height, "synthetic frame ready");

    let start = Instant::now();
    for _ in 0..settings.frames {
        let encoded = codec.encode(&frame)?;
        codec.decode(&encoded)?;
    }
    let metrics = VideoMetrics::from_elapsed(settings.frames, start.elapsed());

    info!(fps = metrics.fps, decode_time = metrics.decode_time, "codec loop finished");
    Ok(metrics)
}
