//! The three sub-tests

pub mod browser;
pub mod network;
pub mod video;

pub use browser::{Browser, BrowserMetrics, BrowserSession, BrowserSettings, ElementId, SessionGuard};
pub use network::{NetworkMetrics, SpeedProbe};
pub use video::{ImageCodec, VideoMetrics, VideoSettings};
