//! Real collaborators behind the sub-test traits

pub mod chrome;
pub mod codec;
pub mod speed;

pub use chrome::{ChromeLauncher, ChromeSession, ChromeSettings};
pub use codec::JpegCodec;
pub use speed::{HttpSpeedProbe, SpeedSettings};
