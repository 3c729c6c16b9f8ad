//! JPEG codec backed by the `image` crate

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageFormat, RgbImage};

use crate::checks::video::ImageCodec;
use crate::error::Result;

/// Same default quality as common still-image toolkits
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, Copy)]
pub struct JpegCodec {
    quality: u8,
}

impl JpegCodec {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }
}

impl Default for JpegCodec {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl ImageCodec for JpegCodec {
    fn encode(&mut self, frame: &RgbImage) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, self.quality).encode(
            frame.as_raw(),
            frame.width(),
            frame.height(),
            ExtendedColorType::Rgb8,
        )?;
        Ok(out)
    }

    fn decode(&mut self, bytes: &[u8]) -> Result<RgbImage> {
        Ok(image::load_from_memory_with_format(bytes, ImageFormat::Jpeg)?.into_rgb8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::video::synthetic_frame;
    use crate::error::BenchError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_round_trip_keeps_dimensions() {
        let mut rng = StdRng::seed_from_u64(1);
        let frame = synthetic_frame(&mut rng, 64, 48).unwrap();
        let mut codec = JpegCodec::default();

        let bytes = codec.encode(&frame).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let decoded = codec.decode(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (64, 48));
    }

    #[test]
    fn test_garbage_is_a_codec_error() {
        let mut codec = JpegCodec::default();
        let err = codec.decode(b"not a jpeg").unwrap_err();
        assert!(matches!(err, BenchError::Codec(_)));
    }
}
