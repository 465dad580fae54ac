//! Stand-in for the deraining model.
//!
//! Waits a fixed delay, checks the input the way a real backend would (size
//! limit, decodable format), applies a light Gaussian smoothing and returns a
//! PNG.

use super::DerainService;
use super::timer;
use crate::error::ServiceError;
use crate::state::WorkbenchSettings;
use image::{DynamicImage, ImageError, ImageFormat};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SimulatedDerainService {
    delay: Duration,
    max_input_bytes: usize,
    smoothing_sigma: f32,
}

impl SimulatedDerainService {
    pub fn new(delay: Duration, max_input_bytes: usize, smoothing_sigma: f32) -> Self {
        Self {
            delay,
            max_input_bytes,
            smoothing_sigma,
        }
    }

    pub fn from_settings(settings: &WorkbenchSettings) -> Self {
        Self::new(
            settings.simulated_delay(),
            settings.max_input_bytes,
            settings.smoothing_sigma,
        )
    }
}

impl DerainService for SimulatedDerainService {
    async fn derain(&self, input: Arc<[u8]>) -> Result<Vec<u8>, ServiceError> {
        if input.len() > self.max_input_bytes {
            return Err(ServiceError::SizeLimitExceeded {
                size: input.len(),
                limit: self.max_input_bytes,
            });
        }

        timer::sleep(self.delay).await;

        smooth_to_png(&input, self.smoothing_sigma)
    }
}

/// Decode, blur with `sigma` (skipped when not positive) and re-encode as PNG.
fn smooth_to_png(input: &[u8], sigma: f32) -> Result<Vec<u8>, ServiceError> {
    let format = image::guess_format(input).map_err(|_| ServiceError::UnsupportedFormat)?;
    let decoded = image::load_from_memory_with_format(input, format).map_err(|e| match e {
        ImageError::Unsupported(_) => ServiceError::UnsupportedFormat,
        other => ServiceError::Internal(other.to_string()),
    })?;

    let processed = if sigma > 0.0 {
        DynamicImage::ImageRgba8(image::imageops::blur(&decoded.to_rgba8(), sigma))
    } else {
        decoded
    };

    let mut out = Cursor::new(Vec::new());
    processed
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| ServiceError::Internal(e.to_string()))?;

    log::debug!(
        "Simulated deraining produced {} bytes from {} ({}x{})",
        out.get_ref().len(),
        input.len(),
        processed.width(),
        processed.height()
    );

    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::{encoded_image, png};

    fn service(max_input_bytes: usize, sigma: f32) -> SimulatedDerainService {
        SimulatedDerainService::new(Duration::ZERO, max_input_bytes, sigma)
    }

    #[test]
    fn test_returns_png_of_same_size() {
        let input: Arc<[u8]> = encoded_image(12, 9, ImageFormat::Jpeg).into();
        let output = pollster::block_on(service(1 << 20, 1.0).derain(input)).unwrap();

        assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Png);
        let decoded = image::load_from_memory(&output).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (12, 9));
    }

    #[test]
    fn test_size_limit() {
        let input: Arc<[u8]> = png(16, 16).into();
        let len = input.len();
        let result = pollster::block_on(service(len - 1, 0.0).derain(input));
        assert_eq!(
            result,
            Err(ServiceError::SizeLimitExceeded {
                size: len,
                limit: len - 1
            })
        );
    }

    #[test]
    fn test_unrecognised_bytes() {
        let input: Arc<[u8]> = b"this is plain text".to_vec().into();
        let result = pollster::block_on(service(1 << 20, 0.0).derain(input));
        assert_eq!(result, Err(ServiceError::UnsupportedFormat));
    }

    #[test]
    fn test_waits_for_delay() {
        let delay = Duration::from_millis(40);
        let service = SimulatedDerainService::new(delay, 1 << 20, 0.0);
        let start = web_time::Instant::now();
        pollster::block_on(service.derain(png(4, 4).into())).unwrap();
        assert!(start.elapsed() >= delay);
    }
}
