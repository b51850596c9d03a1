use anyhow::Result;

use crate::detect::result::Detection;

/// Person detector seam.
///
/// The pipeline treats detection as a black box: RGB24 pixels in,
/// bounding boxes with confidence weights out. Implementations may
/// preprocess internally (resize for speed, contrast enhancement as a
/// zero-detection fallback) as long as the boxes they report are in the
/// frame's original coordinate space.
///
/// Returning an empty vector is a valid outcome, not an error.
pub trait PersonDetector: Send {
    /// Backend identifier, used in logs and configuration.
    fn name(&self) -> &'static str;

    /// Detect people in one RGB24 frame.
    fn detect(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<Vec<Detection>>;

    /// Optional warm-up hook (model loading, first-run allocation).
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
