use std::collections::VecDeque;

use anyhow::Result;

use crate::detect::backend::PersonDetector;
use crate::detect::result::Detection;

/// Stub detector for tests, demos, and `stub://` runs.
///
/// Either replays a fixed detection set on every frame, or plays a
/// script of per-sample detection sets and reports nothing once the
/// script runs out.
pub struct StubDetector {
    fixed: Vec<Detection>,
    script: VecDeque<Vec<Detection>>,
}

impl StubDetector {
    /// A detector that never detects anyone.
    pub fn empty() -> Self {
        Self::fixed(Vec::new())
    }

    /// Report the same detections on every frame.
    pub fn fixed(detections: Vec<Detection>) -> Self {
        Self {
            fixed: detections,
            script: VecDeque::new(),
        }
    }

    /// Play one detection set per call, then report nothing.
    pub fn scripted<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = Vec<Detection>>,
    {
        Self {
            fixed: Vec::new(),
            script: samples.into_iter().collect(),
        }
    }
}

impl PersonDetector for StubDetector {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn detect(&mut self, _pixels: &[u8], _width: u32, _height: u32) -> Result<Vec<Detection>> {
        if let Some(next) = self.script.pop_front() {
            return Ok(next);
        }
        Ok(self.fixed.clone())
    }
}
