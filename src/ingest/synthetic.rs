//! Deterministic synthetic frame source.
//!
//! Serves `stub://` paths and tests: a fixed-length stream of generated
//! RGB frames with configurable rate and dimensions, no codec anywhere.

use anyhow::Result;

use super::source::{Frame, FrameSource, StreamInfo};

/// Shape of a synthetic stream.
#[derive(Clone, Copy, Debug)]
pub struct SyntheticConfig {
    pub fps: f64,
    pub total_frames: u64,
    pub width: u32,
    pub height: u32,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            fps: 30.0,
            total_frames: 90,
            width: 640,
            height: 480,
        }
    }
}

/// Generated frame stream.
pub struct SyntheticSource {
    config: SyntheticConfig,
    produced: u64,
}

impl SyntheticSource {
    pub fn new(config: SyntheticConfig) -> Self {
        log::info!(
            "synthetic source: {} frames at {} fps, {}x{}",
            config.total_frames,
            config.fps,
            config.width,
            config.height
        );
        Self {
            config,
            produced: 0,
        }
    }

    fn generate_pixels(&self) -> Vec<u8> {
        let len = (self.config.width as usize) * (self.config.height as usize) * 3;
        let mut pixels = vec![0u8; len];
        for (i, pixel) in pixels.iter_mut().enumerate() {
            *pixel = ((i as u64 + self.produced) % 256) as u8;
        }
        pixels
    }
}

impl FrameSource for SyntheticSource {
    fn info(&self) -> StreamInfo {
        StreamInfo {
            fps: self.config.fps,
            total_frames: self.config.total_frames,
            width: self.config.width,
            height: self.config.height,
        }
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.produced >= self.config.total_frames {
            return Ok(None);
        }
        let pixels = self.generate_pixels();
        self.produced += 1;
        Ok(Some(Frame {
            pixels,
            width: self.config.width,
            height: self.config.height,
        }))
    }
}
