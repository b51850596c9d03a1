//! Frame source seam.
//!
//! The pipeline consumes frames through `FrameSource` and never touches
//! container formats or codecs. Opening a stream is each
//! implementation's constructor; an open failure therefore aborts
//! before any record is produced. Decoder handles are released on drop,
//! on every exit path.

use anyhow::Result;

/// Stream-level metadata, read once after opening a source.
#[derive(Clone, Copy, Debug)]
pub struct StreamInfo {
    /// Frames per second as declared by the container. May be 0 for
    /// broken files; the sampler guards its arithmetic against that.
    pub fps: f64,
    /// Declared frame count. Advisory: streaming ends when
    /// `next_frame` returns `None`, not when this many frames have
    /// been seen.
    pub total_frames: u64,
    pub width: u32,
    pub height: u32,
}

/// One decoded RGB24 frame.
#[derive(Clone, Debug)]
pub struct Frame {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Sequential supplier of decoded frames.
pub trait FrameSource {
    fn info(&self) -> StreamInfo;

    /// The next frame, or `None` at end of stream.
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}
