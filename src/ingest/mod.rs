//! Frame ingestion sources.
//!
//! Everything the pipeline knows about video comes through the
//! [`FrameSource`] trait: stream metadata once at open time, then
//! decoded RGB24 frames until `None`. Sources:
//! - `VideoFileSource`: local recordings (FFmpeg behind the
//!   `ingest-file-ffmpeg` feature)
//! - `SyntheticSource`: deterministic generated frames (`stub://`
//!   paths, tests)

pub mod file;
#[cfg(feature = "ingest-file-ffmpeg")]
pub(crate) mod file_ffmpeg;
pub mod source;
pub mod synthetic;

pub use file::VideoFileSource;
pub use source::{Frame, FrameSource, StreamInfo};
pub use synthetic::{SyntheticConfig, SyntheticSource};
