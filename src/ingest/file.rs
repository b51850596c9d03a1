//! Local video file frame source.
//!
//! `VideoFileSource` opens a local recording and yields decoded RGB24
//! frames. `stub://` paths map to the synthetic source so demos and
//! tests run without any codec installed; real paths require the
//! `ingest-file-ffmpeg` feature.

use anyhow::{anyhow, Result};

use super::source::{Frame, FrameSource, StreamInfo};
use super::synthetic::{SyntheticConfig, SyntheticSource};

#[cfg(feature = "ingest-file-ffmpeg")]
use super::file_ffmpeg::FfmpegFileSource;

/// Frame source for a local video file.
pub struct VideoFileSource {
    backend: FileBackend,
}

enum FileBackend {
    Synthetic(SyntheticSource),
    #[cfg(feature = "ingest-file-ffmpeg")]
    Ffmpeg(FfmpegFileSource),
}

impl VideoFileSource {
    /// Open a recording. Fails when the file cannot be opened or has no
    /// video track; no partial output is ever produced from a failed
    /// open.
    pub fn open(path: &str) -> Result<Self> {
        if !is_local_file_path(path) {
            return Err(anyhow!(
                "file ingestion only supports local paths (no URL schemes)"
            ));
        }
        if path.starts_with("stub://") {
            return Ok(Self {
                backend: FileBackend::Synthetic(SyntheticSource::new(SyntheticConfig::default())),
            });
        }

        #[cfg(feature = "ingest-file-ffmpeg")]
        {
            Ok(Self {
                backend: FileBackend::Ffmpeg(FfmpegFileSource::open(path)?),
            })
        }
        #[cfg(not(feature = "ingest-file-ffmpeg"))]
        {
            Err(anyhow!(
                "file ingestion requires the ingest-file-ffmpeg feature"
            ))
        }
    }
}

impl FrameSource for VideoFileSource {
    fn info(&self) -> StreamInfo {
        match &self.backend {
            FileBackend::Synthetic(source) => source.info(),
            #[cfg(feature = "ingest-file-ffmpeg")]
            FileBackend::Ffmpeg(source) => source.info(),
        }
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        match &mut self.backend {
            FileBackend::Synthetic(source) => source.next_frame(),
            #[cfg(feature = "ingest-file-ffmpeg")]
            FileBackend::Ffmpeg(source) => source.next_frame(),
        }
    }
}

fn is_local_file_path(path: &str) -> bool {
    if path.trim().is_empty() {
        return false;
    }
    if path.starts_with("stub://") {
        return true;
    }
    !path.contains("://")
}
