//! FFmpeg-backed local file decoder.
//!
//! Decodes the best video stream of a local recording to RGB24. Stream
//! metadata (rate, frame count, dimensions) is read once at open time;
//! end of stream surfaces as a clean `None` after the decoder has been
//! drained. The decoder and demuxer handles are freed on drop.

use anyhow::{Context, Result};
use ffmpeg_next as ffmpeg;

use super::source::{Frame, FrameSource, StreamInfo};

pub(crate) struct FfmpegFileSource {
    input: ffmpeg::format::context::Input,
    stream_index: usize,
    decoder: ffmpeg::codec::decoder::Video,
    scaler: ffmpeg::software::scaling::Context,
    info: StreamInfo,
    eof_sent: bool,
}

impl FfmpegFileSource {
    pub(crate) fn open(path: &str) -> Result<Self> {
        ffmpeg::init().context("initialize ffmpeg")?;
        let input = ffmpeg::format::input(&path)
            .with_context(|| format!("failed to open video file '{}' with ffmpeg", path))?;
        let stream = input
            .streams()
            .best(ffmpeg::media::Type::Video)
            .ok_or_else(|| anyhow::anyhow!("file has no video track"))?;
        let stream_index = stream.index();

        let rate = stream.avg_frame_rate();
        let fps = if rate.denominator() != 0 {
            rate.numerator() as f64 / rate.denominator() as f64
        } else {
            0.0
        };
        let declared_frames = stream.frames().max(0) as u64;
        let total_frames = if declared_frames > 0 {
            declared_frames
        } else {
            // Containers without an exact count still carry a duration.
            let time_base = stream.time_base();
            let duration_secs = stream.duration().max(0) as f64 * time_base.numerator() as f64
                / time_base.denominator().max(1) as f64;
            (duration_secs * fps) as u64
        };

        let context = ffmpeg::codec::context::Context::from_parameters(stream.parameters())
            .context("load video decoder parameters")?;
        let decoder = context
            .decoder()
            .video()
            .context("open ffmpeg video decoder")?;

        let scaler = ffmpeg::software::scaling::context::Context::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            ffmpeg::util::format::pixel::Pixel::RGB24,
            decoder.width(),
            decoder.height(),
            ffmpeg::software::scaling::flag::Flags::BILINEAR,
        )
        .context("create ffmpeg scaler")?;

        let info = StreamInfo {
            fps,
            total_frames,
            width: decoder.width(),
            height: decoder.height(),
        };
        log::info!(
            "ffmpeg source: {} ({}x{}, {:.2} fps, ~{} frames)",
            path,
            info.width,
            info.height,
            info.fps,
            info.total_frames
        );

        Ok(Self {
            input,
            stream_index,
            decoder,
            scaler,
            info,
            eof_sent: false,
        })
    }

    fn rgb_frame(&mut self, decoded: &ffmpeg::frame::Video) -> Result<Frame> {
        let mut rgb = ffmpeg::frame::Video::empty();
        self.scaler
            .run(decoded, &mut rgb)
            .context("scale frame to RGB")?;
        let (pixels, width, height) = frame_to_pixels(&rgb)?;
        Ok(Frame {
            pixels,
            width,
            height,
        })
    }
}

impl FrameSource for FfmpegFileSource {
    fn info(&self) -> StreamInfo {
        self.info
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let mut decoded = ffmpeg::frame::Video::empty();

        loop {
            if self.decoder.receive_frame(&mut decoded).is_ok() {
                return self.rgb_frame(&decoded).map(Some);
            }
            if self.eof_sent {
                return Ok(None);
            }

            match self.input.packets().next() {
                Some((stream, packet)) if stream.index() == self.stream_index => {
                    self.decoder
                        .send_packet(&packet)
                        .context("send packet to ffmpeg decoder")?;
                }
                Some(_) => continue,
                None => {
                    // Flush buffered frames before reporting end of stream.
                    let _ = self.decoder.send_eof();
                    self.eof_sent = true;
                }
            }
        }
    }
}

fn frame_to_pixels(frame: &ffmpeg::frame::Video) -> Result<(Vec<u8>, u32, u32)> {
    let width = frame.width();
    let height = frame.height();
    let row_bytes = (width as usize) * 3;
    let stride = frame.stride(0);
    let data = frame.data(0);

    if stride == row_bytes {
        return Ok((data.to_vec(), width, height));
    }

    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        let end = start + row_bytes;
        pixels.extend_from_slice(
            data.get(start..end)
                .context("ffmpeg frame row is out of bounds")?,
        );
    }

    Ok((pixels, width, height))
}
