//! Sampling pipeline.
//!
//! Drives a frame source through three states:
//! - init: read stream metadata, normalize zones, derive the sampling
//!   stride
//! - streaming: pull frames in order; run detection, suppression, and
//!   aggregation on sample points only, discarding the rest untouched
//!   (detection is the expensive step)
//! - done: source exhausted; return the accumulated records
//!
//! Everything is single-threaded and in frame order, so records come
//! out sorted by frame number, then zone input order, with no locking.

use std::time::Instant;

use anyhow::Result;
use chrono::Utc;

use super::aggregate::count_in_zones;
use crate::detect::{suppress_overlaps, Detection, PersonDetector, DEFAULT_IOU_THRESHOLD};
use crate::ingest::FrameSource;
use crate::record::{density_percentage, format_video_timestamp, DensityRecord, RecordMetadata};
use crate::zones::{normalize_zones, Zone};

/// Seconds between samples when the caller does not say otherwise.
pub const DEFAULT_SAMPLE_INTERVAL_SECS: f64 = 15.0;

/// Configured analysis run. Construct once, run against any source and
/// detector.
#[derive(Clone, Debug)]
pub struct Analyzer {
    event_id: String,
    sample_interval_secs: f64,
    iou_threshold: f32,
}

/// Summary handed to progress observers after each sample point.
#[derive(Clone, Copy, Debug)]
pub struct SampleSummary {
    pub frame_number: u64,
    /// Declared stream length; 0 when the container does not know.
    pub total_frames: u64,
    /// People counted across all zones at this sample.
    pub people_count: u32,
}

impl Analyzer {
    pub fn new(event_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            sample_interval_secs: DEFAULT_SAMPLE_INTERVAL_SECS,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
        }
    }

    pub fn with_sample_interval(mut self, secs: f64) -> Self {
        self.sample_interval_secs = secs;
        self
    }

    pub fn with_iou_threshold(mut self, threshold: f32) -> Self {
        self.iou_threshold = threshold;
        self
    }

    /// Run the full pipeline and return the ordered record sequence.
    pub fn run<S, D>(
        &self,
        source: &mut S,
        detector: &mut D,
        zones: Vec<Zone>,
    ) -> Result<Vec<DensityRecord>>
    where
        S: FrameSource + ?Sized,
        D: PersonDetector + ?Sized,
    {
        self.run_with_observer(source, detector, zones, |_| {})
    }

    /// Like [`run`](Self::run), with a callback invoked after every
    /// sample point. The callback is the progress side channel; the
    /// pipeline itself never writes to stdout.
    pub fn run_with_observer<S, D>(
        &self,
        source: &mut S,
        detector: &mut D,
        zones: Vec<Zone>,
        mut observer: impl FnMut(&SampleSummary),
    ) -> Result<Vec<DensityRecord>>
    where
        S: FrameSource + ?Sized,
        D: PersonDetector + ?Sized,
    {
        let info = source.info();
        log::info!(
            "analyzing {}x{} stream: {:.2} fps, ~{} frames, sampling every {}s",
            info.width,
            info.height,
            info.fps,
            info.total_frames,
            self.sample_interval_secs
        );

        let zones = normalize_zones(zones, info.width, info.height);
        let stride = frames_per_sample(info.fps, self.sample_interval_secs);

        if let Err(e) = detector.warm_up() {
            log::warn!("detector '{}' warm-up failed: {:#}", detector.name(), e);
        }

        let mut records = Vec::new();
        let mut frame_number: u64 = 0;

        loop {
            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(e) => {
                    // A mid-stream read failure ends the stream; what has
                    // been accumulated so far is still flushed.
                    log::warn!("frame read failed at frame {}: {:#}", frame_number, e);
                    break;
                }
            };

            if frame_number % stride == 0 {
                let started = Instant::now();

                let raw = match detector.detect(&frame.pixels, frame.width, frame.height) {
                    Ok(raw) => raw,
                    Err(e) => {
                        log::warn!(
                            "detector '{}' failed on frame {}: {:#}; counting zero detections",
                            detector.name(),
                            frame_number,
                            e
                        );
                        Vec::new()
                    }
                };
                let survivors = suppress_overlaps(&raw, self.iou_threshold);
                let counts = count_in_zones(&survivors, &zones);

                let elapsed_secs = if info.fps > 0.0 {
                    (frame_number as f64 / info.fps).floor() as u64
                } else {
                    0
                };
                let video_timestamp = format_video_timestamp(elapsed_secs);
                let confidence = mean_weight(&survivors);
                let processing_time_ms = started.elapsed().as_millis() as u64;

                let people_total: u32 = counts.values().sum();
                log::info!(
                    "frame {}: {} detections, {} people in zones at {}",
                    frame_number,
                    survivors.len(),
                    people_total,
                    video_timestamp
                );

                for zone in &zones {
                    let people_count = counts.get(&zone.id).copied().unwrap_or(0);
                    if people_count > 0 {
                        log::debug!("  zone '{}': {} people", zone.id, people_count);
                    }
                    records.push(DensityRecord {
                        event_id: self.event_id.clone(),
                        zone_id: zone.id.clone(),
                        zone_name: zone.name.clone(),
                        people_count,
                        density_percentage: density_percentage(people_count, zone.max_capacity),
                        timestamp: Utc::now(),
                        video_timestamp: video_timestamp.clone(),
                        metadata: RecordMetadata {
                            frame_number,
                            confidence,
                            processing_time_ms,
                        },
                    });
                }

                observer(&SampleSummary {
                    frame_number,
                    total_frames: info.total_frames,
                    people_count: people_total,
                });
            }

            frame_number += 1;
        }

        log::info!(
            "analysis complete: {} records from {} frames",
            records.len(),
            frame_number
        );
        Ok(records)
    }
}

/// Frames between sample points: `floor(fps * interval)`, never below 1
/// so degenerate rates still make progress.
pub fn frames_per_sample(fps: f64, interval_secs: f64) -> u64 {
    let stride = (fps * interval_secs).floor();
    if stride.is_finite() && stride >= 1.0 {
        stride as u64
    } else {
        1
    }
}

fn mean_weight(detections: &[Detection]) -> f64 {
    if detections.is_empty() {
        return 0.0;
    }
    detections.iter().map(|d| d.weight as f64).sum::<f64>() / detections.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_follows_fps_times_interval() {
        assert_eq!(frames_per_sample(30.0, 5.0), 150);
        assert_eq!(frames_per_sample(29.97, 15.0), 449);
        assert_eq!(frames_per_sample(10.0, 0.5), 5);
    }

    #[test]
    fn stride_never_drops_below_one_frame() {
        assert_eq!(frames_per_sample(0.0, 15.0), 1);
        assert_eq!(frames_per_sample(0.01, 1.0), 1);
        assert_eq!(frames_per_sample(f64::NAN, 15.0), 1);
    }

    #[test]
    fn mean_weight_of_nothing_is_zero() {
        assert_eq!(mean_weight(&[]), 0.0);
        let some = vec![
            Detection::new(0.0, 0.0, 1.0, 1.0, 0.5),
            Detection::new(0.0, 0.0, 1.0, 1.0, 1.0),
        ];
        assert_eq!(mean_weight(&some), 0.75);
    }
}
