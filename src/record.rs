//! Density record output model.
//!
//! One record per (zone, sampled frame) pair; the accumulated sequence
//! is the sole externally consumed artifact of an analysis run. Records
//! serialize with the camelCase field names downstream consumers
//! already store.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Immutable per-zone occupancy sample.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityRecord {
    pub event_id: String,
    pub zone_id: String,
    pub zone_name: String,
    pub people_count: u32,
    pub density_percentage: f64,
    /// Wall-clock time of record creation.
    pub timestamp: DateTime<Utc>,
    /// Elapsed video time at the sampled frame, `H:MM:SS`.
    pub video_timestamp: String,
    pub metadata: RecordMetadata,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    /// 0-based index of the sampled frame within the source.
    pub frame_number: u64,
    /// Mean weight of the detections that survived suppression.
    pub confidence: f64,
    /// Measured wall time spent on this sample.
    pub processing_time_ms: u64,
}

/// Occupancy as a percentage of capacity, clamped to 100 and rounded to
/// 2 decimals.
pub fn density_percentage(people_count: u32, max_capacity: f64) -> f64 {
    if max_capacity <= 0.0 {
        return 0.0;
    }
    let pct = (people_count as f64 / max_capacity * 100.0).min(100.0);
    (pct * 100.0).round() / 100.0
}

/// Elapsed seconds formatted as `H:MM:SS` (hours unpadded).
pub fn format_video_timestamp(elapsed_secs: u64) -> String {
    let hours = elapsed_secs / 3600;
    let minutes = (elapsed_secs % 3600) / 60;
    let seconds = elapsed_secs % 60;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}
