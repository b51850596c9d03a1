//! Zone-aware crowd density analysis for recorded video.
//!
//! The pipeline samples frames from a recording at a fixed interval,
//! asks a pluggable person detector for bounding boxes, suppresses
//! duplicate detections, assigns the survivors to user-defined
//! polygonal zones, and emits one density record per zone per sample.
//!
//! Zone geometry is reconciled with the actual stream resolution before
//! any detection work: missing zones become a single full-frame zone,
//! and zones authored against a different resolution are rescaled or
//! redistributed (see [`zones::normalize_zones`]).
//!
//! # Module Structure
//!
//! - `geometry`: point-in-polygon and extent primitives
//! - `zones`: zone model, loading, normalization policies
//! - `detect`: person detector seam, duplicate suppression, backends
//! - `ingest`: frame sources (video files, synthetic streams)
//! - `pipeline`: the sampling state machine and zone aggregation
//! - `record`: density record output model
//! - `config`, `ui`: run configuration and terminal progress

pub mod config;
pub mod detect;
pub mod geometry;
pub mod ingest;
pub mod pipeline;
pub mod record;
pub mod ui;
pub mod zones;

pub use config::{AnalyzerConfig, DetectorSettings};
#[cfg(feature = "backend-tract")]
pub use detect::TractDetector;
pub use detect::{
    iou, suppress_overlaps, Detection, PersonDetector, StubDetector, DEFAULT_IOU_THRESHOLD,
};
pub use geometry::{bounding_extent, point_in_polygon, Point};
pub use ingest::{
    Frame, FrameSource, StreamInfo, SyntheticConfig, SyntheticSource, VideoFileSource,
};
pub use pipeline::{
    count_in_zones, frames_per_sample, Analyzer, SampleSummary, DEFAULT_SAMPLE_INTERVAL_SECS,
};
pub use record::{DensityRecord, RecordMetadata};
pub use zones::{
    full_frame_zone, load_zones, normalize_zones, validate_zones, Zone, DEFAULT_MAX_CAPACITY,
    FULL_VIDEO_ZONE_ID, ZONE_EXTENT_MIN_RATIO,
};
