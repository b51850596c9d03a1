use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde::Deserialize;

use crate::detect::DEFAULT_IOU_THRESHOLD;
use crate::pipeline::DEFAULT_SAMPLE_INTERVAL_SECS;

const DEFAULT_VIDEO_PATH: &str = "stub://venue";
const DEFAULT_EVENT_ID: &str = "event-local";
const DEFAULT_DETECTOR: &str = "stub";
const DEFAULT_MODEL_INPUT_SIZE: u32 = 640;

#[derive(Debug, Deserialize, Default)]
struct AnalyzerConfigFile {
    video_path: Option<String>,
    zones_path: Option<PathBuf>,
    event_id: Option<String>,
    sample_interval_secs: Option<f64>,
    iou_threshold: Option<f32>,
    detector: Option<DetectorConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct DetectorConfigFile {
    backend: Option<String>,
    model_path: Option<PathBuf>,
    model_input_size: Option<u32>,
}

/// Resolved analysis configuration: JSON file (path from
/// `CROWDWATCH_CONFIG` or the CLI), then `CROWDWATCH_*` env overrides,
/// then validation.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    pub video_path: String,
    pub zones_path: Option<PathBuf>,
    pub event_id: String,
    pub sample_interval_secs: f64,
    pub iou_threshold: f32,
    pub detector: DetectorSettings,
}

#[derive(Debug, Clone)]
pub struct DetectorSettings {
    pub backend: String,
    pub model_path: Option<PathBuf>,
    pub model_input_size: u32,
}

impl AnalyzerConfig {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("CROWDWATCH_CONFIG").ok().map(PathBuf::from);
        Self::load_from(config_path.as_deref())
    }

    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file_cfg = match path {
            Some(path) => read_config_file(path)?,
            None => AnalyzerConfigFile::default(),
        };
        let mut cfg = Self::from_file(file_cfg);
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: AnalyzerConfigFile) -> Self {
        let detector = file.detector.unwrap_or_default();
        Self {
            video_path: file
                .video_path
                .unwrap_or_else(|| DEFAULT_VIDEO_PATH.to_string()),
            zones_path: file.zones_path,
            event_id: file.event_id.unwrap_or_else(|| DEFAULT_EVENT_ID.to_string()),
            sample_interval_secs: file
                .sample_interval_secs
                .unwrap_or(DEFAULT_SAMPLE_INTERVAL_SECS),
            iou_threshold: file.iou_threshold.unwrap_or(DEFAULT_IOU_THRESHOLD),
            detector: DetectorSettings {
                backend: detector
                    .backend
                    .unwrap_or_else(|| DEFAULT_DETECTOR.to_string()),
                model_path: detector.model_path,
                model_input_size: detector.model_input_size.unwrap_or(DEFAULT_MODEL_INPUT_SIZE),
            },
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("CROWDWATCH_VIDEO") {
            if !path.trim().is_empty() {
                self.video_path = path;
            }
        }
        if let Ok(path) = std::env::var("CROWDWATCH_ZONES") {
            if !path.trim().is_empty() {
                self.zones_path = Some(PathBuf::from(path));
            }
        }
        if let Ok(event_id) = std::env::var("CROWDWATCH_EVENT_ID") {
            if !event_id.trim().is_empty() {
                self.event_id = event_id;
            }
        }
        if let Ok(interval) = std::env::var("CROWDWATCH_INTERVAL_SECS") {
            self.sample_interval_secs = interval
                .parse()
                .map_err(|_| anyhow!("CROWDWATCH_INTERVAL_SECS must be a number of seconds"))?;
        }
        if let Ok(threshold) = std::env::var("CROWDWATCH_IOU_THRESHOLD") {
            self.iou_threshold = threshold
                .parse()
                .map_err(|_| anyhow!("CROWDWATCH_IOU_THRESHOLD must be a number"))?;
        }
        if let Ok(backend) = std::env::var("CROWDWATCH_DETECTOR") {
            if !backend.trim().is_empty() {
                self.detector.backend = backend;
            }
        }
        if let Ok(model) = std::env::var("CROWDWATCH_MODEL") {
            if !model.trim().is_empty() {
                self.detector.model_path = Some(PathBuf::from(model));
            }
        }
        Ok(())
    }

    /// Re-check invariants after callers apply their own overrides.
    pub fn validate(&self) -> Result<()> {
        if self.video_path.trim().is_empty() {
            return Err(anyhow!("video path must not be empty"));
        }
        if self.event_id.trim().is_empty() {
            return Err(anyhow!("event id must not be empty"));
        }
        if !(self.sample_interval_secs.is_finite() && self.sample_interval_secs > 0.0) {
            return Err(anyhow!("sample interval must be a positive number of seconds"));
        }
        if !(self.iou_threshold > 0.0 && self.iou_threshold < 1.0) {
            return Err(anyhow!("IoU threshold must lie strictly between 0 and 1"));
        }
        match self.detector.backend.as_str() {
            "stub" => {}
            "tract" => {
                if self.detector.model_path.is_none() {
                    return Err(anyhow!("the tract detector requires a model path"));
                }
            }
            other => {
                return Err(anyhow!(
                    "unknown detector backend '{}'; expected 'stub' or 'tract'",
                    other
                ));
            }
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<AnalyzerConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
