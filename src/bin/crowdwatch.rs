//! crowdwatch - zone-aware crowd density analysis over a recorded video

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use crowdwatch::ui::{Progress, UiMode};
use crowdwatch::{
    load_zones, Analyzer, AnalyzerConfig, FrameSource, PersonDetector, StubDetector,
    VideoFileSource,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the recording (stub:// paths yield a synthetic stream).
    #[arg(long)]
    video: Option<String>,
    /// Zones document (JSON array). Omit to analyze the full frame.
    #[arg(long)]
    zones: Option<PathBuf>,
    /// Event identifier stamped on every record.
    #[arg(long)]
    event_id: Option<String>,
    /// Seconds between samples.
    #[arg(long)]
    interval: Option<f64>,
    /// Detector backend (stub, tract).
    #[arg(long)]
    detector: Option<String>,
    /// Config file (also read from CROWDWATCH_CONFIG).
    #[arg(long, env = "CROWDWATCH_CONFIG")]
    config: Option<PathBuf>,
    /// Write records to this file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Progress style: auto, plain, pretty.
    #[arg(long, default_value = "auto")]
    ui: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut cfg = AnalyzerConfig::load_from(args.config.as_deref())?;
    if let Some(video) = args.video {
        cfg.video_path = video;
    }
    if let Some(zones) = args.zones {
        cfg.zones_path = Some(zones);
    }
    if let Some(event_id) = args.event_id {
        cfg.event_id = event_id;
    }
    if let Some(interval) = args.interval {
        cfg.sample_interval_secs = interval;
    }
    if let Some(detector) = args.detector {
        cfg.detector.backend = detector;
    }
    cfg.validate()?;

    let zones = match &cfg.zones_path {
        Some(path) => load_zones(path)?,
        None => Vec::new(),
    };

    let mut source = VideoFileSource::open(&cfg.video_path)
        .with_context(|| format!("cannot open video source '{}'", cfg.video_path))?;
    let info = source.info();

    let mut detector = build_detector(&cfg)?;
    let analyzer = Analyzer::new(cfg.event_id.clone())
        .with_sample_interval(cfg.sample_interval_secs)
        .with_iou_threshold(cfg.iou_threshold);

    let progress = Progress::new(
        UiMode::from_flag(&args.ui),
        std::io::stderr().is_terminal(),
        info.total_frames,
    );
    let records = analyzer.run_with_observer(&mut source, detector.as_mut(), zones, |sample| {
        progress.observe(sample)
    })?;
    progress.finish();

    let json = serde_json::to_string_pretty(&records).context("serialize records")?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write records to {}", path.display()))?;
            log::info!("wrote {} records to {}", records.len(), path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn build_detector(cfg: &AnalyzerConfig) -> Result<Box<dyn PersonDetector>> {
    match cfg.detector.backend.as_str() {
        "stub" => Ok(Box::new(StubDetector::empty())),
        #[cfg(feature = "backend-tract")]
        "tract" => {
            let model = cfg
                .detector
                .model_path
                .as_ref()
                .ok_or_else(|| anyhow!("the tract detector requires a model path"))?;
            Ok(Box::new(crowdwatch::TractDetector::new(
                model,
                cfg.detector.model_input_size,
            )?))
        }
        #[cfg(not(feature = "backend-tract"))]
        "tract" => Err(anyhow!(
            "this build does not include the backend-tract feature"
        )),
        other => Err(anyhow!("unknown detector backend '{}'", other)),
    }
}
