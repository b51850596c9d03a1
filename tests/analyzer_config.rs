use std::sync::Mutex;

use tempfile::NamedTempFile;

use crowdwatch::AnalyzerConfig;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "CROWDWATCH_CONFIG",
        "CROWDWATCH_VIDEO",
        "CROWDWATCH_ZONES",
        "CROWDWATCH_EVENT_ID",
        "CROWDWATCH_INTERVAL_SECS",
        "CROWDWATCH_IOU_THRESHOLD",
        "CROWDWATCH_DETECTOR",
        "CROWDWATCH_MODEL",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    let json = r#"{
        "video_path": "footage/main_hall.mp4",
        "zones_path": "zones/main_hall.json",
        "event_id": "evt-2026-08",
        "sample_interval_secs": 5,
        "iou_threshold": 0.4,
        "detector": {
            "backend": "stub"
        }
    }"#;
    std::io::Write::write_all(&mut file, json.as_bytes()).expect("write config");

    std::env::set_var("CROWDWATCH_EVENT_ID", "evt-override");
    std::env::set_var("CROWDWATCH_INTERVAL_SECS", "30");

    let cfg = AnalyzerConfig::load_from(Some(file.path())).expect("load config");

    assert_eq!(cfg.video_path, "footage/main_hall.mp4");
    assert_eq!(
        cfg.zones_path.as_deref(),
        Some(std::path::Path::new("zones/main_hall.json"))
    );
    assert_eq!(cfg.event_id, "evt-override");
    assert_eq!(cfg.sample_interval_secs, 30.0);
    assert_eq!(cfg.iou_threshold, 0.4);
    assert_eq!(cfg.detector.backend, "stub");

    clear_env();
}

#[test]
fn defaults_apply_without_a_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = AnalyzerConfig::load_from(None).expect("load defaults");

    assert_eq!(cfg.video_path, "stub://venue");
    assert!(cfg.zones_path.is_none());
    assert_eq!(cfg.event_id, "event-local");
    assert_eq!(cfg.sample_interval_secs, 15.0);
    assert_eq!(cfg.iou_threshold, 0.3);
    assert_eq!(cfg.detector.backend, "stub");

    clear_env();
}

#[test]
fn rejects_non_positive_sample_interval() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("CROWDWATCH_INTERVAL_SECS", "0");

    let err = AnalyzerConfig::load_from(None).unwrap_err();
    assert!(err.to_string().contains("sample interval"));

    clear_env();
}

#[test]
fn tract_backend_requires_a_model_path() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("CROWDWATCH_DETECTOR", "tract");

    let err = AnalyzerConfig::load_from(None).unwrap_err();
    assert!(err.to_string().contains("model path"));

    clear_env();
}

#[test]
fn unknown_backend_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("CROWDWATCH_DETECTOR", "hog");

    let err = AnalyzerConfig::load_from(None).unwrap_err();
    assert!(err.to_string().contains("unknown detector backend"));

    clear_env();
}
