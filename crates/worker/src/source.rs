//! Loading a swing from disk.
//!
//! Two layouts are accepted: a bare pose series (`frames` at the top
//! level) or a rep document that nests the series under `input`. Rep
//! documents may also carry analysis hints next to the frames.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use swingcoach_core::capture_quality::CaptureQualityInput;
use swingcoach_core::engine::AnalyzeOptions;
use swingcoach_core::pose::PoseSeries;
use swingcoach_core::report::PlayerProfile;
use swingcoach_core::types::Handedness;

/// Pose-level keys a rep may keep beside `input` rather than inside it.
const INHERITED_KEYS: &[&str] = &["fps", "width", "height", "metrics"];

/// A pose series plus the options recorded alongside it.
#[derive(Debug, Clone)]
pub struct LoadedSwing {
    pub pose: PoseSeries,
    pub options: AnalyzeOptions,
}

/// Read one hint from the document. A malformed hint is dropped on its own
/// so it cannot take its siblings with it.
fn hint<T: DeserializeOwned>(doc: &Value, key: &str) -> Option<T> {
    let value = doc.get(key)?;
    match serde_json::from_value(value.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(hint = key, error = %e, "Ignoring malformed hint");
            None
        }
    }
}

pub fn load(path: &Path) -> Result<LoadedSwing> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse(&text).with_context(|| format!("Failed to load swing from {}", path.display()))
}

pub fn parse(text: &str) -> Result<LoadedSwing> {
    let doc: Value = serde_json::from_str(text).context("Invalid JSON")?;

    let has_frames = |v: &Value| v.get("frames").is_some_and(Value::is_array);
    let pose_value = if has_frames(&doc) {
        doc.clone()
    } else if let Some(input) = doc.get("input").filter(|i| has_frames(i)) {
        let mut input = input.clone();
        if let Some(obj) = input.as_object_mut() {
            for &key in INHERITED_KEYS {
                if let Some(v) = doc.get(key) {
                    obj.entry(key).or_insert_with(|| v.clone());
                }
            }
        }
        input
    } else {
        bail!("No pose frames found under `frames` or `input.frames`");
    };

    let pose: PoseSeries = serde_json::from_value(pose_value).context("Invalid pose series")?;

    Ok(LoadedSwing {
        pose,
        options: AnalyzeOptions {
            source_url: hint(&doc, "sourceUrl"),
            capture: hint::<CaptureQualityInput>(&doc, "capture").unwrap_or_default(),
            handedness: hint::<Handedness>(&doc, "handedness").unwrap_or_default(),
            player: hint::<PlayerProfile>(&doc, "player"),
        },
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn frame() -> Value {
        json!({ "landmarks": [{ "x": 0.5, "y": 0.5 }] })
    }

    #[test]
    fn bare_pose_series() {
        let text = json!({ "fps": 60, "frames": [frame(), frame()] }).to_string();
        let swing = parse(&text).unwrap();
        assert_eq!(swing.pose.frame_count(), 2);
        assert_eq!(swing.pose.fps, Some(60.0));
        assert_eq!(swing.options, AnalyzeOptions::default());
    }

    #[test]
    fn rep_document_with_hints() {
        let text = json!({
            "fps": 120,
            "sourceUrl": "https://example.com/rep.mp4",
            "handedness": "left",
            "capture": { "isShaky": true },
            "player": { "playerName": "Kai" },
            "input": { "frames": [frame(), frame(), frame()] },
        })
        .to_string();
        let swing = parse(&text).unwrap();
        assert_eq!(swing.pose.frame_count(), 3);
        assert_eq!(swing.pose.fps, Some(120.0));
        assert_eq!(swing.options.source_url.as_deref(), Some("https://example.com/rep.mp4"));
        assert_eq!(swing.options.handedness, Handedness::Left);
        assert_eq!(swing.options.capture.is_shaky, Some(true));
        assert_eq!(
            swing.options.player.and_then(|p| p.player_name).as_deref(),
            Some("Kai")
        );
    }

    #[test]
    fn input_values_win_over_top_level() {
        let text = json!({
            "fps": 120,
            "input": { "fps": 30, "frames": [frame()] },
        })
        .to_string();
        assert_eq!(parse(&text).unwrap().pose.fps, Some(30.0));
    }

    #[test]
    fn missing_frames_is_an_error() {
        let err = parse(&json!({ "input": { "video": "a.mp4" } }).to_string()).unwrap_err();
        assert!(err.to_string().contains("No pose frames"));
    }

    #[test]
    fn malformed_hints_are_ignored() {
        let text = json!({ "handedness": 7, "frames": [frame()] }).to_string();
        let swing = parse(&text).unwrap();
        assert_eq!(swing.options.handedness, Handedness::Right);
    }

    #[test]
    fn malformed_hint_keeps_its_siblings() {
        let text = json!({
            "handedness": "ambidextrous",
            "sourceUrl": 42,
            "capture": { "isTooDark": true },
            "player": { "playerName": "Kai" },
            "frames": [{ "landmarks": [] }],
        })
        .to_string();
        let swing = parse(&text).unwrap();
        assert_eq!(swing.options.capture.is_too_dark, Some(true));
        assert_eq!(swing.options.handedness, Handedness::Right);
        assert_eq!(swing.options.source_url, None);
        assert_eq!(
            swing.options.player.and_then(|p| p.player_name).as_deref(),
            Some("Kai")
        );
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/not/here.json"));
    }
}
