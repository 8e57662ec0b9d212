//! Writing analysis results to the reports directory.
//!
//! A report lands in three files: `post_<stamp>.json` (the archive copy),
//! `latest.full.json` (same content, fixed name) and `latest.json`, a
//! small index the UI polls. A rejected capture only writes
//! `capture_<stamp>.json` and leaves the `latest` files untouched.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use swingcoach_core::capture_quality::CaptureCheck;
use swingcoach_core::faults::Confidence;
use swingcoach_core::report::{Priority, Report, ReportMeta, Scores};

pub const LATEST_FULL: &str = "latest.full.json";
pub const LATEST_INDEX: &str = "latest.json";

pub fn report_file_name(stamp: &str) -> String {
    format!("post_{stamp}.json")
}

pub fn capture_file_name(stamp: &str) -> String {
    format!("capture_{stamp}.json")
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FaultSummary<'a> {
    key: &'a str,
    label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<u8>,
    confidence: Confidence,
}

/// Contents of `latest.json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LatestIndex<'a> {
    file: String,
    meta: &'a ReportMeta,
    scores: &'a Scores,
    priority: &'a Priority,
    faults: Vec<FaultSummary<'a>>,
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("Failed to serialize output")?;
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}

fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))
}

/// Write the archive copy, the full latest copy and the index. Returns the
/// paths in that order.
pub fn write_report(out_dir: &Path, report: &Report, stamp: &str) -> Result<Vec<PathBuf>> {
    ensure_dir(out_dir)?;

    let file = report_file_name(stamp);
    let archive = out_dir.join(&file);
    let full = out_dir.join(LATEST_FULL);
    let index = out_dir.join(LATEST_INDEX);

    write_json(&archive, report)?;
    write_json(&full, report)?;
    write_json(
        &index,
        &LatestIndex {
            file,
            meta: &report.meta,
            scores: &report.scores,
            priority: &report.priority,
            faults: report
                .faults
                .iter()
                .map(|f| FaultSummary {
                    key: &f.key,
                    label: &f.label,
                    score: f.score,
                    confidence: f.confidence,
                })
                .collect(),
        },
    )?;

    Ok(vec![archive, full, index])
}

pub fn write_capture_check(out_dir: &Path, check: &CaptureCheck, stamp: &str) -> Result<PathBuf> {
    ensure_dir(out_dir)?;
    let path = out_dir.join(capture_file_name(stamp));
    write_json(&path, check)?;
    Ok(path)
}
