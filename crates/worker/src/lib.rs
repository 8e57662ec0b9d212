//! Post-estimate batch runner.
//!
//! Loads one pose file, runs the coaching engine and writes the result to
//! the reports directory. The binary in `main.rs` is a thin CLI over
//! [`run`].

pub mod output;
pub mod source;

use std::path::PathBuf;

use anyhow::Result;
use swingcoach_core::clock::Clock;
use swingcoach_core::engine::{AnalysisOutcome, SwingCoach};
use swingcoach_core::metrics::MetricExtractor;
use swingcoach_core::scoring::BaseScorer;
use swingcoach_core::types::Handedness;

/// What to analyse and where to put the result.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub src: PathBuf,
    /// Replaces any source URL recorded in the file.
    pub source_url: Option<String>,
    pub out_dir: PathBuf,
    /// Replaces any handedness recorded in the file.
    pub handedness: Option<Handedness>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunSummary {
    Report {
        files: Vec<PathBuf>,
        frame_count: usize,
        swing_score: u8,
        priority: Option<String>,
        faults: Vec<String>,
    },
    CaptureRejected {
        file: PathBuf,
        reasons: Vec<String>,
    },
}

/// Analyse `config.src` and write the outcome under `config.out_dir`.
///
/// `stamp` names the archive file; callers pass a UTC timestamp.
pub fn run<E, S, C>(coach: &SwingCoach<E, S, C>, config: &RunConfig, stamp: &str) -> Result<RunSummary>
where
    E: MetricExtractor,
    S: BaseScorer,
    C: Clock,
{
    let mut swing = source::load(&config.src)?;
    if config.source_url.is_some() {
        swing.options.source_url = config.source_url.clone();
    }
    if let Some(handedness) = config.handedness {
        swing.options.handedness = handedness;
    }
    tracing::debug!(
        src = %config.src.display(),
        frames = swing.pose.frame_count(),
        "Loaded swing"
    );

    match coach.analyze(&swing.pose, &swing.options)? {
        AnalysisOutcome::Report(report) => {
            let files = output::write_report(&config.out_dir, &report, stamp)?;
            Ok(RunSummary::Report {
                files,
                frame_count: swing.pose.frame_count(),
                swing_score: report.scores.swing_score,
                priority: report.priority.key.clone(),
                faults: report.faults.iter().map(|f| f.key.clone()).collect(),
            })
        }
        AnalysisOutcome::CaptureRejected(check) => {
            let file = output::write_capture_check(&config.out_dir, &check, stamp)?;
            Ok(RunSummary::CaptureRejected {
                file,
                reasons: check.reasons,
            })
        }
    }
}
