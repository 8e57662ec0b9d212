//! Engine driver: one call from landmark series to report.

use serde::{Deserialize, Serialize};

use crate::capture_quality::{self, CaptureCheck, CaptureQualityInput};
use crate::clock::{Clock, SystemClock};
use crate::drills;
use crate::error::CoreError;
use crate::faults::{self, Fault};
use crate::metrics::{LandmarkMetricExtractor, MetricExtractor, MetricSet};
use crate::pose::PoseSeries;
use crate::power_leaks;
use crate::report::{self, PipelineMeta, PipelineOutput, PlayerProfile, Report};
use crate::scoring::{self, BaseScorer, DeterministicScorer};
use crate::types::Handedness;

/// Highlights carried over from the fault list.
const MAX_FAULT_HIGHLIGHTS: usize = 3;

/// Per-call options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeOptions {
    pub source_url: Option<String>,
    pub capture: CaptureQualityInput,
    pub handedness: Handedness,
    pub player: Option<PlayerProfile>,
}

/// Either a full report or the capture check that stopped the analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Report(Box<Report>),
    CaptureRejected(CaptureCheck),
}

/// The coaching engine.
///
/// Stateless apart from its injected parts, so one instance can be shared
/// across threads and calls.
#[derive(Debug, Clone, Default)]
pub struct SwingCoach<E = LandmarkMetricExtractor, S = DeterministicScorer, C = SystemClock> {
    extractor: E,
    scorer: S,
    clock: C,
}

impl SwingCoach {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E, S, C> SwingCoach<E, S, C>
where
    E: MetricExtractor,
    S: BaseScorer,
    C: Clock,
{
    pub fn with_parts(extractor: E, scorer: S, clock: C) -> Self {
        Self {
            extractor,
            scorer,
            clock,
        }
    }

    /// Run the full pipeline on one swing.
    ///
    /// A failing capture check is returned as a value; no metric work is
    /// done in that case.
    pub fn analyze(
        &self,
        pose: &PoseSeries,
        options: &AnalyzeOptions,
    ) -> Result<AnalysisOutcome, CoreError> {
        let check = capture_quality::evaluate(&options.capture);
        if check.is_fail() {
            tracing::info!(reasons = ?check.reasons, "Capture rejected");
            return Ok(AnalysisOutcome::CaptureRejected(check));
        }

        let metrics = self.metrics_for(pose, options.handedness);
        tracing::debug!(metric_count = metrics.len(), "Metrics extracted");

        let fault_list = faults::detect(&metrics);
        let keys = fault_keys(&fault_list);
        tracing::debug!(faults = ?keys, "Faults detected");

        let leaks = power_leaks::rank(&metrics, &fault_list);
        let drill_ids: Vec<String> = drills::select_drills(&keys)
            .into_iter()
            .map(str::to_string)
            .collect();
        tracing::debug!(leaks = leaks.len(), drills = drill_ids.len(), "Remedies selected");

        let base = self.scorer.score(pose, &metrics);

        let mut player = PlayerProfile {
            handedness: Some(options.handedness),
            ..Default::default()
        };
        if let Some(p) = &options.player {
            player.overlay(p);
        }
        let meta = PipelineMeta {
            fps: pose.effective_fps(),
            frame_count: pose.frame_count(),
            source_url: options.source_url.clone(),
            player: Some(player),
            extras: Default::default(),
        };

        let pipeline = PipelineOutput {
            efficiency: scoring::pipeline_efficiency(&metrics),
            highlights: fault_highlights(&fault_list),
            metrics,
            faults: fault_list,
            power_leaks: leaks,
            drills: drill_ids,
        };

        let report = report::assemble(base, pipeline, meta, &self.clock)?;
        tracing::info!(
            frame_count = pose.frame_count(),
            faults = ?fault_keys(&report.faults),
            priority = %report.priority.key.as_deref().unwrap_or("none"),
            swing_score = report.scores.swing_score,
            quality = ?check.quality,
            "Swing analysed"
        );
        Ok(AnalysisOutcome::Report(Box::new(report)))
    }

    /// Extracted metrics with provider metrics laid over them.
    fn metrics_for(&self, pose: &PoseSeries, handedness: Handedness) -> MetricSet {
        let mut metrics = self.extractor.extract(pose, handedness);
        if let Some(provided) = &pose.metrics {
            metrics.overlay(provided);
        }
        metrics
    }
}

fn fault_keys(faults: &[Fault]) -> Vec<&str> {
    faults.iter().map(|f| f.key.as_str()).collect()
}

fn fault_highlights(faults: &[Fault]) -> Option<Vec<String>> {
    if faults.is_empty() {
        return None;
    }
    Some(
        faults
            .iter()
            .take(MAX_FAULT_HIGHLIGHTS)
            .map(|f| format!("{}: {}", f.label, f.meaning))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;
    use crate::capture_quality::CaptureQuality;
    use crate::checkpoints::CheckpointStatus;
    use crate::clock::FixedClock;
    use crate::faults::{FAULT_FLIP_RISK, FAULT_LATE_PRESSURE_SHIFT};
    use crate::metrics::METRIC_PRESSURE_FORWARD;
    use crate::test_support::{mirrored, synthetic_swing, SwingShape};

    fn coach() -> SwingCoach<LandmarkMetricExtractor, DeterministicScorer, FixedClock> {
        SwingCoach::with_parts(
            LandmarkMetricExtractor,
            DeterministicScorer,
            FixedClock(chrono::Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0).unwrap()),
        )
    }

    fn report_of(outcome: AnalysisOutcome) -> Report {
        match outcome {
            AnalysisOutcome::Report(r) => *r,
            AnalysisOutcome::CaptureRejected(c) => panic!("unexpected rejection: {c:?}"),
        }
    }

    // -- gate -----------------------------------------------------------------

    #[test]
    fn dark_capture_short_circuits() {
        let options = AnalyzeOptions {
            capture: CaptureQualityInput {
                is_too_dark: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };
        // Empty frames would otherwise still produce a report.
        let outcome = coach().analyze(&PoseSeries::default(), &options).unwrap();
        assert_matches!(
            outcome,
            AnalysisOutcome::CaptureRejected(check) if check.quality == CaptureQuality::Fail
        );
    }

    // -- full pipeline --------------------------------------------------------

    #[test]
    fn sound_swing_has_no_faults() {
        let pose = synthetic_swing(SwingShape::default());
        let report = report_of(coach().analyze(&pose, &AnalyzeOptions::default()).unwrap());
        assert!(report.faults.is_empty());
        assert!(report.drills.is_empty());
        assert!(report.practice_plan14.is_empty());
        assert_eq!(report.checkpoints.len(), 9);
        assert_eq!(report.power_leaks.len(), 3);
        assert_eq!(report.meta.frame_count, Some(60));
        assert_eq!(report.meta.fps, Some(30.0));
    }

    #[test]
    fn decelerating_hands_prioritise_flip() {
        let pose = synthetic_swing(SwingShape {
            hands_decelerate: true,
            ..Default::default()
        });
        let report = report_of(coach().analyze(&pose, &AnalyzeOptions::default()).unwrap());
        assert_eq!(report.priority.key.as_deref(), Some(FAULT_FLIP_RISK));
        assert_eq!(report.checkpoints[6].status, CheckpointStatus::PriorityFix);
        assert_eq!(report.drills[0], "impact_bag");
        assert_eq!(report.power_leaks[0].key, "handle_slow");
        assert_eq!(report.practice_plan14.len(), 14);
    }

    #[test]
    fn summary_log_names_fault_keys() {
        use std::io;
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Captured {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Captured {
            type Writer = Captured;

            fn make_writer(&'a self) -> Self::Writer {
                self.clone()
            }
        }

        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .finish();
        let pose = synthetic_swing(SwingShape {
            hands_decelerate: true,
            ..Default::default()
        });
        tracing::subscriber::with_default(subscriber, || {
            coach().analyze(&pose, &AnalyzeOptions::default()).unwrap();
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        let summary = output
            .lines()
            .find(|l| l.contains("Swing analysed"))
            .expect("summary line");
        assert!(summary.contains(FAULT_FLIP_RISK), "{summary}");
        assert!(summary.contains("priority=flip_risk"), "{summary}");
    }

    #[test]
    fn same_input_same_report() {
        let pose = synthetic_swing(SwingShape {
            impact_pressure: 45.0,
            ..Default::default()
        });
        let options = AnalyzeOptions {
            source_url: Some("https://example.com/a.mp4".into()),
            ..Default::default()
        };
        let a = coach().analyze(&pose, &options).unwrap();
        let b = coach().analyze(&pose, &options).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn provider_metrics_override_extracted() {
        let mut pose = synthetic_swing(SwingShape::default());
        pose.metrics = Some(MetricSet::new().with(METRIC_PRESSURE_FORWARD, 30.0));
        let report = report_of(coach().analyze(&pose, &AnalyzeOptions::default()).unwrap());
        assert_eq!(report.metrics.number(METRIC_PRESSURE_FORWARD), Some(30.0));
        assert_eq!(report.faults[0].key, FAULT_LATE_PRESSURE_SHIFT);
        assert_eq!(report.faults[0].score, Some(50));
    }

    #[test]
    fn left_handed_mirror_yields_same_faults() {
        let right = synthetic_swing(SwingShape {
            hands_decelerate: true,
            ..Default::default()
        });
        let left = mirrored(&right);
        let options = AnalyzeOptions {
            handedness: Handedness::Left,
            ..Default::default()
        };
        let r = report_of(coach().analyze(&right, &AnalyzeOptions::default()).unwrap());
        let l = report_of(coach().analyze(&left, &options).unwrap());
        let keys = |rep: &Report| rep.faults.iter().map(|f| f.key.clone()).collect::<Vec<_>>();
        assert_eq!(keys(&r), keys(&l));
        assert_eq!(l.meta.player.handedness, Some(Handedness::Left));
    }

    #[test]
    fn player_metadata_and_clock_reach_meta() {
        let pose = synthetic_swing(SwingShape::default());
        let options = AnalyzeOptions {
            source_url: Some("https://example.com/b.mp4".into()),
            player: Some(PlayerProfile {
                player_name: Some("Alex".into()),
                club: Some("driver".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = report_of(coach().analyze(&pose, &options).unwrap());
        assert_eq!(report.meta.player.player_name.as_deref(), Some("Alex"));
        assert_eq!(report.meta.player.handedness, Some(Handedness::Right));
        assert_eq!(report.meta.source_url.as_deref(), Some("https://example.com/b.mp4"));
        assert_eq!(
            report.meta.generated_at,
            chrono::Utc.with_ymd_and_hms(2026, 5, 4, 9, 30, 0).unwrap()
        );
        assert_eq!(report.meta.pipeline.as_deref(), Some(report::PIPELINE_VERSION));
    }

    #[test]
    fn coach_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SwingCoach>();
    }
}
