use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swingcoach_core::engine::SwingCoach;
use swingcoach_core::types::Handedness;
use swingcoach_worker::{run, RunConfig, RunSummary};

#[derive(Parser, Debug)]
#[command(name = "swingcoach-worker")]
#[command(about = "Run the coaching engine on a pose JSON file")]
struct Args {
    /// Pose JSON, or a rep JSON with frames under `input.frames`
    #[arg(long)]
    src: PathBuf,

    /// Source video URL recorded in the report (overrides the file)
    #[arg(long)]
    source_url: Option<String>,

    /// Directory for `post_<stamp>.json`, `latest.full.json` and `latest.json`
    #[arg(long, default_value = "public/reports")]
    out_dir: PathBuf,

    /// Analyse as a left-handed golfer (overrides the file)
    #[arg(long)]
    left_handed: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "swingcoach_worker=debug,swingcoach_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = RunConfig {
        src: args.src,
        source_url: args.source_url,
        out_dir: args.out_dir,
        handedness: args.left_handed.then_some(Handedness::Left),
    };
    let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ").to_string();

    match run(&SwingCoach::new(), &config, &stamp)? {
        RunSummary::Report {
            files,
            frame_count,
            swing_score,
            priority,
            faults,
        } => {
            tracing::info!(
                frame_count,
                swing_score,
                priority = priority.as_deref().unwrap_or("none"),
                faults = ?faults,
                "Post-estimate report written"
            );
            for file in files {
                tracing::info!(path = %file.display(), "Wrote");
            }
        }
        RunSummary::CaptureRejected { file, reasons } => {
            tracing::warn!(path = %file.display(), reasons = ?reasons, "Capture rejected");
        }
    }

    Ok(())
}
