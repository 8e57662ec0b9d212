//! SwingCoach core: the post-pose-estimation coaching engine.
//!
//! Everything in this crate is pure logic over immutable inputs. The
//! pipeline is gate -> extract -> detect -> {rank, select drills} ->
//! assemble, driven by [`engine::SwingCoach`].

pub mod capture_quality;
pub mod checkpoints;
pub mod clock;
pub mod drills;
pub mod engine;
pub mod error;
pub mod faults;
pub mod metrics;
pub mod pose;
pub mod power_leaks;
pub mod report;
pub mod scoring;
pub mod types;

#[cfg(test)]
mod test_support;
