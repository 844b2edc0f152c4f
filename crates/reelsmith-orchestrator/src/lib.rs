//! Video assembly orchestration
//!
//! Turns a handful of screenshots and a prompt into one long clip: a first
//! segment grounded on reference images, then sequential extensions until the
//! duration target or the segment budget is reached.

mod config;
mod lease;
mod orchestrator;
mod poll;
mod progress;
mod prompt;

pub use config::{AssemblyConfig, PollPolicy, MAX_SEGMENTS_CAP};
pub use lease::RunLease;
pub use orchestrator::VideoAssemblyOrchestrator;
pub use progress::ProgressSink;
pub use prompt::{extension_prompt, initial_prompt};
pub use tokio_util::sync::CancellationToken;
