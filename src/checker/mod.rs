//! Link checking engine
//!
//! This module contains the core checking logic, including:
//! - Single-link HTTP probing with timeout and error classification
//! - Bounded-concurrency scheduling with ordered results and cancellation
//! - Result aggregation and summary statistics

mod probe;
mod results;
mod scheduler;
mod status;

pub use probe::{build_http_client, classify_error, HttpProber, ProbeResult, Prober};
pub use results::{summarize, ResultSet, Summary};
pub use scheduler::{PartialResults, RunOutcome, Scheduler};
pub use status::ProbeStatus;

use crate::config::ProbeConfig;
use crate::source::Channel;
use tokio_util::sync::CancellationToken;

/// Probes `channels` over HTTP using `config`
///
/// This is the main entry point for a check run. It builds an `HttpProber`,
/// runs it under the configured concurrency limit, and stops early if
/// `cancel` fires.
///
/// # Returns
///
/// * `Ok(RunOutcome)` - The run completed or was cancelled
/// * `Err(ProbeError::Reqwest)` - The HTTP client could not be built
pub async fn check_channels(
    channels: &[Channel],
    config: &ProbeConfig,
    cancel: &CancellationToken,
) -> crate::Result<RunOutcome> {
    let prober = HttpProber::new(config)?;
    let scheduler = Scheduler::new(prober, config.concurrency_limit)
        .with_progress_interval(config.progress_interval);
    Ok(scheduler.run_until_cancelled(channels, cancel).await)
}
