//! Bounded-concurrency probe scheduler
//!
//! This module handles:
//! - Global concurrency limiting via a semaphore
//! - Index-based result placement, so output order never depends on timing
//! - Periodic progress logging
//! - Cooperative cancellation

use crate::checker::{ProbeResult, Prober, ResultSet};
use crate::source::Channel;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Completed part of a cancelled run
#[derive(Debug, Clone, Default)]
pub struct PartialResults {
    /// Number of channels the run was started with
    pub total: usize,

    /// `(input index, result)` pairs for finished probes, in input order
    pub completed: Vec<(usize, ProbeResult)>,
}

impl PartialResults {
    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Finished results only, in input order
    pub fn into_result_set(self) -> ResultSet {
        self.completed.into_iter().map(|(_, result)| result).collect()
    }
}

/// How a run ended
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Every channel has a result
    Complete(ResultSet),

    /// The run was cancelled before every probe finished
    Cancelled(PartialResults),
}

impl RunOutcome {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

/// Scheduler drives a `Prober` over a channel list
///
/// The scheduler coordinates:
/// - Global concurrency limits (at most `concurrency_limit` probes in flight)
/// - Result placement by input index
/// - Progress reporting every `progress_interval` completions
pub struct Scheduler<P: Prober> {
    prober: Arc<P>,
    concurrency_limit: usize,
    progress_interval: usize,
}

impl<P: Prober> Scheduler<P> {
    /// Creates a new scheduler
    ///
    /// A `concurrency_limit` of 0 is treated as 1.
    pub fn new(prober: P, concurrency_limit: usize) -> Self {
        Self {
            prober: Arc::new(prober),
            concurrency_limit: concurrency_limit.max(1),
            progress_interval: 200,
        }
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    pub fn prober(&self) -> &P {
        &self.prober
    }

    /// Probes every channel and returns results in input order
    ///
    /// Returns only after every channel has a result.
    pub async fn run_all(&self, channels: &[Channel]) -> ResultSet {
        let (results, _) = self.drive(channels, &CancellationToken::new()).await;
        results.into_iter().flatten().collect()
    }

    /// Like [`Scheduler::run_all`], but stops early when `cancel` fires
    ///
    /// On cancellation no new probes start, in-flight probes are aborted,
    /// and probes that had already finished are kept.
    pub async fn run_until_cancelled(
        &self,
        channels: &[Channel],
        cancel: &CancellationToken,
    ) -> RunOutcome {
        let (results, cancelled) = self.drive(channels, cancel).await;

        if cancelled {
            let completed = results
                .into_iter()
                .enumerate()
                .filter_map(|(index, slot)| slot.map(|result| (index, result)))
                .collect();
            RunOutcome::Cancelled(PartialResults {
                total: channels.len(),
                completed,
            })
        } else {
            RunOutcome::Complete(results.into_iter().flatten().collect())
        }
    }

    /// Runs the probes; returns one slot per channel and whether the run was cancelled
    async fn drive(
        &self,
        channels: &[Channel],
        cancel: &CancellationToken,
    ) -> (Vec<Option<ProbeResult>>, bool) {
        let total = channels.len();
        let mut slots: Vec<Option<ProbeResult>> = vec![None; total];
        let semaphore = Arc::new(Semaphore::new(self.concurrency_limit));
        let mut tasks: JoinSet<(usize, ProbeResult)> = JoinSet::new();

        let mut progress = Progress::new(total, self.progress_interval);
        let mut next = 0;
        let mut cancelled = false;

        tracing::info!(
            "Testing {} links with concurrency {}",
            total,
            self.concurrency_limit
        );

        loop {
            if next == total && tasks.is_empty() {
                break;
            }

            tokio::select! {
                biased;

                Some(joined) = tasks.join_next() => {
                    let (index, result) = unwrap_joined(joined);
                    progress.record(&result);
                    slots[index] = Some(result);
                }

                _ = cancel.cancelled() => {
                    cancelled = true;
                    break;
                }

                Ok(permit) = semaphore.clone().acquire_owned(), if next < total => {
                    let index = next;
                    let channel = channels[index].clone();
                    let prober = Arc::clone(&self.prober);
                    tasks.spawn(async move {
                        let _permit = permit;
                        let result = prober.probe(&channel).await;
                        (index, result)
                    });
                    next += 1;
                }
            }
        }

        if cancelled {
            tracing::warn!(
                "Run cancelled with {}/{} links tested, {} in flight",
                progress.completed,
                total,
                tasks.len()
            );
            tasks.abort_all();
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((index, result)) => {
                        progress.record(&result);
                        slots[index] = Some(result);
                    }
                    Err(e) if e.is_cancelled() => {}
                    Err(e) => std::panic::resume_unwind(e.into_panic()),
                }
            }
        }

        progress.finish();
        (slots, cancelled)
    }
}

fn unwrap_joined(
    joined: Result<(usize, ProbeResult), tokio::task::JoinError>,
) -> (usize, ProbeResult) {
    match joined {
        Ok(done) => done,
        // Probes never fail outward, so only a panic lands here
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => unreachable!("probe task aborted outside cancellation: {}", e),
    }
}

/// Progress counters for log output
struct Progress {
    total: usize,
    interval: usize,
    completed: usize,
    available: usize,
    started: Instant,
}

impl Progress {
    fn new(total: usize, interval: usize) -> Self {
        Self {
            total,
            interval,
            completed: 0,
            available: 0,
            started: Instant::now(),
        }
    }

    fn record(&mut self, result: &ProbeResult) {
        self.completed += 1;
        if result.reachable() {
            self.available += 1;
        }

        if self.completed % self.interval == 0 || self.completed == self.total {
            let elapsed = self.started.elapsed().as_secs_f64();
            let rate = if elapsed > 0.0 {
                self.completed as f64 / elapsed
            } else {
                0.0
            };
            tracing::info!(
                "Progress: {}/{} tested, {} available, {:.1} links/sec",
                self.completed,
                self.total,
                self.available,
                rate
            );
        }
    }

    fn finish(&self) {
        tracing::info!(
            "Tested {} links in {:.2}s: {} available, {} unavailable",
            self.completed,
            self.started.elapsed().as_secs_f64(),
            self.available,
            self.completed - self.available
        );
    }
}
