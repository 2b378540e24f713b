// src/pipeline/poll.rs

//! The polling loop.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::time::Instant;

use crate::error::Result;
use crate::models::Payload;
use crate::pipeline::cycle::CycleRunner;
use crate::pipeline::session::Session;
use crate::storage::{PublishMetadata, SnapshotStore};

/// Where the loop is between cycles.
#[derive(Debug)]
pub enum PollState {
    Starting,
    Cycle,
    Publishing { payload: Payload, started: Instant },
    Sleeping,
    Stopped,
}

/// Drives cycles back to back with a fixed pause between them.
pub struct Poller {
    runner: CycleRunner,
    store: Arc<dyn SnapshotStore>,
    interval: Duration,
}

impl Poller {
    pub fn new(runner: CycleRunner, store: Arc<dyn SnapshotStore>, interval: Duration) -> Self {
        Self {
            runner,
            store,
            interval,
        }
    }

    /// Run one cycle and publish it.
    pub async fn run_once(&self, session: &mut Session) -> Result<PublishMetadata> {
        let started = Instant::now();
        let payload = self.runner.run(session).await;
        self.publish(&payload, started.elapsed()).await
    }

    /// Loop until `shutdown` resolves, returning the number of cycles run.
    ///
    /// A cycle already in flight when `shutdown` resolves is finished and
    /// published before the loop stops. The pause is measured from the end
    /// of each cycle.
    pub async fn run<S>(&self, session: &mut Session, shutdown: S) -> usize
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut cycles = 0;
        let mut state = PollState::Starting;

        loop {
            state = match state {
                PollState::Starting => {
                    log::info!("Polling every {:?} (plus cycle time)", self.interval);
                    PollState::Cycle
                }
                PollState::Cycle => {
                    let started = Instant::now();
                    let payload = self.runner.run(session).await;
                    PollState::Publishing { payload, started }
                }
                PollState::Publishing { payload, started } => {
                    // A failed publish leaves the previous snapshot in place.
                    let _ = self.publish(&payload, started.elapsed()).await;
                    cycles += 1;
                    if (&mut shutdown).now_or_never().is_some() {
                        PollState::Stopped
                    } else {
                        PollState::Sleeping
                    }
                }
                PollState::Sleeping => {
                    tokio::select! {
                        _ = tokio::time::sleep(self.interval) => PollState::Cycle,
                        _ = &mut shutdown => PollState::Stopped,
                    }
                }
                PollState::Stopped => break,
            };
        }

        log::info!("Polling stopped after {} cycles", cycles);
        cycles
    }

    async fn publish(&self, payload: &Payload, took: Duration) -> Result<PublishMetadata> {
        match self.store.publish(payload).await {
            Ok(meta) => {
                log::info!(
                    "Wrote snapshot @ {} | lobby rows: {} | events scraped: {} | live details: {} | took {:.1}s",
                    payload.fetched_at.to_rfc3339(),
                    payload.lobby.len(),
                    payload.events.len(),
                    payload.live_details.len(),
                    took.as_secs_f64()
                );
                log::debug!(
                    "Published {} bytes at {} ({}ms after fetch)",
                    meta.bytes,
                    meta.published_at.to_rfc3339(),
                    (meta.published_at - meta.fetched_at).num_milliseconds()
                );
                Ok(meta)
            }
            Err(e) => {
                log::error!("Snapshot not published: {}", e);
                Err(e)
            }
        }
    }
}
