//! Background jobs: periodic autosave and dynamic repricing.
//!
//! Each job is an independent tokio task driven by an interval and a
//! cancellation token. A tick is a discrete unit of work: cancellation is
//! only observed between ticks, so an in-flight save is never interrupted
//! mid-write. Tick failures are logged and never escape the loop.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::registry::AuctionHouse;
use crate::storage::StorageManager;

struct Job {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl Job {
    async fn stop(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            warn!(error = %e, "background job did not shut down cleanly");
        }
    }
}

/// Owns the store's periodic jobs. Each job moves `stopped -> scheduled ->
/// stopped`; starting is a no-op while scheduled, stopping is always safe.
pub struct Scheduler {
    house: AuctionHouse,
    storage: Arc<StorageManager>,
    autosave: Option<Job>,
    reprice: Option<Job>,
}

impl Scheduler {
    pub fn new(house: AuctionHouse, storage: Arc<StorageManager>) -> Self {
        Self {
            house,
            storage,
            autosave: None,
            reprice: None,
        }
    }

    /// Schedule the autosave job at the configured interval (floored at
    /// one second). No-op if already scheduled.
    pub fn start_autosave(&mut self) {
        if self.autosave.is_some() {
            return;
        }
        let interval = self.house.config().storage.autosave_interval();
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let house = self.house.clone();
        let storage = Arc::clone(&self.storage);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately; skip it so the job waits a
            // full period before its first save.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = storage.save(&house) {
                            warn!(error = %e, "autosave failed, will retry next tick");
                        } else {
                            debug!("autosave completed");
                        }
                    }
                }
            }
        });

        info!(interval_secs = interval.as_secs(), "autosave scheduled");
        self.autosave = Some(Job { cancel, handle });
    }

    /// Schedule the dynamic repricing job. No-op if already scheduled,
    /// if repricing is disabled, or if the oracle reports itself inactive.
    pub fn start_repricing(&mut self) {
        if self.reprice.is_some() {
            return;
        }
        let config = self.house.config();
        if !config.repricing.enabled {
            debug!("dynamic repricing disabled by config");
            return;
        }
        if !self.house.oracle_active() {
            debug!("pricing oracle inactive, repricing not scheduled");
            return;
        }
        let interval = config.repricing.interval();
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let house = self.house.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        // reprice_all re-checks the policy gate and oracle
                        // availability every tick.
                        house.reprice_all();
                    }
                }
            }
        });

        info!(interval_secs = interval.as_secs(), "dynamic repricing scheduled");
        self.reprice = Some(Job { cancel, handle });
    }

    pub fn autosave_scheduled(&self) -> bool {
        self.autosave.is_some()
    }

    pub fn repricing_scheduled(&self) -> bool {
        self.reprice.is_some()
    }

    /// Cancel both jobs, letting any in-flight tick finish.
    pub async fn stop(&mut self) {
        if let Some(job) = self.autosave.take() {
            job.stop().await;
        }
        if let Some(job) = self.reprice.take() {
            job.stop().await;
        }
    }

    /// Stop and re-schedule both jobs, picking up changed configuration.
    pub async fn restart(&mut self) {
        self.stop().await;
        self.start_autosave();
        self.start_repricing();
    }

    /// Stop both jobs and perform one final best-effort save.
    pub async fn shutdown(&mut self) {
        self.stop().await;
        match self.storage.save(&self.house) {
            Ok(()) => info!("final save completed"),
            Err(e) => warn!(error = %e, "final save failed"),
        }
    }
}
