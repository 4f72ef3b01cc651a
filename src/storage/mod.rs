//! Durable persistence for the listing registry.
//!
//! `StorageManager` owns the primary data file and its backup directory.
//! Saves rotate a backup first and then write atomically; loads refuse any
//! document without a matching schema version and commit marker, falling
//! back to the newest valid backup.

pub mod atomic_file;
pub mod document;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::MarketConfig;
use crate::error::MarketResult;
use crate::registry::AuctionHouse;
use crate::traits::TimeProvider;

use document::StoreDocument;

pub use atomic_file::{restore_latest_backup, rotate_backups, save_atomically};
pub use document::SCHEMA_VERSION;

pub struct StorageManager {
    data_path: PathBuf,
    backup_dir: PathBuf,
    backup_keep: usize,
    clock: Arc<dyn TimeProvider>,
}

impl StorageManager {
    pub fn new(
        data_path: PathBuf,
        backup_dir: PathBuf,
        backup_keep: usize,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            data_path,
            backup_dir,
            backup_keep: backup_keep.max(1),
            clock,
        }
    }

    /// Resolve paths from configuration against a data directory.
    pub fn from_config(data_dir: &Path, config: &MarketConfig, clock: Arc<dyn TimeProvider>) -> Self {
        Self::new(
            data_dir.join(&config.storage.data_file),
            data_dir.join(&config.storage.backup_dir),
            config.storage.backup_keep(),
            clock,
        )
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Restore the registry from disk.
    ///
    /// A missing primary file is a clean empty start. An unreadable or
    /// untrusted primary triggers a one-shot restore of the newest backup;
    /// if that also fails, in-memory state is left unchanged.
    pub fn load(&self, house: &AuctionHouse) -> MarketResult<()> {
        if !self.data_path.exists() {
            info!(path = %self.data_path.display(), "no data file, starting empty");
            return Ok(());
        }

        if let Some(doc) = self.read_trusted() {
            house.restore(doc);
            return Ok(());
        }

        let Some(used) = restore_latest_backup(&self.data_path, &self.backup_dir) else {
            warn!("primary data file untrusted and no backup available, keeping current state");
            return Ok(());
        };
        warn!(backup = %used.display(), "recovered auction data from backup");

        match self.read_trusted() {
            Some(doc) => house.restore(doc),
            None => warn!("restored backup is also untrusted, keeping current state"),
        }
        Ok(())
    }

    /// Snapshot the registry and persist it: rotate a backup of the
    /// current primary, then write the new document atomically.
    pub fn save(&self, house: &AuctionHouse) -> MarketResult<()> {
        let doc = house.snapshot();
        let bytes = doc.encode()?;

        rotate_backups(
            &self.data_path,
            &self.backup_dir,
            self.backup_keep,
            self.clock.now_millis(),
        );
        save_atomically(&self.data_path, &bytes)?;
        Ok(())
    }

    /// Read and decode the primary file, returning it only if trusted.
    fn read_trusted(&self) -> Option<StoreDocument> {
        let bytes = match std::fs::read(&self.data_path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "failed to read data file");
                return None;
            }
        };
        match StoreDocument::decode(&bytes) {
            Ok(doc) if doc.is_trusted() => Some(doc),
            Ok(doc) => {
                warn!(
                    schema = doc.schema_version,
                    committed = doc.commit_marker,
                    "data file is not trusted"
                );
                None
            }
            Err(e) => {
                warn!(error = %e, "data file is corrupt");
                None
            }
        }
    }
}
