//! Crash-safe file writing and backup rotation.
//!
//! A save never leaves a half-written primary file: bytes go to a
//! temporary sibling, are forced to stable storage, and are renamed over
//! the target. Rotation keeps a bounded set of timestamp-suffixed backup
//! copies whose lexicographic order matches chronological order.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Suffix appended to backup file names.
const BACKUP_SUFFIX: &str = ".bak";

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Write `bytes` to `target` such that a crash cannot leave a partial file.
///
/// Uses write-to-temp + fsync + rename. If the rename fails (some
/// platforms cannot replace atomically), falls back to a best-effort
/// copy-and-delete.
pub fn save_atomically(target: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp = target.with_file_name(format!("{}.tmp", file_name_of(target)));
    {
        let mut file = File::create(&temp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    match fs::rename(&temp, target) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            debug!(error = %rename_err, "atomic rename failed, falling back to copy");
            fs::copy(&temp, target)?;
            let _ = fs::remove_file(&temp);
            Ok(())
        }
    }
}

/// Copy the current primary into the backup directory, then prune old
/// backups down to the `keep` most recent (floored at one).
///
/// Rotation failures are logged and swallowed; a broken backup disk must
/// never block the save itself.
pub fn rotate_backups(source: &Path, backup_dir: &Path, keep: usize, now_millis: u64) {
    let result = (|| -> io::Result<()> {
        fs::create_dir_all(backup_dir)?;

        let name = file_name_of(source);
        if source.exists() {
            let backup = backup_dir.join(format!("{name}.{now_millis}{BACKUP_SUFFIX}"));
            fs::copy(source, &backup)?;
        }

        let mut backups = list_backups(source, backup_dir)?;
        // Greatest name first; names embed epoch millis so this is newest first.
        backups.sort_by(|a, b| b.cmp(a));
        for stale in backups.into_iter().skip(keep.max(1)) {
            if let Err(e) = fs::remove_file(&stale) {
                debug!(path = %stale.display(), error = %e, "failed to prune backup");
            }
        }
        Ok(())
    })();

    if let Err(e) = result {
        warn!(error = %e, "backup rotation failed");
    }
}

/// Copy the newest backup over the primary path. Returns the backup used,
/// or `None` if no backup exists or the copy failed.
pub fn restore_latest_backup(source: &Path, backup_dir: &Path) -> Option<PathBuf> {
    if !backup_dir.is_dir() {
        return None;
    }

    let latest = list_backups(source, backup_dir).ok()?.into_iter().max()?;
    match fs::copy(&latest, source) {
        Ok(_) => Some(latest),
        Err(e) => {
            warn!(path = %latest.display(), error = %e, "failed to restore backup");
            None
        }
    }
}

fn list_backups(source: &Path, backup_dir: &Path) -> io::Result<Vec<PathBuf>> {
    let prefix = format!("{}.", file_name_of(source));
    let mut found = Vec::new();
    for entry in fs::read_dir(backup_dir)? {
        let path = entry?.path();
        let name = file_name_of(&path);
        if name.starts_with(&prefix) && name.ends_with(BACKUP_SUFFIX) {
            found.push(path);
        }
    }
    Ok(found)
}
