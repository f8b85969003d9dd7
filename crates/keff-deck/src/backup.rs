//! Scoped backup/restore lifecycle for the deck file.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use keff_core::{ErrorInfo, KeffError};

/// Returns the backup path for a deck: the deck path with `.backup`
/// appended to the file name.
pub fn backup_path_for(deck_path: &Path) -> PathBuf {
    let mut name = OsString::from(deck_path.as_os_str());
    name.push(".backup");
    PathBuf::from(name)
}

/// Restores the deck from its backup file on demand.
pub fn restore_from_backup(deck_path: &Path) -> Result<(), KeffError> {
    let backup = backup_path_for(deck_path);
    if !backup.exists() {
        return Err(KeffError::Deck(
            ErrorInfo::new("backup-missing", "no backup file to restore from")
                .with_context("backup", backup.display().to_string()),
        ));
    }
    fs::copy(&backup, deck_path).map_err(|err| {
        KeffError::Deck(
            ErrorInfo::new("backup-restore", "failed to restore deck from backup")
                .with_context("deck", deck_path.display().to_string())
                .with_context("backup", backup.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    Ok(())
}

/// Scoped snapshot of the pristine deck.
///
/// Acquiring the guard copies the deck to `<deck>.backup` unless a backup
/// already exists; a leftover backup from an interrupted sweep is the
/// original deck snapshot and must not be overwritten with a possibly
/// already-patched file. Dropping the guard restores the deck if no
/// explicit [`BackupGuard::restore`] call happened, so the deck is put back
/// on every exit path, including panics and early returns.
#[derive(Debug)]
pub struct BackupGuard {
    deck_path: PathBuf,
    backup_path: PathBuf,
    restored: bool,
}

impl BackupGuard {
    /// Snapshots the deck, reusing an existing backup when present.
    pub fn acquire(deck_path: &Path) -> Result<Self, KeffError> {
        let backup_path = backup_path_for(deck_path);
        if backup_path.exists() {
            tracing::info!(backup = %backup_path.display(), "reusing existing deck backup");
        } else {
            fs::copy(deck_path, &backup_path).map_err(|err| {
                KeffError::Deck(
                    ErrorInfo::new("backup-create", "failed to back up the deck")
                        .with_context("deck", deck_path.display().to_string())
                        .with_context("backup", backup_path.display().to_string())
                        .with_hint(err.to_string()),
                )
            })?;
            tracing::info!(backup = %backup_path.display(), "deck backed up");
        }
        Ok(Self {
            deck_path: deck_path.to_path_buf(),
            backup_path,
            restored: false,
        })
    }

    /// Path of the backup file.
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    /// Restores the original deck and marks the guard as done.
    pub fn restore(&mut self) -> Result<(), KeffError> {
        restore_from_backup(&self.deck_path)?;
        self.restored = true;
        tracing::info!(deck = %self.deck_path.display(), "original deck restored");
        Ok(())
    }
}

impl Drop for BackupGuard {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(err) = fs::copy(&self.backup_path, &self.deck_path) {
            tracing::warn!(
                deck = %self.deck_path.display(),
                error = %err,
                "failed to restore deck while unwinding"
            );
        }
    }
}
