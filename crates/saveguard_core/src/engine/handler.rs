//! Atomic save-file persistence with self-verification and backup rollback.
//!
//! Every save is written to a temp file and renamed over the primary, then
//! reloaded to prove the bytes on disk round-trip before the backup is
//! updated. A load that fails on the primary rolls back to the backup and
//! retries exactly once.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{error, warn};

use super::error::{PersistError, PersistErrorCode};
use crate::codec::Codec;
use crate::data::GameData;

/// Appended to the primary file name to form the backup file name.
pub const BACKUP_SUFFIX: &str = ".bak";

const TEMP_SUFFIX: &str = ".tmp";

// Deployment-time constant, not a caller-supplied secret. The codec is an
// obfuscation layer only.
const CODEC_KEYWORD: &str = "saveguard-v1-keep-out";

#[derive(Debug)]
pub struct FileDataHandler {
    data_dir: PathBuf,
    file_name: String,
    use_encryption: bool,
    codec: Codec,
}

impl FileDataHandler {
    pub fn new(
        data_dir: impl Into<PathBuf>,
        file_name: impl Into<String>,
        use_encryption: bool,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            file_name: file_name.into(),
            use_encryption,
            codec: Codec::new(CODEC_KEYWORD),
        }
    }

    pub fn primary_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("{}{}", self.file_name, BACKUP_SUFFIX))
    }

    /// Serializes and durably writes the record to the primary path, then
    /// verifies the file reloads before promoting it to the backup.
    ///
    /// The backup is only ever overwritten after a successful verification,
    /// so a failed or torn save can never corrupt it.
    pub fn save(&self, data: &GameData) -> Result<(), PersistError> {
        let full_path = self.primary_path();

        fs::create_dir_all(&self.data_dir).map_err(|e| {
            PersistError::new(
                PersistErrorCode::Io,
                format!("failed to create {}: {e}", self.data_dir.display()),
            )
        })?;

        let text = serde_json::to_string_pretty(data).map_err(|e| {
            PersistError::new(
                PersistErrorCode::Serialize,
                format!("failed to serialize save data: {e}"),
            )
        })?;

        let bytes = if self.use_encryption {
            self.codec.transform(text.as_bytes())
        } else {
            text.into_bytes()
        };

        atomic_write(&full_path, &bytes).map_err(|e| {
            PersistError::new(
                PersistErrorCode::Io,
                format!("failed to write {}: {e}", full_path.display()),
            )
        })?;

        // Verify the just-written primary without touching the backup; a
        // rollback here would mask a bad write with stale data.
        if self.load_with(false).is_none() {
            return Err(PersistError::new(
                PersistErrorCode::Verification,
                format!(
                    "save file at {} could not be verified; backup not updated",
                    full_path.display()
                ),
            ));
        }

        let backup_path = self.backup_path();
        fs::copy(&full_path, &backup_path).map_err(|e| {
            PersistError::new(
                PersistErrorCode::Io,
                format!("failed to update backup {}: {e}", backup_path.display()),
            )
        })?;

        Ok(())
    }

    /// Loads the record from the primary path. A missing primary is the
    /// normal "no save yet" state and returns `None` without logging.
    ///
    /// All failure paths resolve to `None` with a diagnostic log; this
    /// never panics or propagates an I/O fault to the caller.
    pub fn load(&self) -> Option<GameData> {
        self.load_with(true)
    }

    fn load_with(&self, allow_restore_from_backup: bool) -> Option<GameData> {
        let full_path = self.primary_path();
        if !full_path.exists() {
            return None;
        }

        match self.read_record(&full_path) {
            Ok(data) => Some(data),
            Err(e) if allow_restore_from_backup => {
                warn!(
                    "failed to load {}; attempting rollback: {e}",
                    full_path.display()
                );
                if self.attempt_rollback() {
                    // Retry exactly once with rollback disallowed so a
                    // corrupt backup cannot recurse further.
                    self.load_with(false)
                } else {
                    None
                }
            }
            Err(e) => {
                error!(
                    "failed to load {} and the backup did not help: {e}",
                    full_path.display()
                );
                None
            }
        }
    }

    fn read_record(&self, path: &Path) -> Result<GameData, PersistError> {
        let raw = fs::read(path).map_err(|e| {
            PersistError::new(
                PersistErrorCode::Io,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;

        let plain = if self.use_encryption {
            self.codec.transform(&raw)
        } else {
            raw
        };

        let text = String::from_utf8(plain).map_err(|e| {
            PersistError::new(
                PersistErrorCode::Deserialize,
                format!("save file {} is not valid UTF-8: {e}", path.display()),
            )
        })?;

        serde_json::from_str(&text).map_err(|e| {
            PersistError::new(
                PersistErrorCode::Deserialize,
                format!("failed to deserialize {}: {e}", path.display()),
            )
        })
    }

    /// Copies the backup over the primary. Returns false (with an error
    /// log) when there is no backup or the copy fails; this is the sole
    /// recovery mechanism, there is no partial repair.
    pub fn attempt_rollback(&self) -> bool {
        match self.rollback() {
            Ok(()) => {
                warn!(
                    "rolled back to backup file at {}",
                    self.backup_path().display()
                );
                true
            }
            Err(e) => {
                error!("{e}");
                false
            }
        }
    }

    fn rollback(&self) -> Result<(), PersistError> {
        let backup_path = self.backup_path();
        if !backup_path.exists() {
            return Err(PersistError::new(
                PersistErrorCode::Rollback,
                format!(
                    "tried to roll back, but no backup exists at {}",
                    backup_path.display()
                ),
            ));
        }

        fs::copy(&backup_path, self.primary_path()).map_err(|e| {
            PersistError::new(
                PersistErrorCode::Rollback,
                format!("failed to roll back from {}: {e}", backup_path.display()),
            )
        })?;

        Ok(())
    }

    /// Removes the save directory for a profile id. `None` is a silent
    /// no-op; a missing file warns but does not fail the caller.
    pub fn delete(&self, profile_id: Option<&str>) {
        let Some(profile_id) = profile_id else {
            return;
        };

        let profile_dir = self.data_dir.join(profile_id);
        let full_path = profile_dir.join(&self.file_name);
        if full_path.exists() {
            if let Err(e) = fs::remove_dir_all(&profile_dir) {
                error!(
                    "failed to delete save data for profile {profile_id} at {}: {e}",
                    profile_dir.display()
                );
            }
        } else {
            warn!(
                "tried to delete save data, but none was found at {}",
                full_path.display()
            );
        }
    }
}

/// Write-rename: the new content lands in a sibling temp file, is synced
/// to disk, then renamed over the destination. A crash mid-write leaves
/// the previous file untouched, so a reader never sees a torn write.
fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(TEMP_SUFFIX);
    let tmp_path = PathBuf::from(tmp_name);

    let mut file = File::create(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp_path, path)
}
