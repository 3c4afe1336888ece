//! On-disk persistence of the latest [`PageRecord`].
//!
//! Layout under the data directory:
//!
//! | File                 | Contents                                  |
//! |----------------------|-------------------------------------------|
//! | `scraped-data.json`  | the last successful record, pretty JSON    |
//! | `.refresh.lock`      | advisory lock held while refreshing        |
//!
//! Writes go to a temporary file first and are renamed into place, so readers
//! see either the previous record or the new one.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use fs2::FileExt;
use tracing::{debug, info, warn};

use crate::error::{ExtractError, StoreError};
use crate::extract::Extractor;
use crate::model::PageRecord;
use crate::render::RenderContext;

pub const RECORD_FILE: &str = "scraped-data.json";
pub const LOCK_FILE: &str = ".refresh.lock";

/// The data directory holding the persisted record.
#[derive(Debug, Clone)]
pub struct Store {
    data_dir: PathBuf,
}

impl Store {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn record_path(&self) -> PathBuf {
        self.data_dir.join(RECORD_FILE)
    }

    /// Read the persisted record. A missing file means no data yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the file exists but cannot be read or
    /// does not hold a record.
    pub fn load(&self) -> Result<Option<PageRecord>, StoreError> {
        let path = self.record_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let record = serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "Record loaded");
        Ok(Some(record))
    }

    /// Replace the persisted record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the directory or file cannot be written.
    pub fn save(&self, record: &PageRecord) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir).map_err(io_error(&self.data_dir))?;

        let path = self.record_path();
        let json = serde_json::to_string_pretty(record).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;

        let tmp = self.data_dir.join(format!("{RECORD_FILE}.tmp"));
        fs::write(&tmp, json).map_err(io_error(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_error(&path))?;

        info!(path = %path.display(), "Record saved");
        Ok(())
    }

    /// Take the refresh lock. Held until the returned guard is dropped.
    ///
    /// The lock is an OS advisory lock on `.refresh.lock`, so it is released
    /// when the holding process exits, however it exits. The file itself
    /// stays behind and only records the last holder's PID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Locked`] if another refresh holds the lock.
    pub fn lock(&self) -> Result<RefreshGuard, StoreError> {
        fs::create_dir_all(&self.data_dir).map_err(io_error(&self.data_dir))?;

        let path = self.data_dir.join(LOCK_FILE);
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(io_error(&path))?;

        if let Err(e) = FileExt::try_lock_exclusive(&file) {
            if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() {
                return Err(StoreError::Locked { path });
            }
            return Err(StoreError::Io { path, source: e });
        }

        // Informational only; the OS lock is what excludes other refreshes.
        if file.set_len(0).is_ok() {
            let _ = writeln!(file, "{}", std::process::id());
        }
        debug!(path = %path.display(), "Refresh lock taken");
        Ok(RefreshGuard { file, path })
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

/// Holds the refresh lock; unlocks on drop.
#[derive(Debug)]
pub struct RefreshGuard {
    file: File,
    path: PathBuf,
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!(path = %self.path.display(), error = %e, "Failed to release refresh lock");
        }
    }
}

/// Whether `record` is strictly older than `threshold` at `now`.
pub fn is_stale(record: &PageRecord, now: DateTime<Utc>, threshold: Duration) -> bool {
    now.signed_duration_since(record.fetched_at) > threshold
}

/// Run one extraction and persist the result, holding the refresh lock for
/// the whole sequence. The stored record is untouched when extraction fails,
/// and `ctx` is closed on every path.
///
/// # Errors
///
/// Returns [`ExtractError::Store`] when the lock is held elsewhere or the
/// record cannot be written, and [`ExtractError::Fetch`] when extraction fails.
pub async fn refresh(
    extractor: &Extractor,
    ctx: &mut dyn RenderContext,
    store: &Store,
) -> Result<PageRecord, ExtractError> {
    let _guard = match store.lock() {
        Ok(guard) => guard,
        Err(e) => {
            if let Err(close) = ctx.close().await {
                warn!(error = %close, "Closing rendering context failed");
            }
            return Err(e.into());
        }
    };
    let record = extractor.run(ctx).await?;
    store.save(&record)?;
    Ok(record)
}
