//! Debounced persistence of the line set.
//!
//! Every change schedules a write due after a quiet window. A newer change
//! replaces the pending write, so a burst of edits produces one write holding
//! the last state.

use crate::config::EditorConfig;
use crate::document::LineSet;
use crate::persistence::{export_lines, import_lines};
use crate::storage::{BlobStore, PlatformStorage, StorageError, StorageResult, create_default_storage};
use std::sync::Arc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Identifies one scheduled write. Later schedules get larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WriteToken(u64);

#[derive(Debug)]
struct PendingWrite {
    token: WriteToken,
    due: Instant,
    payload: String,
}

/// Owns the single pending write for one storage key.
pub struct AutoSaveManager<S: BlobStore> {
    storage: Arc<S>,
    key: String,
    quiet_window: Duration,
    pending: Option<PendingWrite>,
    next_token: u64,
    last_save: Option<Instant>,
}

impl<S: BlobStore> AutoSaveManager<S> {
    pub fn new(storage: Arc<S>, key: impl Into<String>, quiet_window: Duration) -> Self {
        Self {
            storage,
            key: key.into(),
            quiet_window,
            pending: None,
            next_token: 0,
            last_save: None,
        }
    }

    /// Key and quiet window taken from the editor config.
    pub fn from_config(storage: Arc<S>, config: &EditorConfig) -> Self {
        Self::new(storage, config.storage_key.clone(), config.autosave_quiet_window())
    }

    /// Snapshot `lines` and schedule a write due at `now + quiet window`,
    /// replacing any write still pending.
    pub fn schedule(&mut self, lines: &LineSet, now: Instant) -> StorageResult<WriteToken> {
        let payload = export_lines(lines).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.next_token += 1;
        let token = WriteToken(self.next_token);
        self.pending = Some(PendingWrite {
            token,
            due: now + self.quiet_window,
            payload,
        });
        Ok(token)
    }

    /// Write the pending snapshot if its quiet window has elapsed.
    /// Returns true if a write happened.
    ///
    /// A failed write is dropped; the next change schedules a fresh one.
    pub fn poll(&mut self, now: Instant) -> StorageResult<bool> {
        match &self.pending {
            Some(pending) if pending.due <= now => self.write_pending(now),
            _ => Ok(false),
        }
    }

    /// Write the pending snapshot immediately (used on shutdown).
    pub fn flush(&mut self) -> StorageResult<bool> {
        self.write_pending(Instant::now())
    }

    /// Drop the pending write without saving it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    fn write_pending(&mut self, now: Instant) -> StorageResult<bool> {
        let Some(pending) = self.pending.take() else {
            return Ok(false);
        };
        self.storage.put(&self.key, &pending.payload)?;
        log::debug!("Autosaved {} ({} bytes)", self.key, pending.payload.len());
        self.last_save = Some(now);
        Ok(true)
    }

    /// When the pending write becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.due)
    }

    pub fn pending_token(&self) -> Option<WriteToken> {
        self.pending.as_ref().map(|pending| pending.token)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_save(&self) -> Option<Instant> {
        self.last_save
    }

    /// Read the persisted line set. Absent or unreadable data yields an
    /// empty set.
    pub fn load_initial(&self) -> LineSet {
        let text = match self.storage.get(&self.key) {
            Ok(text) => text,
            Err(StorageError::NotFound(_)) => {
                log::debug!("No saved drawing under {}", self.key);
                return LineSet::new();
            }
            Err(e) => {
                log::warn!("Failed to read saved drawing: {}", e);
                return LineSet::new();
            }
        };
        match import_lines(&text) {
            Ok(lines) => {
                log::info!("Restored {} lines from {}", lines.len(), self.key);
                LineSet::from_lines(lines)
            }
            Err(e) => {
                log::warn!("Ignoring saved drawing under {}: {}", self.key, e);
                LineSet::new()
            }
        }
    }

    /// Get a reference to the storage backend.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

/// Type alias for the auto-save manager with platform-specific storage.
pub type PlatformAutoSaveManager = AutoSaveManager<PlatformStorage>;

/// Create an auto-save manager over the default platform storage.
pub fn create_autosave_manager(config: &EditorConfig) -> StorageResult<PlatformAutoSaveManager> {
    let storage = create_default_storage()?;
    Ok(AutoSaveManager::from_config(storage, config))
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use kurbo::Point;

    const KEY: &str = "gridsketch.lines";

    fn manager() -> AutoSaveManager<MemoryStorage> {
        AutoSaveManager::new(Arc::new(MemoryStorage::new()), KEY, Duration::from_millis(1000))
    }

    fn one_line() -> LineSet {
        let mut lines = LineSet::new();
        lines.push_segment(Point::new(0.0, 0.0), Point::new(40.0, 0.0));
        lines
    }

    #[test]
    fn test_nothing_pending_initially() {
        let mut manager = manager();
        assert!(!manager.is_pending());
        assert_eq!(manager.next_deadline(), None);
        assert!(!manager.poll(Instant::now()).unwrap());
        assert!(!manager.flush().unwrap());
    }

    #[test]
    fn test_write_waits_for_quiet_window() {
        let mut manager = manager();
        let t0 = Instant::now();
        manager.schedule(&one_line(), t0).unwrap();
        assert_eq!(manager.next_deadline(), Some(t0 + Duration::from_millis(1000)));

        assert!(!manager.poll(t0 + Duration::from_millis(999)).unwrap());
        assert!(!manager.storage().exists(KEY).unwrap());

        assert!(manager.poll(t0 + Duration::from_millis(1000)).unwrap());
        assert!(manager.storage().exists(KEY).unwrap());
        assert!(!manager.is_pending());
        assert_eq!(manager.last_save(), Some(t0 + Duration::from_millis(1000)));
    }

    #[test]
    fn test_reschedule_replaces_pending_write() {
        let mut manager = manager();
        let t0 = Instant::now();
        let first = manager.schedule(&LineSet::new(), t0).unwrap();
        let t1 = t0 + Duration::from_millis(600);
        let second = manager.schedule(&one_line(), t1).unwrap();
        assert!(second > first);
        assert_eq!(manager.pending_token(), Some(second));

        // The first deadline passes without a write
        assert!(!manager.poll(t0 + Duration::from_millis(1000)).unwrap());
        assert!(manager.poll(t1 + Duration::from_millis(1000)).unwrap());

        let saved = manager.storage().get(KEY).unwrap();
        assert_eq!(import_lines(&saved).unwrap().len(), 1);
        assert_eq!(manager.storage().len(), 1);
    }

    #[test]
    fn test_flush_writes_immediately() {
        let mut manager = manager();
        manager.schedule(&one_line(), Instant::now()).unwrap();
        assert!(manager.flush().unwrap());
        assert!(manager.storage().exists(KEY).unwrap());
        assert!(!manager.is_pending());
    }

    #[test]
    fn test_cancel_drops_pending_write() {
        let mut manager = manager();
        let t0 = Instant::now();
        manager.schedule(&one_line(), t0).unwrap();
        manager.cancel();
        assert!(!manager.poll(t0 + Duration::from_secs(5)).unwrap());
        assert!(!manager.storage().exists(KEY).unwrap());
    }

    #[test]
    fn test_load_initial_restores_lines() {
        let mut manager = manager();
        let lines = one_line();
        manager.schedule(&lines, Instant::now()).unwrap();
        manager.flush().unwrap();

        let restored = AutoSaveManager::new(manager.storage().clone(), KEY, Duration::ZERO).load_initial();
        assert_eq!(restored.as_slice(), lines.as_slice());
    }

    #[test]
    fn test_load_initial_absent_is_empty() {
        assert!(manager().load_initial().is_empty());
    }

    #[test]
    fn test_load_initial_ignores_malformed() {
        let manager = manager();
        manager.storage().put(KEY, "{ not an array").unwrap();
        assert!(manager.load_initial().is_empty());
        // Left untouched for inspection
        assert!(manager.storage().exists(KEY).unwrap());
    }

    #[test]
    fn test_from_config_uses_storage_key() {
        let config = EditorConfig {
            storage_key: "custom".to_string(),
            ..Default::default()
        };
        let mut manager = AutoSaveManager::from_config(Arc::new(MemoryStorage::new()), &config);
        manager.schedule(&LineSet::new(), Instant::now()).unwrap();
        manager.flush().unwrap();
        assert!(manager.storage().exists("custom").unwrap());
    }
}
