use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, Utc};
use rusqlite::{Connection, params};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::TrackerError;
use crate::models::{DEFAULT_DAILY_GOAL, MealEntry, Snapshot, WeightEntry};

pub const STORAGE_KEY: &str = "healthTrackerData";

/// A string key-value store the tracker persists into.
///
/// The desktop CLI backs this with SQLite; tests and throwaway sessions use
/// [`MemoryStore`].
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-process store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        let store = SqliteStore { conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = SqliteStore { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS kv_store (
                    key TEXT PRIMARY KEY NOT NULL,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
                );

                PRAGMA user_version = 1;",
            )?;
        }

        Ok(())
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM kv_store WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }
}

/// Stored form of [`Snapshot`], tolerant of missing fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSnapshot {
    #[serde(default)]
    meals: Vec<MealEntry>,
    #[serde(default)]
    water_intake: u32,
    #[serde(default)]
    weight_log: Vec<WeightEntry>,
    #[serde(default)]
    daily_goal: Option<u32>,
    #[serde(default)]
    selected_date: Option<NaiveDate>,
}

impl StoredSnapshot {
    fn into_snapshot(self, today: NaiveDate) -> Snapshot {
        Snapshot {
            meals: self.meals,
            water_intake: self.water_intake,
            weight_log: self.weight_log,
            daily_goal: self.daily_goal.unwrap_or(DEFAULT_DAILY_GOAL),
            selected_date: self.selected_date.unwrap_or(today),
        }
    }
}

/// Stored data that became readable after the tracker started without it.
#[derive(Debug, Clone, PartialEq)]
pub struct LateLoad {
    pub stored: Snapshot,
    /// What the tracker started from instead.
    pub fallback: Snapshot,
}

/// Reads and writes the tracker snapshot under a single key.
///
/// A store that fails puts the gateway in degraded mode: the tracker keeps
/// working from memory and the next successful write clears the flag. If the
/// initial read failed, nothing is written until [`reload`](Self::reload)
/// has read the stored data back.
pub struct PersistenceGateway {
    store: Box<dyn KeyValueStore>,
    key: String,
    degraded: bool,
    unread: Option<Snapshot>,
}

impl PersistenceGateway {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            key: STORAGE_KEY.to_string(),
            degraded: false,
            unread: None,
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Key an unparsable snapshot is moved to before it gets overwritten.
    #[must_use]
    pub fn backup_key(&self) -> String {
        format!("{}.unreadable", self.key)
    }

    /// Never fails: absent or corrupt data yields an empty snapshot for `today`.
    pub fn load(&mut self, today: NaiveDate) -> Snapshot {
        match self.read(today) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("failed to read tracker data, starting in memory: {err:#}");
                let fallback = Snapshot::empty(today);
                self.degraded = true;
                self.unread = Some(fallback.clone());
                fallback
            }
        }
    }

    /// Retry the read that failed in [`load`](Self::load). Returns `None`
    /// when there is nothing pending or the store is still unreadable.
    pub fn reload(&mut self) -> Option<LateLoad> {
        let today = self.unread.as_ref()?.selected_date;
        match self.read(today) {
            Ok(stored) => {
                info!("tracker data readable again");
                let fallback = self.unread.take()?;
                Some(LateLoad { stored, fallback })
            }
            Err(err) => {
                debug!("tracker data still unreadable: {err:#}");
                None
            }
        }
    }

    fn read(&mut self, today: NaiveDate) -> Result<Snapshot> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Snapshot::empty(today));
        };

        match serde_json::from_str::<StoredSnapshot>(&raw) {
            Ok(stored) => Ok(stored.into_snapshot(today)),
            Err(err) => {
                let backup = self.backup_key();
                warn!(error = %err, %backup, "setting aside unparsable tracker data");
                self.store
                    .set(&backup, &raw)
                    .context("Failed to back up unparsable tracker data")?;
                Ok(Snapshot::empty(today))
            }
        }
    }

    pub fn save(&mut self, snapshot: &Snapshot) -> Result<(), TrackerError> {
        if self.unread.is_some() {
            self.degraded = true;
            return Err(TrackerError::Storage(anyhow!(
                "stored tracker data has not been read yet"
            )));
        }

        let payload = serde_json::to_string(snapshot)
            .context("Failed to serialize tracker data")
            .map_err(TrackerError::Storage)?;

        match self.store.set(&self.key, &payload) {
            Ok(()) => {
                if self.degraded {
                    info!("storage recovered, tracker data persisted again");
                    self.degraded = false;
                }
                Ok(())
            }
            Err(err) => {
                warn!("failed to persist tracker data: {err:#}");
                self.degraded = true;
                Err(TrackerError::Storage(err))
            }
        }
    }
}
