#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use filetrack::records::{NewRecord, RecordStore};
use filetrack::render::{RenderConfig, RenderContext, SearchRenderer};
use filetrack::storage::{MemoryStorage, SqliteStorage};
use filetrack::{SharedStorage, Tracker};
use tempfile::TempDir;

pub fn memory_storage() -> SharedStorage {
    Arc::new(MemoryStorage::new())
}

/// SQLite storage in a fresh temp dir. Keep the dir alive for the test.
pub fn sqlite_storage() -> (TempDir, SharedStorage) {
    let dir = TempDir::new().expect("temp dir");
    let sqlite = SqliteStorage::new(dir.path().join("filetrack.sqlite"));
    sqlite.init().expect("init sqlite");
    (dir, Arc::new(sqlite))
}

/// Stores `n` records titled `File 0000`, `File 0001`, ... with strictly
/// increasing ids.
pub fn seed(storage: &SharedStorage, n: usize) -> RecordStore<SharedStorage> {
    let store = RecordStore::new(storage.clone());
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    for i in 0..n {
        let draft = NewRecord::new(format!("File {i:04}"), format!("Shelf {}", i % 7));
        store
            .add(draft, base + chrono::Duration::milliseconds(i as i64))
            .expect("seed record");
    }
    store
}

pub fn renderer(config: RenderConfig) -> SearchRenderer {
    SearchRenderer::new(RenderContext::new(), config)
}

pub fn signed_in(storage: SharedStorage) -> Tracker {
    let mut tracker = Tracker::open(storage, RenderConfig::default()).expect("open tracker");
    tracker.sign_in("user", "password").expect("default account");
    tracker
}
