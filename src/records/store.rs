use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use super::date;
use super::record::{NewRecord, Record, RecordChanges, RecordId};
use crate::error::{DecodeError, TrackerError, TrackerResult, ValidationError};
use crate::storage::{keys, Storage, StorageJsonExt};

/// Outcome of [`RecordStore::load_or_reset`].
#[derive(Debug)]
pub struct LoadedRecords {
    pub records: Vec<Record>,
    /// Set when the stored collection was corrupt and has just been cleared.
    pub recovered: Option<DecodeError>,
}

/// The record collection, persisted as one JSON array.
///
/// Every mutation reads the whole collection, changes one element and
/// writes the whole collection back. Last writer wins.
pub struct RecordStore<S> {
    storage: S,
}

impl<S: Storage> RecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn load(&self) -> TrackerResult<Vec<Record>> {
        match self.storage.get_json::<Vec<Record>>(keys::RECORDS)? {
            None => Ok(Vec::new()),
            Some(Ok(records)) => Ok(records),
            Some(Err(source)) => Err(DecodeError {
                key: keys::RECORDS,
                source,
            }
            .into()),
        }
    }

    /// Like [`load`](Self::load), but a corrupt collection is dropped and
    /// replaced by an empty one instead of failing.
    pub fn load_or_reset(&self) -> Result<LoadedRecords> {
        match self.load() {
            Ok(records) => Ok(LoadedRecords {
                records,
                recovered: None,
            }),
            Err(TrackerError::Decode(err)) => {
                tracing::warn!(error = %err, "stored files data is corrupted; clearing it");
                self.storage
                    .remove(keys::RECORDS)
                    .context("clearing corrupted records")?;
                Ok(LoadedRecords {
                    records: Vec::new(),
                    recovered: Some(err),
                })
            }
            Err(TrackerError::Storage(err)) => Err(err),
            Err(TrackerError::Validation(err)) => Err(err.into()),
        }
    }

    pub fn save(&self, records: &[Record]) -> Result<()> {
        self.storage
            .set_json(keys::RECORDS, records)
            .context("saving records")
    }

    fn load_for_update(&self) -> Result<Vec<Record>> {
        Ok(self.load_or_reset()?.records)
    }

    pub fn get(&self, id: RecordId) -> Result<Option<Record>> {
        Ok(self
            .load_for_update()?
            .into_iter()
            .find(|record| record.id == id))
    }

    pub fn add(&self, draft: NewRecord, now: DateTime<Utc>) -> TrackerResult<Record> {
        let draft = draft.validated()?;
        let mut records = self.load_for_update()?;

        let file_date = draft
            .date
            .or_else(|| date::parse_date_in(&draft.title))
            .map(date::to_timestamp);

        let record = Record {
            id: next_id(&records, now)?,
            title: draft.title,
            storage: draft.storage,
            info: draft.info,
            created_at: now,
            file_date,
            image: draft.image,
            borrowed_by: None,
        };
        records.push(record.clone());
        self.save(&records)?;

        tracing::info!(id = record.id, title = %record.title, "file added");
        Ok(record)
    }

    /// Applies `changes` to record `id`. `Ok(None)` when the record is gone.
    pub fn update(&self, id: RecordId, changes: RecordChanges) -> TrackerResult<Option<Record>> {
        let mut records = self.load_for_update()?;
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };

        let title = changes
            .title
            .map(|t| t.trim().to_string())
            .unwrap_or_else(|| record.title.clone());
        let storage = changes
            .storage
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| record.storage.clone());
        if title.is_empty() || storage.is_empty() {
            return Err(ValidationError::new("Title and Storage Location are required").into());
        }

        if let Some(info) = changes.info {
            record.info = info.trim().to_string();
        }
        // A date in the new title wins; otherwise keep whatever was there.
        if let Some(parsed) = date::parse_date_in(&title) {
            record.file_date = Some(date::to_timestamp(parsed));
        }
        record.title = title;
        record.storage = storage;

        let updated = record.clone();
        self.save(&records)?;
        tracing::info!(id, "file updated");
        Ok(Some(updated))
    }

    /// Returns whether a record was removed.
    pub fn delete(&self, id: RecordId) -> TrackerResult<bool> {
        let mut records = self.load_for_update()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records)?;
        tracing::info!(id, "file deleted");
        Ok(true)
    }

    pub fn borrow(&self, id: RecordId, worker: Option<&str>) -> TrackerResult<Option<Record>> {
        let Some(worker) = worker.map(str::trim).filter(|w| !w.is_empty()) else {
            return Err(ValidationError::new(
                "Please select a worker before borrowing.",
            )
            .into());
        };

        let mut records = self.load_for_update()?;
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        if let Some(holder) = &record.borrowed_by {
            return Err(ValidationError::new(format!("File is already borrowed by {holder}")).into());
        }
        record.borrowed_by = Some(worker.to_string());

        let updated = record.clone();
        self.save(&records)?;
        tracing::info!(id, worker, "file borrowed");
        Ok(Some(updated))
    }

    pub fn return_record(&self, id: RecordId) -> TrackerResult<Option<Record>> {
        let mut records = self.load_for_update()?;
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        record.borrowed_by = None;

        let updated = record.clone();
        self.save(&records)?;
        tracing::info!(id, "file returned");
        Ok(Some(updated))
    }

    pub fn export_json(&self) -> TrackerResult<String> {
        let records = self.load_for_update()?;
        if records.is_empty() {
            return Err(ValidationError::new("No files to export").into());
        }
        let json = serde_json::to_string_pretty(&records).context("encoding export")?;
        Ok(json)
    }

    /// Writes a backup to `path` and returns how many records it holds.
    pub fn export_to(&self, path: &Path) -> TrackerResult<usize> {
        let json = self.export_json()?;
        std::fs::write(path, &json).with_context(|| format!("writing {}", path.display()))?;
        let count = self.load_for_update()?.len();
        tracing::info!(path = %path.display(), count, "files exported");
        Ok(count)
    }

    /// Appends the records in `json` to the collection and returns how
    /// many were kept.
    ///
    /// Imported ids that clash with stored ones are replaced by fresh ids so
    /// the collection keeps one record per id. Records without a title or
    /// location are skipped, and so are ids no later add could follow.
    pub fn import_json(&self, json: &str, now: DateTime<Utc>) -> TrackerResult<usize> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| ValidationError::new(format!("Error reading file: {e}")))?;
        if !value.is_array() {
            return Err(ValidationError::new("Invalid file format").into());
        }
        let imported: Vec<Record> = serde_json::from_value(value)
            .map_err(|e| ValidationError::new(format!("Invalid file format: {e}")))?;

        let mut records = self.load_for_update()?;
        let mut taken: HashSet<RecordId> = records.iter().map(|r| r.id).collect();
        let mut count = 0usize;
        for mut record in imported {
            record.title = record.title.trim().to_string();
            record.storage = record.storage.trim().to_string();
            if record.title.is_empty() || record.storage.is_empty() {
                tracing::warn!(id = record.id, "skipping imported file without title or location");
                continue;
            }
            if record.id == RecordId::MAX {
                tracing::warn!(id = record.id, "skipping imported file with out-of-range id");
                continue;
            }
            if !taken.insert(record.id) {
                let fresh = next_id(&records, now)?;
                tracing::debug!(old = record.id, new = fresh, "reassigning clashing id on import");
                record.id = fresh;
                taken.insert(fresh);
            }
            records.push(record);
            count += 1;
        }
        self.save(&records)?;
        tracing::info!(count, "files imported");
        Ok(count)
    }

    pub fn import_from(&self, path: &Path, now: DateTime<Utc>) -> TrackerResult<usize> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        self.import_json(&json, now)
    }
}

/// Creation-time id, bumped past the largest stored id when the clock
/// has not moved since the last add.
fn next_id(records: &[Record], now: DateTime<Utc>) -> Result<RecordId, ValidationError> {
    let stamp = now.timestamp_millis();
    match records.iter().map(|r| r.id).max() {
        Some(max) if max >= stamp => max
            .checked_add(1)
            .ok_or_else(|| ValidationError::new("No file ids left; remove the file with the largest id")),
        _ => Ok(stamp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::{NaiveDate, TimeZone};

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn store() -> RecordStore<MemoryStorage> {
        RecordStore::new(MemoryStorage::new())
    }

    #[test]
    fn add_assigns_creation_time_ids_and_keeps_them_unique() {
        let store = store();
        let a = store.add(NewRecord::new("A", "Shelf"), at(1_000)).unwrap();
        let b = store.add(NewRecord::new("B", "Shelf"), at(1_000)).unwrap();
        let c = store.add(NewRecord::new("C", "Shelf"), at(500)).unwrap();
        assert_eq!(a.id, 1_000);
        assert_eq!(b.id, 1_001);
        assert_eq!(c.id, 1_002);
        assert_eq!(store.load().unwrap().len(), 3);
    }

    #[test]
    fn add_rejects_blank_required_fields_without_writing() {
        let store = store();
        let err = store.add(NewRecord::new("", "Shelf"), at(1)).unwrap_err();
        assert!(err.is_validation());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn add_derives_file_date_from_explicit_date_then_title() {
        let store = store();
        let explicit = store
            .add(
                NewRecord::new("Bill 2020-01-01", "Box")
                    .with_date(NaiveDate::from_ymd_opt(2021, 6, 30).unwrap()),
                at(1),
            )
            .unwrap();
        assert_eq!(
            explicit.file_date.map(|d| d.date_naive()),
            NaiveDate::from_ymd_opt(2021, 6, 30)
        );

        let from_title = store.add(NewRecord::new("Bill 15/02/2022", "Box"), at(2)).unwrap();
        assert_eq!(
            from_title.file_date.map(|d| d.date_naive()),
            NaiveDate::from_ymd_opt(2022, 2, 15)
        );

        let none = store.add(NewRecord::new("Bill", "Box"), at(3)).unwrap();
        assert_eq!(none.file_date, None);
    }

    #[test]
    fn update_keeps_previous_file_date_when_new_title_has_none() {
        let store = store();
        let r = store.add(NewRecord::new("Lease 2019-05-01", "Safe"), at(1)).unwrap();
        let updated = store
            .update(
                r.id,
                RecordChanges {
                    title: Some("Lease".into()),
                    info: Some("renewed".into()),
                    ..RecordChanges::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Lease");
        assert_eq!(updated.storage, "Safe");
        assert_eq!(updated.info, "renewed");
        assert_eq!(updated.file_date, r.file_date);
    }

    #[test]
    fn update_of_missing_record_is_a_no_op() {
        let store = store();
        assert_eq!(store.update(42, RecordChanges::default()).unwrap(), None);
    }

    #[test]
    fn update_rejects_blanking_the_location() {
        let store = store();
        let r = store.add(NewRecord::new("Lease", "Safe"), at(1)).unwrap();
        let err = store
            .update(
                r.id,
                RecordChanges {
                    storage: Some("  ".into()),
                    ..RecordChanges::default()
                },
            )
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.get(r.id).unwrap().unwrap().storage, "Safe");
    }

    #[test]
    fn delete_removes_only_the_matching_record() {
        let store = store();
        for i in 1..=10 {
            store.add(NewRecord::new(format!("F{i}"), "Shelf"), at(i)).unwrap();
        }
        assert!(store.delete(7).unwrap());
        let left = store.load().unwrap();
        assert_eq!(left.len(), 9);
        assert!(left.iter().all(|r| r.id != 7));
        assert!(!store.delete(7).unwrap());
    }

    #[test]
    fn borrow_then_second_borrow_fails_until_returned() {
        let store = store();
        let r = store.add(NewRecord::new("Atlas", "Library"), at(1)).unwrap();

        let borrowed = store.borrow(r.id, Some("alice")).unwrap().unwrap();
        assert_eq!(borrowed.borrowed_by.as_deref(), Some("alice"));

        let err = store.borrow(r.id, Some("bob")).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            store.get(r.id).unwrap().unwrap().borrowed_by.as_deref(),
            Some("alice")
        );

        let returned = store.return_record(r.id).unwrap().unwrap();
        assert_eq!(returned.borrowed_by, None);
        assert!(store.borrow(r.id, Some("bob")).unwrap().is_some());
    }

    #[test]
    fn borrow_without_worker_is_rejected() {
        let store = store();
        let r = store.add(NewRecord::new("Atlas", "Library"), at(1)).unwrap();
        assert!(store.borrow(r.id, None).unwrap_err().is_validation());
        assert!(store.borrow(r.id, Some(" ")).unwrap_err().is_validation());
    }

    #[test]
    fn corrupted_collection_is_reset_once() {
        let storage = MemoryStorage::new();
        storage.set(keys::RECORDS, "[{broken").unwrap();
        let store = RecordStore::new(storage);

        assert!(matches!(store.load(), Err(TrackerError::Decode(_))));

        let first = store.load_or_reset().unwrap();
        assert!(first.records.is_empty());
        assert!(first.recovered.is_some());

        let second = store.load_or_reset().unwrap();
        assert!(second.recovered.is_none());
    }

    #[test]
    fn export_of_empty_collection_is_rejected() {
        assert!(store().export_json().unwrap_err().is_validation());
    }

    #[test]
    fn export_then_import_into_empty_store_round_trips() {
        let source = store();
        source.add(NewRecord::new("A 2024-01-02", "Shelf 1").with_info("x"), at(10)).unwrap();
        source.add(NewRecord::new("B", "Shelf 2").with_image("data:image/png;base64,AA=="), at(20)).unwrap();
        let r = source.add(NewRecord::new("C", "Shelf 3"), at(30)).unwrap();
        source.borrow(r.id, Some("carol")).unwrap();

        let json = source.export_json().unwrap();
        let target = store();
        assert_eq!(target.import_json(&json, at(99)).unwrap(), 3);

        let mut expected = source.load().unwrap();
        let mut actual = target.load().unwrap();
        expected.sort_by_key(|r| r.id);
        actual.sort_by_key(|r| r.id);
        assert_eq!(expected, actual);
    }

    #[test]
    fn import_reassigns_clashing_ids() {
        let store = store();
        store.add(NewRecord::new("A", "Shelf"), at(10)).unwrap();
        let json = store.export_json().unwrap();
        store.import_json(&json, at(5)).unwrap();

        let records = store.load().unwrap();
        assert_eq!(records.len(), 2);
        assert_ne!(records[0].id, records[1].id);
    }

    #[test]
    fn import_skips_max_id_so_later_adds_still_work() {
        let store = store();
        let json = format!(
            r#"[{{"id": {}, "title": "Edge", "storage": "Shelf"}}, {{"id": 7, "title": "Kept", "storage": "Shelf"}}]"#,
            i64::MAX
        );
        assert_eq!(store.import_json(&json, at(1)).unwrap(), 1);

        let added = store.add(NewRecord::new("Next", "Shelf"), at(2)).unwrap();
        assert_eq!(added.id, 7 + 1);
        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn next_id_refuses_to_overflow() {
        let edge = Record {
            id: i64::MAX,
            title: "Edge".into(),
            storage: "Shelf".into(),
            info: String::new(),
            created_at: at(1),
            file_date: None,
            image: None,
            borrowed_by: None,
        };
        assert!(next_id(&[edge], at(1)).is_err());
    }

    #[test]
    fn import_skips_records_without_title_or_location() {
        let store = store();
        let json = r#"[
            {"id": 1, "title": "  ", "storage": "Shelf"},
            {"id": 2, "title": "Deed", "storage": null},
            {"id": 3, "title": " Lease ", "storage": "Safe"}
        ]"#;
        assert_eq!(store.import_json(json, at(1)).unwrap(), 1);
        let records = store.load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Lease");
    }

    #[test]
    fn import_rejects_non_array_documents() {
        let store = store();
        assert!(store.import_json(r#"{"id": 1}"#, at(1)).unwrap_err().is_validation());
        assert!(store.import_json("nope", at(1)).unwrap_err().is_validation());
    }
}
