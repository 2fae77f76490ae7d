use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

pub type RecordId = i64;

/// One tracked file and where it is kept.
///
/// Field names on the wire match the backup files the tracker has always
/// exported, so old exports stay importable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    #[serde(default, deserialize_with = "string_or_null")]
    pub title: String,
    /// Storage location.
    #[serde(default, deserialize_with = "string_or_null")]
    pub storage: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub info: String,
    #[serde(rename = "createdDate", default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub file_date: Option<DateTime<Utc>>,
    /// `data:` URL of an attached picture.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub borrowed_by: Option<String>,
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Record {
    /// Case-insensitive substring match over title, location and info.
    /// `folded_query` must already be lowercased.
    pub fn matches(&self, folded_query: &str) -> bool {
        if folded_query.is_empty() {
            return true;
        }
        [&self.title, &self.storage, &self.info]
            .iter()
            .any(|field| field.to_lowercase().contains(folded_query))
    }
}

/// Input of the add form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewRecord {
    pub title: String,
    pub storage: String,
    pub info: String,
    /// Explicit file date; otherwise one is looked for in the title.
    pub date: Option<NaiveDate>,
    pub image: Option<String>,
}

impl NewRecord {
    pub fn new(title: impl Into<String>, storage: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            storage: storage.into(),
            ..Self::default()
        }
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = info.into();
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Trims every field and rejects a blank title or location.
    pub fn validated(self) -> Result<Self, ValidationError> {
        let title = self.title.trim().to_string();
        let storage = self.storage.trim().to_string();
        if title.is_empty() || storage.is_empty() {
            return Err(ValidationError::new(
                "Title and Storage Location are required",
            ));
        }
        Ok(Self {
            title,
            storage,
            info: self.info.trim().to_string(),
            ..self
        })
    }
}

/// Edit form. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordChanges {
    pub title: Option<String>,
    pub storage: Option<String>,
    pub info: Option<String>,
}

impl RecordChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.storage.is_none() && self.info.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, storage: &str, info: &str) -> Record {
        Record {
            id: 1,
            title: title.to_string(),
            storage: storage.to_string(),
            info: info.to_string(),
            created_at: Utc::now(),
            file_date: None,
            image: None,
            borrowed_by: None,
        }
    }

    #[test]
    fn matches_any_searchable_field_ignoring_case() {
        let r = record("Tax Return 2023", "Cabinet B", "blue folder");
        assert!(r.matches("tax"));
        assert!(r.matches("cabinet b"));
        assert!(r.matches("blue"));
        assert!(!r.matches("green"));
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(record("a", "b", "").matches(""));
    }

    #[test]
    fn deserializes_legacy_export_with_missing_and_null_fields() {
        let json = r#"{"id": 1700000000000, "title": "Lease", "storage": "Drawer 2",
            "info": null, "createdDate": "2023-11-14T22:13:20.000Z"}"#;
        let r: Record = serde_json::from_str(json).unwrap();
        assert_eq!(r.id, 1_700_000_000_000);
        assert_eq!(r.info, "");
        assert_eq!(r.file_date, None);
        assert_eq!(r.borrowed_by, None);
    }

    #[test]
    fn serializes_with_tracker_field_names() {
        let value = serde_json::to_value(record("t", "s", "i")).unwrap();
        for key in ["id", "title", "storage", "info", "createdDate", "fileDate", "image", "borrowedBy"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn new_record_validation_trims_and_rejects_blank() {
        let ok = NewRecord::new("  Deed ", " Safe ").with_info(" old ").validated().unwrap();
        assert_eq!(ok.title, "Deed");
        assert_eq!(ok.storage, "Safe");
        assert_eq!(ok.info, "old");

        assert!(NewRecord::new("   ", "Safe").validated().is_err());
        assert!(NewRecord::new("Deed", "").validated().is_err());
    }
}
