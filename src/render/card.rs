use std::fmt;

use chrono::{DateTime, Utc};

use crate::records::{date, Record, RecordId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("record {id} is malformed: {field} is empty")]
pub struct MalformedRecord {
    pub id: RecordId,
    pub field: &'static str,
}

/// Rendered form of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCard {
    pub id: RecordId,
    pub title: String,
    pub storage: String,
    pub info: Option<String>,
    pub file_date: Option<DateTime<Utc>>,
    pub has_image: bool,
    pub borrowed_by: Option<String>,
}

impl TryFrom<&Record> for RecordCard {
    type Error = MalformedRecord;

    fn try_from(record: &Record) -> Result<Self, Self::Error> {
        if record.title.trim().is_empty() {
            return Err(MalformedRecord {
                id: record.id,
                field: "title",
            });
        }
        if record.storage.trim().is_empty() {
            return Err(MalformedRecord {
                id: record.id,
                field: "storage",
            });
        }
        Ok(Self {
            id: record.id,
            title: record.title.clone(),
            storage: record.storage.clone(),
            info: Some(record.info.clone()).filter(|i| !i.is_empty()),
            file_date: record.file_date,
            has_image: record.image.is_some(),
            borrowed_by: record.borrowed_by.clone(),
        })
    }
}

impl fmt::Display for RecordCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.title)?;
        if let Some(d) = &self.file_date {
            write!(f, "  ({})", date::format_for_display(d))?;
        }
        writeln!(f)?;
        writeln!(f, "    Location: {}", self.storage)?;
        if let Some(info) = &self.info {
            writeln!(f, "    Info: {}", info)?;
        }
        if self.has_image {
            writeln!(f, "    Image: attached")?;
        }
        match &self.borrowed_by {
            Some(worker) => write!(f, "    Borrowed by {}", worker),
            None => write!(f, "    Available"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, storage: &str) -> Record {
        Record {
            id: 7,
            title: title.to_string(),
            storage: storage.to_string(),
            info: String::new(),
            created_at: Utc::now(),
            file_date: None,
            image: Some("data:image/png;base64,AA==".into()),
            borrowed_by: Some("dana".into()),
        }
    }

    #[test]
    fn builds_card_and_renders_lines() {
        let card = RecordCard::try_from(&record("Passport", "Safe")).unwrap();
        assert_eq!(card.info, None);
        let text = card.to_string();
        assert!(text.starts_with("[7] Passport"));
        assert!(text.contains("Location: Safe"));
        assert!(text.contains("Image: attached"));
        assert!(text.contains("Borrowed by dana"));
        assert!(!text.contains("Info:"));
    }

    #[test]
    fn blank_required_fields_are_malformed() {
        let err = RecordCard::try_from(&record(" ", "Safe")).unwrap_err();
        assert_eq!(err, MalformedRecord { id: 7, field: "title" });
        let err = RecordCard::try_from(&record("Passport", "")).unwrap_err();
        assert_eq!(err.field, "storage");
    }
}
