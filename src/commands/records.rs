use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{NaiveDate, Utc};

use crate::error::TrackerError;
use crate::prompt;
use crate::records::{NewRecord, RecordChanges, RecordId};
use crate::render::{SortMode, SurfaceKind};
use crate::tracker::{ActionOutcome, Tracker};

pub struct AddArgs<'a> {
    pub title: &'a str,
    pub storage: &'a str,
    pub info: Option<&'a str>,
    pub date: Option<NaiveDate>,
    pub image: Option<&'a Path>,
}

pub async fn add(tracker: &mut Tracker, args: AddArgs<'_>) -> Result<()> {
    if let Some(path) = args.image {
        tracker.stage_image(path)?;
    }
    let mut draft = NewRecord::new(args.title, args.storage);
    if let Some(info) = args.info {
        draft = draft.with_info(info);
    }
    if let Some(date) = args.date {
        draft = draft.with_date(date);
    }

    let record = tracker.add_record(draft).await?;
    println!("File added successfully! (id {})", record.id);
    super::print_dashboard(tracker);
    Ok(())
}

pub async fn edit(
    tracker: &mut Tracker,
    id: RecordId,
    changes: RecordChanges,
    password: Option<&str>,
) -> Result<()> {
    if changes.is_empty() {
        return Err(TrackerError::validation("Nothing to change").into());
    }
    tracker.request_edit(id, changes);
    confirm(tracker, password).await
}

pub async fn delete(tracker: &mut Tracker, id: RecordId, password: Option<&str>) -> Result<()> {
    tracker.request_delete(id);
    confirm(tracker, password).await
}

async fn confirm(tracker: &mut Tracker, password: Option<&str>) -> Result<()> {
    let password = match prompt::password_or_prompt(password, "Password") {
        Ok(p) => p,
        Err(e) => {
            tracker.cancel_pending();
            return Err(e);
        }
    };
    match tracker.confirm_pending(&password).await? {
        Some(ActionOutcome::Edited(Some(record))) => {
            println!("File updated successfully! (id {})", record.id)
        }
        Some(ActionOutcome::Deleted(true)) => println!("File deleted successfully!"),
        Some(ActionOutcome::Edited(None)) | Some(ActionOutcome::Deleted(false)) => {
            log::warn!("no such file; nothing changed")
        }
        None => {}
    }
    super::print_dashboard(tracker);
    Ok(())
}

pub async fn search(
    tracker: &mut Tracker,
    query: &str,
    surface: SurfaceKind,
    sort: Option<SortMode>,
    all: bool,
) -> Result<()> {
    if sort.is_some() {
        tracker.set_sort_mode(sort)?;
    }
    let report = if all {
        tracker.load_all(surface, query).await?
    } else {
        tracker.search(surface, query).await?
    };
    super::print_surface(tracker, surface, &report);
    Ok(())
}

pub async fn borrow(tracker: &mut Tracker, id: RecordId, worker: Option<&str>) -> Result<()> {
    match tracker.borrow(id, worker).await? {
        Some(record) => println!(
            "File borrowed by {}",
            record.borrowed_by.as_deref().unwrap_or_default()
        ),
        None => log::warn!("no file with id {}", id),
    }
    super::print_dashboard(tracker);
    Ok(())
}

pub async fn return_record(tracker: &mut Tracker, id: RecordId) -> Result<()> {
    match tracker.return_record(id).await? {
        Some(_) => println!("File returned"),
        None => log::warn!("no file with id {}", id),
    }
    super::print_dashboard(tracker);
    Ok(())
}

pub fn export(tracker: &Tracker, path: Option<&Path>) -> Result<()> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(format!("files-backup-{}.json", Utc::now().timestamp_millis())));
    let count = tracker.export_to(&path)?;
    println!("Exported {} files to {}", count, path.display());
    Ok(())
}

pub async fn import(tracker: &mut Tracker, path: &Path) -> Result<()> {
    let count = tracker.import_from(path).await?;
    println!("Successfully imported {count} files!");
    super::print_dashboard(tracker);
    Ok(())
}
