use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::account::AccountStore;
use crate::error::{TrackerResult, ValidationError};
use crate::preferences::Preferences;
use crate::records::{image, NewRecord, Record, RecordChanges, RecordId, RecordStore};
use crate::render::{
    BufferSurface, RenderConfig, RenderReport, SearchRenderer, SortMode, SurfaceKind,
};
use crate::session::{PendingAction, Session};
use crate::storage::Storage;
use crate::workers::WorkerRegistry;

pub type SharedStorage = Arc<dyn Storage + Send + Sync>;

pub const CORRUPTED_DATA_WARNING: &str =
    "Warning: stored files data is corrupted and has been cleared. Please import a valid backup if you have one.";

pub const CORRUPTED_ACCOUNT_WARNING: &str =
    "Warning: stored account data is corrupted and has been reset to the default credentials.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// `None` when the record disappeared before the edit landed.
    Edited(Option<Record>),
    Deleted(bool),
}

/// One user session over the local store: the operations the tracker
/// offers, and the two result surfaces they refresh.
pub struct Tracker {
    records: RecordStore<SharedStorage>,
    accounts: AccountStore<SharedStorage>,
    workers: WorkerRegistry<SharedStorage>,
    prefs: Preferences<SharedStorage>,
    session: Session,
    renderer: SearchRenderer,
    surfaces: HashMap<SurfaceKind, BufferSurface>,
    queries: HashMap<SurfaceKind, String>,
    warnings: Vec<String>,
}

impl Tracker {
    pub fn open(storage: SharedStorage, config: RenderConfig) -> Result<Self> {
        let accounts = AccountStore::new(storage.clone());
        let prefs = Preferences::new(storage.clone());

        let mut session = Session::new();
        accounts.restore(&mut session)?;
        session
            .render()
            .set_sort_mode(prefs.sort_mode().context("loading sort mode")?);
        let renderer = SearchRenderer::new(session.render().clone(), config);

        let surfaces = [SurfaceKind::Landing, SurfaceKind::Dashboard]
            .into_iter()
            .map(|kind| (kind, BufferSurface::for_kind(kind)))
            .collect();

        let mut tracker = Self {
            records: RecordStore::new(storage.clone()),
            accounts,
            workers: WorkerRegistry::new(storage),
            prefs,
            session,
            renderer,
            surfaces,
            queries: HashMap::new(),
            warnings: Vec::new(),
        };
        tracker.check_account()?;
        Ok(tracker)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn records(&self) -> &RecordStore<SharedStorage> {
        &self.records
    }

    pub fn workers(&self) -> &WorkerRegistry<SharedStorage> {
        &self.workers
    }

    pub fn preferences(&self) -> &Preferences<SharedStorage> {
        &self.prefs
    }

    pub fn surface(&self, kind: SurfaceKind) -> &BufferSurface {
        &self.surfaces[&kind]
    }

    pub fn last_query(&self, kind: SurfaceKind) -> &str {
        self.queries.get(&kind).map(String::as_str).unwrap_or("")
    }

    /// Warnings raised since the last call, oldest first.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    pub fn sign_in(&mut self, username: &str, password: &str) -> TrackerResult<()> {
        self.check_account()?;
        self.accounts.sign_in(&mut self.session, username, password)
    }

    pub fn sign_out(&mut self) -> Result<()> {
        self.accounts.sign_out(&mut self.session)?;
        self.queries.clear();
        Ok(())
    }

    pub fn change_account(&mut self, username: &str, password: &str, confirm: &str) -> TrackerResult<()> {
        self.accounts
            .change(&mut self.session, username, password, confirm)
    }

    /// Reads a picture to attach to the next added record.
    pub fn stage_image(&mut self, path: &Path) -> Result<()> {
        let data_url = image::read_data_url(path)?;
        self.session.stage_image(data_url);
        Ok(())
    }

    pub async fn add_record(&mut self, mut draft: NewRecord) -> TrackerResult<Record> {
        if !self.session.is_signed_in() {
            return Err(ValidationError::new("Please sign in first").into());
        }
        if draft.image.is_none() {
            draft.image = self.session.take_staged_image();
        }
        let record = self.records.add(draft, Utc::now())?;

        self.queries.clear();
        self.refresh().await?;
        Ok(record)
    }

    /// Queues an edit until [`confirm_pending`](Self::confirm_pending).
    pub fn request_edit(&mut self, id: RecordId, changes: RecordChanges) {
        self.session.request(PendingAction::Edit { id, changes });
    }

    /// Queues a delete until [`confirm_pending`](Self::confirm_pending).
    pub fn request_delete(&mut self, id: RecordId) {
        self.session.request(PendingAction::Delete { id });
    }

    pub fn cancel_pending(&mut self) {
        self.session.take_pending();
    }

    /// Checks `password` and runs the queued action.
    ///
    /// A wrong password leaves the action queued. `Ok(None)` means nothing
    /// was queued.
    pub async fn confirm_pending(&mut self, password: &str) -> TrackerResult<Option<ActionOutcome>> {
        self.check_account()?;
        if !self.accounts.verify_password(password)? {
            return Err(ValidationError::new("Incorrect password!").into());
        }
        let Some(action) = self.session.take_pending() else {
            tracing::warn!("password verified but no action is pending");
            return Ok(None);
        };

        let outcome = match action {
            PendingAction::Edit { id, changes } => {
                ActionOutcome::Edited(self.records.update(id, changes)?)
            }
            PendingAction::Delete { id } => ActionOutcome::Deleted(self.records.delete(id)?),
        };
        self.refresh().await?;
        Ok(Some(outcome))
    }

    /// Lends record `id` to `worker`, or to the selected worker when `None`.
    /// An explicit worker must be registered.
    pub async fn borrow(&mut self, id: RecordId, worker: Option<&str>) -> TrackerResult<Option<Record>> {
        let worker = match worker.map(str::trim) {
            Some(w) if !w.is_empty() => {
                if !self.workers.list()?.iter().any(|known| known == w) {
                    return Err(ValidationError::new(format!("Unknown worker {w}")).into());
                }
                Some(w.to_string())
            }
            Some(_) => None,
            None => self.workers.selected()?,
        };
        let record = self.records.borrow(id, worker.as_deref())?;
        self.refresh().await?;
        Ok(record)
    }

    pub async fn return_record(&mut self, id: RecordId) -> TrackerResult<Option<Record>> {
        let record = self.records.return_record(id)?;
        self.refresh().await?;
        Ok(record)
    }

    pub async fn search(&mut self, kind: SurfaceKind, query: &str) -> Result<RenderReport> {
        self.queries.insert(kind, query.to_string());
        let surface = &self.surfaces[&kind];
        let report = self.renderer.search(&self.records, query, surface).await?;
        self.note_recovery(&report);
        Ok(report)
    }

    /// Lifts the render cap for the rest of the session and renders `query`.
    pub async fn load_all(&mut self, kind: SurfaceKind, query: &str) -> Result<RenderReport> {
        self.queries.insert(kind, query.to_string());
        let surface = &self.surfaces[&kind];
        let report = self.renderer.load_all(&self.records, query, surface).await?;
        self.note_recovery(&report);
        Ok(report)
    }

    /// Re-runs each surface's last query, one surface after the other.
    pub async fn refresh(&mut self) -> Result<()> {
        for kind in [SurfaceKind::Landing, SurfaceKind::Dashboard] {
            let query = self.last_query(kind).to_string();
            self.search(kind, &query).await?;
        }
        Ok(())
    }

    pub fn sort_mode(&self) -> Option<SortMode> {
        self.session.render().sort_mode()
    }

    pub fn set_sort_mode(&mut self, mode: Option<SortMode>) -> Result<()> {
        self.prefs.set_sort_mode(mode)?;
        self.session.render().set_sort_mode(mode);
        Ok(())
    }

    pub fn export_to(&self, path: &Path) -> TrackerResult<usize> {
        self.records.export_to(path)
    }

    pub async fn import_from(&mut self, path: &Path) -> TrackerResult<usize> {
        let count = self.records.import_from(path, Utc::now())?;
        self.queries.clear();
        self.refresh().await?;
        Ok(count)
    }

    fn check_account(&mut self) -> Result<()> {
        if self.accounts.load_or_reset()?.recovered.is_some() {
            self.warnings.push(CORRUPTED_ACCOUNT_WARNING.to_string());
        }
        Ok(())
    }

    fn note_recovery(&mut self, report: &RenderReport) {
        if report.recovered.is_some() {
            self.warnings.push(CORRUPTED_DATA_WARNING.to_string());
        }
    }
}
