use anyhow::Result;
use tracing::Instrument;

use super::card::RecordCard;
use super::context::RenderContext;
use super::surface::{Placeholder, RenderBlock, RenderSurface};
use crate::error::DecodeError;
use crate::records::{LoadedRecords, Record, RecordStore};
use crate::storage::Storage;

pub const DEFAULT_MAX_RENDER: usize = 500;
pub const DEFAULT_BATCH_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Results shown before the truncation notice kicks in.
    pub max_render: usize,
    pub batch_size: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_render: DEFAULT_MAX_RENDER,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Nothing stored and no query.
    Empty,
    NoResults,
    Completed {
        rendered: usize,
        /// Matches before the cap was applied.
        total: usize,
        truncated: bool,
    },
    /// A newer render took over.
    Aborted { rendered: usize },
    /// A batch could not be built; earlier batches stay on the surface.
    Failed { rendered: usize, error: String },
}

#[derive(Debug)]
pub struct RenderReport {
    pub generation: u64,
    pub outcome: RenderOutcome,
    /// Set when the stored collection was corrupt and got cleared on load.
    pub recovered: Option<DecodeError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenderState {
    Filtering,
    EmptyState,
    NoResults,
    Batching,
    Aborted,
    Failed,
    Sorting,
    Idle,
}

/// Records matching `query` as a case-insensitive substring of title,
/// location or info. An empty query keeps everything.
pub fn filter_records(records: Vec<Record>, query: &str) -> Vec<Record> {
    if query.is_empty() {
        return records;
    }
    let folded = query.to_lowercase();
    records.into_iter().filter(|r| r.matches(&folded)).collect()
}

/// Incremental search renderer.
///
/// Results are appended in batches with a scheduler yield before each one,
/// so a large list never holds the thread for more than one batch. Every
/// render takes a fresh token from the shared [`RenderContext`] and checks
/// it before each batch; once a newer render has started, the older one
/// stops without appending anything else.
#[derive(Debug, Clone)]
pub struct SearchRenderer {
    ctx: RenderContext,
    config: RenderConfig,
}

impl SearchRenderer {
    pub fn new(ctx: RenderContext, config: RenderConfig) -> Self {
        let config = RenderConfig {
            max_render: config.max_render.max(1),
            batch_size: config.batch_size.max(1),
        };
        Self { ctx, config }
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    /// Lifts the render cap for the rest of the session and renders `query`
    /// again from the start.
    pub async fn load_all<S, T>(
        &self,
        store: &RecordStore<S>,
        query: &str,
        surface: &T,
    ) -> Result<RenderReport>
    where
        S: Storage,
        T: RenderSurface + ?Sized,
    {
        self.ctx.set_allow_large_render(true);
        self.search(store, query, surface).await
    }

    pub async fn search<S, T>(
        &self,
        store: &RecordStore<S>,
        query: &str,
        surface: &T,
    ) -> Result<RenderReport>
    where
        S: Storage,
        T: RenderSurface + ?Sized,
    {
        let LoadedRecords { records, recovered } = store.load_or_reset()?;

        let token = self.ctx.next_generation();
        let span = tracing::debug_span!("search", surface = surface.id(), token);

        surface.clear();
        surface.claim(token);
        let outcome = async {
            tracing::debug!(total = records.len(), query, "start render");
            self.render(records, query, surface, token).await
        }
        .instrument(span)
        .await;

        Ok(RenderReport {
            generation: token,
            outcome,
            recovered,
        })
    }

    async fn render<T>(
        &self,
        records: Vec<Record>,
        query: &str,
        surface: &T,
        token: u64,
    ) -> RenderOutcome
    where
        T: RenderSurface + ?Sized,
    {
        transition(RenderState::Filtering);
        if records.is_empty() && query.is_empty() {
            transition(RenderState::EmptyState);
            surface.append(vec![RenderBlock::Placeholder(Placeholder::Empty)]);
            surface.release(token);
            return RenderOutcome::Empty;
        }

        let mut matches = filter_records(records, query);
        if matches.is_empty() {
            transition(RenderState::NoResults);
            surface.append(vec![RenderBlock::Placeholder(Placeholder::NoResults)]);
            surface.release(token);
            return RenderOutcome::NoResults;
        }

        let total = matches.len();
        let cap = self.config.max_render;
        let truncated = total > cap && !self.ctx.allow_large_render();
        if truncated {
            tracing::info!(total, cap, "too many results; truncating");
            surface.append(vec![RenderBlock::TruncationNotice { total, shown: cap }]);
            matches.truncate(cap);
        }

        transition(RenderState::Batching);
        let mut rendered = 0usize;
        for batch in matches.chunks(self.config.batch_size) {
            tokio::task::yield_now().await;

            if !self.ctx.is_current(token) {
                transition(RenderState::Aborted);
                surface.release(token);
                tracing::debug!(
                    newer = self.ctx.current_generation(),
                    rendered,
                    "aborting superseded render"
                );
                return RenderOutcome::Aborted { rendered };
            }

            let blocks = match batch
                .iter()
                .map(|r| RecordCard::try_from(r).map(RenderBlock::Card))
                .collect::<Result<Vec<_>, _>>()
            {
                Ok(blocks) => blocks,
                Err(err) => {
                    transition(RenderState::Failed);
                    surface.release(token);
                    tracing::error!(error = %err, rendered, "error rendering batch");
                    return RenderOutcome::Failed {
                        rendered,
                        error: err.to_string(),
                    };
                }
            };

            let start = rendered;
            rendered += blocks.len();
            surface.append(blocks);
            tracing::trace!(start, end = rendered, of = matches.len(), "rendered batch");
        }

        surface.release(token);
        if let Some(mode) = self.ctx.sort_mode() {
            transition(RenderState::Sorting);
            surface.sort_cards(mode);
        }
        transition(RenderState::Idle);
        tracing::debug!(rendered, "finished render");

        RenderOutcome::Completed {
            rendered,
            total,
            truncated,
        }
    }
}

fn transition(state: RenderState) {
    tracing::trace!(?state, "render state");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::NewRecord;
    use crate::render::{BufferSurface, SortMode};
    use crate::storage::{keys, MemoryStorage, StorageJsonExt};
    use chrono::{TimeZone, Utc};

    fn seeded(n: usize) -> RecordStore<MemoryStorage> {
        let store = RecordStore::new(MemoryStorage::new());
        let records: Vec<Record> = (1..=n as i64)
            .map(|i| Record {
                id: i,
                title: format!("File {i}"),
                storage: if i % 2 == 0 { "Cabinet A" } else { "Cabinet B" }.to_string(),
                info: String::new(),
                created_at: Utc.timestamp_millis_opt(i).unwrap(),
                file_date: None,
                image: None,
                borrowed_by: None,
            })
            .collect();
        store.save(&records).unwrap();
        store
    }

    fn renderer() -> SearchRenderer {
        SearchRenderer::new(RenderContext::new(), RenderConfig::default())
    }

    #[tokio::test]
    async fn empty_store_and_query_shows_empty_state() {
        let store = RecordStore::new(MemoryStorage::new());
        let surface = BufferSurface::new("results");
        let report = renderer().search(&store, "", &surface).await.unwrap();
        assert_eq!(report.outcome, RenderOutcome::Empty);
        assert_eq!(surface.placeholder(), Some(Placeholder::Empty));
        assert!(!surface.is_rendering());
    }

    #[tokio::test]
    async fn query_against_empty_store_shows_no_results() {
        let store = RecordStore::new(MemoryStorage::new());
        let surface = BufferSurface::new("results");
        let report = renderer().search(&store, "tax", &surface).await.unwrap();
        assert_eq!(report.outcome, RenderOutcome::NoResults);
        assert_eq!(surface.placeholder(), Some(Placeholder::NoResults));
    }

    #[tokio::test]
    async fn renders_every_match_across_batches() {
        let store = seeded(250);
        let surface = BufferSurface::new("results");
        let report = renderer().search(&store, "cabinet a", &surface).await.unwrap();
        assert_eq!(
            report.outcome,
            RenderOutcome::Completed {
                rendered: 125,
                total: 125,
                truncated: false
            }
        );
        assert!(surface.cards().iter().all(|c| c.storage == "Cabinet A"));
        assert!(!surface.is_rendering());
    }

    #[tokio::test]
    async fn cap_truncates_until_load_all() {
        let store = seeded(600);
        let surface = BufferSurface::new("results");
        let renderer = renderer();

        let report = renderer.search(&store, "", &surface).await.unwrap();
        assert_eq!(
            report.outcome,
            RenderOutcome::Completed {
                rendered: 500,
                total: 600,
                truncated: true
            }
        );
        assert_eq!(surface.cards().len(), 500);
        assert_eq!(surface.truncation_notice(), Some((600, 500)));

        let report = renderer.load_all(&store, "", &surface).await.unwrap();
        assert!(matches!(
            report.outcome,
            RenderOutcome::Completed { rendered: 600, truncated: false, .. }
        ));
        assert_eq!(surface.cards().len(), 600);
        assert_eq!(surface.truncation_notice(), None);
    }

    #[tokio::test]
    async fn newer_search_supersedes_older_one() {
        let store = seeded(300);
        let surface = BufferSurface::new("results");
        let renderer = renderer();

        let (first, second) = tokio::join!(
            renderer.search(&store, "", &surface),
            async {
                tokio::task::yield_now().await;
                tokio::task::yield_now().await;
                renderer.search(&store, "cabinet b", &surface).await
            }
        );

        assert!(matches!(first.unwrap().outcome, RenderOutcome::Aborted { .. }));
        assert!(matches!(
            second.unwrap().outcome,
            RenderOutcome::Completed { rendered: 150, .. }
        ));
        assert_eq!(surface.cards().len(), 150);
        assert!(surface.cards().iter().all(|c| c.storage == "Cabinet B"));
        assert!(!surface.is_rendering());
    }

    #[tokio::test]
    async fn malformed_record_stops_render_and_keeps_earlier_batches() {
        let store = seeded(150);
        let mut records = store.load().unwrap();
        records[120].title = "   ".into();
        store.save(&records).unwrap();

        let surface = BufferSurface::new("results");
        let report = renderer().search(&store, "", &surface).await.unwrap();
        match report.outcome {
            RenderOutcome::Failed { rendered, .. } => assert_eq!(rendered, 100),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(surface.cards().len(), 100);
        assert!(!surface.is_rendering());
    }

    #[tokio::test]
    async fn selected_sort_is_applied_after_rendering() {
        let store = RecordStore::new(MemoryStorage::new());
        for (i, title) in ["charlie", "alpha", "bravo"].iter().enumerate() {
            store
                .add(
                    NewRecord::new(*title, "Shelf"),
                    Utc.timestamp_millis_opt(i as i64 + 1).unwrap(),
                )
                .unwrap();
        }
        let renderer = renderer();
        renderer.context().set_sort_mode(Some(SortMode::TitleAsc));

        let surface = BufferSurface::new("results");
        renderer.search(&store, "", &surface).await.unwrap();
        let titles: Vec<String> = surface.cards().into_iter().map(|c| c.title).collect();
        assert_eq!(titles, vec!["alpha", "bravo", "charlie"]);
    }

    #[tokio::test]
    async fn corrupt_collection_is_reported_and_reset() {
        let storage = MemoryStorage::new();
        storage.set_json(keys::RECORDS, &"not an array").unwrap();
        let store = RecordStore::new(storage);
        let surface = BufferSurface::new("results");

        let report = renderer().search(&store, "", &surface).await.unwrap();
        assert!(report.recovered.is_some());
        assert_eq!(report.outcome, RenderOutcome::Empty);
    }
}
