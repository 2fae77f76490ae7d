use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use super::card::RecordCard;
use super::sort::SortMode;

/// The two result lists a session shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum SurfaceKind {
    Landing,
    Dashboard,
}

impl SurfaceKind {
    pub fn id(&self) -> &'static str {
        match self {
            SurfaceKind::Landing => "results",
            SurfaceKind::Dashboard => "results-main",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Nothing stored and nothing searched for.
    Empty,
    NoResults,
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placeholder::Empty => f.write_str("No files yet. Sign in to add your first file!"),
            Placeholder::NoResults => {
                f.write_str("No files found. Try searching or add a new file.")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderBlock {
    Placeholder(Placeholder),
    /// Shown above a capped list; `search --all` renders the rest.
    TruncationNotice { total: usize, shown: usize },
    Card(RecordCard),
}

impl fmt::Display for RenderBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderBlock::Placeholder(p) => write!(f, "{p}"),
            RenderBlock::TruncationNotice { total, shown } => write!(
                f,
                "Too many results ({total}). Showing first {shown} items. Use --all to load all results."
            ),
            RenderBlock::Card(card) => write!(f, "{card}"),
        }
    }
}

/// An addressable output sink for search results.
///
/// The rendering marker records which render token currently owns the
/// surface, so only that render can release it.
pub trait RenderSurface {
    fn id(&self) -> &str;
    fn clear(&self);
    fn append(&self, blocks: Vec<RenderBlock>);
    fn claim(&self, token: u64);
    /// Clears the marker if `token` holds it. Returns whether it did.
    fn release(&self, token: u64) -> bool;
    fn rendering_token(&self) -> Option<u64>;
    /// Reorders the cards already on the surface; other blocks stay on top.
    fn sort_cards(&self, mode: SortMode);
}

#[derive(Debug, Default)]
struct SurfaceState {
    blocks: Vec<RenderBlock>,
    rendering: Option<u64>,
}

/// In-memory surface. Clones share the same contents.
#[derive(Debug, Clone)]
pub struct BufferSurface {
    id: String,
    state: Arc<Mutex<SurfaceState>>,
}

impl BufferSurface {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: Arc::new(Mutex::new(SurfaceState::default())),
        }
    }

    pub fn for_kind(kind: SurfaceKind) -> Self {
        Self::new(kind.id())
    }

    fn state(&self) -> MutexGuard<'_, SurfaceState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn blocks(&self) -> Vec<RenderBlock> {
        self.state().blocks.clone()
    }

    pub fn cards(&self) -> Vec<RecordCard> {
        self.state()
            .blocks
            .iter()
            .filter_map(|b| match b {
                RenderBlock::Card(card) => Some(card.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn card_ids(&self) -> Vec<i64> {
        self.cards().iter().map(|c| c.id).collect()
    }

    pub fn placeholder(&self) -> Option<Placeholder> {
        self.state().blocks.iter().find_map(|b| match b {
            RenderBlock::Placeholder(p) => Some(*p),
            _ => None,
        })
    }

    pub fn truncation_notice(&self) -> Option<(usize, usize)> {
        self.state().blocks.iter().find_map(|b| match b {
            RenderBlock::TruncationNotice { total, shown } => Some((*total, *shown)),
            _ => None,
        })
    }

    pub fn is_rendering(&self) -> bool {
        self.state().rendering.is_some()
    }
}

impl RenderSurface for BufferSurface {
    fn id(&self) -> &str {
        &self.id
    }

    fn clear(&self) {
        self.state().blocks.clear();
    }

    fn append(&self, blocks: Vec<RenderBlock>) {
        self.state().blocks.extend(blocks);
    }

    fn claim(&self, token: u64) {
        self.state().rendering = Some(token);
    }

    fn release(&self, token: u64) -> bool {
        let mut state = self.state();
        if state.rendering == Some(token) {
            state.rendering = None;
            true
        } else {
            false
        }
    }

    fn rendering_token(&self) -> Option<u64> {
        self.state().rendering
    }

    fn sort_cards(&self, mode: SortMode) {
        let mut state = self.state();
        let (mut cards, others): (Vec<_>, Vec<_>) = std::mem::take(&mut state.blocks)
            .into_iter()
            .partition(|b| matches!(b, RenderBlock::Card(_)));
        cards.sort_by(|a, b| match (a, b) {
            (RenderBlock::Card(a), RenderBlock::Card(b)) => mode.compare(a, b),
            _ => std::cmp::Ordering::Equal,
        });
        state.blocks = others;
        state.blocks.extend(cards);
    }
}

impl fmt::Display for BufferSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in self.state().blocks.iter() {
            writeln!(f, "{block}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: i64, title: &str) -> RenderBlock {
        RenderBlock::Card(RecordCard {
            id,
            title: title.to_string(),
            storage: "Shelf".to_string(),
            info: None,
            file_date: None,
            has_image: false,
            borrowed_by: None,
        })
    }

    #[test]
    fn only_the_owning_token_releases_the_marker() {
        let surface = BufferSurface::for_kind(SurfaceKind::Dashboard);
        assert_eq!(surface.id(), "results-main");
        surface.claim(1);
        surface.claim(2);
        assert!(!surface.release(1));
        assert_eq!(surface.rendering_token(), Some(2));
        assert!(surface.release(2));
        assert!(!surface.is_rendering());
    }

    #[test]
    fn sort_keeps_notice_on_top() {
        let surface = BufferSurface::new("s");
        surface.append(vec![
            RenderBlock::TruncationNotice { total: 3, shown: 2 },
            card(2, "b"),
            card(1, "a"),
        ]);
        surface.sort_cards(SortMode::TitleAsc);
        assert_eq!(surface.truncation_notice(), Some((3, 2)));
        assert!(matches!(surface.blocks()[0], RenderBlock::TruncationNotice { .. }));
        assert_eq!(surface.card_ids(), vec![1, 2]);
    }

    #[test]
    fn clones_share_contents() {
        let surface = BufferSurface::new("s");
        let view = surface.clone();
        surface.append(vec![card(1, "a")]);
        assert_eq!(view.card_ids(), vec![1]);
        view.clear();
        assert!(surface.blocks().is_empty());
    }
}
