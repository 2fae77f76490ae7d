use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::sort::SortMode;

#[derive(Debug, Default)]
struct Shared {
    generation: AtomicU64,
    allow_large_render: AtomicBool,
    sort_mode: Mutex<Option<SortMode>>,
}

/// Render state shared by every surface of a session.
///
/// The generation counter is shared across surfaces: a render started later
/// holds a larger token than any render still in flight, on any surface.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    inner: Arc<Shared>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new render cycle and returns its token.
    pub fn next_generation(&self) -> u64 {
        self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current_generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.current_generation() == token
    }

    pub fn allow_large_render(&self) -> bool {
        self.inner.allow_large_render.load(Ordering::SeqCst)
    }

    pub fn set_allow_large_render(&self, allow: bool) {
        self.inner.allow_large_render.store(allow, Ordering::SeqCst);
    }

    pub fn sort_mode(&self) -> Option<SortMode> {
        *self
            .inner
            .sort_mode
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_sort_mode(&self, mode: Option<SortMode>) {
        *self
            .inner
            .sort_mode
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generations_increase_and_only_latest_is_current() {
        let ctx = RenderContext::new();
        let a = ctx.next_generation();
        let b = ctx.clone().next_generation();
        assert!(b > a);
        assert!(!ctx.is_current(a));
        assert!(ctx.is_current(b));
    }

    #[test]
    fn clones_share_flags() {
        let ctx = RenderContext::new();
        let other = ctx.clone();
        other.set_allow_large_render(true);
        other.set_sort_mode(Some(SortMode::TitleAsc));
        assert!(ctx.allow_large_render());
        assert_eq!(ctx.sort_mode(), Some(SortMode::TitleAsc));
    }
}
