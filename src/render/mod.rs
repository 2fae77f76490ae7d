mod card;
mod context;
mod engine;
mod sort;
mod surface;

pub use card::{MalformedRecord, RecordCard};
pub use context::RenderContext;
pub use engine::{
    filter_records, RenderConfig, RenderOutcome, RenderReport, SearchRenderer, DEFAULT_BATCH_SIZE,
    DEFAULT_MAX_RENDER,
};
pub use sort::SortMode;
pub use surface::{BufferSurface, Placeholder, RenderBlock, RenderSurface, SurfaceKind};
