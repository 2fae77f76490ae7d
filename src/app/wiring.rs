use std::sync::Arc;

use crate::{context, storage, tracker::Tracker};
use anyhow::{Context, Result};

pub fn init_data_dir(ctx: &context::Context) -> Result<()> {
    std::fs::create_dir_all(&ctx.data_dir)?;
    Ok(())
}

pub fn init_storage(ctx: &context::Context) -> Result<Arc<dyn storage::Storage + Send + Sync>> {
    let sqlite = storage::SqliteStorage::new(ctx.db_path());
    if ctx.reset {
        sqlite.reset_all().context("resetting storage")?;
    }
    sqlite.init().context("initializing storage")?;
    Ok(Arc::new(sqlite))
}

pub fn build_tracker(
    ctx: &context::Context,
    storage: Arc<dyn storage::Storage + Send + Sync>,
) -> Result<Tracker> {
    Tracker::open(storage, ctx.render()).context("opening tracker")
}
