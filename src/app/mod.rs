mod wiring;

use crate::{cli, commands, context, storage, tracker::Tracker};
use anyhow::{Context as AnyhowContext, Result};
use std::sync::Arc;

pub struct App {
    pub ctx: context::Context,
    pub storage: Arc<dyn storage::Storage + Send + Sync>,
}

impl App {
    pub fn from_cli() -> Result<(Self, cli::Cli)> {
        let cli = crate::cli::parse();
        let ctx = context::Context::from_cli(&cli);

        crate::tracing::init(ctx.log_file.as_deref());
        log::debug!("data dir: {}", ctx.data_dir.display());
        if let Some(path) = ctx.log_file.as_deref() {
            log::debug!("log file: {}", path.display());
        }

        wiring::init_data_dir(&ctx).context("initializing data dir")?;
        let storage = wiring::init_storage(&ctx)?;

        Ok((Self { ctx, storage }, cli))
    }

    pub fn tracker(&self) -> Result<Tracker> {
        wiring::build_tracker(&self.ctx, self.storage.clone())
    }
}

pub async fn run() -> Result<()> {
    let (app, cli) = App::from_cli()?;
    let mut tracker = app.tracker()?;

    let result = match &cli.cmd {
        Some(cmd) => cmd.run(&mut tracker).await,
        None => commands::show_dashboard(&mut tracker).await,
    };

    for warning in tracker.take_warnings() {
        eprintln!("{warning}");
    }
    result
}
