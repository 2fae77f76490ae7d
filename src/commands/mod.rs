use crate::cli::Command;
use crate::render::{RenderOutcome, RenderReport, SurfaceKind};
use crate::tracker::Tracker;

pub mod account;
pub mod prefs;
pub mod records;
pub mod workers;

#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn run(&self, tracker: &mut Tracker) -> anyhow::Result<()>;
}

impl Command {
    pub async fn run(&self, tracker: &mut Tracker) -> anyhow::Result<()> {
        match self {
            Command::Signin { username, password } => {
                account::sign_in(tracker, username, password.as_deref()).await
            }
            Command::Signout => account::sign_out(tracker),
            Command::Account { cmd } => cmd.run(tracker).await,
            Command::Add {
                title,
                storage,
                info,
                date,
                image,
            } => {
                records::add(
                    tracker,
                    records::AddArgs {
                        title,
                        storage,
                        info: info.as_deref(),
                        date: *date,
                        image: image.as_deref(),
                    },
                )
                .await
            }
            Command::Edit {
                id,
                title,
                storage,
                info,
                password,
            } => {
                let changes = crate::records::RecordChanges {
                    title: title.clone(),
                    storage: storage.clone(),
                    info: info.clone(),
                };
                records::edit(tracker, *id, changes, password.as_deref()).await
            }
            Command::Delete { id, password } => {
                records::delete(tracker, *id, password.as_deref()).await
            }
            Command::Search {
                query,
                surface,
                sort,
                all,
            } => {
                records::search(
                    tracker,
                    query.as_deref().unwrap_or(""),
                    *surface,
                    *sort,
                    *all,
                )
                .await
            }
            Command::Borrow { id, worker } => records::borrow(tracker, *id, worker.as_deref()).await,
            Command::Return { id } => records::return_record(tracker, *id).await,
            Command::Export { path } => records::export(tracker, path.as_deref()),
            Command::Import { path } => records::import(tracker, path).await,
            Command::Worker { cmd } => cmd.run(tracker).await,
            Command::Sort { mode } => prefs::sort(tracker, mode.mode()),
            Command::Theme { choice } => prefs::theme(tracker, *choice),
        }
    }
}

/// What runs when no subcommand is given.
pub async fn show_dashboard(tracker: &mut Tracker) -> anyhow::Result<()> {
    let report = tracker.search(SurfaceKind::Dashboard, "").await?;
    print_surface(tracker, SurfaceKind::Dashboard, &report);
    Ok(())
}

pub(crate) fn print_surface(tracker: &Tracker, kind: SurfaceKind, report: &RenderReport) {
    print!("{}", tracker.surface(kind));
    match &report.outcome {
        RenderOutcome::Aborted { rendered } => {
            log::debug!("render {} superseded after {} cards", report.generation, rendered)
        }
        RenderOutcome::Failed { rendered, error } => {
            log::error!("rendering stopped after {} cards: {}", rendered, error)
        }
        _ => {}
    }
}

/// Prints the dashboard after a mutation has refreshed both surfaces.
pub(crate) fn print_dashboard(tracker: &Tracker) {
    print!("{}", tracker.surface(SurfaceKind::Dashboard));
}
