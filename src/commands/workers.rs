use anyhow::Result;

use super::CommandRunner;
use crate::cli;
use crate::tracker::Tracker;

impl CommandRunner for cli::WorkerCmd {
    async fn run(&self, tracker: &mut Tracker) -> Result<()> {
        let registry = tracker.workers();
        match self {
            cli::WorkerCmd::List => {
                let selected = registry.selected()?;
                let workers = registry.list()?;
                if workers.is_empty() {
                    println!("No workers registered");
                }
                for name in workers {
                    let mark = if selected.as_deref() == Some(name.as_str()) { '*' } else { ' ' };
                    println!("{mark} {name}");
                }
                Ok(())
            }
            cli::WorkerCmd::Add { name } => {
                registry.add(name)?;
                log::info!("worker {} added", name.trim());
                Ok(())
            }
            cli::WorkerCmd::Remove { name } => {
                if registry.remove(name)? {
                    log::info!("worker {} removed", name.trim());
                } else {
                    log::warn!("no worker named {}", name.trim());
                }
                Ok(())
            }
            cli::WorkerCmd::Select { name } => {
                registry.select(name)?;
                println!("Selected worker: {}", name.trim());
                Ok(())
            }
        }
    }
}
