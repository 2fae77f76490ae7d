use clap::Subcommand;

#[derive(Subcommand, Debug, Clone)]
pub enum WorkerCmd {
    #[command(about = "List workers", long_about = "List registered workers; the selected one is marked with *.")]
    List,
    #[command(about = "Register a worker")]
    Add { name: String },
    #[command(about = "Remove a worker")]
    Remove { name: String },
    #[command(
        about = "Select the worker",
        long_about = "Select the worker that `borrow` lends files to when --worker is not given."
    )]
    Select { name: String },
}
