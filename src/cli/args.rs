use clap::Parser;
use std::env;
use std::path::PathBuf;

use crate::cli::command::Command;
use crate::render::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_RENDER};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Track where your files are stored",
    long_about = "Record where physical or digital files are kept, search them, and lend them to workers. Everything lives in a local SQLite file.",
    subcommand_required = false,
    arg_required_else_help = false
)]
pub struct Cli {
    #[arg(
        long,
        env = "FILETRACK_DATA_DIR",
        default_value = ".filetrack/",
        value_name = "DIR",
        help = "Directory to store persistent data"
    )]
    pub data_dir: PathBuf,

    #[arg(
        long = "log-file",
        env = "FILETRACK_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long,
        default_value_t = false,
        help = "Reset all persisted state (delete the SQLite database) before starting"
    )]
    pub reset: bool,

    #[arg(
        short = 'b',
        long,
        default_value_t = DEFAULT_BATCH_SIZE,
        value_name = "SIZE",
        help = "Render search results in batches of SIZE"
    )]
    pub batch_size: usize,

    #[arg(
        long,
        default_value_t = DEFAULT_MAX_RENDER,
        value_name = "N",
        help = "Show at most N results unless --all is given"
    )]
    pub max_render: usize,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    dotenvy::from_filename(&dotenv_path).ok();

    Cli::parse()
}
