mod account_cmd;
mod args;
mod command;
mod worker_cmd;

pub use account_cmd::AccountCmd;
pub use args::Cli;
pub use command::{Command, SortChoice, ThemeChoice};
pub use worker_cmd::WorkerCmd;

pub use args::parse;
