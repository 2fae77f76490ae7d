use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::Subcommand;

use crate::cli::account_cmd::AccountCmd;
use crate::cli::worker_cmd::WorkerCmd;
use crate::records::RecordId;
use crate::render::{SortMode, SurfaceKind};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(
        about = "Sign in",
        long_about = "Sign in with the stored account. The first account is user / password until changed with `account change`."
    )]
    Signin {
        #[arg(long, short = 'u', value_name = "NAME")]
        username: String,
        #[arg(
            long,
            short = 'p',
            value_name = "PASSWORD",
            help = "Prompted for on a terminal when omitted"
        )]
        password: Option<String>,
    },
    #[command(about = "Sign out")]
    Signout,
    #[command(about = "Account management commands")]
    Account {
        #[command(subcommand)]
        cmd: AccountCmd,
    },
    #[command(
        about = "Add a file",
        long_about = "Record a new file and where it is kept. A date in the title (e.g. 2024-03-01 or 01/03/2024) becomes the file date unless --date is given."
    )]
    Add {
        #[arg(long, short = 't', value_name = "TITLE")]
        title: String,
        #[arg(long, short = 's', value_name = "LOCATION", help = "Where the file is stored")]
        storage: String,
        #[arg(long, short = 'i', value_name = "TEXT", help = "Additional info")]
        info: Option<String>,
        #[arg(long, value_name = "YYYY-MM-DD", help = "File date")]
        date: Option<NaiveDate>,
        #[arg(long, value_name = "PATH", help = "Picture to attach")]
        image: Option<PathBuf>,
    },
    #[command(
        about = "Edit a file",
        long_about = "Change the title, location or info of a file. Requires the account password."
    )]
    Edit {
        id: RecordId,
        #[arg(long, short = 't', value_name = "TITLE")]
        title: Option<String>,
        #[arg(long, short = 's', value_name = "LOCATION")]
        storage: Option<String>,
        #[arg(long, short = 'i', value_name = "TEXT")]
        info: Option<String>,
        #[arg(long, value_name = "PASSWORD", help = "Prompted for on a terminal when omitted")]
        password: Option<String>,
    },
    #[command(about = "Delete a file", long_about = "Delete a file. Requires the account password.")]
    Delete {
        id: RecordId,
        #[arg(long, value_name = "PASSWORD", help = "Prompted for on a terminal when omitted")]
        password: Option<String>,
    },
    #[command(
        about = "Search files",
        long_about = "Case-insensitive search over title, location and info. An empty query lists everything."
    )]
    Search {
        query: Option<String>,
        #[arg(long, value_enum, default_value_t = SurfaceKind::Dashboard)]
        surface: SurfaceKind,
        #[arg(long, value_enum, help = "Sort mode to select before searching")]
        sort: Option<SortMode>,
        #[arg(long, default_value_t = false, help = "Show every result, lifting the render cap")]
        all: bool,
    },
    #[command(about = "Lend a file to a worker")]
    Borrow {
        id: RecordId,
        #[arg(long, short = 'w', value_name = "NAME", help = "Defaults to the selected worker")]
        worker: Option<String>,
    },
    #[command(about = "Mark a borrowed file as returned")]
    Return { id: RecordId },
    #[command(
        about = "Export all files as JSON",
        long_about = "Write every file to PATH as a JSON array (default: files-backup-<ms>.json)."
    )]
    Export { path: Option<PathBuf> },
    #[command(
        about = "Import files from JSON",
        long_about = "Append the files of a previously exported JSON array. Clashing ids are reassigned."
    )]
    Import { path: PathBuf },
    #[command(about = "Worker registry commands")]
    Worker {
        #[command(subcommand)]
        cmd: WorkerCmd,
    },
    #[command(
        about = "Select the sort mode",
        long_about = "Select how search results are sorted: date-asc, date-desc, title-asc, title-desc, newest, oldest or none."
    )]
    Sort {
        #[arg(value_name = "MODE")]
        mode: SortChoice,
    },
    #[command(about = "Show or change the theme")]
    Theme {
        #[arg(value_enum, default_value_t = ThemeChoice::Show)]
        choice: ThemeChoice,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortChoice {
    Mode(SortMode),
    None,
}

impl SortChoice {
    pub fn mode(self) -> Option<SortMode> {
        match self {
            SortChoice::Mode(mode) => Some(mode),
            SortChoice::None => None,
        }
    }
}

impl FromStr for SortChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("none") {
            return Ok(SortChoice::None);
        }
        SortMode::from_str(s)
            .map(SortChoice::Mode)
            .map_err(|e| e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ThemeChoice {
    Show,
    Light,
    Dark,
    Toggle,
}
