use std::ops::Deref;

use crate::configuration::Configuration;

pub struct Context {
    pub config: Configuration,
}

impl Context {
    pub fn from_cli(cli: &crate::cli::Cli) -> Self {
        let cfg = Configuration {
            data_dir: cli.data_dir.clone(),
            log_file: cli.log_file.clone(),
            reset: cli.reset,
            batch_size: cli.batch_size,
            max_render: cli.max_render,
        };
        Self { config: cfg }
    }
}

impl Deref for Context {
    type Target = Configuration;

    fn deref(&self) -> &Configuration {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn from_cli_copies_flags() {
        let cli = crate::cli::Cli::try_parse_from([
            "filetrack",
            "--data-dir",
            "/tmp/ft",
            "--batch-size",
            "7",
            "--reset",
        ])
        .unwrap();
        let ctx = Context::from_cli(&cli);
        assert!(ctx.reset);
        assert_eq!(ctx.render().batch_size, 7);
        assert_eq!(ctx.db_path(), std::path::PathBuf::from("/tmp/ft/filetrack.sqlite"));
    }
}
