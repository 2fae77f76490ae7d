use std::path::PathBuf;

use crate::render::RenderConfig;

#[derive(Debug, Clone)]
pub struct Configuration {
    pub data_dir: PathBuf,
    pub log_file: Option<PathBuf>,
    pub reset: bool,
    pub batch_size: usize,
    pub max_render: usize,
}

impl Configuration {
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("filetrack.sqlite")
    }

    pub fn render(&self) -> RenderConfig {
        RenderConfig {
            max_render: self.max_render,
            batch_size: self.batch_size,
        }
    }
}
