use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingError {
    #[error("cannot determine the current directory: {0}")]
    CurrentDir(#[source] io::Error),
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("malformed setting file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("cannot write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Reasons the application stops before or while running its window.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Setting(#[from] SettingError),
    #[error("cannot create the window: {0}")]
    Window(String),
    #[error("unexpected failure: {0}")]
    Panic(String),
}

impl From<eframe::Error> for AppError {
    fn from(err: eframe::Error) -> Self {
        Self::Window(err.to_string())
    }
}
