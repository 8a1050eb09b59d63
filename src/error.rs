use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the daylog storage layer
#[derive(Debug, Error)]
pub enum DaylogError {
    #[error("daylog not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("{} is not a valid daylog: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("failed to encode daylog for {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },

    #[error("task {index} is out of range (daylog has {len} task{})", plural(.len))]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no daylog named '{name}' in the storage directory")]
    UnknownDaylog { name: String },

    #[error("no daylogs found in {}", .dir.display())]
    NoDaylogs { dir: PathBuf },

    #[error("selection cancelled")]
    SelectionCancelled,

    #[error("configuration error in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

impl DaylogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            DaylogError::NotFound { path }
        } else {
            DaylogError::Io { path, source }
        }
    }

    /// Errors caused by caller input rather than the state of the disk
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DaylogError::IndexOutOfRange { .. }
                | DaylogError::UnknownDaylog { .. }
                | DaylogError::NoDaylogs { .. }
                | DaylogError::SelectionCancelled
        )
    }
}

fn plural(n: &usize) -> &'static str {
    if *n == 1 { "" } else { "s" }
}

pub type DaylogResult<T> = Result<T, DaylogError>;
