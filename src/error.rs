use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures while collecting interpreters. Any of these ends the program
/// before the picker is shown.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("`{command}` failed: {reason}")]
    ExternalCommand { command: String, reason: String },

    #[error("cannot read {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SourceError>;
