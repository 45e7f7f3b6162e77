//! Error types for format operations

use lxm_parser::lxm::LxmError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("format not found: {0}")]
    FormatNotFound(String),

    #[error("{0}")]
    NotSupported(String),

    #[error(transparent)]
    Parse(#[from] LxmError),

    #[error("cannot serialize: {0}")]
    Serialization(String),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no format handles the extension `{0}`")]
    UnknownExtension(String),

    #[error("the document has no file path or format to save to")]
    MissingTarget,
}

impl FormatError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FormatError::Io {
            path: path.into(),
            source,
        }
    }
}
