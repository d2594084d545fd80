//! Vault filesystem boundary.
//!
//! # Responsibility
//! - Discover local projects under the vault's project root.
//! - Run the read-prior / render / write step for one output document.
//!
//! # Invariants
//! - Each output path is read at most once and written at most once per run.
//! - A document's prior text is read immediately before it is overwritten.

pub mod discovery;
pub mod store;

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type VaultResult<T> = Result<T, VaultError>;

/// Filesystem failure at the vault boundary.
#[derive(Debug)]
pub enum VaultError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A project's `tasksync.toml` cannot be parsed.
    InvalidProjectFile { path: PathBuf, message: String },
}

impl VaultError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl Display for VaultError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "I/O error at `{}`: {source}", path.display()),
            Self::InvalidProjectFile { path, message } => {
                write!(f, "invalid project file `{}`: {message}", path.display())
            }
        }
    }
}

impl Error for VaultError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidProjectFile { .. } => None,
        }
    }
}
