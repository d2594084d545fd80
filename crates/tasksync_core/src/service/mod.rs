//! Run-level use-case services.
//!
//! # Responsibility
//! - Orchestrate fetch, routing, and document writes for one run.
//! - Keep the CLI decoupled from routing and rendering details.
//!
//! # Invariants
//! - Runs are strictly sequential; one fetch or one file at a time.
//! - Routing finishes before the first document is written.

pub mod sync_service;
pub mod view_service;

use crate::source::SourceError;
use crate::vault::VaultError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SyncResult<T> = Result<T, SyncError>;

/// Fatal run failure. Per-project fetch failures never surface here.
#[derive(Debug)]
pub enum SyncError {
    Vault(VaultError),
    /// A fetch the run cannot continue without failed.
    Source(SourceError),
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vault(err) => write!(f, "{err}"),
            Self::Source(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Vault(err) => Some(err),
            Self::Source(err) => Some(err),
        }
    }
}

impl From<VaultError> for SyncError {
    fn from(value: VaultError) -> Self {
        Self::Vault(value)
    }
}

impl From<SourceError> for SyncError {
    fn from(value: SourceError) -> Self {
        Self::Source(value)
    }
}
