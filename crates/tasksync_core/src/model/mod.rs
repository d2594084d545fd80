//! Remote task snapshot model.
//!
//! # Responsibility
//! - Define the task shape consumed by routing and rendering.
//! - Fold loosely-typed remote payload fields into typed variants.
//!
//! # Invariants
//! - Tasks are read-only snapshots; nothing in core mutates them after fetch.
//! - Every task is identified by the remote `gid` string.

pub mod task;
