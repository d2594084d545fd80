//! Markdown document rendering.
//!
//! # Responsibility
//! - Describe output documents (title, kind, sections) independent of I/O.
//! - Render them to the persisted Markdown format, re-injecting memos.
//!
//! # Invariants
//! - Rendering is a pure function of document, role lookup, and memo index.
//! - Re-rendering a document from its own output with identical inputs is
//!   byte-identical, timestamp line excluded.
//! - Memo text is only ever emitted under the marker of its own task id.

pub mod document;
pub mod markdown;

pub use document::{Document, DocumentKind, RenderPolicy, Section};
pub use markdown::{anchor_for, regenerate, render_document, task_url};
