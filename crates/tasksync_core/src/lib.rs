//! Core logic for syncing remote tasks into Markdown vault documents.
//! User memos written under generated tasks survive every regeneration.

pub mod config;
pub mod logging;
pub mod memo;
pub mod model;
pub mod render;
pub mod routing;
pub mod service;
pub mod source;
pub mod vault;

pub use config::{ConfigError, ConfigFile, Settings};
pub use logging::{default_log_dir, default_log_level, init_logging};
pub use memo::{extract_memos, load_memos, MemoIndex};
pub use model::task::{CustomField, FieldValue, ProjectRef, Role, Task, TaskId, UserRef};
pub use render::{regenerate, render_document, Document, DocumentKind, RenderPolicy, Section};
pub use routing::resolver::{classification_tag, role_of};
pub use routing::router::{group_by_tag, route_by_tag, Routing};
pub use service::sync_service::{run_sync, SyncReport, SyncRequest};
pub use service::view_service::{run_view, ViewRequest};
pub use service::{SyncError, SyncResult};
pub use source::asana::AsanaClient;
pub use source::{SourceError, SourceResult, TaskSource, WorkspaceRef};
pub use vault::discovery::{discover_local_projects, LocalProject};
pub use vault::store::{write_document, WrittenDocument};
pub use vault::VaultError;

