//! Read-prior / render / write step for one output document.

use super::{VaultError, VaultResult};
use crate::memo::extract_memos;
use crate::model::task::{Role, Task};
use crate::render::{render_document, Document};
use log::info;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Outcome of writing one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenDocument {
    pub path: PathBuf,
    pub tasks: usize,
    /// Memos re-injected under a task of the new document.
    pub memos_preserved: usize,
    /// Non-empty memos of the prior document with no memo region in the new one.
    pub memos_dropped: usize,
}

/// Reads the prior version of a document; `None` when it does not exist.
pub fn read_prior(path: &Path) -> VaultResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(VaultError::io(path, err)),
    }
}

/// Regenerates `doc` at `path`, carrying memos over from the file it replaces.
///
/// Parent directories are created as needed.
pub fn write_document(
    path: &Path,
    doc: &Document,
    role_of: &dyn Fn(&Task) -> Role,
) -> VaultResult<WrittenDocument> {
    let prior = read_prior(path)?;
    let memos = extract_memos(prior.as_deref());
    let text = render_document(doc, role_of, &memos);

    let memo_bearing: Vec<&str> = if doc.policy().memo_markers {
        doc.sections
            .iter()
            .flat_map(|section| section.tasks.iter())
            .filter(|task| !task.is_completed())
            .map(|task| task.gid.as_str())
            .collect()
    } else {
        Vec::new()
    };
    let memos_preserved = memo_bearing
        .iter()
        .filter(|gid| memos.preserved(gid).is_some_and(|memo| !memo.trim().is_empty()))
        .count();
    let memos_dropped = memos
        .iter()
        .filter(|(gid, memo)| !memo.trim().is_empty() && !memo_bearing.contains(gid))
        .count();

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|err| VaultError::io(parent, err))?;
    }
    std::fs::write(path, text).map_err(|err| VaultError::io(path, err))?;

    info!(
        "event=document_write module=vault status=ok path={} tasks={} memos_preserved={} memos_dropped={}",
        path.display(),
        doc.task_count(),
        memos_preserved,
        memos_dropped
    );

    Ok(WrittenDocument {
        path: path.to_path_buf(),
        tasks: doc.task_count(),
        memos_preserved,
        memos_dropped,
    })
}
