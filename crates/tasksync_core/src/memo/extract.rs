//! Line scanner for memo regions.
//!
//! A memo region starts after a `<!-- Memo area for <id> -->` marker line and
//! runs until the next checklist item, the next marker, the next `## ` section
//! heading, or end of input. Other headings belong to the memo.

use super::MemoIndex;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::ErrorKind;
use std::path::Path;

static MEMO_MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!-- Memo area for (\w+) -->").expect("valid memo marker regex"));
static CHECKLIST_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*- \[[ x]\]").expect("valid checklist regex"));
static SECTION_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^## \S").expect("valid section heading regex"));

/// Returns the marker line body that introduces the memo of `task_id`.
pub fn memo_marker(task_id: &str) -> String {
    format!("<!-- Memo area for {task_id} -->")
}

/// Extracts memo regions from prior document text.
///
/// `None` means no prior document exists and yields an empty index.
pub fn extract_memos(prior: Option<&str>) -> MemoIndex {
    let mut index = MemoIndex::new();
    let Some(text) = prior else {
        return index;
    };

    let mut open: Option<String> = None;
    let mut buffer = String::new();

    for line in text.split_inclusive('\n') {
        if let Some(caps) = MEMO_MARKER_RE.captures(line) {
            if let Some(task_id) = open.take() {
                close(&mut index, task_id, &mut buffer);
            }
            open = Some(caps[1].to_string());
            buffer.clear();
            continue;
        }

        if open.is_none() {
            continue;
        }

        if CHECKLIST_ITEM_RE.is_match(line) {
            if let Some(task_id) = open.take() {
                close(&mut index, task_id, &mut buffer);
            }
            continue;
        }

        if SECTION_HEADING_RE.is_match(line) {
            if let Some(task_id) = open.take() {
                if !buffer.trim().is_empty() {
                    warn!(
                        "event=memo_heading_boundary module=memo status=warn task_id={}",
                        task_id
                    );
                }
                close(&mut index, task_id, &mut buffer);
            }
            continue;
        }

        buffer.push_str(line);
    }

    if let Some(task_id) = open.take() {
        close(&mut index, task_id, &mut buffer);
    }

    index
}

/// Reads `path` and extracts its memos; a missing file yields an empty index.
pub fn load_memos(path: &Path) -> std::io::Result<MemoIndex> {
    match std::fs::read_to_string(path) {
        Ok(text) => {
            let index = extract_memos(Some(&text));
            debug!(
                "event=memo_load module=memo status=ok path={} memos={}",
                path.display(),
                index.len()
            );
            Ok(index)
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(MemoIndex::new()),
        Err(err) => Err(err),
    }
}

fn close(index: &mut MemoIndex, task_id: String, buffer: &mut String) {
    if index.get(&task_id).is_some() {
        // Later marker wins; a well-formed document never repeats an id.
        warn!(
            "event=memo_duplicate module=memo status=warn task_id={}",
            task_id
        );
    }
    index.insert(task_id, std::mem::take(buffer));
}
