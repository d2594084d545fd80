use chrono::NaiveDate;
use tasksync_core::{
    extract_memos, load_memos, regenerate, Document, DocumentKind, Role, Section, Task,
};

#[test]
fn memo_region_runs_until_next_checklist_item() {
    let text = "\
- [ ] First [[AsanaLink](https://app.asana.com/0/0/123)]
    - <!-- Memo area for 123 -->
foo
bar
- [ ] Second [[AsanaLink](https://app.asana.com/0/0/456)]
    - <!-- Memo area for 456 -->

";
    let memos = extract_memos(Some(text));
    assert_eq!(memos.get("123"), Some("foo\nbar\n"));
    assert_eq!(memos.get("456"), Some("\n"));
    assert_eq!(memos.len(), 2);
}

#[test]
fn checked_and_indented_items_also_close_the_region() {
    let text = "    - <!-- Memo area for 1 -->\nnote\n  - [x] done\nafter\n";
    let memos = extract_memos(Some(text));
    assert_eq!(memos.get("1"), Some("note\n"));
}

#[test]
fn marker_directly_followed_by_item_yields_empty_memo() {
    let text = "    - <!-- Memo area for 9 -->\n- [ ] next\n";
    let memos = extract_memos(Some(text));
    assert_eq!(memos.get("9"), Some(""));
    assert_eq!(memos.preserved("9"), None);
}

#[test]
fn whitespace_only_memo_is_kept_verbatim() {
    let text = "    - <!-- Memo area for 5 -->\n   \n\n- [ ] next\n";
    let memos = extract_memos(Some(text));
    assert_eq!(memos.get("5"), Some("   \n\n"));
    assert_eq!(memos.preserved("5"), Some("   \n\n"));
}

#[test]
fn new_marker_closes_the_open_memo() {
    let text = "    - <!-- Memo area for 1 -->\none\n    - <!-- Memo area for 2 -->\ntwo\n";
    let memos = extract_memos(Some(text));
    assert_eq!(memos.get("1"), Some("one\n"));
    assert_eq!(memos.get("2"), Some("two\n"));
}

#[test]
fn duplicate_marker_last_one_wins() {
    let text = "\
    - <!-- Memo area for 7 -->
stale
- [ ] other
    - <!-- Memo area for 7 -->
fresh
";
    let memos = extract_memos(Some(text));
    assert_eq!(memos.get("7"), Some("fresh\n"));
    assert_eq!(memos.len(), 1);
}

#[test]
fn memo_at_end_of_input_without_newline_is_stored() {
    let memos = extract_memos(Some("    - <!-- Memo area for 3 -->\nlast line"));
    assert_eq!(memos.get("3"), Some("last line"));
}

#[test]
fn lines_outside_memo_regions_are_ignored() {
    let text = "# Title\nLast Sync: 2026-01-01 00:00:00\n\n## Section\n\n- [x] done\n";
    assert!(extract_memos(Some(text)).is_empty());
}

#[test]
fn load_memos_missing_file_is_empty_not_error() {
    let dir = tempfile::tempdir().unwrap();
    let memos = load_memos(&dir.path().join("absent.md")).unwrap();
    assert!(memos.is_empty());
}

#[test]
fn load_memos_reads_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Tasks.md");
    std::fs::write(&path, "    - <!-- Memo area for 11 -->\nkeep me\n").unwrap();
    let memos = load_memos(&path).unwrap();
    assert_eq!(memos.get("11"), Some("keep me\n"));
}

#[test]
fn memo_starting_with_heading_survives_regeneration() {
    let synced_at = NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap();
    let doc = Document::new("ProjectA", DocumentKind::Project, synced_at)
        .with_section(Section::new("Board", vec![Task::new("123", "Design doc")]))
        .with_section(Section::new("Tagged Personal Tasks", vec![Task::new("456", "Other")]));
    let unranked = |_: &Task| Role::Unrelated;

    let generated = regenerate(None, &doc, &unranked);
    let edited = generated.replace(
        "<!-- Memo area for 123 -->\n\n",
        "<!-- Memo area for 123 -->\n# Notes\nfoo\n### Detail\nbar\n",
    );
    assert_ne!(edited, generated);

    let next = regenerate(Some(&edited), &doc, &unranked);
    assert_eq!(next, edited);
    assert_eq!(
        extract_memos(Some(&next)).get("123"),
        Some("# Notes\nfoo\n### Detail\nbar\n")
    );
}
