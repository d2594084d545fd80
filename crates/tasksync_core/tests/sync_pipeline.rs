use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tasksync_core::{
    discover_local_projects, extract_memos, run_sync, run_view, LocalProject, SourceError,
    SourceResult, SyncRequest, Task, TaskSource, ViewRequest, WorkspaceRef,
};

const ME: &str = "me";
const TAG_FIELD: &str = "案件";
const PERSONAL_POOL: &str = "900";

#[derive(Default)]
struct FakeSource {
    tasks: HashMap<String, Vec<Task>>,
    names: HashMap<String, String>,
    my_tasks: Vec<Task>,
}

impl FakeSource {
    fn with_project(mut self, id: &str, name: &str, tasks: Vec<Task>) -> Self {
        self.tasks.insert(id.to_string(), tasks);
        self.names.insert(id.to_string(), name.to_string());
        self
    }
}

impl TaskSource for FakeSource {
    fn project_tasks(&self, project_id: &str) -> SourceResult<Vec<Task>> {
        self.tasks
            .get(project_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(project_id.to_string()))
    }

    fn project_name(&self, project_id: &str) -> SourceResult<String> {
        self.names
            .get(project_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(project_id.to_string()))
    }

    fn my_tasks(&self, _workspace_id: &str) -> SourceResult<Vec<Task>> {
        Ok(self.my_tasks.clone())
    }

    fn default_workspace(&self) -> SourceResult<WorkspaceRef> {
        Ok(WorkspaceRef {
            gid: "ws".to_string(),
            name: "Workspace".to_string(),
        })
    }
}

fn api_task(gid: &str, name: &str, completed: bool, tag: Option<&str>) -> Task {
    let custom_fields: Vec<serde_json::Value> = tag
        .map(|tag| vec![json!({ "name": TAG_FIELD, "text_value": tag })])
        .unwrap_or_default();
    serde_json::from_value(json!({
        "gid": gid,
        "name": name,
        "completed": completed,
        "due_on": null,
        "assignee": { "gid": ME },
        "followers": [],
        "projects": [],
        "custom_fields": custom_fields
    }))
    .unwrap()
}

fn at(hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 19)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn project(root: &Path, name: &str, remote: &[&str]) -> LocalProject {
    LocalProject {
        name: name.to_string(),
        output_path: root.join(name).join("Tasks.md"),
        remote_project_ids: remote.iter().map(|id| id.to_string()).collect(),
    }
}

struct Vault {
    _dir: tempfile::TempDir,
    root: PathBuf,
    personal: PathBuf,
    summary: PathBuf,
}

fn vault() -> Vault {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    Vault {
        personal: root.join("_Personal Tasks.md"),
        summary: root.join("_Task Summary.md"),
        root,
        _dir: dir,
    }
}

fn personal_pool() -> Vec<String> {
    vec![PERSONAL_POOL.to_string()]
}

fn request<'a>(
    vault: &'a Vault,
    pool: &'a [String],
    projects: &'a [LocalProject],
    hour: u32,
) -> SyncRequest<'a> {
    SyncRequest {
        user_gid: ME,
        tag_field: TAG_FIELD,
        personal_projects: pool,
        projects,
        personal_file: &vault.personal,
        summary_file: &vault.summary,
        synced_at: at(hour),
    }
}

#[test]
fn end_to_end_project_document_and_summary_counts() {
    let vault = vault();
    let source = FakeSource::default().with_project(
        PERSONAL_POOL,
        "Personal",
        vec![
            api_task("1", "Design doc", false, Some("ProjectA")),
            api_task("2", "Old task", true, Some("ProjectA")),
        ],
    );
    let projects = vec![project(&vault.root, "ProjectA", &[])];
    let pool = personal_pool();

    let report = run_sync(&source, &request(&vault, &pool, &projects, 9)).unwrap();
    assert_eq!(report.routed_tasks, 2);
    assert_eq!(report.unmatched_tasks, 0);
    assert_eq!(report.documents.len(), 3);

    let project_doc = std::fs::read_to_string(&projects[0].output_path).unwrap();
    assert!(project_doc.contains(
        "- [ ] [Owner] Design doc [[AsanaLink](https://app.asana.com/0/0/1)]\n    - <!-- Memo area for 1 -->\n"
    ));
    assert!(project_doc.contains("- [x] [Owner] Old task [[AsanaLink](https://app.asana.com/0/0/2)]"));
    assert!(!project_doc.contains("Memo area for 2"));

    let summary = std::fs::read_to_string(&vault.summary).unwrap();
    assert!(summary.contains("- [ProjectA](#ProjectA) (In progress: 1, Completed: 1)"));
    assert!(!summary.contains("Old task"));
    assert!(!summary.contains("Memo area"));

    let personal = std::fs::read_to_string(&vault.personal).unwrap();
    assert!(personal.ends_with("(no tasks)\n"));
}

#[test]
fn unknown_tag_goes_only_to_personal_document() {
    let vault = vault();
    let source = FakeSource::default().with_project(
        PERSONAL_POOL,
        "Personal",
        vec![
            api_task("10", "Tagged elsewhere", false, Some("Nonexistent")),
            api_task("11", "No tag", false, None),
            api_task("12", "For A", false, Some("ProjectA")),
        ],
    );
    let projects = vec![project(&vault.root, "ProjectA", &[])];
    let pool = personal_pool();

    run_sync(&source, &request(&vault, &pool, &projects, 9)).unwrap();

    let project_doc = std::fs::read_to_string(&projects[0].output_path).unwrap();
    let personal = std::fs::read_to_string(&vault.personal).unwrap();
    assert!(project_doc.contains("For A"));
    assert!(!project_doc.contains("Tagged elsewhere"));
    assert!(personal.contains("## Nonexistent\n"));
    assert!(personal.contains("## (Untagged)\n"));
    assert!(personal.contains("Tagged elsewhere"));
    assert!(personal.contains("No tag"));
    assert!(!personal.contains("For A"));
}

#[test]
fn memos_survive_a_second_run_and_output_is_stable() {
    let vault = vault();
    let source = FakeSource::default()
        .with_project(
            PERSONAL_POOL,
            "Personal",
            vec![api_task("123", "Tagged", false, Some("ProjectA"))],
        )
        .with_project(
            "500",
            "Remote Board",
            vec![
                api_task("7", "Board item", false, None),
                api_task("8", "Board done", true, None),
            ],
        );
    let projects = vec![project(&vault.root, "ProjectA", &["500"])];
    let pool = personal_pool();

    run_sync(&source, &request(&vault, &pool, &projects, 9)).unwrap();
    let path = &projects[0].output_path;
    let first = std::fs::read_to_string(path).unwrap();
    assert!(first.contains("## Remote Board\n"));
    assert!(first.contains("## Tagged Personal Tasks\n"));

    let edited = first.replace(
        "<!-- Memo area for 123 -->\n\n",
        "<!-- Memo area for 123 -->\nfoo\nbar\n",
    );
    std::fs::write(path, &edited).unwrap();

    let report = run_sync(&source, &request(&vault, &pool, &projects, 9)).unwrap();
    let second = std::fs::read_to_string(path).unwrap();
    assert_eq!(second, edited);
    assert_eq!(extract_memos(Some(&second)).get("123"), Some("foo\nbar\n"));
    assert_eq!(report.documents[0].memos_preserved, 1);

    run_sync(&source, &request(&vault, &pool, &projects, 10)).unwrap();
    let third = std::fs::read_to_string(path).unwrap();
    assert_eq!(
        third.replace("Last Sync: 2026-10-19 10:00:00", "Last Sync: 2026-10-19 09:00:00"),
        second
    );
}

#[test]
fn failing_remote_project_degrades_to_empty_section() {
    let vault = vault();
    let source = FakeSource::default().with_project(PERSONAL_POOL, "Personal", Vec::new());
    let projects = vec![project(&vault.root, "ProjectA", &["404"])];
    let pool = personal_pool();

    let report = run_sync(&source, &request(&vault, &pool, &projects, 9)).unwrap();
    assert_eq!(report.documents.len(), 3);

    let project_doc = std::fs::read_to_string(&projects[0].output_path).unwrap();
    assert!(project_doc.contains("## 404\n\n(no tasks)\n"));
}

#[test]
fn project_with_nothing_linked_is_skipped() {
    let vault = vault();
    let source = FakeSource::default().with_project(PERSONAL_POOL, "Personal", Vec::new());
    let projects = vec![project(&vault.root, "Idle", &[])];
    let pool = personal_pool();

    let report = run_sync(&source, &request(&vault, &pool, &projects, 9)).unwrap();
    assert_eq!(report.skipped_projects, vec!["Idle".to_string()]);
    assert!(!projects[0].output_path.exists());
}

#[test]
fn task_in_two_sections_is_rendered_once_per_document() {
    let vault = vault();
    let shared = api_task("55", "Shared", false, Some("ProjectA"));
    let source = FakeSource::default()
        .with_project(PERSONAL_POOL, "Personal", vec![shared.clone()])
        .with_project("500", "Board", vec![shared]);
    let projects = vec![project(&vault.root, "ProjectA", &["500"])];
    let pool = personal_pool();

    run_sync(&source, &request(&vault, &pool, &projects, 9)).unwrap();
    let project_doc = std::fs::read_to_string(&projects[0].output_path).unwrap();
    assert_eq!(project_doc.matches("Memo area for 55").count(), 1);
}

#[test]
fn discovered_projects_feed_the_run() {
    let vault = vault();
    std::fs::create_dir_all(vault.root.join("ProjectA")).unwrap();
    std::fs::write(
        vault.root.join("ProjectA").join("tasksync.toml"),
        "remote_projects = [\"500\"]\n",
    )
    .unwrap();
    let projects = discover_local_projects(&vault.root).unwrap();

    let source = FakeSource::default()
        .with_project(PERSONAL_POOL, "Personal", Vec::new())
        .with_project("500", "Board", vec![api_task("1", "Item", false, None)]);
    let pool = personal_pool();

    run_sync(&source, &request(&vault, &pool, &projects, 9)).unwrap();
    let text = std::fs::read_to_string(vault.root.join("ProjectA").join("Tasks.md")).unwrap();
    assert!(text.starts_with("# ProjectA\n"));
    assert!(text.contains("## Board\n"));
}

#[test]
fn view_groups_my_tasks_by_tag() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("nested").join("view.md");
    let source = FakeSource {
        my_tasks: vec![
            api_task("1", "Alpha work", false, Some("Alpha")),
            api_task("2", "Loose end", false, None),
            api_task("3", "Alpha done", true, Some("Alpha")),
        ],
        ..FakeSource::default()
    };

    let written = run_view(
        &source,
        &ViewRequest {
            workspace_gid: None,
            tag_field: TAG_FIELD,
            output: &output,
            synced_at: at(9),
        },
    )
    .unwrap();

    assert_eq!(written.tasks, 3);
    let text = std::fs::read_to_string(&output).unwrap();
    assert!(text.contains("- [Alpha](#Alpha) (In progress: 1, Completed: 1)"));
    assert!(text.contains("- [(Unclassified)](#Unclassified) (In progress: 1, Completed: 0)"));
    assert!(text.contains("- [ ] Alpha work [[AsanaLink]"));
    assert!(!text.contains("[Owner]"));
    let alpha = text.find("## Alpha\n").unwrap();
    let loose = text.find("## (Unclassified)\n").unwrap();
    assert!(alpha < loose);
}

#[test]
fn project_named_like_catch_all_document_is_skipped() {
    let vault = vault();
    let source = FakeSource::default().with_project(
        PERSONAL_POOL,
        "Personal",
        vec![api_task("1", "Tagged with reserved name", false, Some("Personal Tasks"))],
    );
    let projects = vec![
        project(&vault.root, "Personal Tasks", &["500"]),
        project(&vault.root, "ProjectA", &[]),
    ];
    let pool = personal_pool();

    let report = run_sync(&source, &request(&vault, &pool, &projects, 9)).unwrap();
    assert_eq!(
        report.skipped_projects,
        vec!["Personal Tasks".to_string(), "ProjectA".to_string()]
    );
    assert_eq!(report.unmatched_tasks, 1);
    assert!(!projects[0].output_path.exists());

    let summary = std::fs::read_to_string(&vault.summary).unwrap();
    assert_eq!(summary.matches("## Personal Tasks\n").count(), 1);
    assert_eq!(summary.matches("(#Personal-Tasks)").count(), 1);

    let personal = std::fs::read_to_string(&vault.personal).unwrap();
    assert!(personal.contains("## Personal Tasks\n"));
    assert!(personal.contains("Tagged with reserved name"));
}
