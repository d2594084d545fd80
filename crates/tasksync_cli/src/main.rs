//! `tasksync` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration and logging before any remote call.
//! - Dispatch to core run services and print a short outcome per document.

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use tasksync_core::{
    default_log_dir, default_log_level, discover_local_projects, init_logging, load_memos,
    run_sync, run_view, AsanaClient, Settings, SyncRequest, ViewRequest, WrittenDocument,
};

#[derive(Parser)]
#[command(name = "tasksync")]
#[command(about = "Sync Asana tasks into Markdown vault documents, keeping your memos")]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/tasksync/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate project, personal, and summary documents
    Sync,
    /// Regenerate the single-file view of tasks assigned to you
    View,
    /// Print the memos recovered from a generated document as JSON
    Memos {
        /// Document to read
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Memos { file } = &cli.command {
        return print_memos(file);
    }

    let file = tasksync_core::config::load_config_file(cli.config.as_deref())?;
    let settings = Settings::from_process_env(file)?;

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    let log_dir = cli
        .log_dir
        .clone()
        .or_else(default_log_dir)
        .context("could not determine a log directory; pass --log-dir")?;
    init_logging(&level, &log_dir).map_err(anyhow::Error::msg)?;

    let client = AsanaClient::new(settings.asana_token.clone())
        .context("failed to build HTTP client")?
        .with_completed_since(Some(settings.completed_since(Local::now())));

    match cli.command {
        Commands::Sync => sync(&settings, &client),
        Commands::View => view(&settings, &client),
        Commands::Memos { .. } => Ok(()),
    }
}

fn sync(settings: &Settings, client: &AsanaClient) -> Result<()> {
    let user_gid = settings.require_user_gid()?;
    let root = settings.require_projects_root()?;
    let personal_file = settings.personal_file_path()?;
    let summary_file = settings.summary_file_path()?;

    let projects = discover_local_projects(root)
        .with_context(|| format!("failed to scan projects under `{}`", root.display()))?;
    info!(
        "event=cli_sync module=cli status=ok projects={} root={}",
        projects.len(),
        root.display()
    );

    let request = SyncRequest {
        user_gid,
        tag_field: &settings.tag_field,
        personal_projects: &settings.personal_projects,
        projects: &projects,
        personal_file: &personal_file,
        summary_file: &summary_file,
        synced_at: Local::now().naive_local(),
    };
    let report = run_sync(client, &request).context("sync aborted")?;

    for document in &report.documents {
        print_written(document);
    }
    for name in &report.skipped_projects {
        println!("skipped {name}: no linked or tagged tasks");
    }
    println!(
        "routed {} tagged task(s), {} unmatched",
        report.routed_tasks, report.unmatched_tasks
    );
    Ok(())
}

fn view(settings: &Settings, client: &AsanaClient) -> Result<()> {
    let request = ViewRequest {
        workspace_gid: settings.workspace_gid.as_deref(),
        tag_field: &settings.tag_field,
        output: &settings.view_file,
        synced_at: Local::now().naive_local(),
    };
    let written = run_view(client, &request).context("view aborted")?;
    print_written(&written);
    Ok(())
}

fn print_memos(file: &std::path::Path) -> Result<()> {
    let memos =
        load_memos(file).with_context(|| format!("failed to read `{}`", file.display()))?;
    println!("{}", serde_json::to_string_pretty(&memos)?);
    Ok(())
}

fn print_written(document: &WrittenDocument) {
    println!(
        "wrote {} ({} task(s), {} memo(s) kept, {} dropped)",
        document.path.display(),
        document.tasks,
        document.memos_preserved,
        document.memos_dropped
    );
}
