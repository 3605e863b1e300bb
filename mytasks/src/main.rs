//! `MyTasks` -- offline-tolerant task tracker client.
//!
//! Every command refreshes the task list from the service (falling back to
//! the local cache when offline), applies its change, and prints the
//! resulting view. Configuration via CLI flags, environment variables, or
//! config file (`~/.config/mytasks/config.toml`).
//!
//! ```bash
//! # Show everything
//! cargo run --bin mytasks
//!
//! # Add, then show only high-priority tasks sorted by weight
//! cargo run --bin mytasks -- add "Buy milk" --priority High
//! cargo run --bin mytasks -- list --priority High --sort
//!
//! # Point at another service
//! MYTASKS_API_URL=http://10.0.2.2:5000/tasks cargo run --bin mytasks
//! ```

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use mytasks::config::{CliArgs, ClientConfig, Command};
use mytasks::state::AppState;
use mytasks::sync::{
    FileCache, HttpTaskApi, RefreshSource, SyncError, SyncLayer, TaskApi, TaskCache,
};
use mytasks_proto::Task;
use mytasks_proto::api::{DELETED_MESSAGE, NOT_FOUND_MESSAGE};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CliArgs::parse();

    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Logs go to a file so stdout only carries command output.
    let _log_guard = init_logging(&config.log_level, config.log_file.as_deref());
    tracing::info!(
        api_url = %config.api_url,
        cache = %config.cache_path.display(),
        "mytasks starting"
    );

    let api = match HttpTaskApi::new(&config.api_url, config.timeout) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let sync = SyncLayer::new(api, FileCache::new(&config.cache_path));
    let mut state = AppState::new();

    match run(&sync, &mut state, cli.command.unwrap_or_default()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("mytasks.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

async fn run<A: TaskApi, C: TaskCache>(
    sync: &SyncLayer<A, C>,
    state: &mut AppState,
    command: Command,
) -> Result<(), SyncError> {
    match sync.refresh(state).await {
        RefreshSource::Server => {}
        RefreshSource::Cache => eprintln!("Showing cached tasks."),
        RefreshSource::Unchanged => eprintln!("Could not load tasks."),
    }

    match command {
        Command::List { priority, sort } => {
            state.filter = priority;
            state.sort_by_priority = sort;
        }
        Command::Add { title, priority } => {
            let task = sync.add(state, &title, priority).await?;
            println!("Added {}", task.id);
        }
        Command::Toggle { id } => {
            let task = sync.toggle(state, id).await?;
            let status = if task.completed { "complete" } else { "incomplete" };
            println!("Marked {} {status}", task.id);
        }
        Command::Delete { id } => {
            sync.remove(state, id).await?;
            println!("{DELETED_MESSAGE}");
        }
        Command::Edit {
            id,
            title,
            priority,
            completed,
        } => {
            if !state.begin_edit(id) {
                return Err(SyncError::NotFound(NOT_FOUND_MESSAGE.to_string()));
            }
            let Some(mut edited) = state.editing_task().cloned() else {
                return Err(SyncError::NotFound(NOT_FOUND_MESSAGE.to_string()));
            };
            if let Some(title) = title {
                edited.title = title;
            }
            if let Some(priority) = priority {
                edited.priority = priority;
            }
            if let Some(completed) = completed {
                edited.completed = completed;
            }
            let task = sync.edit(state, &edited).await?;
            println!("Updated {}", task.id);
        }
    }

    print_tasks(&state.visible_tasks());
    Ok(())
}

fn print_tasks(tasks: &[&Task]) {
    if tasks.is_empty() {
        println!("No tasks.");
        return;
    }
    for task in tasks {
        let mark = if task.completed { "x" } else { " " };
        println!(
            "[{mark}] {:<6} {}  {}  {}",
            task.priority,
            task.title,
            task.created_at.format("%Y-%m-%d %H:%M"),
            task.id,
        );
    }
}
