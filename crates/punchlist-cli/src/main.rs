//! # punchlist-cli
//!
//! Punchlist binary: runs the task server and drives it from the
//! command line.

#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use punchlist_client::{ChecklistCoordinator, TasksApi, ToggleOutcome};
use punchlist_core::{ChecklistItem, Task, TaskCreate, TaskPriority, TaskStatus};
use punchlist_server::config::ServerConfig;
use punchlist_server::server::TaskServer;
use punchlist_store::ConnectionConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Punchlist task server and client.
#[derive(Parser, Debug)]
#[command(name = "punchlist", about = "Punchlist task server and client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the task API server.
    Serve {
        /// Host to bind.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind (0 for auto-assign).
        #[arg(long, default_value = "5000")]
        port: u16,

        /// Path to the `SQLite` database.
        #[arg(long)]
        db_path: Option<PathBuf>,
    },
    /// Create a task.
    Add {
        /// Server base URL.
        #[arg(long)]
        server: String,

        /// Task title.
        title: String,

        /// Checklist item (repeatable).
        #[arg(long)]
        todo: Vec<String>,

        /// Priority: low, medium, or high.
        #[arg(long)]
        priority: Option<String>,

        /// Due date, ISO 8601.
        #[arg(long)]
        due: Option<String>,
    },
    /// List tasks.
    List {
        /// Server base URL.
        #[arg(long)]
        server: String,

        /// Filter: pending, in_progress, or completed.
        #[arg(long)]
        status: Option<String>,
    },
    /// Show one task with its checklist.
    Show {
        /// Server base URL.
        #[arg(long)]
        server: String,

        /// Task id.
        id: String,
    },
    /// Toggle a checklist item and sync the task status.
    Toggle {
        /// Server base URL.
        #[arg(long)]
        server: String,

        /// Task id.
        id: String,

        /// Zero-based checklist index.
        index: usize,
    },
}

impl Cli {
    fn default_db_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
        PathBuf::from(home).join(".punchlist").join("punchlist.db")
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=warn"));

    // Logs go to stderr so command output on stdout stays parseable.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn parse_priority(raw: &str) -> Result<TaskPriority> {
    TaskPriority::from_sql(raw)
        .ok_or_else(|| anyhow::anyhow!("unknown priority: {raw} (use low, medium, or high)"))
}

fn parse_status(raw: &str) -> Result<TaskStatus> {
    TaskStatus::from_sql(raw).ok_or_else(|| {
        anyhow::anyhow!("unknown status: {raw} (use pending, in_progress, or completed)")
    })
}

fn checklist_progress(task: &Task) -> (usize, usize) {
    let done = task
        .todo_checklist
        .iter()
        .filter(|item| item.completed)
        .count();
    (done, task.todo_checklist.len())
}

fn print_task_line(task: &Task) {
    let (done, total) = checklist_progress(task);
    println!("{}  [{}]  {}  ({done}/{total} done)", task.id, task.status, task.title);
}

fn print_task(task: &Task) {
    print_task_line(task);
    if let Some(description) = &task.description {
        println!("  {description}");
    }
    if let Some(due) = &task.due_date {
        println!("  due {due}");
    }
    for (index, item) in task.todo_checklist.iter().enumerate() {
        let mark = if item.completed { "x" } else { " " };
        println!("  {index}. [{mark}] {}", item.text);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing();

    match args.command {
        Commands::Serve {
            host,
            port,
            db_path,
        } => serve(host, port, db_path).await,
        Commands::Add {
            server,
            title,
            todo,
            priority,
            due,
        } => add(&server, title, todo, priority.as_deref(), due).await,
        Commands::List { server, status } => list(&server, status.as_deref()).await,
        Commands::Show { server, id } => show(&server, &id).await,
        Commands::Toggle { server, id, index } => toggle(&server, &id, index).await,
    }
}

async fn serve(host: String, port: u16, db_path: Option<PathBuf>) -> Result<()> {
    let db_path = db_path.unwrap_or_else(Cli::default_db_path);
    ensure_parent_dir(&db_path)?;
    let pool = punchlist_store::new_file(&db_path, &ConnectionConfig::default())
        .context("Failed to open database")?;
    {
        let conn = pool.get().context("Failed to get DB connection")?;
        let _ = punchlist_store::run_migrations(&conn).context("Failed to run migrations")?;
    }

    let config = ServerConfig {
        host,
        port,
        ..ServerConfig::default()
    };
    let server = TaskServer::new(config, pool);
    let (addr, handle) = server.listen().await.context("Failed to bind server")?;

    tracing::info!(db = %db_path.display(), "Punchlist listening on http://{addr}");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;

    tracing::info!("Shutting down...");
    server.shutdown().shutdown();
    let _ = handle.await;
    Ok(())
}

async fn add(
    server: &str,
    title: String,
    todo: Vec<String>,
    priority: Option<&str>,
    due: Option<String>,
) -> Result<()> {
    let priority = match priority {
        Some(raw) => parse_priority(raw)?,
        None => TaskPriority::default(),
    };
    let params = TaskCreate {
        title,
        priority,
        due_date: due,
        todo_checklist: todo.into_iter().map(ChecklistItem::new).collect(),
        ..TaskCreate::default()
    };

    let api = TasksApi::new(server);
    let task = api.create_task(&params).await?;
    print_task(&task);
    Ok(())
}

async fn list(server: &str, status: Option<&str>) -> Result<()> {
    let status = match status {
        Some(raw) => Some(parse_status(raw)?),
        None => None,
    };

    let api = TasksApi::new(server);
    let listed = api.list_tasks(status).await?;
    for task in &listed.tasks {
        print_task_line(task);
    }
    println!("{} of {} task(s)", listed.tasks.len(), listed.total);
    Ok(())
}

async fn show(server: &str, id: &str) -> Result<()> {
    let api = TasksApi::new(server);
    let task = api.get_task(id).await?;
    print_task(&task);
    Ok(())
}

async fn toggle(server: &str, id: &str, index: usize) -> Result<()> {
    let api = TasksApi::new(server);
    let coordinator = ChecklistCoordinator::new(api);
    let _ = coordinator.load(id).await?;

    match coordinator.toggle_item(index).await {
        ToggleOutcome::Skipped => anyhow::bail!("no checklist item at index {index}"),
        ToggleOutcome::Reverted { error } => {
            anyhow::bail!("checklist update failed, nothing changed: {error}")
        }
        ToggleOutcome::StatusLagged { error } => {
            // The checklist write landed, so report success with a caveat.
            eprintln!("warning: status update failed, will align on the next toggle: {error}");
        }
        ToggleOutcome::Committed | ToggleOutcome::Synced => {}
    }

    if let Some(task) = coordinator.snapshot() {
        print_task(&task);
    }
    Ok(())
}
