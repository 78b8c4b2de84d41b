use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use invoker_core::app::{ArtefactRelocator, DispatcherBuilder};
use invoker_core::config::InvokerConfig;
use invoker_core::domain::{InvokerError, OperationKind, TaskPayload};
use invoker_core::impls::FsObjectStore;
use invoker_core::ports::TaskHandler;

#[derive(Parser)]
#[command(name = "invoker")]
#[command(about = "Dispatch pipeline tasks and relocate build packages", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML / YAML / JSON)
    #[arg(short, long, env = "INVOKER_CONFIG")]
    config: Option<PathBuf>,

    /// Root directory of the filesystem object stores
    /// (`<root>/service` for service-mode packages, `<root>/local` for the local stand-in)
    #[arg(long, env = "INVOKER_STORE_ROOT", default_value = ".invoker/store")]
    store_root: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch one task to its compiler / runner
    Dispatch {
        /// component-compile | deployspec-compile | run
        #[arg(value_parser = parse_operation)]
        operation: OperationKind,

        /// Task payload (JSON)
        #[arg(short, long)]
        task: PathBuf,
    },

    /// Copy the task's package into the artefact store
    Relocate {
        /// Task payload (JSON)
        #[arg(short, long)]
        task: PathBuf,
    },
}

fn parse_operation(s: &str) -> Result<OperationKind, String> {
    s.parse()
}

/// local mode 用: 受け取った task をそのまま受理したと返す
struct Acknowledge {
    operation: OperationKind,
}

#[async_trait]
impl TaskHandler for Acknowledge {
    async fn handle(&self, task: TaskPayload) -> Result<Value, InvokerError> {
        tracing::info!(operation = %self.operation, task = %task.task, "handled locally");
        Ok(json!({
            "Operation": self.operation.as_str(),
            "Task": task.task,
            "Status": "accepted",
        }))
    }
}

/// service / local どちらの package もプロセスをまたいで残るよう filesystem に置く
fn relocator(config: &InvokerConfig, store_root: &Path) -> Result<ArtefactRelocator, InvokerError> {
    let relocator = ArtefactRelocator::new(config, Arc::new(FsObjectStore::new(store_root.join("service"))))?;
    Ok(relocator.with_local_store(Arc::new(FsObjectStore::new(store_root.join("local")))))
}

fn read_task(path: &Path) -> anyhow::Result<TaskPayload> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read task file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid task payload in {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config = InvokerConfig::load(cli.config.as_deref())?;
    tracing::debug!(mode = ?config.mode, "configuration loaded");

    let output = match cli.command {
        Commands::Dispatch { operation, task } => {
            let task = read_task(&task)?;
            let mut builder = DispatcherBuilder::new(&config);
            if config.is_local_mode() {
                for op in OperationKind::ALL {
                    builder = builder.register(op, Acknowledge { operation: op })?;
                }
            }
            let dispatcher = builder.build()?;
            dispatcher.dispatch(operation, &task).await?
        }
        Commands::Relocate { task } => {
            let task = read_task(&task)?;
            let relocator = relocator(&config, &cli.store_root)?;
            let result = relocator.relocate(&task).await?;
            serde_json::to_value(result)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
