use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use futures::future::join_all;
use std::path::PathBuf;

use minimem::config::{ConfigOverrides, load_config};
use minimem::memory::{ActivityPolicy, Role, SessionStore, start_sweep_task, sweep_once};

#[derive(Parser)]
#[command(name = "minimem")]
#[command(about = "minimem - short-term conversational memory store")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a JSON config file (defaults to ~/.minimem/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display version information
    Version,
    /// Print the effective configuration as JSON
    Config(StoreArgs),
    /// Run concurrent writers against an in-memory store and print its stats
    Simulate {
        #[command(flatten)]
        store: StoreArgs,

        /// Number of concurrent writers, one session each
        #[arg(long, default_value_t = 10)]
        sessions: usize,

        /// Messages appended by each writer
        #[arg(long, default_value_t = 100)]
        messages: usize,
    },
}

#[derive(Args, Debug, Default)]
pub struct StoreArgs {
    /// Messages retained per session
    #[arg(long)]
    pub max_history: Option<usize>,

    /// Idle seconds before a session may be swept
    #[arg(long)]
    pub ttl_secs: Option<u64>,

    /// Which operations refresh a session's TTL (read_write or write_only)
    #[arg(long)]
    pub activity_policy: Option<ActivityPolicy>,

    /// Seconds between background sweeps
    #[arg(long)]
    pub sweep_interval_secs: Option<u64>,
}

impl From<&StoreArgs> for ConfigOverrides {
    fn from(args: &StoreArgs) -> Self {
        ConfigOverrides {
            max_history: args.max_history,
            ttl_secs: args.ttl_secs,
            activity_policy: args.activity_policy,
            sweep_interval_secs: args.sweep_interval_secs,
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Version) => {
            print_version();
            Ok(())
        }
        Some(Commands::Config(ref args)) => {
            let config = load_config(&args.into(), cli.config.clone())?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Some(Commands::Simulate {
            ref store,
            sessions,
            messages,
        }) => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("Failed to start async runtime")?;
            runtime.block_on(simulate(store, cli.config.clone(), sessions, messages))
        }
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

async fn simulate(
    args: &StoreArgs,
    config_path: Option<PathBuf>,
    sessions: usize,
    messages: usize,
) -> Result<()> {
    let config = load_config(&args.into(), config_path)?;
    let store = SessionStore::from_config(&config).context("Cannot build session store")?;
    let (sweeper, shutdown_tx) = start_sweep_task(store.clone(), config.sweep_interval())
        .context("Cannot start background sweeper")?;

    tracing::info!(sessions, messages, "Starting simulated workload");

    let writers = (0..sessions).map(|writer| {
        let store = store.clone();
        tokio::spawn(async move {
            let session_id = format!("session-{}", writer);
            for seq in 0..messages {
                let role = if seq % 2 == 0 {
                    Role::User
                } else {
                    Role::Assistant
                };
                store
                    .add_message(&session_id, role, format!("seq:{}", seq))
                    .await;
            }
        })
    });

    for result in join_all(writers).await {
        result.context("Simulated writer panicked")?;
    }

    // A dropped receiver means the sweeper already stopped; the join reports why
    let _ = shutdown_tx.send(()).await;
    sweeper.await.context("Background sweeper panicked")?;

    let report = sweep_once(&store).await;
    tracing::info!(
        sessions_removed = report.sessions_removed,
        sessions_remaining = report.sessions_remaining,
        "Simulation sweep complete"
    );

    let stats = store.stats().await;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn print_version() {
    println!("minimem {}", env!("CARGO_PKG_VERSION"));
}
