use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

pub mod controller;
pub mod events;
pub mod io;
pub mod profile;
pub mod state;

use self::controller::AppController;
use self::events::{Command, Flow, Shell};
use self::state::AppState;


#[derive(Debug, Parser)]
#[command(name = "wordsmith", version, about = "Personal vocabulary trainer")]
struct Cli {
    /// JSON config file (defaults to ./wordsmith.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Vocabulary file, overrides the config
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Log as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr));

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.json);

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run(cli));
    // The stdin reader may still be parked in a blocking read
    runtime.shutdown_background();

    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = profile::load_config(cli.config.as_deref())?;
    if let Some(store) = cli.store {
        config.store.path = store;
    }

    let state = Arc::new(AppState::from_config(config)?);
    let mut shell = Shell::new(state);

    if let Some(notice) = shell.load_notice() {
        eprintln!("{notice}");
    }

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => run_shell(shell).await,
        Command::Quiz => {
            let mut buf = Vec::new();
            let flow = shell.run_quiz_only(&mut buf).await?;
            std::io::stdout().write_all(&buf)?;
            if flow == Flow::Quit {
                return Ok(());
            }
            run_shell(shell).await
        }
        command => {
            let mut buf = Vec::new();
            shell.run_command(command, &mut buf).await?;
            std::io::stdout().write_all(&buf)?;
            Ok(())
        }
    }
}

async fn run_shell(shell: Shell) -> anyhow::Result<()> {
    let interactive = atty::is(atty::Stream::Stdin);
    if interactive {
        println!("Type 'help' for commands, 'quit' to leave.");
    }

    let controller = AppController::new();
    let mut tasks = controller.spawn_tasks(shell, interactive);

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                tracing::info!("Shutdown requested");
                controller.shutdown();
            }
            result = tasks.join_next() => {
                match result {
                    Some(Ok(Ok(()))) => controller.shutdown(),
                    Some(Ok(Err(e))) => {
                        controller.shutdown();
                        return Err(e);
                    }
                    Some(Err(e)) => {
                        controller.shutdown();
                        anyhow::bail!("task panicked: {e}");
                    }
                    None => break,
                }
            }
        }
    }

    Ok(())
}
