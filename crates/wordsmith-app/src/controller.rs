use std::io::Write;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::events::{Flow, Shell};
use crate::io::watch_stdin;

/// Centralized channel management
pub struct ChannelSet {
    pub input: (AsyncSender<String>, AsyncReceiver<String>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            input: kanal::bounded_async(64),
        }
    }
}

/// Runs the shell: stdin reader and event loop as two tasks
pub struct AppController {
    channels: ChannelSet,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new() -> Self {
        Self {
            channels: ChannelSet::new(),
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(&self, shell: Shell, interactive: bool) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        tasks.spawn(watch_stdin(
            self.cancel_token.child_token(),
            self.channels.input.0.clone(),
        ));

        tasks.spawn(event_loop(
            shell,
            self.channels.input.1.clone(),
            self.cancel_token.clone(),
            interactive,
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

/// Handle input lines one at a time until quit, EOF or cancellation
pub async fn event_loop(
    mut shell: Shell,
    line_rx: AsyncReceiver<String>,
    cancel: CancellationToken,
    interactive: bool,
) -> anyhow::Result<()> {
    if interactive {
        print_prompt(&shell)?;
    }

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = line_rx.recv() => match line {
                Ok(line) => line,
                Err(_) => break,
            },
        };

        let mut buf = Vec::new();
        let flow = shell.handle_line(&line, &mut buf).await?;
        std::io::stdout().write_all(&buf)?;

        if flow == Flow::Quit {
            break;
        }
        if interactive {
            print_prompt(&shell)?;
        }
    }

    tracing::debug!("Event loop stopping");
    cancel.cancel();
    Ok(())
}

fn print_prompt(shell: &Shell) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{}", shell.prompt())?;
    stdout.flush()
}
