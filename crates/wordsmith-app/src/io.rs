use kanal::AsyncSender;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

/// Forward stdin lines to the event loop until EOF or cancellation
pub async fn watch_stdin(cancel: CancellationToken, line_tx: AsyncSender<String>) -> anyhow::Result<()> {
    forward_lines(BufReader::new(tokio::io::stdin()), cancel, line_tx).await
}

pub async fn forward_lines<R>(
    reader: R,
    cancel: CancellationToken,
    line_tx: AsyncSender<String>,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Input reader stopping");
                break;
            }
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if let Err(e) = line_tx.send(line).await {
                            tracing::debug!("Event loop gone, dropping input: {}", e);
                            break;
                        }
                    }
                    None => {
                        tracing::debug!("End of input");
                        break;
                    }
                }
            }
        }
    }

    // Dropping the sender lets the event loop see the end of input
    Ok(())
}
