//! CLI channel: interactive terminal chat.
//!
//! Reads visitor messages line by line from stdin and forwards them over an
//! mpsc channel. Used by `careerchat chat` interactive mode.

use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Lines that end an interactive session.
pub const EXIT_COMMANDS: &[&str] = &["exit", "quit", "/exit", "/quit", ":q"];

/// Interactive CLI channel for terminal-based chat.
#[derive(Debug, Default)]
pub struct CliChannel;

impl CliChannel {
    pub fn new() -> Self {
        Self
    }

    pub fn name(&self) -> &str {
        "cli"
    }

    /// Start reading stdin. The receiver closes on EOF or an exit command.
    pub fn start(&self) -> mpsc::Receiver<Result<String, io::Error>> {
        Self::read_lines(BufReader::new(io::stdin()))
    }

    /// Forward non-empty trimmed lines from `reader` until EOF or an exit command.
    pub fn read_lines<R>(reader: R) -> mpsc::Receiver<Result<String, io::Error>>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(32);

        tokio::spawn(async move {
            let mut lines = reader.lines();

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let line = line.trim().to_string();
                        if line.is_empty() {
                            continue;
                        }
                        if EXIT_COMMANDS.contains(&line.as_str()) {
                            break;
                        }
                        if tx.send(Ok(line)).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => break, // EOF (Ctrl+D)
                    Err(e) => {
                        let _ = tx.send(Err(e)).await;
                        break;
                    }
                }
            }
        });

        rx
    }
}
