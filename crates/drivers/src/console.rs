use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use shelf_application::ConfirmationGate;

/// Reads one line from stdin off the async runtime. `None` at end of input.
pub async fn read_line() -> io::Result<Option<String>> {
    tokio::task::spawn_blocking(|| -> io::Result<Option<String>> {
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        Ok((read > 0).then_some(line))
    })
    .await
    .map_err(io::Error::other)?
}

pub fn prompt(text: &str) {
    print!("{text}");
    let _ = io::stdout().flush();
}

/// Asks on the terminal; anything but an explicit yes declines.
#[derive(Debug, Default)]
pub struct PromptConfirmation;

#[async_trait]
impl ConfirmationGate for PromptConfirmation {
    async fn confirm(&self, question: &str) -> bool {
        prompt(&format!("{question} [y/N] "));
        match read_line().await {
            Ok(Some(answer)) => is_yes(&answer),
            _ => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct AssumeYes;

#[async_trait]
impl ConfirmationGate for AssumeYes {
    async fn confirm(&self, _question: &str) -> bool {
        true
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
