//! `chatfmt replay` command implementation.
//!
//! Stored history keeps raw message text only. Replaying renders every entry
//! again, so output always reflects the current renderer.

use std::io::Write;
use std::path::{Path, PathBuf};

use chatfmt_config::{Config, InputConfig};
use chatfmt_renderer::{ChatMessage, render_transcript};
use clap::Args;

use crate::error::CliError;
use crate::input::bound_input;
use crate::output::Output;

/// Arguments for the replay command.
#[derive(Args)]
pub(crate) struct ReplayArgs {
    /// JSON file with stored history: `[{"type": "user", "content": "..."}]`.
    file: PathBuf,

    /// Path to configuration file (default: auto-discover chatfmt.toml).
    #[arg(short, long, env = "CHATFMT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ReplayArgs {
    /// Execute the replay command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the history file can't be
    /// read or parsed, or a message exceeds the limit under the reject policy.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref(), None)?;

        let messages = load_history(&self.file, &config.input)?;
        if self.verbose {
            output.info(&format!(
                "Replaying {} messages from {}",
                messages.len(),
                self.file.display()
            ));
        }

        let html = render_transcript(&messages);

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(html.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

/// Read stored history and apply the input limit to each message.
fn load_history(path: &Path, limits: &InputConfig) -> Result<Vec<ChatMessage>, CliError> {
    let content = std::fs::read_to_string(path)?;
    let mut messages: Vec<ChatMessage> = serde_json::from_str(&content)?;

    for (idx, message) in messages.iter_mut().enumerate() {
        let source = format!("{} entry {idx}", path.display());
        let kept = bound_input(&message.content, limits, &source)?.len();
        message.content.truncate(kept);
    }

    tracing::info!(messages = messages.len(), "Loaded history");
    Ok(messages)
}
