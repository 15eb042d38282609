//! `chatfmt render` command implementation.

use std::io::Write;
use std::path::PathBuf;

use chatfmt_config::{CliSettings, Config, OversizePolicy};
use chatfmt_renderer::{ChatMessage, render, render_message};
use clap::Args;

use crate::error::CliError;
use crate::input::{bound_input, read_input};
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Message file to render (default: read stdin).
    file: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover chatfmt.toml).
    #[arg(short, long, env = "CHATFMT_CONFIG")]
    config: Option<PathBuf>,

    /// Wrap the output in a message container for this role (overrides config).
    #[arg(short, long)]
    role: Option<String>,

    /// Maximum input size in bytes (overrides config).
    #[arg(long)]
    max_input_bytes: Option<usize>,

    /// Oversized input handling: "truncate" or "reject" (overrides config).
    #[arg(long)]
    oversize: Option<OversizePolicy>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the input can't be read, or
    /// the input exceeds the limit under the reject policy.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            max_input_bytes: self.max_input_bytes,
            oversize: self.oversize,
            role: self.role,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if self.verbose
            && let Some(path) = &config.config_path
        {
            output.info(&format!("Using configuration: {}", path.display()));
        }

        let raw = read_input(self.file.as_deref())?;
        let source = self
            .file
            .as_ref()
            .map_or_else(|| "stdin".to_owned(), |path| path.display().to_string());
        let text = bound_input(&raw, &config.input, &source)?;

        let html = render_text(text, config.output.role.as_deref());

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(html.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

/// Render `text`, wrapped in a message container when a role is given.
fn render_text(text: &str, role: Option<&str>) -> String {
    match role {
        Some(role) => render_message(&ChatMessage::new(role, text)),
        None => render(text).html,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_render_text_plain() {
        assert_eq!(
            render_text("**hi**", None),
            r#"<p class="msg-paragraph"><strong>hi</strong></p>"#
        );
    }

    #[test]
    fn test_render_text_with_role() {
        assert_eq!(
            render_text("hi", Some("bot")),
            r#"<div class="msg bot"><p class="msg-paragraph">hi</p></div>"#
        );
    }
}
