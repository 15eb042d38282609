//! Safe HTML rendering of untrusted chat messages.
//!
//! This crate turns raw message text (model output or echoed user input) into
//! an HTML fragment that can be assigned as the content of a display element.
//! It understands a small, fixed markdown subset and escapes everything else.
//!
//! # Architecture
//!
//! Rendering is a pipeline of pure stages, each a function of its input:
//!
//! 1. [`strip_comments`]: drops `<!-- … -->` spans and dangling remnants
//! 2. [`extract_tables`]: lifts pipe tables out of the text as pre-rendered [`Block::Table`]s
//! 3. [`render_lines`]: classifies every remaining line ([`LineKind`]) and wraps it in a tag
//! 4. [`apply_inline`]: bold, italic, inline code, links and autolinks outside table regions
//! 5. [`colorize_emoji`]: wraps a fixed set of emoji in colored spans
//!
//! [`format`] runs the whole pipeline. [`render`] does the same and also
//! reports [`RenderStats`]. Message and transcript wrappers live in
//! [`render_message`] and [`render_transcript`].
//!
//! # Example
//!
//! ```
//! use chatfmt_renderer::format;
//!
//! let html = format("# Hello\n\n**Bold** text");
//! assert_eq!(
//!     html,
//!     r#"<h1 class="msg-header">Hello</h1><div class="msg-spacer"></div><p class="msg-paragraph"><strong>Bold</strong> text</p>"#
//! );
//! ```

mod comments;
mod emoji;
mod escape;
mod inline;
mod line;
mod message;
mod renderer;
mod table;

pub use comments::strip_comments;
pub use emoji::{EMOJI_PALETTE, colorize_emoji};
pub use escape::{escape_html, quote_attr};
pub use inline::{apply_inline, format_inline};
pub use line::{LineKind, classify, render_lines};
pub use message::{ChatMessage, Role, render_message, render_transcript};
pub use renderer::{RenderResult, RenderStats, format, render};
pub use table::{Block, Table, extract_tables};
