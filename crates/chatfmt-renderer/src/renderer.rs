//! Rendering pipeline entry points.

use crate::comments::strip_comments;
use crate::emoji::colorize_emoji;
use crate::inline::apply_inline;
use crate::line::render_lines;
use crate::table::{Block, extract_tables};

/// Counters collected while rendering one message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Size of the raw input in bytes.
    pub input_bytes: usize,
    /// Number of line fragments emitted (a table counts as one).
    pub lines: usize,
    /// Number of tables extracted.
    pub tables: usize,
    /// Size of the rendered HTML in bytes.
    pub output_bytes: usize,
}

/// Result of rendering a message.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML fragment.
    pub html: String,
    /// Counters for this render.
    pub stats: RenderStats,
}

/// Render raw message text to a safe HTML fragment.
///
/// Pure and infallible: any input, including empty or malformed text,
/// produces escaped HTML. Calls share no state and may run concurrently.
///
/// # Examples
///
/// ```
/// use chatfmt_renderer::format;
///
/// assert_eq!(
///     format("<b>hi</b>"),
///     r#"<p class="msg-paragraph">&lt;b&gt;hi&lt;/b&gt;</p>"#
/// );
/// ```
pub fn format(raw: &str) -> String {
    run(raw).html
}

/// Render raw message text and report what was rendered.
///
/// Same output as [`format`]; also emits a `debug` trace event with the
/// collected [`RenderStats`].
pub fn render(raw: &str) -> RenderResult {
    let result = run(raw);
    tracing::debug!(
        input_bytes = result.stats.input_bytes,
        lines = result.stats.lines,
        tables = result.stats.tables,
        output_bytes = result.stats.output_bytes,
        "Rendered message"
    );
    result
}

fn run(raw: &str) -> RenderResult {
    let stripped = strip_comments(raw);
    let blocks = extract_tables(&stripped);
    let html = render_lines(&blocks);
    let html = apply_inline(&html);
    let html = colorize_emoji(&html);

    let mut stats = RenderStats {
        input_bytes: raw.len(),
        output_bytes: html.len(),
        ..RenderStats::default()
    };
    for block in &blocks {
        match block {
            Block::Text(text) => stats.lines += text.split('\n').count(),
            Block::Table(_) => {
                stats.lines += 1;
                stats.tables += 1;
            }
        }
    }

    RenderResult { html, stats }
}
