//! Line classification and block-level rendering.

use crate::escape::escape_html;
use crate::table::Block;

/// Heading markers, longest first so `##` is never measured as `#`.
const HEADING_PREFIXES: [(u8, &str); 4] = [(4, "#### "), (3, "### "), (2, "## "), (1, "# ")];

/// Structural kind of a single line.
///
/// Payloads borrow the raw (unescaped) line text after the marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Pre-rendered table fragment, emitted verbatim.
    Table(&'a str),
    /// Three or more `-` and nothing else.
    Rule,
    /// Empty or whitespace-only line.
    Spacer,
    /// `#` to `####` followed by a space.
    Heading { level: u8, text: &'a str },
    /// `> ` prefix.
    Blockquote(&'a str),
    /// `-`, `*` or `•` followed by whitespace.
    BulletItem(&'a str),
    /// Digits, `.` and whitespace.
    NumberedItem(&'a str),
    /// Anything else.
    Paragraph(&'a str),
}

/// Classify a line of message text.
///
/// Checks run in a fixed order and the first match wins: rule, spacer,
/// headings (level 4 down to 1), blockquote, bullet item, numbered item,
/// paragraph. [`LineKind::Table`] is never produced here; table fragments come
/// from [`Block::Table`] and cannot be forged by typing markup.
///
/// # Examples
///
/// ```
/// use chatfmt_renderer::{LineKind, classify};
///
/// assert_eq!(classify("---"), LineKind::Rule);
/// assert_eq!(classify("## Plan"), LineKind::Heading { level: 2, text: "Plan" });
/// assert_eq!(classify("  * item"), LineKind::BulletItem("item"));
/// assert_eq!(classify("#hashtag"), LineKind::Paragraph("#hashtag"));
/// ```
pub fn classify(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();

    if is_rule(trimmed) {
        LineKind::Rule
    } else if trimmed.is_empty() {
        LineKind::Spacer
    } else if let Some((level, text)) = heading(line) {
        LineKind::Heading { level, text }
    } else if let Some(text) = line.strip_prefix("> ") {
        LineKind::Blockquote(text)
    } else if let Some(text) = bullet_item(line) {
        LineKind::BulletItem(text)
    } else if let Some(text) = numbered_item(line) {
        LineKind::NumberedItem(text)
    } else {
        LineKind::Paragraph(line)
    }
}

fn is_rule(trimmed: &str) -> bool {
    trimmed.len() >= 3 && trimmed.bytes().all(|b| b == b'-')
}

fn heading(line: &str) -> Option<(u8, &str)> {
    HEADING_PREFIXES
        .iter()
        .find_map(|&(level, prefix)| line.strip_prefix(prefix).map(|text| (level, text)))
}

fn bullet_item(line: &str) -> Option<&str> {
    let rest = line.trim_start();
    let rest = rest
        .strip_prefix('-')
        .or_else(|| rest.strip_prefix('*'))
        .or_else(|| rest.strip_prefix('•'))?;
    after_marker_space(rest)
}

fn numbered_item(line: &str) -> Option<&str> {
    let rest = line.trim_start();
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    after_marker_space(rest[digits..].strip_prefix('.')?)
}

/// Require at least one whitespace character after a list marker.
fn after_marker_space(rest: &str) -> Option<&str> {
    rest.starts_with(char::is_whitespace)
        .then(|| rest.trim_start())
}

impl LineKind<'_> {
    /// Append the HTML for this line to `out`.
    ///
    /// Payload text is escaped before it is wrapped; table fragments are not.
    pub fn render(&self, out: &mut String) {
        match *self {
            LineKind::Table(html) => out.push_str(html),
            LineKind::Rule => out.push_str(r#"<hr class="msg-divider" />"#),
            LineKind::Spacer => out.push_str(r#"<div class="msg-spacer"></div>"#),
            LineKind::Heading { level, text } => {
                let tag = match level {
                    1 => "h1",
                    2 => "h2",
                    3 => "h3",
                    _ => "h4",
                };
                wrap(out, tag, r#" class="msg-header""#, text);
            }
            LineKind::Blockquote(text) => wrap(out, "div", r#" class="msg-quote""#, text),
            LineKind::BulletItem(text) => wrap(out, "li", r#" class="msg-list-item""#, text),
            LineKind::NumberedItem(text) => {
                wrap(out, "li", r#" class="msg-list-item numbered""#, text);
            }
            LineKind::Paragraph(text) => wrap(out, "p", r#" class="msg-paragraph""#, text),
        }
    }
}

fn wrap(out: &mut String, tag: &str, attrs: &str, text: &str) {
    out.push('<');
    out.push_str(tag);
    out.push_str(attrs);
    out.push('>');
    out.push_str(&escape_html(text));
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// Render every line of every block, in order, into one HTML string.
///
/// Text blocks are split on `\n` (a trailing `\r` is dropped) and each line
/// becomes one fragment. Table blocks become a single [`LineKind::Table`]
/// fragment. List items are emitted as bare `<li>` elements, without an
/// enclosing list.
pub fn render_lines(blocks: &[Block<'_>]) -> String {
    let capacity = blocks
        .iter()
        .map(|block| match block {
            Block::Text(text) => text.len() * 2,
            Block::Table(html) => html.len(),
        })
        .sum();
    let mut out = String::with_capacity(capacity);

    for block in blocks {
        match block {
            Block::Text(text) => {
                for line in text.split('\n') {
                    let line = line.strip_suffix('\r').unwrap_or(line);
                    classify(line).render(&mut out);
                }
            }
            Block::Table(html) => LineKind::Table(html).render(&mut out),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn render_one(line: &str) -> String {
        let mut out = String::new();
        classify(line).render(&mut out);
        out
    }

    #[test]
    fn test_rule() {
        assert_eq!(classify("---"), LineKind::Rule);
        assert_eq!(classify("  ------  "), LineKind::Rule);
        assert_eq!(render_one("---"), r#"<hr class="msg-divider" />"#);
    }

    #[test]
    fn test_two_dashes_is_not_rule() {
        assert_eq!(classify("--"), LineKind::Paragraph("--"));
    }

    #[test]
    fn test_spacer() {
        assert_eq!(classify(""), LineKind::Spacer);
        assert_eq!(classify(" \t "), LineKind::Spacer);
        assert_eq!(render_one(""), r#"<div class="msg-spacer"></div>"#);
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(classify("# A"), LineKind::Heading { level: 1, text: "A" });
        assert_eq!(classify("## A"), LineKind::Heading { level: 2, text: "A" });
        assert_eq!(classify("### A"), LineKind::Heading { level: 3, text: "A" });
        assert_eq!(classify("#### A"), LineKind::Heading { level: 4, text: "A" });
        assert_eq!(render_one("### Title"), r#"<h3 class="msg-header">Title</h3>"#);
    }

    #[test]
    fn test_five_hashes_is_paragraph() {
        // "#####" has no "#### " prefix, so it stays a paragraph
        assert_eq!(classify("##### A"), LineKind::Paragraph("##### A"));
    }

    #[test]
    fn test_heading_requires_space() {
        assert_eq!(classify("#tag"), LineKind::Paragraph("#tag"));
    }

    #[test]
    fn test_indented_heading_is_paragraph() {
        assert_eq!(classify(" # A"), LineKind::Paragraph(" # A"));
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(classify("> quoted"), LineKind::Blockquote("quoted"));
        assert_eq!(render_one("> a<b"), r#"<div class="msg-quote">a&lt;b</div>"#);
    }

    #[test]
    fn test_bare_gt_is_paragraph() {
        assert_eq!(render_one(">nope"), r#"<p class="msg-paragraph">&gt;nope</p>"#);
    }

    #[test]
    fn test_bullet_markers() {
        assert_eq!(classify("- a"), LineKind::BulletItem("a"));
        assert_eq!(classify("* a"), LineKind::BulletItem("a"));
        assert_eq!(classify("• a"), LineKind::BulletItem("a"));
        assert_eq!(classify("   -   a"), LineKind::BulletItem("a"));
        assert_eq!(render_one("- a"), r#"<li class="msg-list-item">a</li>"#);
    }

    #[test]
    fn test_bold_line_is_not_bullet() {
        assert_eq!(classify("**bold** start"), LineKind::Paragraph("**bold** start"));
    }

    #[test]
    fn test_numbered_item() {
        assert_eq!(classify("1. first"), LineKind::NumberedItem("first"));
        assert_eq!(classify("  42.\tanswer"), LineKind::NumberedItem("answer"));
        assert_eq!(
            render_one("2. b"),
            r#"<li class="msg-list-item numbered">b</li>"#
        );
    }

    #[test]
    fn test_numbered_requires_space_after_dot() {
        assert_eq!(classify("3.14 is pi"), LineKind::Paragraph("3.14 is pi"));
        assert_eq!(classify(". x"), LineKind::Paragraph(". x"));
    }

    #[test]
    fn test_paragraph_is_escaped() {
        assert_eq!(
            render_one("<script>alert(1)</script> & co"),
            r#"<p class="msg-paragraph">&lt;script&gt;alert(1)&lt;/script&gt; &amp; co</p>"#
        );
    }

    #[test]
    fn test_typed_table_markup_is_escaped() {
        assert_eq!(
            render_one("<table><tr><td>x</td></tr></table>"),
            r#"<p class="msg-paragraph">&lt;table&gt;&lt;tr&gt;&lt;td&gt;x&lt;/td&gt;&lt;/tr&gt;&lt;/table&gt;</p>"#
        );
    }

    #[test]
    fn test_render_lines_keeps_order_and_passes_tables() {
        let blocks = [
            Block::Text("# T\n- a"),
            Block::Table("<table></table>".to_owned()),
            Block::Text("end\r"),
        ];
        assert_eq!(
            render_lines(&blocks),
            concat!(
                r#"<h1 class="msg-header">T</h1>"#,
                r#"<li class="msg-list-item">a</li>"#,
                "<table></table>",
                r#"<p class="msg-paragraph">end</p>"#,
            )
        );
    }
}
