//! Emoji highlighting.

/// Emoji that get wrapped in a styled span, with the inline style used.
///
/// `⚠️` only matches with its emoji presentation selector (U+FE0F); a bare
/// `⚠` is ordinary text.
pub const EMOJI_PALETTE: [(&str, &str); 6] = [
    ("✅", "color: #28a745;"),
    ("📝", "color: #17a2b8;"),
    ("📅", "color: #ffc107;"),
    ("❌", "color: #dc3545;"),
    ("⚠️", "color: #ff9800;"),
    ("😊", "font-size: 1.2em;"),
];

/// Wrap every palette emoji in `<span style="…">`.
///
/// Text inside tags (attribute values in particular) is never rewritten.
/// Emoji outside the palette pass through unchanged.
///
/// # Examples
///
/// ```
/// use chatfmt_renderer::colorize_emoji;
///
/// assert_eq!(
///     colorize_emoji("done ✅"),
///     r#"done <span style="color: #28a745;">✅</span>"#
/// );
/// assert_eq!(colorize_emoji("🚀"), "🚀");
/// ```
pub fn colorize_emoji(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut copied = 0;
    let mut pos = 0;

    while pos < html.len() {
        let tail = &html[pos..];

        if tail.starts_with('<') {
            pos = tail.find('>').map_or(html.len(), |idx| pos + idx + 1);
            continue;
        }

        let matched = EMOJI_PALETTE
            .iter()
            .find(|&&(emoji, _)| tail.starts_with(emoji));
        if let Some(&(emoji, style)) = matched {
            out.push_str(&html[copied..pos]);
            out.push_str(r#"<span style=""#);
            out.push_str(style);
            out.push_str(r#"">"#);
            out.push_str(emoji);
            out.push_str("</span>");
            pos += emoji.len();
            copied = pos;
            continue;
        }

        pos += tail.chars().next().map_or(1, char::len_utf8);
    }

    out.push_str(&html[copied..]);
    out
}
