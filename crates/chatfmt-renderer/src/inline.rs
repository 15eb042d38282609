//! Inline formatting passes.
//!
//! The passes run in a fixed order over already-escaped HTML:
//! bold, italic, inline code, markdown links, bare-URL autolinks.
//!
//! Every pass is a forward scan over the input. A failed match never makes a
//! pass re-read text it has already ruled out, so the cost stays linear in
//! the input length no matter how many unbalanced markers it contains.

use std::borrow::Cow;

use crate::escape::quote_attr;

/// Closing tags that end a block fragment. Inline spans never cross these.
const BLOCK_ENDS: [&str; 8] = [
    "</p>", "</h1>", "</h2>", "</h3>", "</h4>", "</li>", "</div>", "/>",
];

const LINK_ATTRS: &str = r#" target="_blank" rel="noopener" class="msg-link""#;

/// Tags the bold, italic and code passes emit, with the marker they replace.
const URL_MARKERS: [(&str, &str, &str); 3] = [
    ("<strong>", "</strong>", "**"),
    ("<em>", "</em>", "*"),
    (r#"<code class="msg-code">"#, "</code>", "`"),
];

/// Link schemes that are never turned into anchors.
const BLOCKED_SCHEMES: [&str; 3] = ["javascript", "vbscript", "data"];

/// Apply all inline passes to rendered block HTML.
///
/// Closed `<table>…</table>` regions are copied through untouched, since
/// their cells were formatted when the table was built. The remaining text is
/// cut at block fragment boundaries and each piece is formatted on its own.
///
/// # Examples
///
/// ```
/// use chatfmt_renderer::apply_inline;
///
/// assert_eq!(
///     apply_inline("<p>**a** and *b*</p>"),
///     "<p><strong>a</strong> and <em>b</em></p>"
/// );
/// ```
pub fn apply_inline(html: &str) -> String {
    let mut out = String::with_capacity(html.len() + html.len() / 4);
    let mut rest = html;

    while let Some((free, table, tail)) = split_table(rest) {
        push_free(&mut out, free);
        out.push_str(table);
        rest = tail;
    }
    push_free(&mut out, rest);

    out
}

/// Split off the first closed table region: `(before, table, after)`.
fn split_table(html: &str) -> Option<(&str, &str, &str)> {
    let start = html.find("<table")?;
    let len = html[start..].find("</table>")? + "</table>".len();
    let (before, from_table) = html.split_at(start);
    let (table, after) = from_table.split_at(len);
    Some((before, table, after))
}

fn push_free(out: &mut String, free: &str) {
    for unit in block_units(free) {
        out.push_str(&format_inline(unit));
    }
}

/// Cut free HTML right after every block-closing tag.
fn block_units(html: &str) -> impl Iterator<Item = &str> {
    let mut rest = html;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let cut = rest
            .match_indices('>')
            .map(|(idx, _)| idx + 1)
            .find(|&end| BLOCK_ENDS.iter().any(|tag| rest[..end].ends_with(tag)))
            .unwrap_or(rest.len());
        let (unit, tail) = rest.split_at(cut);
        rest = tail;
        Some(unit)
    })
}

/// Apply all inline passes to a single piece of escaped text.
///
/// Unlike [`apply_inline`] this does not look for tables or block
/// boundaries; it is what table cells are formatted with.
///
/// # Examples
///
/// ```
/// use chatfmt_renderer::format_inline;
///
/// assert_eq!(format_inline("`x`"), r#"<code class="msg-code">x</code>"#);
/// ```
pub fn format_inline(text: &str) -> String {
    let text = replace_paired(text, "**", '*', "<strong>", "</strong>");
    let text = replace_italic(&text);
    let text = replace_paired(&text, "`", '`', r#"<code class="msg-code">"#, "</code>");
    let text = replace_links(&text);
    autolink(&text)
}

/// Replace `{delim}content{delim}` where content is non-empty and free of `stop`.
fn replace_paired(text: &str, delim: &str, stop: char, open_tag: &str, close_tag: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(offset) = text[pos..].find(delim) {
        let open = pos + offset;
        let body = open + delim.len();
        let Some(len) = text[body..].find(stop) else {
            break;
        };
        let close = body + len;

        if len > 0 && text[close..].starts_with(delim) {
            out.push_str(&text[copied..open]);
            out.push_str(open_tag);
            out.push_str(&text[body..close]);
            out.push_str(close_tag);
            copied = close + delim.len();
            pos = copied;
        } else {
            pos = open + 1;
        }
    }

    out.push_str(&text[copied..]);
    out
}

/// Replace `*content*` unless either delimiter touches another `*`.
fn replace_italic(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(offset) = text[pos..].find('*') {
        let open = pos + offset;
        let Some(len) = text[open + 1..].find('*') else {
            break;
        };
        let close = open + 1 + len;

        let preceded = open > 0 && bytes[open - 1] == b'*';
        let followed = bytes.get(close + 1) == Some(&b'*');
        if len > 0 && !preceded && !followed {
            out.push_str(&text[copied..open]);
            out.push_str("<em>");
            out.push_str(&text[open + 1..close]);
            out.push_str("</em>");
            copied = close + 1;
            pos = copied;
        } else {
            pos = open + 1;
        }
    }

    out.push_str(&text[copied..]);
    out
}

/// Replace `[label](url)` with an anchor.
fn replace_links(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(offset) = text[pos..].find('[') {
        let open = pos + offset;
        let Some(label_len) = text[open + 1..].find(']') else {
            break;
        };
        let label_end = open + 1 + label_len;
        // Any `[` before `label_end` closes at the same `]`, so on failure
        // scanning resumes from there.
        pos = label_end;

        if label_len == 0 || !text[label_end + 1..].starts_with('(') {
            continue;
        }
        let url_start = label_end + 2;
        let Some(url_len) = text[url_start..].find(')') else {
            break;
        };
        let url_end = url_start + url_len;
        // A link opening inside a rejected URL would stop at the same place.
        pos = url_end;

        let Some(url) = restore_markers(text[url_start..url_end].trim()) else {
            continue;
        };
        if url.is_empty() || has_blocked_scheme(&url) {
            continue;
        }

        out.push_str(&text[copied..open]);
        push_anchor(&mut out, &url, &text[open + 1..label_end]);
        copied = url_end + 1;
        pos = copied;
    }

    out.push_str(&text[copied..]);
    out
}

/// Undo earlier inline passes inside a link URL.
///
/// `https://x.com/*a*` reaches the link pass as `https://x.com/<em>a</em>`.
/// Returns `None` if the URL holds any other tag or only half of a pair.
fn restore_markers(url: &str) -> Option<Cow<'_, str>> {
    if !url.contains('<') {
        return Some(Cow::Borrowed(url));
    }

    let mut out = String::with_capacity(url.len());
    let mut open = Vec::new();
    let mut rest = url;
    while let Some(idx) = rest.find('<') {
        out.push_str(&rest[..idx]);
        let tail = &rest[idx..];
        let (kind, tag) = match URL_MARKERS
            .iter()
            .position(|&(start, _, _)| tail.starts_with(start))
        {
            Some(kind) => {
                open.push(kind);
                (kind, URL_MARKERS[kind].0)
            }
            None => {
                let kind = open.pop()?;
                let end = URL_MARKERS[kind].1;
                if !tail.starts_with(end) {
                    return None;
                }
                (kind, end)
            }
        };
        out.push_str(URL_MARKERS[kind].2);
        rest = &tail[tag.len()..];
    }
    out.push_str(rest);

    open.is_empty().then_some(Cow::Owned(out))
}

fn has_blocked_scheme(url: &str) -> bool {
    let Some(colon) = url.find(':') else {
        return false;
    };
    let scheme: String = url[..colon]
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    BLOCKED_SCHEMES.contains(&scheme.as_str())
}

/// Wrap bare `http://` and `https://` URLs in anchors.
///
/// Tags are skipped whole, and nothing between `<a …>` and `</a>` is touched,
/// so URLs already used as an `href` or a link label are left alone.
fn autolink(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut pos = 0;
    let mut in_anchor = false;

    while pos < text.len() {
        let tail = &text[pos..];

        if tail.starts_with('<') {
            let end = tail.find('>').map_or(text.len(), |idx| pos + idx + 1);
            let tag = &text[pos..end];
            if tag.starts_with("<a ") || tag == "<a>" {
                in_anchor = true;
            } else if tag == "</a>" {
                in_anchor = false;
            }
            pos = end;
            continue;
        }

        if !in_anchor && let Some(len) = url_len(tail) {
            let url = &tail[..len];
            out.push_str(&text[copied..pos]);
            push_anchor(&mut out, url, url);
            pos += len;
            copied = pos;
            continue;
        }

        pos += tail.chars().next().map_or(1, char::len_utf8);
    }

    out.push_str(&text[copied..]);
    out
}

/// Length of the URL at the start of `tail`, if there is one.
///
/// The URL ends at whitespace, `<`, `>`, `"` or an escaped `&lt;`/`&gt;`.
/// Trailing sentence punctuation is not part of it.
fn url_len(tail: &str) -> Option<usize> {
    let scheme_len = if tail.starts_with("https://") {
        "https://".len()
    } else if tail.starts_with("http://") {
        "http://".len()
    } else {
        return None;
    };

    let rest = &tail[scheme_len..];
    let body_len = rest
        .char_indices()
        .find(|&(idx, c)| {
            c.is_whitespace()
                || matches!(c, '<' | '>' | '"')
                || rest[idx..].starts_with("&lt;")
                || rest[idx..].starts_with("&gt;")
        })
        .map_or(rest.len(), |(idx, _)| idx);

    let url = tail[..scheme_len + body_len].trim_end_matches(['.', ',', ';', ':', '!', '?']);
    (url.len() > scheme_len).then_some(url.len())
}

fn push_anchor(out: &mut String, href: &str, label: &str) {
    out.push_str(r#"<a href=""#);
    out.push_str(&quote_attr(href));
    out.push('"');
    out.push_str(LINK_ATTRS);
    out.push('>');
    out.push_str(label);
    out.push_str("</a>");
}
