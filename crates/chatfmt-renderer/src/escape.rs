//! HTML escaping helpers.

use std::borrow::Cow;

/// Escape the characters that would otherwise start markup or an entity.
///
/// Only `&`, `<` and `>` are replaced. Quotes are left alone because message
/// text is only ever placed in element content; see [`quote_attr`] for
/// attribute values.
///
/// # Examples
///
/// ```
/// use chatfmt_renderer::escape_html;
///
/// assert_eq!(escape_html("a < b && c"), "a &lt; b &amp;&amp; c");
/// assert_eq!(escape_html("plain"), "plain");
/// ```
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Make already-escaped text safe inside a double-quoted attribute value.
///
/// The input is expected to have gone through [`escape_html`], so only the
/// quote characters still need replacing.
pub fn quote_attr(escaped: &str) -> Cow<'_, str> {
    if !escaped.contains(['"', '\'']) {
        return Cow::Borrowed(escaped);
    }

    let mut out = String::with_capacity(escaped.len() + 8);
    for c in escaped.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_borrows_when_clean() {
        assert!(matches!(escape_html("nothing to do"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_html_script_tag() {
        assert_eq!(
            escape_html("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_escape_html_existing_entity_is_escaped_again() {
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_escape_html_keeps_quotes() {
        assert_eq!(escape_html(r#"say "hi""#), r#"say "hi""#);
    }

    #[test]
    fn test_quote_attr() {
        assert_eq!(
            quote_attr(r#"x" onclick='y'"#),
            "x&quot; onclick=&#39;y&#39;"
        );
        assert!(matches!(quote_attr("https://a.com"), Cow::Borrowed(_)));
    }
}
