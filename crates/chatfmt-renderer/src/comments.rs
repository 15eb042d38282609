//! HTML comment removal.
//!
//! Runs before anything else so that markup smuggled inside a comment never
//! reaches the later stages, even as escaped text.

/// Remove HTML comments and dangling comment delimiters.
///
/// Three passes, in order:
/// - every complete `<!-- … -->` span (shortest match, may cross lines)
/// - any `<!` followed by one or more `-` left over from a truncated opener
/// - any run of two or more `-` followed by `>` left over from a closer
///
/// A single-dash arrow (`->`) is ordinary text and survives. This is
/// deliberate: the browser client's `-+>` pattern also ate arrows in prose.
///
/// # Examples
///
/// ```
/// use chatfmt_renderer::strip_comments;
///
/// assert_eq!(strip_comments("a<!-- hidden -->b"), "ab");
/// assert_eq!(strip_comments("cut off <!-- here"), "cut off  here");
/// assert_eq!(strip_comments("a -> b"), "a -> b");
/// ```
pub fn strip_comments(input: &str) -> String {
    let without_spans = remove_comment_spans(input);
    let without_openers = remove_dangling_openers(&without_spans);
    remove_dangling_closers(&without_openers)
}

fn remove_comment_spans(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("<!--") {
        let body = &rest[start + 4..];
        let Some(end) = body.find("-->") else {
            break;
        };
        out.push_str(&rest[..start]);
        rest = &body[end + 3..];
    }

    out.push_str(rest);
    out
}

fn remove_dangling_openers(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("<!-") {
        out.push_str(&rest[..start]);
        rest = rest[start + 2..].trim_start_matches('-');
    }

    out.push_str(rest);
    out
}

fn remove_dangling_closers(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find("-->") {
        // Swallow the whole dash run, not just the last two dashes
        let run_start = rest[..pos].trim_end_matches('-').len();
        out.push_str(&rest[..run_start]);
        rest = &rest[pos + 3..];
    }

    out.push_str(rest);
    out
}
