//! Pipe table extraction.
//!
//! Tables span several lines, so they are lifted out of the text before the
//! line classifier runs. The text is cut into [`Block`]s: plain text spans
//! that still need line-by-line rendering, and tables that are already
//! rendered to HTML and must be passed through untouched.

use crate::escape::escape_html;
use crate::inline::format_inline;

/// A span of message text after table extraction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block<'a> {
    /// Newline-separated lines still to be classified.
    Text(&'a str),
    /// A fully rendered table fragment (single line, no newlines).
    Table(String),
}

impl Block<'_> {
    /// Join blocks back into one string, each block on its own line.
    ///
    /// Table fragments appear as single opaque lines.
    pub fn join(blocks: &[Block<'_>]) -> String {
        let mut out = String::new();
        for (idx, block) in blocks.iter().enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            match block {
                Block::Text(text) => out.push_str(text),
                Block::Table(html) => out.push_str(html),
            }
        }
        out
    }
}

/// A parsed pipe table.
///
/// Every data row has exactly as many cells as the header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    /// Header cells (raw, unescaped text).
    pub header: Vec<String>,
    /// Data rows; the separator row is not included.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Parse a table from its lines.
    ///
    /// `lines[0]` is the header, `lines[1]` the separator and the rest are data
    /// rows. Returns `None` if the lines do not form a valid table.
    pub fn parse(lines: &[&str]) -> Option<Self> {
        let [header, separator, data @ ..] = lines else {
            return None;
        };
        if !is_header_row(header) || !is_separator_row(separator) || data.is_empty() {
            return None;
        }
        if !data.iter().all(|line| contains_unescaped_pipe(line)) {
            return None;
        }

        let header = split_row(header);
        let width = header.len();
        let rows = data
            .iter()
            .map(|line| {
                let mut cells = split_row(line);
                cells.resize(width, String::new());
                cells
            })
            .collect();

        Some(Self { header, rows })
    }

    /// Render the table as a single-line HTML fragment.
    ///
    /// Cell text is escaped and then inline-formatted on its own, so the
    /// fragment never needs another formatting pass.
    pub fn render(&self, out: &mut String) {
        out.push_str(r#"<div class="msg-table-wrapper"><table class="msg-table"><thead><tr>"#);
        for cell in &self.header {
            push_cell(out, "th", cell);
        }
        out.push_str("</tr></thead><tbody>");
        for row in &self.rows {
            out.push_str("<tr>");
            for cell in row {
                push_cell(out, "td", cell);
            }
            out.push_str("</tr>");
        }
        out.push_str("</tbody></table></div>");
    }
}

fn push_cell(out: &mut String, tag: &str, cell: &str) {
    out.push('<');
    out.push_str(tag);
    out.push('>');
    out.push_str(&format_inline(&escape_html(cell)));
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// A line together with its byte offset in the source text.
#[derive(Clone, Copy)]
struct SourceLine<'a> {
    start: usize,
    text: &'a str,
}

fn source_lines(text: &str) -> Vec<SourceLine<'_>> {
    let mut start = 0;
    text.split('\n')
        .map(|line| {
            let source_line = SourceLine { start, text: line };
            start += line.len() + 1;
            source_line
        })
        .collect()
}

/// Cut text into plain spans and rendered tables.
///
/// A table is a header row containing `|` and some other content, a valid
/// separator row, and one or more further rows containing `|`. The table
/// extends over every following line that contains an unescaped `|`.
/// One blank line directly above a table is folded into it.
///
/// Table-shaped lines whose second row is not a valid separator are left in
/// the text and end up rendered as ordinary paragraphs.
///
/// # Examples
///
/// ```
/// use chatfmt_renderer::{Block, extract_tables};
///
/// let blocks = extract_tables("intro\n| a | b |\n|---|---|\n| 1 | 2 |");
/// assert_eq!(blocks.len(), 2);
/// assert_eq!(blocks[0], Block::Text("intro"));
/// assert!(matches!(&blocks[1], Block::Table(html) if html.contains("<td>1</td>")));
/// ```
pub fn extract_tables(text: &str) -> Vec<Block<'_>> {
    let lines = source_lines(text);
    let mut blocks = Vec::new();
    // Byte offset where the pending text span starts
    let mut text_start = 0;
    // Index of the first line of the pending text span
    let mut first_pending = 0;
    let mut idx = 0;

    while idx < lines.len() {
        let run = table_run_len(&lines[idx..]);
        let table = if run >= 3 {
            let table_lines: Vec<&str> = lines[idx..idx + run].iter().map(|line| line.text).collect();
            Table::parse(&table_lines)
        } else {
            None
        };

        let Some(table) = table else {
            idx += 1;
            continue;
        };

        let mut cut_line = idx;
        if cut_line > first_pending && lines[cut_line - 1].text.trim().is_empty() {
            cut_line -= 1;
        }
        if cut_line > first_pending {
            // Exclude the newline that ends the last pending line
            blocks.push(Block::Text(&text[text_start..lines[cut_line].start - 1]));
        }

        let mut html = String::new();
        table.render(&mut html);
        blocks.push(Block::Table(html));

        idx += run;
        first_pending = idx;
        text_start = lines.get(idx).map_or(text.len(), |line| line.start);
    }

    if first_pending < lines.len() {
        blocks.push(Block::Text(&text[text_start..]));
    }

    blocks
}

/// Number of lines in the candidate table starting at `lines[0]`.
///
/// Returns 0 when the first two lines cannot start a table.
fn table_run_len(lines: &[SourceLine<'_>]) -> usize {
    match lines {
        [header, separator, ..]
            if is_header_row(header.text) && is_separator_row(separator.text) =>
        {
            2 + lines[2..]
                .iter()
                .take_while(|line| contains_unescaped_pipe(line.text))
                .count()
        }
        _ => 0,
    }
}

fn is_header_row(line: &str) -> bool {
    contains_unescaped_pipe(line) && line.chars().any(|c| c != '|' && !c.is_whitespace())
}

/// A separator row has at least one `-` and every cell reduces to nothing
/// once `-`, `:` and whitespace are removed.
fn is_separator_row(line: &str) -> bool {
    contains_unescaped_pipe(line)
        && line.contains('-')
        && split_row(line)
            .iter()
            .all(|cell| cell.chars().all(|c| c == '-' || c == ':' || c.is_whitespace()))
}

fn contains_unescaped_pipe(line: &str) -> bool {
    let mut prev = None;
    for c in line.chars() {
        if c == '|' && prev != Some('\\') {
            return true;
        }
        prev = Some(c);
    }
    false
}

/// Split a row into trimmed cells on unescaped pipes.
///
/// Leading and trailing pipes are dropped, and `\|` inside a cell becomes `|`.
fn split_row(line: &str) -> Vec<String> {
    let row = line.trim();
    let row = row.strip_prefix('|').unwrap_or(row);

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = row.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut cell)),
            _ => cell.push(c),
        }
    }
    // A trailing unescaped pipe leaves an empty final cell behind
    if !cell.trim().is_empty() || !row.ends_with('|') {
        cells.push(cell);
    }

    cells.into_iter().map(|cell| cell.trim().to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn table_html(blocks: &[Block<'_>]) -> Vec<String> {
        blocks
            .iter()
            .filter_map(|block| match block {
                Block::Table(html) => Some(html.clone()),
                Block::Text(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_split_row() {
        assert_eq!(split_row("| a | b |"), vec!["a", "b"]);
        assert_eq!(split_row("a|b"), vec!["a", "b"]);
        assert_eq!(split_row("|  | x |"), vec!["", "x"]);
    }

    #[test]
    fn test_split_row_escaped_pipe() {
        assert_eq!(split_row(r"| a \| b | c |"), vec!["a | b", "c"]);
        assert_eq!(split_row(r"| a | b \|"), vec!["a", "b |"]);
    }

    #[test]
    fn test_separator_row() {
        assert!(is_separator_row("|---|---|"));
        assert!(is_separator_row("| :--- | ---: | :-: |"));
        assert!(!is_separator_row("| abc | --- |"));
        assert!(!is_separator_row("|   |   |"));
        assert!(!is_separator_row("-----"));
    }

    #[test]
    fn test_no_tables() {
        assert_eq!(extract_tables("just\ntext"), vec![Block::Text("just\ntext")]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_tables(""), vec![Block::Text("")]);
    }

    #[test]
    fn test_simple_table() {
        let blocks = extract_tables("| A | B |\n|---|---|\n| 1 | 2 |");
        assert_eq!(
            blocks,
            vec![Block::Table(
                r#"<div class="msg-table-wrapper"><table class="msg-table"><thead><tr><th>A</th><th>B</th></tr></thead><tbody><tr><td>1</td><td>2</td></tr></tbody></table></div>"#
                    .to_owned()
            )]
        );
    }

    #[test]
    fn test_row_count_and_no_separator_text() {
        let blocks = extract_tables("| A | B | C |\n| --- | --- | --- |\n| 1 | 2 | 3 |\n| 4 | 5 | 6 |");
        let tables = table_html(&blocks);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].matches("<tr>").count(), 3);
        assert_eq!(tables[0].matches("<th>").count(), 3);
        assert_eq!(tables[0].matches("<td>").count(), 6);
        assert!(!tables[0].contains("---"));
    }

    #[test]
    fn test_invalid_separator_is_not_a_table() {
        let text = "| A | B |\n| x | y |\n| 1 | 2 |";
        assert_eq!(extract_tables(text), vec![Block::Text(text)]);
    }

    #[test]
    fn test_header_and_separator_only_is_not_a_table() {
        let text = "| A | B |\n|---|---|\nafter";
        assert_eq!(extract_tables(text), vec![Block::Text(text)]);
    }

    #[test]
    fn test_text_around_table() {
        let blocks = extract_tables("before\n| A |\n|---|\n| 1 |\nafter");
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0], Block::Text("before"));
        assert_eq!(blocks[2], Block::Text("after"));
    }

    #[test]
    fn test_blank_line_above_table_is_folded() {
        let blocks = extract_tables("before\n\n| A |\n|---|\n| 1 |\n\nafter");
        assert_eq!(blocks[0], Block::Text("before"));
        assert!(matches!(blocks[1], Block::Table(_)));
        assert_eq!(blocks[2], Block::Text("\nafter"));
    }

    #[test]
    fn test_only_one_blank_line_folded() {
        let blocks = extract_tables("before\n\n\n| A |\n|---|\n| 1 |");
        assert_eq!(blocks[0], Block::Text("before\n"));
    }

    #[test]
    fn test_trailing_newline_after_table() {
        let blocks = extract_tables("| A |\n|---|\n| 1 |\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1], Block::Text(""));
    }

    #[test]
    fn test_two_tables() {
        let blocks = extract_tables("| A |\n|---|\n| 1 |\ntext\n| B |\n|---|\n| 2 |");
        assert_eq!(table_html(&blocks).len(), 2);
        assert_eq!(blocks[1], Block::Text("text"));
    }

    #[test]
    fn test_short_rows_are_padded_long_rows_truncated() {
        let blocks = extract_tables("| A | B |\n|---|---|\n| 1 |\n| 1 | 2 | 3 |");
        let html = &table_html(&blocks)[0];
        assert!(html.contains("<tr><td>1</td><td></td></tr>"));
        assert!(html.contains("<tr><td>1</td><td>2</td></tr>"));
        assert!(!html.contains("<td>3</td>"));
    }

    #[test]
    fn test_cells_are_escaped_and_formatted() {
        let blocks = extract_tables("| Name | Note |\n|---|---|\n| <b> | **bold** `x` |");
        let html = &table_html(&blocks)[0];
        assert!(html.contains("<td>&lt;b&gt;</td>"));
        assert!(html.contains(r#"<td><strong>bold</strong> <code class="msg-code">x</code></td>"#));
    }

    #[test]
    fn test_table_without_outer_pipes() {
        let blocks = extract_tables("A | B\n--- | ---\n1 | 2");
        assert_eq!(table_html(&blocks).len(), 1);
    }

    #[test]
    fn test_join_round_trips_plain_text() {
        let text = "a\nb";
        assert_eq!(Block::join(&extract_tables(text)), text);
    }

    #[test]
    fn test_table_parse_rejects_short_input() {
        assert_eq!(Table::parse(&["| a |", "|---|"]), None);
    }
}
