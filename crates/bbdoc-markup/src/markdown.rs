//! Markdown output primitives.
//!
//! Nothing here knows about classes or markup tags.

/// Prefix of in-page member anchors.
pub const ANCHOR_PREFIX: &str = "i_";

/// Spacer emitted after tables. Some viewers stick following content to the table otherwise.
pub const TABLE_SPACER: &str = "<p></p>";

#[must_use]
pub fn make_link(text: &str, url: &str) -> String {
    format!("[{text}]({url})")
}

/// Link to a member anchor on the current page.
#[must_use]
pub fn make_internal_link(name: &str) -> String {
    make_link(name, &format!("#{ANCHOR_PREFIX}{name}"))
}

/// Invisible anchor for deep links to a member section.
///
/// Markdown has no anchor syntax, so this falls back on inline HTML.
#[must_use]
pub fn make_anchor(name: &str) -> String {
    format!(r#"<span id="{ANCHOR_PREFIX}{name}"></span>"#)
}

#[must_use]
pub fn inline_code(text: &str) -> String {
    format!("`{text}`")
}

/// Escape characters that would split a table cell.
#[must_use]
pub fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Format rows as a Markdown table.
///
/// The first row is the header. Every column is padded to its widest cell
/// (counted in characters) plus one, so the source stays readable. Short rows
/// are padded with empty cells.
///
/// # Example
///
/// ```
/// use bbdoc_markup::markdown::make_table;
///
/// let table = make_table(&[vec!["H1", "H2"], vec!["a", "bb"]]);
/// assert!(table.contains("--- | ---"));
/// ```
pub fn make_table<S: AsRef<str>>(rows: &[Vec<S>]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; column_count];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.as_ref().chars().count());
        }
    }
    for width in &mut widths {
        *width += 1;
    }

    let mut out = String::from("\n");
    for (row_index, row) in rows.iter().enumerate() {
        for (column, &width) in widths.iter().enumerate() {
            if column > 0 {
                out.push_str(" | ");
            }
            let cell = row.get(column).map_or("", |c| c.as_ref());
            out.push_str(cell);
            let len = cell.chars().count();
            out.push_str(&" ".repeat(width.saturating_sub(len)));
        }
        if row_index == 0 {
            out.push('\n');
            let separator: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
            out.push_str(&separator.join(" | "));
        }
        out.push('\n');
    }
    out.push_str(TABLE_SPACER);
    out
}

/// Remove whitespace common to the start of every non-blank line.
///
/// Whitespace-only lines are emptied.
#[must_use]
pub fn dedent(text: &str) -> String {
    let margin = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| &line[..line.len() - line.trim_start().len()])
        .reduce(common_prefix)
        .unwrap_or("");

    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        if line.trim().is_empty() {
            if line.ends_with('\n') {
                out.push('\n');
            }
        } else {
            out.push_str(line.strip_prefix(margin).unwrap_or(line));
        }
    }
    out
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .char_indices()
        .zip(b.chars())
        .take_while(|((_, x), y)| x == y)
        .last()
        .map_or(0, |((i, c), _)| i + c.len_utf8());
    &a[..len]
}

/// Drop leading and trailing blank lines, joining the rest with `newline`.
#[must_use]
pub fn strip_blank_lines(text: &str, newline: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines
        .iter()
        .position(|line| !line.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|line| !line.trim().is_empty())
        .map_or(start, |i| i + 1);
    lines[start..end].join(newline)
}
