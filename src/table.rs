//! Plain-text and Markdown table rendering for `view`.
//!
//! Widths are measured in characters, ignoring ANSI colour escapes. Line
//! breaks inside a cell never reach the output: the plain layout flattens them
//! to spaces and Markdown writes `<br>`.

use std::borrow::Cow;
use std::fmt::Write as _;

use itertools::Itertools;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Renders comma-separated, space-padded columns. Each comma sticks to its
/// cell, so right-aligned columns read as `    12, next`.
pub fn render_plain(headers: &[String], rows: &[Vec<String>], aligns: &[Align]) -> String {
    let flatten = |value: &str| sanitize_cell(value, " ").into_owned();
    let headers = headers.iter().map(|h| flatten(h.as_str())).collect_vec();
    let rows = rows
        .iter()
        .map(|row| row.iter().map(|cell| flatten(cell.as_str())).collect_vec())
        .collect_vec();
    let widths = column_widths(&headers, &rows, 1);

    let mut output = String::new();
    let _ = writeln!(output, "{}", plain_row(&headers, &widths, &[]));
    for row in &rows {
        let _ = writeln!(output, "{}", plain_row(row, &widths, aligns));
    }
    output
}

/// Renders a GitHub-flavoured Markdown table; right-aligned columns get a
/// `---:` separator.
pub fn render_markdown(headers: &[String], rows: &[Vec<String>], aligns: &[Align]) -> String {
    let escape = |value: &str| sanitize_cell(value, "<br>").replace('|', "\\|");
    let headers = headers.iter().map(|h| escape(h.as_str())).collect_vec();
    let rows = rows
        .iter()
        .map(|row| row.iter().map(|cell| escape(cell.as_str())).collect_vec())
        .collect_vec();
    let widths = column_widths(&headers, &rows, 3);

    let mut output = String::new();
    let _ = writeln!(output, "{}", markdown_row(&headers, &widths, &[]));

    let separator = widths
        .iter()
        .enumerate()
        .map(|(idx, &width)| match align_at(aligns, idx) {
            Align::Left => "-".repeat(width),
            Align::Right => format!("{}:", "-".repeat(width - 1)),
        })
        .collect_vec();
    let _ = writeln!(output, "{}", markdown_row(&separator, &widths, &[]));

    for row in &rows {
        let _ = writeln!(output, "{}", markdown_row(row, &widths, aligns));
    }
    output
}

/// Shortens a cell to `max_height` lines of at most `max_width` characters,
/// marking every cut with `...`.
pub fn truncate_cell(value: &str, max_width: Option<usize>, max_height: Option<usize>) -> String {
    let mut lines = value.split('\n').collect::<Vec<_>>();
    let cut_lines = match max_height {
        Some(height) if lines.len() > height => {
            lines.truncate(height);
            true
        }
        _ => false,
    };

    let last = lines.len().saturating_sub(1);
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            let chars = line.chars().count();
            let marked = cut_lines && idx == last;
            match max_width {
                Some(width) if chars > width || (marked && chars + 3 > width) => {
                    let kept = line.chars().take(width.saturating_sub(3)).collect::<String>();
                    format!("{kept}...")
                }
                _ if marked => format!("{line}..."),
                _ => line.to_string(),
            }
        })
        .join("\n")
}

fn align_at(aligns: &[Align], idx: usize) -> Align {
    aligns.get(idx).copied().unwrap_or(Align::Left)
}

fn column_widths(headers: &[String], rows: &[Vec<String>], min: usize) -> Vec<usize> {
    let mut widths = headers.iter().map(|h| display_width(h)).collect_vec();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(widths.len()) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }
    for width in &mut widths {
        *width = (*width).max(min);
    }
    widths
}

fn plain_row(values: &[String], widths: &[usize], aligns: &[Align]) -> String {
    let count = values.len().min(widths.len());
    let mut cells = Vec::with_capacity(count);
    for (idx, value) in values.iter().enumerate().take(count) {
        let comma = idx + 1 < count;
        let text = if comma {
            Cow::Owned(format!("{value},"))
        } else {
            Cow::Borrowed(value.as_str())
        };
        let width = widths[idx] + usize::from(comma);
        cells.push(pad(&text, width, align_at(aligns, idx)));
    }
    let mut line = cells.join(" ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

fn markdown_row(values: &[String], widths: &[usize], aligns: &[Align]) -> String {
    let mut line = String::new();
    for (idx, width) in widths.iter().enumerate() {
        let value = values.get(idx).map(String::as_str).unwrap_or("");
        let _ = write!(line, "| {} ", pad(value, *width, align_at(aligns, idx)));
    }
    line.push('|');
    line
}

fn pad(value: &str, width: usize, align: Align) -> String {
    let padding = " ".repeat(width.saturating_sub(display_width(value)));
    match align {
        Align::Left => format!("{value}{padding}"),
        Align::Right => format!("{padding}{value}"),
    }
}

fn display_width(value: &str) -> usize {
    let mut width = 0usize;
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            // Skip ANSI escape sequence (e.g. \x1b[31m)
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

fn sanitize_cell<'a>(value: &'a str, line_break: &str) -> Cow<'a, str> {
    if value.contains(['\n', '\r', '\t']) {
        let mut sanitized = String::with_capacity(value.len());
        let mut chars = value.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                '\r' if chars.peek() == Some(&'\n') => {}
                '\n' | '\r' => sanitized.push_str(line_break),
                '\t' => sanitized.push(' '),
                other => sanitized.push(other),
            }
        }
        Cow::Owned(sanitized)
    } else {
        Cow::Borrowed(value)
    }
}
