//! Plain-text rendering of a wide table for terminal output and logs.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::pivot::WideTable;

/// Renders headers plus the first `limit` rows of `table`.
pub fn render(table: &WideTable, limit: usize) -> String {
    let headers = table.headers();
    let rows = table.records().into_iter().take(limit).collect::<Vec<_>>();
    render_grid(&headers, &rows)
}

/// Column-aligned grid; numeric cells are right-aligned.
pub fn render_grid(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths = headers
        .iter()
        .map(|h| h.chars().count().max(1))
        .collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(flatten(cell).chars().count());
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_line(headers, &widths));
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_line(&rule, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_line(row, &widths));
    }
    output
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let text = flatten(cell);
            if is_numeric(&text) {
                format!("{text:>width$}")
            } else {
                format!("{text:<width$}")
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

fn is_numeric(text: &str) -> bool {
    text.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.')
        && text.parse::<f64>().is_ok()
}

fn flatten(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn aligns_text_left_and_numbers_right() {
        let headers = strings(&["Country", "DP"]);
        let rows = vec![strings(&["AUS", "30"]), strings(&["NZL", "28.5"])];
        let rendered = render_grid(&headers, &rows);
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec!["Country  DP", "-------  ----", "AUS        30", "NZL      28.5"]
        );
    }

    #[test]
    fn control_characters_become_spaces() {
        let headers = strings(&["note"]);
        let rows = vec![strings(&["a\nb\tc"])];
        let rendered = render_grid(&headers, &rows);
        assert_eq!(rendered.lines().nth(2), Some("a b c"));
    }
}
