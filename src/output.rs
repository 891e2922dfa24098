//! Output formatting for command results.
//!
//! Supports multiple output formats: table (human-readable), JSON, and toon.

use clap::ValueEnum;
use serde::Serialize;

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// Token-efficient toon format
    Toon,
}

/// Trait for types that can be formatted for output
pub trait Outputable: Serialize {
    /// Format as a human-readable table
    fn to_table(&self) -> String;

    /// Format according to the specified output format
    fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => self.to_table(),
            OutputFormat::Json => serde_json::to_string_pretty(self).unwrap_or_default(),
            OutputFormat::Toon => {
                let json_value = serde_json::to_value(self).unwrap_or_default();
                toon::encode(&json_value, None)
            }
        }
    }
}

/// Render `rows` under `headers` as left-aligned columns separated by two
/// spaces, with a dashed rule under the header line.
///
/// Rows shorter than the header are padded with empty cells. Trailing
/// whitespace is trimmed from every line.
pub fn render_grid(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(grid_line(&widths, headers));
    let rule_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    lines.push("-".repeat(rule_width));
    for row in rows {
        lines.push(grid_line(&widths, row));
    }
    lines.join("\n")
}

fn grid_line(widths: &[usize], cells: &[String]) -> String {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            format!("{:<width$}", cell, width = w)
        })
        .collect();
    padded.join("  ").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[rstest]
    fn test_render_grid_aligns_columns() {
        let headers = strings(&["id", "name"]);
        let rows = vec![strings(&["1", "Alice"]), strings(&["100", "Bo"])];

        let expected = "\
id   name
----------
1    Alice
100  Bo";
        assert_eq!(render_grid(&headers, &rows), expected);
    }

    #[rstest]
    fn test_render_grid_no_rows() {
        let headers = strings(&["a", "bb"]);
        assert_eq!(render_grid(&headers, &[]), "a  bb\n-----");
    }

    #[rstest]
    fn test_render_grid_short_row_padded() {
        let headers = strings(&["x", "y"]);
        let rows = vec![strings(&["1"])];
        assert_eq!(render_grid(&headers, &rows), "x  y\n----\n1");
    }

    #[derive(Serialize)]
    struct Pair {
        left: i32,
        right: String,
    }

    impl Outputable for Pair {
        fn to_table(&self) -> String {
            format!("{} | {}", self.left, self.right)
        }
    }

    #[rstest]
    #[case(OutputFormat::Table, "1 | one")]
    #[case(OutputFormat::Json, "\"right\": \"one\"")]
    #[case(OutputFormat::Toon, "right: one")]
    fn test_format_dispatch(#[case] format: OutputFormat, #[case] needle: &str) {
        let pair = Pair {
            left: 1,
            right: "one".to_string(),
        };
        assert!(pair.format(format).contains(needle));
    }
}
