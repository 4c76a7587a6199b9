use std::fmt;

use crate::{
    decode::YEAR_COLUMN,
    pivot::{COUNTRY_COLUMN, WideTable},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
    Empty,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Text => "text",
            ColumnKind::Empty => "empty",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSummary {
    pub name: String,
    pub non_empty: usize,
    pub kind: ColumnKind,
}

/// Per-column non-empty counts and kinds, in header order.
pub fn summarize(table: &WideTable) -> Vec<ColumnSummary> {
    let total = table.rows.len();
    let mut summaries = vec![
        ColumnSummary {
            name: COUNTRY_COLUMN.to_string(),
            non_empty: total,
            kind: if total == 0 { ColumnKind::Empty } else { ColumnKind::Text },
        },
        ColumnSummary {
            name: YEAR_COLUMN.to_string(),
            non_empty: total,
            kind: if total == 0 {
                ColumnKind::Empty
            } else if table.rows.iter().all(|row| row.year.parse::<i64>().is_ok()) {
                ColumnKind::Numeric
            } else {
                ColumnKind::Text
            },
        },
    ];

    for column in &table.columns {
        let values = table
            .rows
            .iter()
            .filter_map(|row| row.cell(column))
            .collect::<Vec<_>>();
        let kind = if values.is_empty() {
            ColumnKind::Empty
        } else if values.iter().all(|value| value.is_number()) {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        };
        summaries.push(ColumnSummary {
            name: column.clone(),
            non_empty: values.len(),
            kind,
        });
    }
    summaries
}

pub fn summary_rows(summaries: &[ColumnSummary]) -> Vec<Vec<String>> {
    summaries
        .iter()
        .enumerate()
        .map(|(idx, summary)| {
            vec![
                (idx + 1).to_string(),
                summary.name.clone(),
                summary.non_empty.to_string(),
                summary.kind.to_string(),
            ]
        })
        .collect()
}
