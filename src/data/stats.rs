use std::collections::HashMap;

use serde::Serialize;

use super::model::{Column, ColumnType, Table, Value};

/// Quantile `q` (0..=1) of sorted values, by linear interpolation between
/// the closest ranks. `None` for an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let idx = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;
    let fraction = idx - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Non-missing values of a column, sorted ascending.
pub fn sorted_numbers(column: &Column) -> Vec<f64> {
    let mut values: Vec<f64> = column.numbers().collect();
    values.sort_by(f64::total_cmp);
    values
}

/// Summary of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1); undefined below two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Summary of one text column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSummary {
    pub count: usize,
    pub unique: usize,
    /// Most frequent value; ties go to the value seen first.
    pub top: Option<String>,
    pub freq: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Summary {
    Numeric(NumericSummary),
    Text(TextSummary),
}

/// Descriptive statistics for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub summary: Summary,
}

/// Describe every column of `table`, in column order.
pub fn describe(table: &Table) -> Vec<ColumnSummary> {
    table
        .columns()
        .iter()
        .map(|c| ColumnSummary {
            column: c.name.clone(),
            summary: match c.kind {
                ColumnType::Numeric => Summary::Numeric(describe_numeric(c)),
                ColumnType::Text => Summary::Text(describe_text(c)),
            },
        })
        .collect()
}

/// Numeric and text summaries apart, each in column order. The two kinds
/// report different statistics and are shown as separate grids.
pub fn split_by_kind(
    summaries: &[ColumnSummary],
) -> (Vec<(&str, &NumericSummary)>, Vec<(&str, &TextSummary)>) {
    let mut numeric = Vec::new();
    let mut text = Vec::new();
    for s in summaries {
        match &s.summary {
            Summary::Numeric(n) => numeric.push((s.column.as_str(), n)),
            Summary::Text(t) => text.push((s.column.as_str(), t)),
        }
    }
    (numeric, text)
}

fn describe_numeric(column: &Column) -> NumericSummary {
    let sorted = sorted_numbers(column);
    let n = sorted.len();
    let mean = (n > 0).then(|| sorted.iter().sum::<f64>() / n as f64);
    let std = mean.filter(|_| n > 1).map(|m| {
        let ss: f64 = sorted.iter().map(|v| (v - m).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    });

    NumericSummary {
        count: n,
        mean,
        std,
        min: sorted.first().copied(),
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted.last().copied(),
    }
}

fn describe_text(column: &Column) -> TextSummary {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    let mut count = 0;
    for (pos, v) in column.values.iter().enumerate() {
        if let Value::Text(s) = v {
            count += 1;
            counts.entry(s.as_str()).or_insert((0, pos)).0 += 1;
        }
    }

    let top = counts
        .iter()
        .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(b.1 .1.cmp(&a.1 .1)))
        .map(|(s, (n, _))| (s.to_string(), *n));

    TextSummary {
        count,
        unique: counts.len(),
        freq: top.as_ref().map_or(0, |(_, n)| *n),
        top: top.map(|(s, _)| s),
    }
}
