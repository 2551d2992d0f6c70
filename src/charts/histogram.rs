use serde::Serialize;

use super::{ChartKind, MissingColumnError, require_numeric};
use crate::data::model::Table;

/// Bucket count used when the caller does not pick one.
pub const DEFAULT_BINS: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSpec {
    pub column: String,
    pub bins: Vec<HistogramBin>,
}

impl HistogramSpec {
    /// Number of values counted across all bins.
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Equal-width histogram of a numeric column over its observed range.
pub fn histogram(
    table: &Table,
    column: &str,
    bins: Option<usize>,
) -> Result<HistogramSpec, MissingColumnError> {
    let col = require_numeric(table, column, ChartKind::Histogram)?;
    let values: Vec<f64> = col.numbers().collect();
    Ok(HistogramSpec {
        column: column.to_string(),
        bins: bin_values(&values, bins.unwrap_or(DEFAULT_BINS).max(1)),
    })
}

/// Bin `values` into `n` equal-width buckets; the last bucket is closed on
/// the right. A single distinct value gets one bucket.
pub(crate) fn bin_values(values: &[f64], n: usize) -> Vec<HistogramBin> {
    let Some((lo, hi)) = values.iter().fold(None, |acc: Option<(f64, f64)>, &v| {
        Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
    }) else {
        return Vec::new();
    };

    if lo == hi {
        return vec![HistogramBin {
            start: lo,
            end: hi,
            count: values.len(),
        }];
    }

    let width = (hi - lo) / n as f64;
    let mut bins: Vec<HistogramBin> = (0..n)
        .map(|i| HistogramBin {
            start: lo + width * i as f64,
            end: if i + 1 == n { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(n - 1);
        bins[idx].count += 1;
    }
    bins
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    #[test]
    fn counts_every_value_once() {
        let table = Table::new(vec![Column::numeric(
            "claim_amount",
            [Some(0.0), Some(100.0), None, Some(300.0), Some(300.0)],
        )])
        .unwrap();
        let spec = histogram(&table, "claim_amount", Some(3)).unwrap();
        assert_eq!(spec.bins.len(), 3);
        assert_eq!(spec.total(), 4);
        assert_eq!(
            spec.bins.iter().map(|b| b.count).collect::<Vec<_>>(),
            vec![1, 1, 2]
        );
        assert_eq!(spec.bins[2].end, 300.0);
    }

    #[test]
    fn defaults_to_thirty_bins() {
        let table = Table::new(vec![Column::numeric("TX", (0..100).map(|i| Some(i as f64)))]).unwrap();
        let spec = histogram(&table, "TX", None).unwrap();
        assert_eq!(spec.bins.len(), DEFAULT_BINS);
        assert_eq!(spec.total(), 100);
    }

    #[test]
    fn single_value_gets_one_bin() {
        let bins = bin_values(&[2.0, 2.0, 2.0], 30);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
    }

    #[test]
    fn text_column_is_rejected() {
        let table = Table::new(vec![Column::text("code", [Some("a")])]).unwrap();
        assert!(histogram(&table, "code", None).is_err());
    }
}
