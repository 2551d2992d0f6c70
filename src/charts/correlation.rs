use serde::Serialize;

use super::{ChartKind, MissingColumnError, MissingReason, complete_pairs};
use crate::data::model::Table;

/// Square matrix of pairwise Pearson coefficients between numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationSpec {
    pub columns: Vec<String>,
    /// `matrix[i][j]` is the coefficient between `columns[i]` and
    /// `columns[j]`; `None` where it is undefined.
    pub matrix: Vec<Vec<Option<f64>>>,
}

impl CorrelationSpec {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.matrix[i][j]
    }
}

/// Correlate every numeric column of `table` with every other. Text
/// columns are ignored; a table with no numeric column at all cannot be
/// drawn.
pub fn correlation(table: &Table) -> Result<CorrelationSpec, MissingColumnError> {
    let numeric: Vec<_> = table.columns().iter().filter(|c| c.is_numeric()).collect();
    if numeric.is_empty() {
        return Err(MissingColumnError {
            chart: ChartKind::Correlation,
            column: "<any numeric column>".to_string(),
            reason: MissingReason::Absent,
        });
    }

    let n = numeric.len();
    let mut matrix = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&complete_pairs(numeric[i], numeric[j]));
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    log::debug!("Computed {n}×{n} correlation matrix over {} rows", table.n_rows());

    Ok(CorrelationSpec {
        columns: numeric.iter().map(|c| c.name.clone()).collect(),
        matrix,
    })
}

/// Pearson coefficient; undefined for fewer than two pairs or a constant
/// side.
fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for &(x, y) in pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn table() -> Table {
        Table::new(vec![
            Column::numeric("TX", [Some(1.0), Some(2.0), Some(3.0), Some(4.0)]),
            Column::numeric("claim_amount", [Some(10.0), Some(20.0), Some(30.0), None]),
            Column::numeric("RR", [Some(4.0), Some(3.0), Some(2.0), Some(1.0)]),
            Column::numeric("const", [Some(1.0); 4]),
            Column::text("pol_insee_code", [Some("a"), Some("b"), Some("c"), Some("d")]),
        ])
        .unwrap()
    }

    #[test]
    fn restricts_to_numeric_columns() {
        let spec = correlation(&table()).unwrap();
        assert_eq!(spec.columns, vec!["TX", "claim_amount", "RR", "const"]);
        assert_eq!(spec.matrix.len(), 4);
    }

    #[test]
    fn pearson_over_complete_rows() {
        let spec = correlation(&table()).unwrap();
        let close = |a: Option<f64>, b: f64| (a.unwrap() - b).abs() < 1e-12;
        assert!(close(spec.get("TX", "TX"), 1.0));
        assert!(close(spec.get("TX", "RR"), -1.0));
        assert!(close(spec.get("TX", "claim_amount"), 1.0));
        assert_eq!(spec.get("TX", "RR"), spec.get("RR", "TX"));
    }

    #[test]
    fn constant_column_is_undefined() {
        let spec = correlation(&table()).unwrap();
        assert_eq!(spec.get("TX", "const"), None);
        assert_eq!(spec.get("const", "const"), None);
    }

    #[test]
    fn no_numeric_columns_is_an_error() {
        let table = Table::new(vec![Column::text("code", [Some("a")])]).unwrap();
        assert_eq!(
            correlation(&table).unwrap_err().chart,
            ChartKind::Correlation
        );
    }
}
