use serde::Serialize;

use super::{ChartKind, MissingColumnError, require_numeric};
use crate::data::model::{Table, Value};

pub const LAT_COLUMN: &str = "LAT";
pub const LON_COLUMN: &str = "LON";
/// Default size encoding: number of claims at the location.
pub const SIZE_COLUMN: &str = "claim_nb";
/// Optional hover label.
pub const LABEL_COLUMN: &str = "pol_insee_code";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    pub size: f64,
    pub label: Option<String>,
}

/// Scatter of locations sized (and coloured) by a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoSpec {
    pub size_column: String,
    pub points: Vec<GeoPoint>,
    /// Observed `(min, max)` of the size column, for the colour scale.
    pub size_range: Option<(f64, f64)>,
}

/// Geographic scatter of `LAT`/`LON`, sized by `size_column`. Rows missing
/// any of the three are dropped.
pub fn geo_scatter(table: &Table, size_column: &str) -> Result<GeoSpec, MissingColumnError> {
    let lat = require_numeric(table, LAT_COLUMN, ChartKind::Geographic)?;
    let lon = require_numeric(table, LON_COLUMN, ChartKind::Geographic)?;
    let size = require_numeric(table, size_column, ChartKind::Geographic)?;
    let labels = table.column(LABEL_COLUMN);

    let points: Vec<GeoPoint> = (0..table.n_rows())
        .filter_map(|row| {
            Some(GeoPoint {
                lat: lat.values[row].as_f64()?,
                lon: lon.values[row].as_f64()?,
                size: size.values[row].as_f64()?,
                label: labels
                    .map(|c| &c.values[row])
                    .filter(|v| !v.is_missing())
                    .map(Value::to_string),
            })
        })
        .collect();

    let size_range = points.iter().fold(None, |acc: Option<(f64, f64)>, p| {
        Some(acc.map_or((p.size, p.size), |(lo, hi)| (lo.min(p.size), hi.max(p.size))))
    });

    Ok(GeoSpec {
        size_column: size_column.to_string(),
        points,
        size_range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::MissingReason;
    use crate::data::model::Column;

    #[test]
    fn drops_rows_missing_coordinates_or_size() {
        let table = Table::new(vec![
            Column::numeric("LAT", [Some(48.85), None, Some(43.3), Some(45.76)]),
            Column::numeric("LON", [Some(2.35), Some(5.4), Some(5.37), Some(4.83)]),
            Column::numeric("claim_nb", [Some(3.0), Some(1.0), None, Some(1.0)]),
            Column::numeric("pol_insee_code", [Some(75056.0), Some(13055.0), None, None]),
        ])
        .unwrap();

        let spec = geo_scatter(&table, SIZE_COLUMN).unwrap();
        assert_eq!(spec.points.len(), 2);
        assert_eq!(spec.points[0].label.as_deref(), Some("75056"));
        assert_eq!(spec.points[1].label, None);
        assert_eq!(spec.size_range, Some((1.0, 3.0)));
    }

    #[test]
    fn missing_lon_is_reported() {
        let table = Table::new(vec![
            Column::numeric("LAT", [Some(48.85)]),
            Column::numeric("claim_nb", [Some(3.0)]),
        ])
        .unwrap();
        let err = geo_scatter(&table, SIZE_COLUMN).unwrap_err();
        assert_eq!(
            err,
            MissingColumnError {
                chart: ChartKind::Geographic,
                column: "LON".into(),
                reason: MissingReason::Absent,
            }
        );
    }
}
