use super::model::Table;

/// Default file name offered for the filtered download.
pub const EXPORT_FILE_NAME: &str = "donnees_filtrees.csv";

/// Media type of the exported bytes.
pub const EXPORT_MEDIA_TYPE: &str = "text/csv";

/// Error writing a table as CSV.
#[derive(Debug, thiserror::Error)]
#[error("failed to write CSV: {0}")]
pub struct ExportError(#[from] csv::Error);

/// Serialize `table` as UTF-8 CSV: a header row, then one row per record.
///
/// Missing cells are written as empty fields and numbers in their shortest
/// round-trip form, so reading the bytes back yields an equal table.
///
/// Text is written verbatim. A text cell spelled like a missing-value token
/// (`NA`, `null`, ...) therefore reads back as missing; the CSV loader
/// never produces such cells, but Parquet strings and hand-built tables can.
pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>, ExportError> {
    if table.n_cols() == 0 {
        return Ok(Vec::new());
    }

    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(table.column_names())?;
    for row in 0..table.n_rows() {
        writer.write_record(table.row(row).map(|v| v.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError(csv::Error::from(e.into_error())))?;
    log::info!(
        "Exported {} rows × {} columns ({} bytes)",
        table.n_rows(),
        table.n_cols(),
        bytes.len()
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::data::loader::parse_csv;
    use crate::data::model::{Column, ColumnType, Value};

    fn reload(bytes: &[u8]) -> Table {
        parse_csv(bytes, Path::new("<export>")).unwrap()
    }

    #[test]
    fn writes_header_and_rows() {
        let table = Table::new(vec![
            Column::numeric("claim_nb", [Some(1.0), Some(0.0)]),
            Column::numeric("TX", [Some(5.5), None]),
        ])
        .unwrap();
        let text = String::from_utf8(to_csv_bytes(&table).unwrap()).unwrap();
        assert_eq!(text, "claim_nb,TX\n1,5.5\n0,\n");
    }

    #[test]
    fn round_trips_numeric_and_text_columns() {
        let table = Table::new(vec![
            Column::numeric("claim_amount", [Some(1234.5678), Some(-0.1), None, Some(1e-12)]),
            Column::numeric("LAT", [Some(48.8566), Some(43.2965), Some(45.764), Some(0.0)]),
            Column::text(
                "pol_insee_code",
                [Some("75056"), Some("Aix, \"centre\""), None, Some("2A004")],
            ),
        ])
        .unwrap();

        let back = reload(&to_csv_bytes(&table).unwrap());
        assert_eq!(back, table);
        assert_eq!(back.column("claim_amount").unwrap().kind, ColumnType::Numeric);
    }

    #[test]
    fn token_spelled_text_reads_back_as_missing() {
        let table = Table::new(vec![Column::text("commune", [Some("NA"), Some("x")])]).unwrap();
        let bytes = to_csv_bytes(&table).unwrap();
        assert_eq!(bytes, b"commune\nNA\nx\n");

        let back = reload(&bytes);
        assert_eq!(
            back.column("commune").unwrap().values,
            vec![Value::Missing, Value::Text("x".into())]
        );
    }

    #[test]
    fn no_columns_export_nothing() {
        assert!(to_csv_bytes(&Table::default()).unwrap().is_empty());
    }

    #[test]
    fn empty_table_exports_header_only() {
        let table = Table::new(vec![Column::numeric("a", Vec::<Option<f64>>::new())]).unwrap();
        let bytes = to_csv_bytes(&table).unwrap();
        assert_eq!(bytes, b"a\n");
        assert_eq!(reload(&bytes), table);
    }
}
