use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int16Array, Int32Array, Int64Array, Int8Array,
    UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{Column, ColumnType, Table, Value};

/// Cell contents treated as missing, in addition to the empty string.
const MISSING_TOKENS: &[&str] = &["NA", "N/A", "#N/A", "NaN", "nan", "null", "NULL", "None"];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Loading failed; there is no table to show.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("invalid parquet file {path}: {message}")]
    Parquet { path: PathBuf, message: String },
    #[error("{path} has no header row")]
    Empty { path: PathBuf },
    #[error("{path}: header has an empty column name at position {position}")]
    EmptyHeader { path: PathBuf, position: usize },
    #[error("{path}: duplicate column name '{name}'")]
    DuplicateColumn { path: PathBuf, name: String },
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a table from a file. Dispatch by extension; anything that is not
/// Parquet is read as CSV.
pub fn load_file(path: &Path) -> Result<Table, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path)?,
        "csv" | "txt" | "" => load_csv(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };
    log::info!(
        "Loaded {} rows × {} columns from {}",
        table.n_rows(),
        table.n_cols(),
        path.display()
    );
    Ok(table)
}

/// Parse CSV text from any reader. Shared by the file loader and by anything
/// that needs to re-read exported bytes.
pub fn parse_csv<R: std::io::Read>(reader: R, origin: &Path) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let csv_err = |source| LoadError::Csv {
        path: origin.to_path_buf(),
        source,
    };

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    check_headers(&headers, origin)?;

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for result in reader.records() {
        let record = result.map_err(csv_err)?;
        for (cells, field) in raw.iter_mut().zip(record.iter()) {
            cells.push(field.to_string());
        }
    }

    let n_rows = raw.first().map_or(0, Vec::len);
    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| infer_column(name, cells))
        .collect();
    Ok(Table::from_parts(columns, n_rows))
}

fn load_csv(path: &Path) -> Result<Table, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_csv(std::io::BufReader::new(file), path)
}

fn check_headers(headers: &[String], path: &Path) -> Result<(), LoadError> {
    if headers.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    let mut seen = std::collections::HashSet::new();
    for (position, name) in headers.iter().enumerate() {
        if name.is_empty() {
            return Err(LoadError::EmptyHeader {
                path: path.to_path_buf(),
                position,
            });
        }
        if !seen.insert(name.as_str()) {
            return Err(LoadError::DuplicateColumn {
                path: path.to_path_buf(),
                name: name.clone(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Type inference
// ---------------------------------------------------------------------------

fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || MISSING_TOKENS.contains(&cell)
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// A column is numeric when every non-missing cell parses as a number.
fn infer_column(name: String, cells: Vec<String>) -> Column {
    let numeric = cells
        .iter()
        .all(|c| is_missing(c) || parse_number(c).is_some());

    if numeric {
        let values = cells
            .iter()
            .map(|c| parse_number(c).map_or(Value::Missing, Value::Number))
            .collect();
        Column::new(name, ColumnType::Numeric, values)
    } else {
        let values = cells
            .into_iter()
            .map(|c| if is_missing(&c) { Value::Missing } else { Value::Text(c) })
            .collect();
        Column::new(name, ColumnType::Text, values)
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file. Integer and float columns become numeric, string
/// columns text; any other Arrow type is rendered as text.
fn load_parquet(path: &Path) -> Result<Table, LoadError> {
    let parquet_err = |message: String| LoadError::Parquet {
        path: path.to_path_buf(),
        message,
    };

    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| parquet_err(format!("reading metadata: {e}")))?;
    let schema = builder.schema().clone();
    let reader = builder
        .build()
        .map_err(|e| parquet_err(format!("building reader: {e}")))?;

    let headers: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
    check_headers(&headers, path)?;

    let mut columns: Vec<Column> = schema
        .fields()
        .iter()
        .map(|f| {
            let kind = if f.data_type().is_integer() || f.data_type().is_floating() {
                ColumnType::Numeric
            } else {
                ColumnType::Text
            };
            Column::new(f.name().clone(), kind, Vec::new())
        })
        .collect();

    let mut n_rows = 0;
    for batch_result in reader {
        let batch = batch_result.map_err(|e| parquet_err(format!("reading record batch: {e}")))?;
        for (column, array) in columns.iter_mut().zip(batch.columns()) {
            for row in 0..batch.num_rows() {
                column.values.push(arrow_value(array, row, column.kind));
            }
        }
        n_rows += batch.num_rows();
    }

    Ok(Table::from_parts(columns, n_rows))
}

/// Extract a single cell from an Arrow column.
fn arrow_value(col: &Arc<dyn Array>, row: usize, kind: ColumnType) -> Value {
    if col.is_null(row) {
        return Value::Missing;
    }
    if kind == ColumnType::Numeric {
        return arrow_number(col, row)
            .filter(|v| !v.is_nan())
            .map_or(Value::Missing, Value::Number);
    }
    match col.data_type() {
        DataType::Utf8 => Value::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::Text(col.as_string::<i64>().value(row).to_string()),
        _ => match arrow::util::display::array_value_to_string(col.as_ref(), row) {
            Ok(s) => Value::Text(s),
            Err(_) => Value::Missing,
        },
    }
}

fn arrow_number(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    macro_rules! downcast {
        ($($ty:ty),*) => {
            $(if let Some(arr) = col.as_any().downcast_ref::<$ty>() {
                return Some(arr.value(row) as f64);
            })*
        };
    }
    downcast!(
        Float64Array, Float32Array, Int64Array, Int32Array, Int16Array, Int8Array, UInt64Array,
        UInt32Array, UInt16Array, UInt8Array
    );
    None
}

// ---------------------------------------------------------------------------
// DatasetCache – load once per process
// ---------------------------------------------------------------------------

/// Write-once holder for the dataset at a fixed path.
///
/// Constructed at start-up and handed to the app; the first successful
/// [`DatasetCache::get`] loads the file, later calls share that table.
/// Failed loads are not remembered, so a later call retries.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    table: OnceLock<Arc<Table>>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached table, loading it on first use.
    pub fn get(&self) -> Result<Arc<Table>, LoadError> {
        if let Some(table) = self.table.get() {
            return Ok(Arc::clone(table));
        }
        let loaded = Arc::new(load_file(&self.path)?);
        Ok(Arc::clone(self.table.get_or_init(|| loaded)))
    }

    /// Whether the table has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }
}
