use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Optional settings file, looked up in the working directory.
pub const CONFIG_FILE: &str = "claims-explorer.json";

/// Environment variable overriding the dataset path.
pub const DATA_ENV_VAR: &str = "CLAIMS_EXPLORER_DATA";

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Start-up settings. Every field has a default, so the settings file may
/// set any subset of them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Dataset to explore.
    pub data_path: PathBuf,
    /// Rows shown in the column preview.
    pub preview_rows: usize,
    /// Rows shown under the range filter.
    pub filtered_preview_rows: usize,
    /// Histogram bucket count.
    pub histogram_bins: usize,
    /// Columns selected when the window opens (those absent from the data
    /// are skipped).
    pub default_columns: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("dataset_fin.csv"),
            preview_rows: 100,
            filtered_preview_rows: 50,
            histogram_bins: crate::charts::DEFAULT_BINS,
            default_columns: ["claim_nb", "claim_amount", "TX", "RR"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl AppConfig {
    /// Parse a settings file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Settings file if present, then `CLAIMS_EXPLORER_DATA`, then the first
    /// command-line argument for the dataset path.
    pub fn resolve(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let file = Path::new(CONFIG_FILE);
        let mut config = if file.exists() {
            log::info!("Reading settings from {}", file.display());
            Self::from_file(file)?
        } else {
            Self::default()
        };

        if let Ok(path) = std::env::var(DATA_ENV_VAR) {
            config.data_path = PathBuf::from(path);
        }
        if let Some(path) = args.into_iter().next() {
            config.data_path = PathBuf::from(path);
        }
        Ok(config)
    }
}
