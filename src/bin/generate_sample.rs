//! Writes a synthetic claims/climate dataset for trying out the explorer.
//!
//! Usage: `generate_sample [OUTPUT.csv] [--parquet]`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use claims_explorer::data::export::to_csv_bytes;
use claims_explorer::data::model::{Column, Table};

const ROWS: usize = 5_000;

/// (INSEE code, latitude, longitude) of a handful of French communes.
const COMMUNES: &[(&str, f64, f64)] = &[
    ("75056", 48.8566, 2.3522),
    ("13055", 43.2965, 5.3698),
    ("69123", 45.7640, 4.8357),
    ("31555", 43.6047, 1.4442),
    ("06088", 43.7102, 7.2620),
    ("44109", 47.2184, -1.5536),
    ("67482", 48.5734, 7.7521),
    ("33063", 44.8378, -0.5792),
    ("59350", 50.6292, 3.0573),
    ("35238", 48.1173, -1.6778),
    ("2A004", 41.9192, 8.7386),
    ("29019", 48.3904, -4.4861),
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Knuth's method; fine for the small rates used here.
    fn poisson(&mut self, lambda: f64) -> u32 {
        let limit = (-lambda).exp();
        let mut k = 0;
        let mut p = self.next_f64();
        while p > limit {
            k += 1;
            p *= self.next_f64();
        }
        k
    }
}

/// One policy-day: weather at the commune, and the claims it produced.
struct Row {
    claim_nb: f64,
    claim_amount: f64,
    tx: f64,
    rr: f64,
    lat: Option<f64>,
    lon: Option<f64>,
    insee: &'static str,
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    (0..ROWS)
        .map(|_| {
            let (insee, lat, lon) = COMMUNES[(rng.next_u64() % COMMUNES.len() as u64) as usize];
            let tx = (rng.gauss(18.0, 7.0) * 10.0).round() / 10.0;
            let rr = (rng.gauss(2.0, 5.0).max(0.0) * 10.0).round() / 10.0;

            // Heavy rain and heat both raise the claim rate.
            let rate = 0.05 + 0.02 * rr + 0.01 * (tx - 25.0).max(0.0);
            let claim_nb = rng.poisson(rate);
            let claim_amount: f64 = (0..claim_nb)
                .map(|_| rng.gauss(7.0, 0.8).exp())
                .sum::<f64>()
                .round();

            // About 1% of rows lost their geocoding.
            let geocoded = rng.next_f64() > 0.01;
            Row {
                claim_nb: claim_nb as f64,
                claim_amount,
                tx,
                rr,
                lat: geocoded.then(|| lat + rng.gauss(0.0, 0.05)),
                lon: geocoded.then(|| lon + rng.gauss(0.0, 0.05)),
                insee,
            }
        })
        .collect()
}

fn to_table(rows: &[Row]) -> Result<Table> {
    Ok(Table::new(vec![
        Column::numeric("claim_nb", rows.iter().map(|r| Some(r.claim_nb))),
        Column::numeric("claim_amount", rows.iter().map(|r| Some(r.claim_amount))),
        Column::numeric("TX", rows.iter().map(|r| Some(r.tx))),
        Column::numeric("RR", rows.iter().map(|r| Some(r.rr))),
        Column::numeric("LAT", rows.iter().map(|r| r.lat)),
        Column::numeric("LON", rows.iter().map(|r| r.lon)),
        Column::text("pol_insee_code", rows.iter().map(|r| Some(r.insee))),
    ])?)
}

fn write_parquet(rows: &[Row], path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("claim_nb", DataType::Float64, false),
        Field::new("claim_amount", DataType::Float64, false),
        Field::new("TX", DataType::Float64, false),
        Field::new("RR", DataType::Float64, false),
        Field::new("LAT", DataType::Float64, true),
        Field::new("LON", DataType::Float64, true),
        Field::new("pol_insee_code", DataType::Utf8, false),
    ]));

    let f64_col = |f: fn(&Row) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let opt_col = |f: fn(&Row) -> Option<f64>| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            f64_col(|r| r.claim_nb),
            f64_col(|r| r.claim_amount),
            f64_col(|r| r.tx),
            f64_col(|r| r.rr),
            opt_col(|r| r.lat),
            opt_col(|r| r.lon),
            Arc::new(StringArray::from(rows.iter().map(|r| r.insee).collect::<Vec<_>>())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut output = PathBuf::from("dataset_fin.csv");
    let mut parquet = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--parquet" => parquet = true,
            _ => output = PathBuf::from(arg),
        }
    }

    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    let bytes = to_csv_bytes(&to_table(&rows)?)?;
    std::fs::write(&output, bytes).with_context(|| format!("writing {}", output.display()))?;
    println!("Wrote {} rows to {}", rows.len(), output.display());

    if parquet {
        let path = output.with_extension("parquet");
        write_parquet(&rows, &path)?;
        println!("Wrote {} rows to {}", rows.len(), path.display());
    }
    Ok(())
}
