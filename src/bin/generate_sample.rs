use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

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
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
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

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// One row in the column layout of the credit-risk export.
#[derive(Serialize)]
struct SampleRow {
    person_age: i64,
    person_income: i64,
    person_home_ownership: &'static str,
    loan_intent: &'static str,
    loan_amnt: i64,
    loan_int_rate: f64,
    loan_status: i64,
    xgb_prediction: i64,
    rf_prediction: i64,
    logreg_prediction: i64,
}

const HOME_OWNERSHIP: [&str; 4] = ["RENT", "OWN", "MORTGAGE", "OTHER"];
const LOAN_INTENT: [&str; 6] = [
    "DEBTCONSOLIDATION",
    "EDUCATION",
    "HOMEIMPROVEMENT",
    "MEDICAL",
    "PERSONAL",
    "VENTURE",
];

fn generate_row(rng: &mut SimpleRng) -> SampleRow {
    let age = rng.range(20.0, 70.0).round() as i64;
    let income = (rng.range(9_000.0, 180_000.0) / 100.0).round() as i64 * 100;
    let loan_amnt = (rng.range(500.0, 35_000.0) / 25.0).round() as i64 * 25;
    let rate = (rng.range(5.4, 23.2) * 100.0).round() / 100.0;

    // Risk grows with the loan-to-income ratio and the interest rate.
    let risk = (loan_amnt as f64 / income as f64) * 1.5 + (rate - 5.0) / 30.0;
    let status = rng.chance(risk.clamp(0.02, 0.95));

    // Each predictor is right with its own probability.
    let mut predict = |accuracy: f64| {
        let correct = rng.chance(accuracy);
        i64::from(status == correct)
    };
    let xgb = predict(0.93);
    let rf = predict(0.91);
    let logreg = predict(0.84);

    SampleRow {
        person_age: age,
        person_income: income,
        person_home_ownership: rng.pick(&HOME_OWNERSHIP),
        loan_intent: rng.pick(&LOAN_INTENT),
        loan_amnt,
        loan_int_rate: rate,
        loan_status: i64::from(status),
        xgb_prediction: xgb,
        rf_prediction: rf,
        logreg_prediction: logreg,
    }
}

fn write_csv(path: &PathBuf, rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &PathBuf, rows: &[SampleRow]) -> Result<()> {
    let int_col = |f: fn(&SampleRow) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let str_col = |f: fn(&SampleRow) -> &'static str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("person_age", DataType::Int64, false),
        Field::new("person_income", DataType::Int64, false),
        Field::new("person_home_ownership", DataType::Utf8, false),
        Field::new("loan_intent", DataType::Utf8, false),
        Field::new("loan_amnt", DataType::Int64, false),
        Field::new("loan_int_rate", DataType::Float64, false),
        Field::new("loan_status", DataType::Int64, false),
        Field::new("xgb_prediction", DataType::Int64, false),
        Field::new("rf_prediction", DataType::Int64, false),
        Field::new("logreg_prediction", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            int_col(|r| r.person_age),
            int_col(|r| r.person_income),
            str_col(|r| r.person_home_ownership),
            str_col(|r| r.loan_intent),
            int_col(|r| r.loan_amnt),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.loan_int_rate).collect::<Vec<_>>(),
            )),
            int_col(|r| r.loan_status),
            int_col(|r| r.xgb_prediction),
            int_col(|r| r.rf_prediction),
            int_col(|r| r.logreg_prediction),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

/// Write a synthetic loan dataset as `loans.csv` and `loans.parquet`.
#[derive(Parser, Debug)]
#[command(name = "generate_sample", about)]
struct Args {
    /// Output directory
    #[arg(default_value = ".")]
    out_dir: PathBuf,

    /// Number of loan records
    #[arg(long, default_value_t = 5_000)]
    rows: usize,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let out_dir = args.out_dir;
    std::fs::create_dir_all(&out_dir).context("creating output directory")?;

    let mut rng = SimpleRng::new(args.seed);
    let rows: Vec<SampleRow> = (0..args.rows).map(|_| generate_row(&mut rng)).collect();

    let csv_path = out_dir.join("loans.csv");
    write_csv(&csv_path, &rows)?;
    log::info!("wrote {} rows to {}", rows.len(), csv_path.display());

    let parquet_path = out_dir.join("loans.parquet");
    write_parquet(&parquet_path, &rows)?;
    log::info!("wrote {} rows to {}", rows.len(), parquet_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn out_dir_defaults_to_current_directory() {
        Args::command().debug_assert();
        let args = Args::try_parse_from(["generate_sample"]).unwrap();
        assert_eq!(args.out_dir, PathBuf::from("."));
        assert_eq!(args.rows, 5_000);

        let args = Args::try_parse_from(["generate_sample", "out", "--rows", "10"]).unwrap();
        assert_eq!(args.out_dir, PathBuf::from("out"));
        assert_eq!(args.rows, 10);
    }

    #[test]
    fn same_seed_same_rows() {
        let mut a = SimpleRng::new(7);
        let mut b = SimpleRng::new(7);
        let ra = generate_row(&mut a);
        let rb = generate_row(&mut b);
        assert_eq!(ra.person_age, rb.person_age);
        assert_eq!(ra.loan_amnt, rb.loan_amnt);
        assert!((0..=1).contains(&ra.xgb_prediction));
    }
}
