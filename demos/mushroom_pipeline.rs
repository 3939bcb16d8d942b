//! Mushroom preprocessing run
//!
//! Reproduces the preparatory stage of a tuning experiment on the UCI
//! mushroom data:
//! - ordinal-encode the `class` target, one-hot encode every other column
//! - split off the target and hold out a test partition
//! - corrupt both partitions with seeded missing values
//! - impute both with one iterative imputer fit on train
//! - score the imputation on exactly the corrupted cells
//!
//! Run with: cargo run --example mushroom_pipeline [path/to/mushroom.csv] [config.json]
//!
//! Without a path a small built-in sample is used. Set `RUST_LOG=debug` to
//! see per-column and per-round events.

use std::error::Error;
use tabprep::dataset::csv::{read_csv, read_csv_path};
use tabprep::pipeline::{StepPipeline, WorkingSet};
use tabprep::preprocessing::{EncodingStrategy, MissingDataSimulator};
use tabprep::{DataFrame, PreprocessingConfig};
use tracing_subscriber::EnvFilter;

const SAMPLE: &str = "\
class,cap-shape,cap-color,odor,gill-size,ring-number
p,x,n,p,n,o
e,x,y,a,b,o
e,b,w,l,b,o
p,x,w,p,n,o
e,x,g,n,b,o
e,x,y,a,b,o
e,b,w,a,b,o
e,b,w,l,b,o
p,x,w,p,n,o
e,b,y,a,b,o
e,x,y,l,b,o
e,x,y,a,b,o
e,b,y,a,b,o
p,x,w,p,n,o
e,x,n,n,b,o
e,s,g,n,b,o
e,f,w,n,b,o
p,x,n,p,n,o
p,x,w,p,n,o
p,b,n,p,n,o
e,x,y,a,b,o
e,x,y,l,b,o
e,b,y,l,b,o
e,b,w,a,b,o
e,x,w,l,b,o
e,x,y,a,b,o
";

fn load(path: Option<&String>) -> Result<DataFrame, Box<dyn Error>> {
    Ok(match path {
        Some(path) => read_csv_path(path)?,
        None => read_csv(SAMPLE.as_bytes())?,
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let data = load(args.get(1))?;
    let mut config = match args.get(2) {
        Some(path) => PreprocessingConfig::from_json_file(path)?,
        None => PreprocessingConfig::default(),
    };

    // Ordinal for the target, one-hot for every other categorical column.
    if config.encoding.strategies.is_empty() {
        config.encoding.strategies = data
            .categorical_columns()
            .iter()
            .map(|c| EncodingStrategy::from(c == "class"))
            .collect();
    }
    config.simulator.chance = config.simulator.chance.max(0.2);
    config.imputer.max_iter = config.imputer.max_iter.min(5);

    println!("=== Mushroom preprocessing ===");
    println!("Rows: {}, columns: {}", data.n_rows(), data.n_cols());
    println!("Categorical columns: {:?}", data.categorical_columns());

    let pipeline = StepPipeline::from_config(&config, "class")?;
    println!("Steps: {:?}", pipeline.step_names());

    let mut ws = WorkingSet::new().with("data", data);
    pipeline.run(&mut ws)?;

    let encoders = ws.encoders("encoders")?;
    for (column, encoder) in encoders.iter() {
        println!("  {:<14} {}", column, encoder.strategy_name());
    }

    // Score imputation on the cells the simulator nulled in the test split.
    let encoded = ws.frame("data")?;
    let x_test = ws.frame("x_test")?;
    let n_train = ws.frame("x_train")?.n_rows();
    let truth = encoded
        .select(&x_test.column_names())?
        .slice_rows(n_train..encoded.n_rows())?;
    let mask = MissingDataSimulator::from_config(config.simulator.clone())
        .mask(x_test.n_rows(), x_test.n_cols())?;

    let mut sq_err = 0.0;
    let mut count = 0usize;
    for (row, flags) in mask.iter().enumerate() {
        for (col, &hit) in flags.iter().enumerate() {
            let expected = truth.get(row, col).and_then(|c| c.as_f64());
            let imputed = x_test.get(row, col).and_then(|c| c.as_f64());
            if let (true, Some(e), Some(i)) = (hit, expected, imputed) {
                sq_err += (e - i).powi(2);
                count += 1;
            }
        }
    }

    println!("\n=== Results ===");
    println!("Train rows: {}, test rows: {}", n_train, x_test.n_rows());
    println!("Imputed test cells: {}", count);
    if count > 0 {
        println!("Imputation MSE on test: {:.4}", sq_err / count as f64);
    }
    Ok(())
}
