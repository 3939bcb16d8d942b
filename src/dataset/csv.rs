//! Delimited-text ingestion.
//!
//! The schema is inferred exactly once, here: a column is `Numeric` when every
//! non-missing field parses as `f64`, otherwise `Categorical`. Downstream code
//! relies on the declared types and never re-inspects values.

use super::{Cell, Column, ColumnType, DataFrame};
use crate::preprocessing::error::Result;
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Field values (compared case-insensitively) read as the missing marker.
pub const MISSING_TOKENS: [&str; 5] = ["", "na", "nan", "null", "none"];

fn is_missing_token(field: &str) -> bool {
    let trimmed = field.trim();
    MISSING_TOKENS
        .iter()
        .any(|t| trimmed.eq_ignore_ascii_case(t))
}

/// Read a headed, comma-delimited table from any reader.
pub fn read_csv<R: Read>(reader: R) -> Result<DataFrame> {
    read_csv_with_delimiter(reader, b',')
}

/// Read a headed table with a custom single-byte delimiter.
pub fn read_csv_with_delimiter<R: Read>(reader: R, delimiter: u8) -> Result<DataFrame> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let mut raw: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

    for result in rdr.records() {
        let record = result?;
        for (j, field) in record.iter().enumerate().take(headers.len()) {
            raw[j].push((!is_missing_token(field)).then(|| field.trim().to_string()));
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, fields)| infer_column(name, fields))
        .collect::<Result<Vec<_>>>()?;

    let df = DataFrame::from_columns(columns)?;
    tracing::debug!(
        rows = df.n_rows(),
        cols = df.n_cols(),
        categorical = df.categorical_columns().len(),
        "Loaded table"
    );
    Ok(df)
}

/// Read a headed, comma-delimited file.
pub fn read_csv_path<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let file = File::open(path.as_ref())?;
    tracing::info!(path = %path.as_ref().display(), "Reading table");
    read_csv(BufReader::new(file))
}

fn infer_column(name: String, fields: Vec<Option<String>>) -> Result<Column> {
    let numeric = fields
        .iter()
        .flatten()
        .all(|f| f.parse::<f64>().is_ok());

    if numeric {
        let cells = fields
            .into_iter()
            .map(|f| f.and_then(|v| v.parse::<f64>().ok()).map_or(Cell::Missing, Cell::number))
            .collect();
        Column::new(name, ColumnType::Numeric, cells)
    } else {
        let cells = fields
            .into_iter()
            .map(|f| f.map_or(Cell::Missing, Cell::Text))
            .collect();
        Column::new(name, ColumnType::Categorical, cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_infers_schema() {
        let data = "class,cap-shape,weight\np,x,1.5\ne,b,2\ne,x,NA\n";
        let df = read_csv(data.as_bytes()).unwrap();

        assert_eq!(df.shape(), (3, 3));
        assert_eq!(
            df.categorical_columns(),
            vec!["class".to_string(), "cap-shape".to_string()]
        );
        assert_eq!(df.numeric_columns(), vec!["weight".to_string()]);
        assert_eq!(df.get(1, 2), Some(&Cell::Number(2.0)));
        assert_eq!(df.get(2, 2), Some(&Cell::Missing));
    }

    #[test]
    fn test_read_csv_missing_tokens() {
        let data = "a,b\n,x\nnull,NaN\n3,None\n";
        let df = read_csv(data.as_bytes()).unwrap();

        assert_eq!(df.column("a").unwrap().dtype(), ColumnType::Numeric);
        assert_eq!(df.column("a").unwrap().missing_count(), 2);
        assert_eq!(df.column("b").unwrap().dtype(), ColumnType::Categorical);
        assert_eq!(df.column("b").unwrap().missing_count(), 2);
    }

    #[test]
    fn test_read_csv_custom_delimiter() {
        let data = "a;b\n1;2\n";
        let df = read_csv_with_delimiter(data.as_bytes(), b';').unwrap();
        assert_eq!(df.shape(), (1, 2));
    }

    #[test]
    fn test_read_csv_path_missing_file() {
        let result = read_csv_path("/definitely/not/here.csv");
        assert!(matches!(
            result,
            Err(crate::preprocessing::PreprocessingError::Io(_))
        ));
    }
}
