use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct CsvData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Read a headed CSV table from any reader
pub fn read_csv<R: Read>(source: R) -> Result<CsvData> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(source);

    let headers = reader
        .headers()
        .context("Failed to read CSV headers")?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("Failed to read CSV record")?;
        let row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(anyhow!("CSV must contain at least one data row"));
    }

    Ok(CsvData { headers, rows })
}

pub fn read_csv_from_stdin() -> Result<CsvData> {
    read_csv(io::stdin())
}

pub fn read_csv_from_path(path: &Path) -> Result<CsvData> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open CSV file '{}'", path.display()))?;
    read_csv(file).with_context(|| format!("Failed to load '{}'", path.display()))
}
