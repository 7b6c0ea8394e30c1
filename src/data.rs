use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::ChartError;

/// Loaded tabular input: a header row plus string-keyed data rows
#[derive(Debug, Clone)]
pub struct PlotData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl PlotData {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn from_csv(csv: crate::csv_reader::CsvData) -> Self {
        Self {
            headers: csv.headers,
            rows: csv.rows,
        }
    }

    /// Create PlotData from a JSON Array of Objects
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value.as_array().ok_or_else(||
            anyhow!("Input data must be a JSON array of objects")
        )?;

        if array.is_empty() {
            return Err(anyhow!("Input data array is empty"));
        }

        // Extract headers from the first object
        let first_obj = array[0].as_object().ok_or_else(||
            anyhow!("Items in array must be objects")
        )?;

        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut rows = Vec::new();
        for item in array {
            let obj = item.as_object().ok_or_else(||
                anyhow!("Items in array must be objects")
            )?;

            let mut row = Vec::new();
            for header in &headers {
                let val_str = match obj.get(header) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::Bool(b)) => b.to_string(),
                    Some(Value::Null) | None => "".to_string(),
                    _ => return Err(anyhow!("Unsupported value type for field '{}'", header)),
                };
                row.push(val_str);
            }
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// Load a dataset from disk. `.json` files are read as an array of
    /// objects, everything else as headed CSV.
    pub fn load(path: &Path) -> Result<Self> {
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read '{}'", path.display()))?;
            let value: Value = serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse JSON in '{}'", path.display()))?;
            Self::from_json(&value)
        } else {
            crate::csv_reader::read_csv_from_path(path).map(Self::from_csv)
        }
    }

    /// Resolve a column by name, ignoring ASCII case
    pub fn column_index(&self, name: &str) -> Result<usize, ChartError> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| ChartError::ColumnNotFound {
                column: name.to_string(),
                available: self.headers.join(", "),
            })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
