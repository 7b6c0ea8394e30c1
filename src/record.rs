// Record parser: string rows -> typed records

use log::warn;
use serde::{Deserialize, Serialize};

use crate::data::PlotData;
use crate::error::{ChartError, ChartWarning};

/// What to do with a row whose numeric field does not coerce.
/// The choice applies uniformly to every row of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParsePolicy {
    /// First malformed row fails the whole dataset
    #[default]
    #[serde(rename = "abort")]
    Abort,
    /// Malformed rows are dropped and reported as warnings
    #[serde(rename = "skip")]
    SkipRow,
}

/// A record shape that can be built from the named columns of one row
pub trait FromRow: Sized {
    /// Required columns, in the order `from_row` receives their values
    const COLUMNS: &'static [&'static str];

    fn from_row(row: usize, fields: &[&str]) -> Result<Self, ChartError>;
}

/// Box-plot input: one post's like count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementRecord {
    pub platform: String,
    pub likes: f64,
}

/// Grouped-bar input: average likes per platform and post type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AveragedRecord {
    pub platform: String,
    pub post_type: String,
    pub like_avg: f64,
}

/// Line-chart input: average likes for one date label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimePoint {
    pub date: String,
    pub like_avg: f64,
}

impl FromRow for EngagementRecord {
    const COLUMNS: &'static [&'static str] = &["Platform", "Likes"];

    fn from_row(row: usize, fields: &[&str]) -> Result<Self, ChartError> {
        Ok(Self {
            platform: fields[0].to_string(),
            likes: parse_number(row, Self::COLUMNS[1], fields[1])?,
        })
    }
}

impl FromRow for AveragedRecord {
    const COLUMNS: &'static [&'static str] = &["Platform", "PostType", "LikeAvg"];

    fn from_row(row: usize, fields: &[&str]) -> Result<Self, ChartError> {
        Ok(Self {
            platform: fields[0].to_string(),
            post_type: fields[1].to_string(),
            like_avg: parse_number(row, Self::COLUMNS[2], fields[2])?,
        })
    }
}

impl FromRow for TimePoint {
    const COLUMNS: &'static [&'static str] = &["Date", "LikeAvg"];

    fn from_row(row: usize, fields: &[&str]) -> Result<Self, ChartError> {
        Ok(Self {
            date: fields[0].to_string(),
            like_avg: parse_number(row, Self::COLUMNS[1], fields[1])?,
        })
    }
}

/// Coerce one field to a finite number
pub fn parse_number(row: usize, field: &str, raw: &str) -> Result<f64, ChartError> {
    let malformed = || ChartError::MalformedRecord {
        row,
        field: field.to_string(),
        value: raw.to_string(),
    };

    let value = raw.trim().parse::<f64>().map_err(|_| malformed())?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(malformed())
    }
}

/// Typed records plus the rows dropped under `ParsePolicy::SkipRow`
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub records: Vec<T>,
    pub skipped: Vec<ChartWarning>,
}

/// Parse every row of `data` into `T`.
///
/// Missing columns always fail the dataset. Row-level failures follow
/// `policy`. A dataset left with no records fails with `EmptyDataset`.
pub fn parse_records<T: FromRow>(data: &PlotData, policy: ParsePolicy) -> Result<Parsed<T>, ChartError> {
    let indices = T::COLUMNS
        .iter()
        .map(|name| data.column_index(name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut records = Vec::with_capacity(data.rows.len());
    let mut skipped = Vec::new();

    for (row_idx, row) in data.rows.iter().enumerate() {
        match parse_row::<T>(row_idx, row, &indices) {
            Ok(record) => records.push(record),
            Err(err) => match policy {
                ParsePolicy::Abort => return Err(err),
                ParsePolicy::SkipRow => {
                    warn!("Skipping row {}: {}", row_idx, err);
                    skipped.push(ChartWarning::SkippedRow {
                        row: row_idx,
                        reason: err.to_string(),
                    });
                }
            },
        }
    }

    if records.is_empty() {
        return Err(ChartError::EmptyDataset);
    }

    Ok(Parsed { records, skipped })
}

fn parse_row<T: FromRow>(row_idx: usize, row: &[String], indices: &[usize]) -> Result<T, ChartError> {
    let mut fields = Vec::with_capacity(indices.len());
    for (&idx, name) in indices.iter().zip(T::COLUMNS) {
        let value = row.get(idx).ok_or_else(|| ChartError::MissingField {
            row: row_idx,
            field: name.to_string(),
        })?;
        fields.push(value.as_str());
    }
    T::from_row(row_idx, &fields)
}
