use anyhow::{anyhow, bail, Context};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;
use std::path::Path;

use crate::error::{ChartError, Result};

pub const YEAR: &str = "Year";
pub const POPULATION: &str = "Population";
pub const FOREST_COVER: &str = "Forest cover";
pub const REGION: &str = "Region";

/// One input row before numeric coercion. Absent columns and empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Year", default)]
    pub year: Option<String>,
    #[serde(rename = "Population", default)]
    pub population: Option<String>,
    #[serde(rename = "Forest cover", default)]
    pub forest_cover: Option<String>,
    #[serde(rename = "Region", default)]
    pub region: Option<String>,
}

impl RawRow {
    pub fn new(year: &str, population: &str, forest_cover: &str, region: &str) -> Self {
        Self {
            year: Some(year.to_string()),
            population: Some(population.to_string()),
            forest_cover: Some(forest_cover.to_string()),
            region: Some(region.to_string()),
        }
    }
}

/// A single normalized observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub year: i32,
    pub population: f64,
    pub forest_cover: f64,
    pub region: i64,
}

/// Normalized observations in input row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Largest value of `value_fn` over the dataset, `None` when empty.
    pub fn max_of<F>(&self, value_fn: F) -> Option<f64>
    where
        F: Fn(&Record) -> f64,
    {
        self.records
            .iter()
            .map(value_fn)
            .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// =============================================================================
// Normalization
// =============================================================================

/// Convert raw rows into a dataset, dropping rows that fail numeric coercion.
pub fn normalize(rows: &[RawRow]) -> Dataset {
    let mut records = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        match normalize_row(idx + 1, row) {
            Ok(record) => records.push(record),
            Err(e) => warn!("skipping {}", e),
        }
    }
    debug!("normalized {} of {} rows", records.len(), rows.len());
    Dataset::new(records)
}

/// Like [`normalize`], but the first malformed row fails the whole operation.
pub fn normalize_strict(rows: &[RawRow]) -> Result<Dataset> {
    let records = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| normalize_row(idx + 1, row))
        .collect::<Result<Vec<_>>>()?;
    Ok(Dataset::new(records))
}

fn normalize_row(row: usize, raw: &RawRow) -> Result<Record> {
    Ok(Record {
        year: parse_integer(row, YEAR, &raw.year)?
            .try_into()
            .map_err(|_| malformed(row, YEAR, &raw.year))?,
        population: parse_number(row, POPULATION, &raw.population)?,
        forest_cover: parse_number(row, FOREST_COVER, &raw.forest_cover)?,
        region: parse_integer(row, REGION, &raw.region)?,
    })
}

fn parse_number(row: usize, field: &'static str, cell: &Option<String>) -> Result<f64> {
    cell.as_deref()
        .map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .ok_or_else(|| malformed(row, field, cell))
}

/// Integer codes may be written as "3" or "3.0"; fractional values are rejected.
fn parse_integer(row: usize, field: &'static str, cell: &Option<String>) -> Result<i64> {
    let text = cell.as_deref().map(str::trim).unwrap_or("");
    if let Ok(v) = text.parse::<i64>() {
        return Ok(v);
    }
    let v = parse_number(row, field, cell)?;
    if v.fract() != 0.0 || v.abs() >= i64::MAX as f64 {
        return Err(malformed(row, field, cell));
    }
    Ok(v as i64)
}

fn malformed(row: usize, field: &'static str, cell: &Option<String>) -> ChartError {
    ChartError::MalformedRow {
        row,
        field,
        value: cell.clone().unwrap_or_default(),
    }
}

// =============================================================================
// Loading
// =============================================================================

/// Read raw rows from CSV text with a header row.
pub fn load_csv<R: Read>(reader: R) -> anyhow::Result<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (idx, result) in rdr.deserialize::<RawRow>().enumerate() {
        let row = result.with_context(|| format!("Failed to read CSV record {}", idx + 1))?;
        rows.push(blank_to_none(row));
    }
    Ok(rows)
}

/// Read raw rows from a JSON array of objects.
pub fn load_json(value: &Value) -> anyhow::Result<Vec<RawRow>> {
    let array = value
        .as_array()
        .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

    let mut rows = Vec::with_capacity(array.len());
    for (idx, item) in array.iter().enumerate() {
        let obj = item
            .as_object()
            .ok_or_else(|| anyhow!("Item {} in array is not an object", idx + 1))?;

        let cell = |name: &str| -> anyhow::Result<Option<String>> {
            match obj.get(name) {
                Some(Value::String(s)) => Ok(Some(s.clone())),
                Some(Value::Number(n)) => Ok(Some(n.to_string())),
                Some(Value::Null) | None => Ok(None),
                _ => Err(anyhow!(
                    "Unsupported value type for field '{}' in item {}",
                    name,
                    idx + 1
                )),
            }
        };

        rows.push(blank_to_none(RawRow {
            year: cell(YEAR)?,
            population: cell(POPULATION)?,
            forest_cover: cell(FOREST_COVER)?,
            region: cell(REGION)?,
        }));
    }
    Ok(rows)
}

/// Load raw rows from a `.csv` or `.json` file.
pub fn load_path(path: &Path) -> anyhow::Result<Vec<RawRow>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            load_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let value: Value = serde_json::from_str(&text).context("Failed to parse JSON")?;
            load_json(&value)
        }
        other => bail!("Unsupported file extension: .{}", other),
    }
}

fn blank_to_none(row: RawRow) -> RawRow {
    let clean = |c: Option<String>| c.filter(|s| !s.trim().is_empty());
    RawRow {
        year: clean(row.year),
        population: clean(row.population),
        forest_cover: clean(row.forest_cover),
        region: clean(row.region),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_converts_fields() {
        let rows = vec![RawRow::new("2001", "1500.5", "32.25", "3")];
        let data = normalize(&rows);
        assert_eq!(data.len(), 1);
        assert_eq!(
            data.records()[0],
            Record { year: 2001, population: 1500.5, forest_cover: 32.25, region: 3 }
        );
    }

    #[test]
    fn test_normalize_drops_bad_rows_and_keeps_order() {
        let rows = vec![
            RawRow::new("2000", "10", "1", "1"),
            RawRow::new("2001", "abc", "2", "1"),
            RawRow::new("2002", "30", "NaN", "2"),
            RawRow { region: None, ..RawRow::new("2003", "40", "4", "2") },
            RawRow::new("2004", "50", "5", "2.0"),
            RawRow::new("2005", "60", "6", "2.5"),
        ];
        let data = normalize(&rows);
        let years: Vec<i32> = data.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2000, 2004]);
        assert_eq!(data.records()[1].region, 2);
    }

    #[test]
    fn test_normalize_rejects_out_of_range_region() {
        let rows = vec![
            RawRow::new("2000", "10", "1", "9223372036854775807"),
            RawRow::new("2001", "10", "1", "9223372036854775808.0"),
            RawRow::new("2002", "10", "1", "1e19"),
        ];
        let err = normalize_strict(&rows[1..2]).unwrap_err();
        assert!(matches!(err, ChartError::MalformedRow { field: REGION, .. }));

        let data = normalize(&rows);
        assert_eq!(data.len(), 1);
        assert_eq!(data.records()[0].region, i64::MAX);
    }

    #[test]
    fn test_normalize_strict_reports_row() {
        let rows = vec![
            RawRow::new("2000", "10", "1", "1"),
            RawRow::new("2001", "10", "", "1"),
        ];
        let err = normalize_strict(&rows).unwrap_err();
        assert_eq!(
            err,
            ChartError::MalformedRow { row: 2, field: FOREST_COVER, value: String::new() }
        );
    }

    #[test]
    fn test_load_csv_with_spaced_header() {
        let csv = "Year,Population,Forest cover,Region\n2000,100,25.5,1\n2001, 110 ,,2\n";
        let rows = load_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], RawRow::new("2000", "100", "25.5", "1"));
        assert_eq!(rows[1].population.as_deref(), Some("110"));
        assert_eq!(rows[1].forest_cover, None);
    }

    #[test]
    fn test_load_csv_ignores_extra_columns() {
        let csv = "Country,Year,Population,Forest cover,Region\nX,1999,5,6,7\n";
        let rows = load_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows, vec![RawRow::new("1999", "5", "6", "7")]);
    }

    #[test]
    fn test_load_json_values() {
        let value = serde_json::json!([
            {"Year": 2000, "Population": 100.5, "Forest cover": "20", "Region": 1},
            {"Year": 2001, "Population": null, "Forest cover": 21, "Region": 1}
        ]);
        let rows = load_json(&value).unwrap();
        assert_eq!(rows[0], RawRow::new("2000", "100.5", "20", "1"));
        assert_eq!(rows[1].population, None);
        assert_eq!(normalize(&rows).len(), 1);
    }

    #[test]
    fn test_load_json_rejects_nested_values() {
        let value = serde_json::json!([{"Year": [2000]}]);
        assert!(load_json(&value).is_err());
        assert!(load_json(&serde_json::json!({"Year": 1})).is_err());
    }

    #[test]
    fn test_max_of() {
        let data = normalize(&[
            RawRow::new("2000", "10", "4", "1"),
            RawRow::new("2000", "30", "2", "1"),
        ]);
        assert_eq!(data.max_of(|r| r.population), Some(30.0));
        assert_eq!(Dataset::default().max_of(|r| r.population), None);
    }
}
