//! CSV upload parsing and required-column validation.

use crate::error::ServiceError;
use crate::models::{FEATURE_COLS, TARGET_COL};

/// A parsed training upload: feature rows in `FEATURE_COLS` order plus the
/// target column, with any extra CSV columns already dropped.
#[derive(Debug)]
pub struct Dataset {
    pub rows: Vec<Vec<String>>,
    pub labels: Vec<String>,
}

/// Parses an uploaded CSV and pulls out the six feature columns and the
/// target column by name. Column order in the file does not matter and
/// unknown columns are ignored.
pub fn parse_csv(bytes: &[u8]) -> Result<Dataset, ServiceError> {
    let mut reader = csv::ReaderBuilder::new().from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| ServiceError::CsvParse(e.to_string()))?
        .clone();

    let position = |name: &str| headers.iter().position(|h| h == name);

    let missing: Vec<String> = FEATURE_COLS
        .iter()
        .chain(std::iter::once(&TARGET_COL))
        .filter(|c| position(c).is_none())
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ServiceError::MissingColumns(missing));
    }

    // Presence was just checked, so the lookups cannot fail.
    let feature_idx: Vec<usize> = FEATURE_COLS.iter().filter_map(|c| position(c)).collect();
    let target_idx = position(TARGET_COL).unwrap_or_default();

    let mut rows = Vec::new();
    let mut labels = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ServiceError::CsvParse(e.to_string()))?;
        let row = feature_idx
            .iter()
            .map(|&i| record.get(i).unwrap_or_default().trim().to_string())
            .collect();
        rows.push(row);
        labels.push(record.get(target_idx).unwrap_or_default().trim().to_string());
    }

    if rows.is_empty() {
        return Err(ServiceError::InsufficientData(
            "the CSV contains no data rows".to_string(),
        ));
    }

    Ok(Dataset { rows, labels })
}
