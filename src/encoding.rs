//! Categorical encodings fitted at training time and carried in the bundle.
//!
//! Category and label vocabularies are pinned to sorted order so that the
//! index spaces are stable across retrainings on the same data.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// One-hot encoder over string categories, one vocabulary per feature column.
///
/// A value unseen during fitting encodes to the all-zero slice for its
/// column rather than failing, so out-of-vocabulary inputs degrade instead
/// of erroring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneHotEncoder {
    categories: Vec<Vec<String>>,
}

impl OneHotEncoder {
    /// Fits one sorted, deduplicated vocabulary per column from the given
    /// rows. Every row must have the same number of columns.
    pub fn fit(rows: &[Vec<String>]) -> Self {
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut categories = vec![Vec::new(); n_cols];
        for (col, vocab) in categories.iter_mut().enumerate() {
            let mut seen: Vec<String> = rows.iter().map(|r| r[col].clone()).collect();
            seen.sort();
            seen.dedup();
            *vocab = seen;
        }
        Self { categories }
    }

    /// Total width of an encoded row.
    pub fn width(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    /// Encodes one row of raw values into its one-hot vector.
    pub fn transform_row(&self, row: &[String]) -> Vec<f32> {
        let mut out = vec![0.0; self.width()];
        let mut offset = 0;
        for (value, vocab) in row.iter().zip(&self.categories) {
            if let Ok(pos) = vocab.binary_search(value) {
                out[offset + pos] = 1.0;
            }
            offset += vocab.len();
        }
        out
    }

    /// Encodes all rows into a dense matrix, one encoded row per matrix row.
    pub fn transform(&self, rows: &[Vec<String>]) -> Array2<f32> {
        let mut matrix = Array2::zeros((rows.len(), self.width()));
        for (i, row) in rows.iter().enumerate() {
            for (j, v) in self.transform_row(row).into_iter().enumerate() {
                matrix[[i, j]] = v;
            }
        }
        matrix
    }
}

/// Bidirectional mapping between target labels and class indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelCodec {
    classes: Vec<String>,
}

impl LabelCodec {
    /// Fits the codec from the raw target column; indices follow the sorted
    /// order of the distinct labels.
    pub fn fit(labels: &[String]) -> Self {
        let mut classes: Vec<String> = labels.to_vec();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes.binary_search_by(|c| c.as_str().cmp(label)).ok()
    }

    pub fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }
}
