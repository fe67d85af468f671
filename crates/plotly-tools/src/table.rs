//! A minimal column table used as input to the trace builders.
//!
//! Values are stored column-wise in an `Array2<f64>` (rows = index
//! positions) next to the column names, the same shape as a feature matrix
//! with its `feature_names`.
use ndarray::{Array2, ArrayView1};

use crate::error::{PlotError, Result};
use crate::trace::XValues;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    index: XValues,
    names: Vec<String>,
    values: Array2<f64>,
}

impl Table {
    /// Build a table from an index and named columns, keeping column order.
    pub fn new(index: impl Into<XValues>, columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        let index = index.into();
        let nrows = index.len();

        let mut names: Vec<String> = Vec::with_capacity(columns.len());
        for (name, values) in &columns {
            if values.len() != nrows {
                return Err(PlotError::invalid_input(format!(
                    "column '{}' has {} values but the index has {}",
                    name,
                    values.len(),
                    nrows
                )));
            }
            if names.contains(name) {
                return Err(PlotError::invalid_input(format!(
                    "duplicate column name '{}'",
                    name
                )));
            }
            names.push(name.clone());
        }

        let values = Array2::from_shape_fn((nrows, columns.len()), |(row, col)| {
            columns[col].1[row]
        });

        Ok(Self {
            index,
            names,
            values,
        })
    }

    /// A table indexed by row position `0..n`.
    pub fn with_range_index(columns: Vec<(String, Vec<f64>)>) -> Result<Self> {
        let nrows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let index: Vec<f64> = (0..nrows).map(|i| i as f64).collect();
        Self::new(index, columns)
    }

    pub fn index(&self) -> &XValues {
        &self.index
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Result<ArrayView1<'_, f64>> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.values.column(idx))
            .ok_or_else(|| PlotError::invalid_input(format!("no column named '{}'", name)))
    }

    /// Columns in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, ArrayView1<'_, f64>)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(move |(idx, name)| (name.as_str(), self.values.column(idx)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec![0.0, 1.0, 2.0],
            vec![
                ("a".to_string(), vec![1.0, 2.0, 3.0]),
                ("b".to_string(), vec![4.0, 5.0, 6.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_column_lookup() {
        let table = sample();
        assert_eq!(table.column("b").unwrap().to_vec(), vec![4.0, 5.0, 6.0]);
        assert_eq!(table.nrows(), 3);
        assert_eq!(table.ncols(), 2);
    }

    #[test]
    fn test_missing_column_names_it() {
        let err = sample().column("zz").unwrap_err();
        assert_eq!(err, PlotError::InvalidInput("no column named 'zz'".to_string()));
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let result = Table::new(vec![0.0, 1.0], vec![("a".to_string(), vec![1.0])]);
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let result = Table::with_range_index(vec![
            ("a".to_string(), vec![1.0]),
            ("a".to_string(), vec![2.0]),
        ]);
        assert!(result.is_err());
    }
}
