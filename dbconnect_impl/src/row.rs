use crate::{DbError, DbResult, DbValue, ResultSetMetadata};
use std::sync::Arc;

/// A single value of a [`Row`], together with the index of the column it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    col_idx: usize,
    value: DbValue,
}

impl Cell {
    /// The index of the column this value belongs to.
    pub fn col_idx(&self) -> usize {
        self.col_idx
    }

    /// The value.
    pub fn value(&self) -> &DbValue {
        &self.value
    }

    /// Converts the cell into its value.
    pub fn into_value(self) -> DbValue {
        self.value
    }
}

/// A single line of a `ResultSet`, consisting of the contained `Cell`s and
/// a reference to the metadata.
///
/// You can access individual values with `row[idx]`, by name with
/// [`Row::value_by_name`], or iterate over the cells.
#[derive(Clone, Debug)]
pub struct Row {
    metadata: Arc<ResultSetMetadata>,
    cells: Vec<Cell>,
}

impl Row {
    pub(crate) fn new(metadata: Arc<ResultSetMetadata>, values: Vec<DbValue>) -> Self {
        Self {
            metadata,
            cells: values
                .into_iter()
                .enumerate()
                .map(|(col_idx, value)| Cell { col_idx, value })
                .collect(),
        }
    }

    /// Returns the length of the row.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the row contains no value.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the cell at the given column index.
    pub fn get(&self, col_idx: usize) -> Option<&Cell> {
        self.cells.get(col_idx)
    }

    /// Returns the value of the first column with the given name.
    pub fn value_by_name(&self, name: &str) -> Option<&DbValue> {
        self.metadata
            .index_of(name)
            .and_then(|idx| self.cells.get(idx))
            .map(Cell::value)
    }

    /// Iterates over the cells, in column order.
    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    /// Returns the metadata.
    pub fn metadata(&self) -> &ResultSetMetadata {
        &self.metadata
    }

    /// Converts the row into its values, in column order.
    pub fn into_values(self) -> Vec<DbValue> {
        self.cells.into_iter().map(Cell::into_value).collect()
    }

    /// Converts itself in the single contained value.
    ///
    /// # Errors
    ///
    /// `DbError::Usage` if the row is empty or has more than one value.
    pub fn into_single_value(self) -> DbResult<DbValue> {
        if self.len() > 1 {
            Err(DbError::Usage("Row has more than one field"))
        } else {
            self.into_values()
                .pop()
                .ok_or(DbError::Usage("Row is empty"))
        }
    }
}

impl std::ops::Index<usize> for Row {
    type Output = DbValue;
    fn index(&self, col_idx: usize) -> &DbValue {
        &self.cells[col_idx].value
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;
    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

impl IntoIterator for Row {
    type Item = Cell;
    type IntoIter = std::vec::IntoIter<Cell>;
    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}

impl std::fmt::Display for Row {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        for cell in &self.cells {
            write!(fmt, "| {} ", cell.value)?;
        }
        write!(fmt, "|")
    }
}
