use crate::{json, DbError, DbResult, DbValue, ResultSetMetadata, Row};
use std::sync::Arc;

/// The result of a database query.
///
/// This is essentially a set of `Row`s, and each `Row` is a set of `Cell`s,
/// each holding a [`DbValue`](crate::DbValue).
///
/// The result set is completely transported when it is returned by
/// [`Connection::select`](crate::sync::Connection::select); it is owned by the caller and
/// stays valid when the connection is used further, or closed.
///
/// ```rust, no_run
/// # use dbconnect::{Connection, DbResult};
/// # fn main() -> DbResult<()> {
/// # let mut connection = Connection::new("sqlite::memory:")?;
/// let resultset = connection.select("select id, name from t")?;
/// println!("rows: {}, col: {}", resultset.row_count(), resultset.column_count());
/// for row in &resultset {
///     println!("{row}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct ResultSet {
    metadata: Arc<ResultSetMetadata>,
    rows: Vec<Row>,
    cleaned: bool,
}

impl ResultSet {
    pub(crate) fn new(metadata: Arc<ResultSetMetadata>, rows: Vec<Vec<DbValue>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|values| Row::new(Arc::clone(&metadata), values))
            .collect();
        Self {
            metadata,
            rows,
            cleaned: false,
        }
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of columns.
    pub fn column_count(&self) -> usize {
        self.metadata.len()
    }

    /// Returns true if the result set contains no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Access to metadata.
    pub fn metadata(&self) -> &ResultSetMetadata {
        &self.metadata
    }

    /// Returns the row with the given index.
    pub fn get(&self, row_idx: usize) -> Option<&Row> {
        self.rows.get(row_idx)
    }

    /// Returns the value at the given position.
    pub fn value(&self, row_idx: usize, col_idx: usize) -> Option<&DbValue> {
        self.rows
            .get(row_idx)
            .and_then(|row| row.get(col_idx))
            .map(crate::Cell::value)
    }

    /// Iterates over the rows, in the order in which the database delivered them.
    pub fn rows(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Releases all values.
    ///
    /// Afterwards the result set has no rows, while its metadata remain available.
    /// Calling `clean()` again is a no-op. There is no need to call this method before dropping
    /// the result set.
    pub fn clean(&mut self) {
        if self.cleaned {
            trace!("ResultSet::clean(): already cleaned");
            return;
        }
        self.rows = Vec::new();
        self.cleaned = true;
    }

    /// Returns true if [`clean`](ResultSet::clean) was called.
    pub fn is_cleaned(&self) -> bool {
        self.cleaned
    }

    /// Converts the resultset into a single row.
    ///
    /// # Errors
    ///
    /// `DbError::Usage` if the resultset contains more than a single row, or is empty.
    pub fn into_single_row(mut self) -> DbResult<Row> {
        match self.rows.len() {
            0 => Err(DbError::Usage("Resultset is empty")),
            1 => self.rows.pop().ok_or(DbError::Impl("row vanished")),
            _ => Err(DbError::Usage("Resultset has more than one row")),
        }
    }

    /// Converts the resultset into a single value.
    ///
    /// # Errors
    ///
    /// `DbError::Usage` if the resultset contains more than a single value, or is empty.
    pub fn into_single_value(self) -> DbResult<DbValue> {
        self.into_single_row()?.into_single_value()
    }

    /// Converts the resultset into its rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Returns the JSON projection of the result set.
    ///
    /// Each row becomes an object that maps column names to values;
    /// INT and DOUBLE values become JSON numbers (non-finite doubles become `null`),
    /// TEXT values become strings, TIMESTAMP values strings in the form
    /// `YYYY-MM-DD HH:MM:SS`, and BLOB values base64-encoded strings.
    pub fn to_json(&self) -> serde_json::Value {
        json::rows_to_json(&self.rows)
    }
}

impl IntoIterator for ResultSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;
    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;
    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl std::fmt::Display for ResultSet {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(fmt, "rows: {}, col: {}", self.row_count(), self.column_count())?;
        writeln!(fmt, "{}", self.metadata)?;
        for row in &self.rows {
            writeln!(fmt, "{row}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::ResultSet;
    use crate::{DbError, DbValue, FieldMetadata, ResultSetMetadata};
    use std::sync::Arc;

    fn two_by_two() -> ResultSet {
        let md = Arc::new(ResultSetMetadata::new(vec![
            FieldMetadata::new("id", "INTEGER"),
            FieldMetadata::new("name", "TEXT"),
        ]));
        ResultSet::new(
            md,
            vec![
                vec![DbValue::INT(1), DbValue::from("a")],
                vec![DbValue::INT(2), DbValue::from("b")],
            ],
        )
    }

    #[test]
    fn test_dimensions_and_access() {
        let rs = two_by_two();
        assert_eq!(2, rs.row_count());
        assert_eq!(2, rs.column_count());
        assert_eq!(Some(&DbValue::from("b")), rs.value(1, 1));
        assert_eq!(None, rs.value(2, 0));
        let row = rs.get(0).unwrap();
        assert_eq!(DbValue::INT(1), row[0]);
        assert_eq!(Some(&DbValue::from("a")), row.value_by_name("name"));
        for (i, cell) in row.iter().enumerate() {
            assert_eq!(i, cell.col_idx());
        }
        assert!(two_by_two().into_single_row().is_err());
    }

    #[test]
    fn test_single_row() {
        let md = Arc::new(ResultSetMetadata::new(vec![FieldMetadata::new("n", "INTEGER")]));
        let rs = ResultSet::new(Arc::clone(&md), vec![vec![DbValue::INT(7)]]);
        assert_eq!(DbValue::INT(7), rs.into_single_value().unwrap());

        let empty = ResultSet::new(md, vec![]);
        assert!(matches!(empty.into_single_row(), Err(DbError::Usage(_))));
        assert!(matches!(
            two_by_two().into_single_row(),
            Err(DbError::Usage(_))
        ));
    }

    #[test]
    fn test_clean_is_idempotent() {
        let mut rs = two_by_two();
        let copy = rs.clone();
        rs.clean();
        assert!(rs.is_cleaned());
        assert_eq!(0, rs.row_count());
        assert_eq!(2, rs.column_count());
        rs.clean();
        assert_eq!(0, rs.row_count());
        // clones own their values
        assert_eq!(2, copy.row_count());
    }
}
