use arrow2::{
    array::Array,
    chunk::Chunk,
    datatypes::{Field, Schema},
};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::{collections::HashSet, fmt, sync::Arc};

use crate::{
    frame::{
        FrameError, Result, Value,
        column::{Column, ColumnData, default_index},
    },
    helpers::compare_helpers::selected_positions,
};

/// In-memory table: ordered named columns sharing one row index
///
/// Every operation returns a new table; inputs are never modified.
///
/// # Examples
///
/// ```rust
/// # use columnar_masks::{Table, TableMasks, Value};
/// let table = Table::new()
///     .with_column("x", vec![1i64, 2, 3]).unwrap()
///     .with_column("name", vec!["a", "b", "c"]).unwrap();
/// let big = table.gt_mask("x", &Value::Int(1)).unwrap();
/// assert_eq!(big.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    index: Vec<Value>,
    names: Vec<String>,
    columns: Vec<ColumnData>,
}

impl Table {
    /// Create an empty table
    pub fn new() -> Self {
        Table {
            index: Vec::new(),
            names: Vec::new(),
            columns: Vec::new(),
        }
    }

    pub(crate) fn from_parts(index: Vec<Value>, names: Vec<String>, columns: Vec<ColumnData>) -> Self {
        Table {
            index,
            names,
            columns,
        }
    }

    /// Append a column.
    ///
    /// The first column of a table without an explicit index sets a default
    /// `0..n` index; later columns must match its length.
    ///
    /// # Errors
    /// [`FrameError::DuplicateColumn`] if `name` is taken,
    /// [`FrameError::LengthMismatch`] if the length differs from the index.
    pub fn with_column(mut self, name: &str, data: impl Into<ColumnData>) -> Result<Self> {
        let data = data.into();
        if self.names.iter().any(|n| n == name) {
            return Err(FrameError::DuplicateColumn(name.to_string()));
        }

        if self.columns.is_empty() && self.index.is_empty() {
            self.index = default_index(data.len());
        } else if data.len() != self.index.len() {
            return Err(FrameError::LengthMismatch {
                expected: self.index.len(),
                actual: data.len(),
            });
        }

        self.names.push(name.to_string());
        self.columns.push(data);
        Ok(self)
    }

    /// Replace the row labels.
    pub fn with_index(mut self, index: Vec<Value>) -> Result<Self> {
        if !self.columns.is_empty() && index.len() != self.index.len() {
            return Err(FrameError::LengthMismatch {
                expected: self.index.len(),
                actual: index.len(),
            });
        }
        self.index = index;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn index(&self) -> &[Value] {
        &self.index
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub(crate) fn columns(&self) -> &[ColumnData] {
        &self.columns
    }

    pub fn get_col(&self, col_name: &str) -> Result<&ColumnData> {
        let col_pos = self
            .names
            .iter()
            .position(|cn| cn == col_name)
            .ok_or_else(|| FrameError::MissingColumn(col_name.to_string()))?;

        Ok(&self.columns[col_pos])
    }

    /// Extract a column together with the table's row labels.
    pub fn column(&self, col_name: &str) -> Result<Column> {
        let data = self.get_col(col_name)?.clone();
        Ok(Column::from_parts(
            Some(col_name.to_string()),
            self.index.clone(),
            data,
        ))
    }

    /// Values of one row in column order.
    pub fn row(&self, idx: usize) -> Option<Vec<Value>> {
        if idx >= self.len() {
            return None;
        }
        self.columns.iter().map(|c| c.get(idx)).collect()
    }

    /// Keep the rows where `mask` is set, in original order.
    pub fn filter_rows(&self, mask: &[bool]) -> Result<Table> {
        if mask.len() != self.len() {
            return Err(FrameError::LengthMismatch {
                expected: self.len(),
                actual: mask.len(),
            });
        }
        Ok(self.take(&selected_positions(mask)))
    }

    /// Gather the rows at `positions`; columns are gathered in parallel.
    pub fn take(&self, positions: &[usize]) -> Table {
        let columns: Vec<ColumnData> = self
            .columns
            .par_iter()
            .map(|col| col.take(positions))
            .collect();

        Table {
            index: positions.iter().map(|&i| self.index[i].clone()).collect(),
            names: self.names.clone(),
            columns,
        }
    }

    /// Stable ascending sort on one column, missing values last.
    pub fn sort_by(&self, key: &str) -> Result<Table> {
        let col = self.get_col(key)?;
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&a, &b| col.cmp_rows(a, b));
        Ok(self.take(&order))
    }

    /// Drop rows whose values repeat an earlier row (labels are ignored).
    pub fn drop_duplicates(&self) -> Table {
        let mut seen: HashSet<Vec<Value>> = HashSet::with_capacity(self.len());
        let keep: Vec<bool> = (0..self.len())
            .map(|i| {
                let row: Vec<Value> = self.columns.iter().filter_map(|c| c.get(i)).collect();
                seen.insert(row)
            })
            .collect();

        self.take(&selected_positions(&keep))
    }

    /// Export the table as an Arrow schema plus one chunk of arrays.
    pub fn to_arrow(&self) -> (Schema, Chunk<Arc<dyn Array>>) {
        let fields: Vec<Field> = self
            .names
            .iter()
            .zip(&self.columns)
            .map(|(name, col)| Field::new(name, col.column_type().arrow_type(), true))
            .collect();

        let schema = Schema::from(fields);

        let arrays: Vec<Arc<dyn Array>> = self.columns.par_iter().map(|col| col.to_arrow()).collect();

        (schema, Chunk::new(arrays))
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "index")?;
        for name in &self.names {
            write!(f, "\t{name}")?;
        }
        writeln!(f)?;

        for (i, label) in self.index.iter().enumerate() {
            write!(f, "{label}")?;
            for col in &self.columns {
                write!(f, "\t{}", col.get(i).unwrap_or(Value::Null))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
