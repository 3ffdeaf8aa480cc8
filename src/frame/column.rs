use arrow2::array::{Array, Float64Array, Int64Array, MutableUtf8Array, Utf8Array};
use arrow2::datatypes::DataType;
use std::cmp::Ordering;
use std::sync::Arc;

use crate::frame::table::Table;
use crate::frame::{Comparator, FrameError, Result, Value};
use crate::helpers::compare_helpers::{mask_by, selected_positions};

/// Label given to a column without a name when it is wrapped as a table.
pub const UNNAMED_COLUMN: &str = "0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int64,
    Float64,
    Str,
}

impl ColumnType {
    pub fn arrow_type(self) -> DataType {
        match self {
            ColumnType::Int64 => DataType::Int64,
            ColumnType::Float64 => DataType::Float64,
            ColumnType::Str => DataType::Utf8,
        }
    }
}

/// Typed, nullable column storage
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int64(Vec<Option<i64>>),
    Float64(Vec<Option<f64>>),
    Str(Vec<Option<String>>),
}

impl ColumnData {
    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Int64(_) => ColumnType::Int64,
            ColumnData::Float64(_) => ColumnType::Float64,
            ColumnData::Str(_) => ColumnType::Str,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int64(v) => v.len(),
            ColumnData::Float64(v) => v.len(),
            ColumnData::Str(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Random access
    pub fn get(&self, idx: usize) -> Option<Value> {
        let value = match self {
            ColumnData::Int64(v) => v.get(idx)?.map_or(Value::Null, Value::Int),
            ColumnData::Float64(v) => v.get(idx)?.map_or(Value::Null, Value::Float),
            ColumnData::Str(v) => v
                .get(idx)?
                .as_ref()
                .map_or(Value::Null, |s| Value::Str(s.clone())),
        };
        Some(value)
    }

    pub fn values(&self) -> Vec<Value> {
        (0..self.len()).filter_map(|i| self.get(i)).collect()
    }

    /// Gather the rows at `positions`, in that order.
    pub fn take(&self, positions: &[usize]) -> ColumnData {
        match self {
            ColumnData::Int64(v) => ColumnData::Int64(positions.iter().map(|&i| v[i]).collect()),
            ColumnData::Float64(v) => {
                ColumnData::Float64(positions.iter().map(|&i| v[i]).collect())
            }
            ColumnData::Str(v) => {
                ColumnData::Str(positions.iter().map(|&i| v[i].clone()).collect())
            }
        }
    }

    /// Gather rows where `None` positions become nulls (outer join padding).
    pub fn take_optional(&self, positions: &[Option<usize>]) -> ColumnData {
        match self {
            ColumnData::Int64(v) => {
                ColumnData::Int64(positions.iter().map(|p| p.and_then(|i| v[i])).collect())
            }
            ColumnData::Float64(v) => {
                ColumnData::Float64(positions.iter().map(|p| p.and_then(|i| v[i])).collect())
            }
            ColumnData::Str(v) => ColumnData::Str(
                positions
                    .iter()
                    .map(|p| p.and_then(|i| v[i].clone()))
                    .collect(),
            ),
        }
    }

    /// Fill the nulls of `self` from `other` row by row.
    ///
    /// Both columns must have the same type and length.
    pub fn coalesce(&self, other: &ColumnData) -> Option<ColumnData> {
        if self.len() != other.len() {
            return None;
        }
        match (self, other) {
            (ColumnData::Int64(a), ColumnData::Int64(b)) => Some(ColumnData::Int64(
                a.iter().zip(b).map(|(x, y)| x.or(*y)).collect(),
            )),
            (ColumnData::Float64(a), ColumnData::Float64(b)) => Some(ColumnData::Float64(
                a.iter().zip(b).map(|(x, y)| x.or(*y)).collect(),
            )),
            (ColumnData::Str(a), ColumnData::Str(b)) => Some(ColumnData::Str(
                a.iter()
                    .zip(b)
                    .map(|(x, y)| x.clone().or_else(|| y.clone()))
                    .collect(),
            )),
            _ => None,
        }
    }

    /// Boolean mask of the rows where `element <cmp> value` holds.
    ///
    /// Integer and float columns compare numerically with both `Int` and
    /// `Float` operands; string columns only with `Str`. A `Null` operand
    /// is unordered against everything.
    pub fn compare_mask(&self, column: &str, cmp: Comparator, value: &Value) -> Result<Vec<bool>> {
        let mask = match (self, value) {
            (_, Value::Null) => vec![cmp.holds(None); self.len()],
            (ColumnData::Int64(v), Value::Int(t)) => mask_by(v, cmp, |x| Some(x.cmp(t))),
            (ColumnData::Int64(v), Value::Float(t)) => {
                mask_by(v, cmp, |x| (*x as f64).partial_cmp(t))
            }
            (ColumnData::Float64(v), Value::Int(_) | Value::Float(_)) => {
                let t = value.as_f64().unwrap_or(f64::NAN);
                mask_by(v, cmp, |x| x.partial_cmp(&t))
            }
            (ColumnData::Str(v), Value::Str(t)) => {
                mask_by(v, cmp, |x| Some(x.as_str().cmp(t.as_str())))
            }
            _ => {
                return Err(FrameError::IncomparableValue {
                    column: column.to_string(),
                    value: format!("{value:?}"),
                });
            }
        };
        Ok(mask)
    }

    /// Non-null, non-NaN values of a numeric column as `f64`.
    pub fn numeric_values(&self, column: &str) -> Result<Vec<f64>> {
        match self {
            ColumnData::Int64(v) => Ok(v.iter().flatten().map(|&x| x as f64).collect()),
            ColumnData::Float64(v) => Ok(v.iter().flatten().copied().filter(|x| !x.is_nan()).collect()),
            ColumnData::Str(_) => Err(FrameError::NonNumericColumn(column.to_string())),
        }
    }

    /// Ascending order of two rows, missing values (and NaN) last.
    pub fn cmp_rows(&self, a: usize, b: usize) -> Ordering {
        fn nulls_last<T, F: Fn(&T, &T) -> Ordering>(x: Option<&T>, y: Option<&T>, f: F) -> Ordering {
            match (x, y) {
                (Some(x), Some(y)) => f(x, y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }

        match self {
            ColumnData::Int64(v) => nulls_last(v[a].as_ref(), v[b].as_ref(), |x, y| x.cmp(y)),
            ColumnData::Float64(v) => {
                let x = v[a].as_ref().filter(|x| !x.is_nan());
                let y = v[b].as_ref().filter(|y| !y.is_nan());
                nulls_last(x, y, |x, y| x.total_cmp(y))
            }
            ColumnData::Str(v) => nulls_last(v[a].as_ref(), v[b].as_ref(), |x, y| x.cmp(y)),
        }
    }

    pub fn to_arrow(&self) -> Arc<dyn Array> {
        match self {
            ColumnData::Int64(v) => Arc::new(Int64Array::from(v.as_slice())) as Arc<dyn Array>,
            ColumnData::Float64(v) => Arc::new(Float64Array::from(v.as_slice())) as Arc<dyn Array>,
            ColumnData::Str(v) => {
                let mut arr = MutableUtf8Array::<i32>::with_capacity(v.len());
                for s in v {
                    arr.push(s.as_deref());
                }
                let array: Utf8Array<i32> = arr.into();
                Arc::new(array) as Arc<dyn Array>
            }
        }
    }
}

impl From<Vec<i64>> for ColumnData {
    fn from(v: Vec<i64>) -> Self {
        ColumnData::Int64(v.into_iter().map(Some).collect())
    }
}

impl From<Vec<Option<i64>>> for ColumnData {
    fn from(v: Vec<Option<i64>>) -> Self {
        ColumnData::Int64(v)
    }
}

impl From<Vec<f64>> for ColumnData {
    fn from(v: Vec<f64>) -> Self {
        ColumnData::Float64(v.into_iter().map(Some).collect())
    }
}

impl From<Vec<Option<f64>>> for ColumnData {
    fn from(v: Vec<Option<f64>>) -> Self {
        ColumnData::Float64(v)
    }
}

impl From<Vec<&str>> for ColumnData {
    fn from(v: Vec<&str>) -> Self {
        ColumnData::Str(v.into_iter().map(|s| Some(s.to_owned())).collect())
    }
}

impl From<Vec<Option<&str>>> for ColumnData {
    fn from(v: Vec<Option<&str>>) -> Self {
        ColumnData::Str(v.into_iter().map(|s| s.map(str::to_owned)).collect())
    }
}

impl From<Vec<String>> for ColumnData {
    fn from(v: Vec<String>) -> Self {
        ColumnData::Str(v.into_iter().map(Some).collect())
    }
}

/// Row labels `0..n`, used when no index is given.
pub fn default_index(len: usize) -> Vec<Value> {
    (0..len as i64).map(Value::Int).collect()
}

/// A single named column with its own row index (a "series")
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: Option<String>,
    index: Vec<Value>,
    data: ColumnData,
}

impl Column {
    pub fn new(data: impl Into<ColumnData>) -> Self {
        let data = data.into();
        Column {
            name: None,
            index: default_index(data.len()),
            data,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_index(mut self, index: Vec<Value>) -> Result<Self> {
        if index.len() != self.data.len() {
            return Err(FrameError::LengthMismatch {
                expected: self.data.len(),
                actual: index.len(),
            });
        }
        self.index = index;
        Ok(self)
    }

    pub(crate) fn from_parts(name: Option<String>, index: Vec<Value>, data: ColumnData) -> Self {
        Column { name, index, data }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn index(&self) -> &[Value] {
        &self.index
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<Value> {
        self.data.get(idx)
    }

    pub fn values(&self) -> Vec<Value> {
        self.data.values()
    }

    /// Keep the elements (and labels) where `mask` is set.
    pub fn filter(&self, mask: &[bool]) -> Result<Column> {
        if mask.len() != self.len() {
            return Err(FrameError::LengthMismatch {
                expected: self.len(),
                actual: mask.len(),
            });
        }
        let positions = selected_positions(mask);
        Ok(Column {
            name: self.name.clone(),
            index: positions.iter().map(|&i| self.index[i].clone()).collect(),
            data: self.data.take(&positions),
        })
    }

    /// Wrap as a single-column table keyed by the column name.
    pub fn into_table(self) -> Table {
        let name = self.name.unwrap_or_else(|| UNNAMED_COLUMN.to_string());
        Table::from_parts(self.index, vec![name], vec![self.data])
    }
}
