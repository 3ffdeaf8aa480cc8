use pyo3::exceptions;
use pyo3::prelude::*;
use pyo3::types::{PyFloat, PyString};

use crate::frame::{FrameError, Value, column::ColumnData};

/// Convert Rust errors to Python exceptions
impl From<FrameError> for PyErr {
    fn from(err: FrameError) -> PyErr {
        match err {
            FrameError::MissingColumn(_) => exceptions::PyKeyError::new_err(err.to_string()),
            FrameError::NotAColumn { .. } => exceptions::PyTypeError::new_err(err.to_string()),
            _ => exceptions::PyValueError::new_err(err.to_string()),
        }
    }
}

pub fn value_from_py(obj: &Bound<'_, PyAny>) -> PyResult<Value> {
    if obj.is_none() {
        Ok(Value::Null)
    } else if obj.is_instance_of::<PyString>() {
        Ok(Value::Str(obj.extract()?))
    } else if obj.is_instance_of::<PyFloat>() {
        Ok(Value::Float(obj.extract()?))
    } else if let Ok(v) = obj.extract::<i64>() {
        Ok(Value::Int(v))
    } else {
        Err(exceptions::PyTypeError::new_err(format!(
            "unsupported value type: {}",
            obj.get_type().name()?
        )))
    }
}

pub fn values_from_py(objs: &[Bound<'_, PyAny>]) -> PyResult<Vec<Value>> {
    objs.iter().map(value_from_py).collect()
}

pub fn value_to_py(py: Python<'_>, value: &Value) -> PyResult<PyObject> {
    let obj = match value {
        Value::Int(i) => (*i).into_pyobject(py)?.into_any().unbind(),
        Value::Float(f) => (*f).into_pyobject(py)?.into_any().unbind(),
        Value::Str(s) => PyString::new(py, s).into_any().unbind(),
        Value::Null => py.None(),
    };
    Ok(obj)
}

/// Build typed column storage from a Python list.
///
/// Any string makes a string column, otherwise any float makes a float
/// column; `None` entries become nulls.
pub fn column_from_py(name: &str, objs: &[Bound<'_, PyAny>]) -> PyResult<ColumnData> {
    let values = values_from_py(objs)?;
    let has = |pred: fn(&Value) -> bool| values.iter().any(pred);

    let data = if has(|v| matches!(v, Value::Str(_))) {
        let mut out = Vec::with_capacity(values.len());
        for v in values {
            match v {
                Value::Str(s) => out.push(Some(s)),
                Value::Null => out.push(None),
                other => return Err(mixed_column(name, &other)),
            }
        }
        ColumnData::Str(out)
    } else if has(|v| matches!(v, Value::Float(_))) {
        ColumnData::Float64(values.iter().map(Value::as_f64).collect())
    } else {
        ColumnData::Int64(
            values
                .iter()
                .map(|v| match v {
                    Value::Int(i) => Some(*i),
                    _ => None,
                })
                .collect(),
        )
    };
    Ok(data)
}

fn mixed_column(name: &str, value: &Value) -> PyErr {
    exceptions::PyTypeError::new_err(format!(
        "column '{name}' mixes strings with {value:?}"
    ))
}
