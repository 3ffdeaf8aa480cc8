//! Zero-copy hand-off of a [`Table`] to pyarrow through the C data interface.
//!
//! The whole table crosses as one struct array (one child per column), so a
//! single schema/array pair is exported and pyarrow rebuilds the record batch
//! on its side.

use arrow2::array::{Array, StructArray};
use arrow2::datatypes::{DataType, Field};
use arrow2::ffi::{ArrowArray, ArrowSchema, export_array_to_c, export_field_to_c};
use pyo3::exceptions;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::frame::table::Table;

fn as_struct(table: &Table) -> PyResult<(Field, Box<dyn Array>)> {
    let (schema, chunk) = table.to_arrow();
    let data_type = DataType::Struct(schema.fields);
    let children = chunk.arrays().iter().map(|a| a.to_boxed()).collect();

    let rows = StructArray::try_new(data_type.clone(), children, None)
        .map_err(|e| exceptions::PyValueError::new_err(e.to_string()))?;
    Ok((Field::new("", data_type, false), rows.boxed()))
}

/// Build a `pyarrow.Table` holding the same columns as `table`.
pub fn table_to_pyarrow<'py>(py: Python<'py>, table: &Table) -> PyResult<Bound<'py, PyAny>> {
    let pyarrow = py.import("pyarrow")?;
    if table.width() == 0 {
        return pyarrow.getattr("table")?.call1((PyDict::new(py),));
    }

    let (field, rows) = as_struct(table)?;
    let c_schema: ArrowSchema = export_field_to_c(&field);
    let c_array: ArrowArray = export_array_to_c(rows);

    let array = pyarrow.getattr("Array")?.getattr("_import_from_c")?.call1((
        &c_array as *const ArrowArray as usize,
        &c_schema as *const ArrowSchema as usize,
    ))?;
    let batch = pyarrow
        .getattr("RecordBatch")?
        .getattr("from_struct_array")?
        .call1((array,))?;

    let batches = PyList::new(py, [batch])?;
    pyarrow.getattr("Table")?.getattr("from_batches")?.call1((batches,))
}
