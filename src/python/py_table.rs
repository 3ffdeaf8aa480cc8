use pyo3::exceptions;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::frame::column::Column;
use crate::frame::join::{JoinOptions, JoinType};
use crate::frame::table::Table;
use crate::frame::{Comparator, FilterPredicate, Value};
use crate::masks::TableMasks;
use crate::masks::series::ColumnMasks;
use crate::merging::{merge_column, merge_columns};
use crate::python::py_arrow::table_to_pyarrow;
use crate::python::py_value::{column_from_py, value_from_py, value_to_py, values_from_py};

fn join_options(
    how: &str,
    left_on: Option<&str>,
    suffixes: Option<(String, String)>,
) -> PyResult<JoinOptions> {
    let mut options = JoinOptions::default().how(how.parse::<JoinType>()?);
    if let Some(col) = left_on {
        options = options.left_on(col);
    }
    if let Some((l, r)) = suffixes {
        options = options.suffixes(&l, &r);
    }
    Ok(options)
}

/// Merges take a `Series` only; a `Table` is rejected even with one column.
fn expect_series<'a, 'py>(obj: &'a Bound<'py, PyAny>) -> PyResult<&'a Bound<'py, PySeries>> {
    obj.downcast::<PySeries>().map_err(|_| {
        let name = obj
            .get_type()
            .name()
            .map(|n| n.to_string())
            .unwrap_or_else(|_| "object".to_string());
        exceptions::PyTypeError::new_err(format!("other must have type Series, not {name}"))
    })
}

fn labels_from_py(index: Option<Vec<Bound<'_, PyAny>>>) -> PyResult<Option<Vec<Value>>> {
    index.map(|objs| values_from_py(&objs)).transpose()
}

/// Python view of a [`Table`]
#[pyclass(name = "Table")]
pub struct PyTable {
    pub inner: Table,
}

impl PyTable {
    fn wrap(inner: Table) -> Self {
        PyTable { inner }
    }
}

#[pymethods]
impl PyTable {
    /// Build from a `{name: [values]}` dict, in insertion order.
    #[new]
    #[pyo3(signature = (data, index=None))]
    pub fn new(data: &Bound<'_, PyDict>, index: Option<Vec<Bound<'_, PyAny>>>) -> PyResult<Self> {
        let mut table = Table::new();
        for (name, values) in data.iter() {
            let name: String = name.extract()?;
            let values: Vec<Bound<'_, PyAny>> = values.extract()?;
            table = table.with_column(&name, column_from_py(&name, &values)?)?;
        }
        if let Some(labels) = labels_from_py(index)? {
            table = table.with_index(labels)?;
        }
        Ok(PyTable::wrap(table))
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        self.inner.to_string()
    }

    #[getter]
    fn columns(&self) -> Vec<String> {
        self.inner.column_names().to_vec()
    }

    #[getter]
    fn index(&self, py: Python<'_>) -> PyResult<Vec<PyObject>> {
        self.inner.index().iter().map(|v| value_to_py(py, v)).collect()
    }

    pub fn eq_mask(&self, key: &str, value: &Bound<'_, PyAny>) -> PyResult<Self> {
        Ok(PyTable::wrap(self.inner.eq_mask(key, &value_from_py(value)?)?))
    }

    pub fn ne_mask(&self, key: &str, value: &Bound<'_, PyAny>) -> PyResult<Self> {
        Ok(PyTable::wrap(self.inner.ne_mask(key, &value_from_py(value)?)?))
    }

    pub fn lt_mask(&self, key: &str, value: &Bound<'_, PyAny>) -> PyResult<Self> {
        Ok(PyTable::wrap(self.inner.lt_mask(key, &value_from_py(value)?)?))
    }

    pub fn le_mask(&self, key: &str, value: &Bound<'_, PyAny>) -> PyResult<Self> {
        Ok(PyTable::wrap(self.inner.le_mask(key, &value_from_py(value)?)?))
    }

    pub fn gt_mask(&self, key: &str, value: &Bound<'_, PyAny>) -> PyResult<Self> {
        Ok(PyTable::wrap(self.inner.gt_mask(key, &value_from_py(value)?)?))
    }

    pub fn ge_mask(&self, key: &str, value: &Bound<'_, PyAny>) -> PyResult<Self> {
        Ok(PyTable::wrap(self.inner.ge_mask(key, &value_from_py(value)?)?))
    }

    /// `f` receives the table and returns one bool per row.
    pub fn gen_mask(&self, py: Python<'_>, f: &Bound<'_, PyAny>) -> PyResult<Self> {
        let arg = Py::new(py, PyTable::wrap(self.inner.clone()))?;
        let mask: Vec<bool> = f.call1((arg,))?.extract()?;
        Ok(PyTable::wrap(self.inner.gen_mask(|_| mask)?))
    }

    pub fn in_eqmask(&self, key: &str, values: Vec<Bound<'_, PyAny>>) -> PyResult<Self> {
        Ok(PyTable::wrap(
            self.inner.in_eqmask(key, &values_from_py(&values)?)?,
        ))
    }

    pub fn mix_eqmask(&self, keys: Vec<String>, values: Vec<Bound<'_, PyAny>>) -> PyResult<Self> {
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        Ok(PyTable::wrap(
            self.inner.mix_eqmask(&keys, &values_from_py(&values)?)?,
        ))
    }

    pub fn mixbool_mask(
        &self,
        keys: Vec<String>,
        bools: Vec<String>,
        values: Vec<Bound<'_, PyAny>>,
    ) -> PyResult<Self> {
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        let comparators = bools
            .iter()
            .map(|tag| tag.parse::<Comparator>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PyTable::wrap(self.inner.mixbool_mask(
            &keys,
            &comparators,
            &values_from_py(&values)?,
        )?))
    }

    #[pyo3(signature = (key, values, inclusive=true))]
    pub fn bet_mask(
        &self,
        key: &str,
        values: (Bound<'_, PyAny>, Bound<'_, PyAny>),
        inclusive: bool,
    ) -> PyResult<Self> {
        let low = value_from_py(&values.0)?;
        let high = value_from_py(&values.1)?;
        Ok(PyTable::wrap(
            self.inner.bet_mask(key, (&low, &high), inclusive)?,
        ))
    }

    /// Legacy dispatch: `how` is one of `eq, ne, lt, le, gt, ge, in`.
    pub fn mask(&self, key: &str, values: &Bound<'_, PyAny>, how: &str) -> PyResult<Self> {
        let values = match values.extract::<Vec<Bound<'_, PyAny>>>() {
            Ok(list) => values_from_py(&list)?,
            Err(_) => vec![value_from_py(values)?],
        };
        let predicate = FilterPredicate::parse(how, values)?;
        Ok(PyTable::wrap(self.inner.mask(key, &predicate)?))
    }

    #[pyo3(signature = (key, percentile, sort=false))]
    pub fn top_mask(&self, key: &str, percentile: f64, sort: bool) -> PyResult<Self> {
        Ok(PyTable::wrap(self.inner.top_mask(key, percentile, sort)?))
    }

    #[pyo3(signature = (key, percentile, sort=false))]
    pub fn bot_mask(&self, key: &str, percentile: f64, sort: bool) -> PyResult<Self> {
        Ok(PyTable::wrap(self.inner.bot_mask(key, percentile, sort)?))
    }

    #[pyo3(signature = (key, percentile, sort=false))]
    pub fn mid_mask(&self, key: &str, percentile: f64, sort: bool) -> PyResult<Self> {
        Ok(PyTable::wrap(self.inner.mid_mask(key, percentile, sort)?))
    }

    /// Merge a `Series` (or a one-column `Table`) in as a new column.
    #[pyo3(signature = (series, how="inner", left_on=None, suffixes=None))]
    pub fn merge_series(
        &self,
        series: &Bound<'_, PyAny>,
        how: &str,
        left_on: Option<&str>,
        suffixes: Option<(String, String)>,
    ) -> PyResult<Self> {
        let options = join_options(how, left_on, suffixes)?;
        let series = expect_series(series)?;
        let merged = merge_column(&self.inner, &series.borrow().inner, &options)?;
        Ok(PyTable::wrap(merged))
    }

    pub fn to_dict(&self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        let dict = PyDict::new(py);
        for name in self.inner.column_names() {
            let values = self
                .inner
                .get_col(name)?
                .values()
                .iter()
                .map(|v| value_to_py(py, v))
                .collect::<PyResult<Vec<PyObject>>>()?;
            dict.set_item(name, values)?;
        }
        Ok(dict.unbind())
    }

    /// Expose the table as a `pyarrow.Table`
    pub fn to_arrow(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        Ok(table_to_pyarrow(py, &self.inner)?.unbind())
    }
}

/// Python view of a [`Column`]
#[pyclass(name = "Series")]
pub struct PySeries {
    pub inner: Column,
}

impl PySeries {
    fn wrap(inner: Column) -> Self {
        PySeries { inner }
    }
}

#[pymethods]
impl PySeries {
    #[new]
    #[pyo3(signature = (values, name=None, index=None))]
    pub fn new(
        values: Vec<Bound<'_, PyAny>>,
        name: Option<String>,
        index: Option<Vec<Bound<'_, PyAny>>>,
    ) -> PyResult<Self> {
        let label = name.as_deref().unwrap_or("<unnamed>");
        let mut column = Column::new(column_from_py(label, &values)?);
        if let Some(name) = &name {
            column = column.with_name(name);
        }
        if let Some(labels) = labels_from_py(index)? {
            column = column.with_index(labels)?;
        }
        Ok(PySeries::wrap(column))
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    #[getter]
    fn name(&self) -> Option<String> {
        self.inner.name().map(str::to_string)
    }

    fn tolist(&self, py: Python<'_>) -> PyResult<Vec<PyObject>> {
        self.inner.values().iter().map(|v| value_to_py(py, v)).collect()
    }

    pub fn eq_mask(&self, value: &Bound<'_, PyAny>) -> PyResult<Self> {
        Ok(PySeries::wrap(self.inner.eq_mask(&value_from_py(value)?)?))
    }

    pub fn ne_mask(&self, value: &Bound<'_, PyAny>) -> PyResult<Self> {
        Ok(PySeries::wrap(self.inner.ne_mask(&value_from_py(value)?)?))
    }

    pub fn lt_mask(&self, value: &Bound<'_, PyAny>) -> PyResult<Self> {
        Ok(PySeries::wrap(self.inner.lt_mask(&value_from_py(value)?)?))
    }

    pub fn le_mask(&self, value: &Bound<'_, PyAny>) -> PyResult<Self> {
        Ok(PySeries::wrap(self.inner.le_mask(&value_from_py(value)?)?))
    }

    pub fn gt_mask(&self, value: &Bound<'_, PyAny>) -> PyResult<Self> {
        Ok(PySeries::wrap(self.inner.gt_mask(&value_from_py(value)?)?))
    }

    pub fn ge_mask(&self, value: &Bound<'_, PyAny>) -> PyResult<Self> {
        Ok(PySeries::wrap(self.inner.ge_mask(&value_from_py(value)?)?))
    }

    pub fn mask(&self, value: &Bound<'_, PyAny>, how: &str) -> PyResult<Self> {
        let how = how.parse::<Comparator>()?;
        Ok(PySeries::wrap(self.inner.mask(how, &value_from_py(value)?)?))
    }

    /// Merge with another `Series` on both indices.
    #[pyo3(signature = (other, how="inner", suffixes=None))]
    pub fn merge_series(
        &self,
        other: &Bound<'_, PyAny>,
        how: &str,
        suffixes: Option<(String, String)>,
    ) -> PyResult<PyTable> {
        let options = join_options(how, None, suffixes)?;
        let other = expect_series(other)?;
        let merged = merge_columns(&self.inner, &other.borrow().inner, &options)?;
        Ok(PyTable::wrap(merged))
    }
}
