//! Folding columns into tables through the join primitive.
//!
//! A column is wrapped as a single-column table named after the column and
//! always joined on its own index; an options value naming a column key for
//! that side is rejected. Everything else in [`JoinOptions`] is passed
//! through to [`Table::join`] as given.

use log::debug;

use crate::frame::{
    FrameError, Result,
    column::Column,
    join::{JoinKey, JoinOptions},
    table::Table,
};

/// Arguments accepted where a column is expected.
///
/// Tables implement it only to report [`FrameError::NotAColumn`], even when
/// they hold a single column.
pub trait IntoColumn {
    fn into_column(self) -> Result<Column>;
}

impl IntoColumn for Column {
    fn into_column(self) -> Result<Column> {
        Ok(self)
    }
}

impl IntoColumn for &Column {
    fn into_column(self) -> Result<Column> {
        Ok(self.clone())
    }
}

impl IntoColumn for Table {
    fn into_column(self) -> Result<Column> {
        (&self).into_column()
    }
}

impl IntoColumn for &Table {
    fn into_column(self) -> Result<Column> {
        Err(FrameError::NotAColumn {
            columns: self.width(),
        })
    }
}

fn ensure_index_key(key: &JoinKey, side: &'static str) -> Result<()> {
    match key {
        JoinKey::Index => Ok(()),
        JoinKey::Column(_) => Err(FrameError::IndexOnlyKey(side)),
    }
}

/// Merge a column into `table` as an additional column.
///
/// The column's index is the right-hand key; the left key comes from
/// `options.left_on` (the table index by default).
///
/// # Errors
/// [`FrameError::NotAColumn`] if `column` is a table,
/// [`FrameError::IndexOnlyKey`] if `options.right_on` names a column, plus
/// any error of [`Table::join`].
pub fn merge_column(table: &Table, column: impl IntoColumn, options: &JoinOptions) -> Result<Table> {
    let right = column.into_column()?.into_table();
    ensure_index_key(&options.right_on, "right_on")?;

    let out = table.join(&right, options)?;
    debug!(
        "merge_column {:?} ({}) -> {} rows",
        right.column_names(),
        options.join_type,
        out.len()
    );
    Ok(out)
}

/// Merge two columns into a two-column table joined on their indices.
///
/// Both `left_on` and `right_on` must be left at [`JoinKey::Index`].
pub fn merge_columns(left: &Column, other: impl IntoColumn, options: &JoinOptions) -> Result<Table> {
    let right = other.into_column()?.into_table();
    ensure_index_key(&options.left_on, "left_on")?;
    ensure_index_key(&options.right_on, "right_on")?;

    let out = left.clone().into_table().join(&right, options)?;
    debug!("merge_columns ({}) -> {} rows", options.join_type, out.len());
    Ok(out)
}

impl Table {
    /// See [`merge_column`].
    pub fn merge_column(&self, column: impl IntoColumn, options: &JoinOptions) -> Result<Table> {
        merge_column(self, column, options)
    }
}

impl Column {
    /// See [`merge_columns`].
    pub fn merge_column(&self, other: impl IntoColumn, options: &JoinOptions) -> Result<Table> {
        merge_columns(self, other, options)
    }
}
