//! # columnar-masks
//!
//! `columnar-masks` is a small library of row-selection masks and column-merge
//! helpers over an in-memory columnar [`Table`]. It supports:
//!
//! - Single-column comparisons (`eq`, `ne`, `lt`, `le`, `gt`, `ge`)
//! - Unions of comparisons across values and columns, deduplicated
//! - Range masks and percentile bands with linear interpolation
//! - Merging a [`Column`] into a table, or two columns together, through a
//!   hash equi-join
//! - Arrow export of any table
//!
//! The masks are extension traits ([`TableMasks`], [`ColumnMasks`]), so they
//! read like native methods once the trait is in scope.
//!
//! # Example
//!
//! ```rust
//! use columnar_masks::{Column, JoinOptions, Table, TableMasks, Value};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let table = Table::new()
//!         .with_column("x", (1..=10).collect::<Vec<i64>>())?
//!         .with_column("region", vec!["EU", "US"].repeat(5))?;
//!
//!     // Top 20 percent of `x` (threshold 8.2)
//!     let top = table.top_mask("x", 20.0, true)?;
//!     assert_eq!(top.len(), 2);
//!
//!     // Rows in either region, in original order
//!     let both = table.in_eqmask("region", &[Value::from("EU"), Value::from("US")])?;
//!     assert_eq!(both.len(), 10);
//!
//!     // Fold a column in as a new column
//!     let flag = Column::new(vec![1i64; 10]).with_name("flag");
//!     let merged = table.merge_column(&flag, &JoinOptions::default())?;
//!     assert_eq!(merged.width(), 3);
//!
//!     Ok(())
//! }
//! ```

mod helpers;
pub mod frame;
pub mod masks;
pub mod merging;

#[cfg(feature = "python-bindings")]
pub mod python;

pub use frame::column::{Column, ColumnData, ColumnType};
pub use frame::join::{JoinKey, JoinOptions, JoinType};
pub use frame::table::Table;
pub use frame::{Comparator, FilterPredicate, FrameError, Result, Value};
pub use helpers::percentile::percentile;
pub use masks::TableMasks;
pub use masks::series::ColumnMasks;
pub use merging::{IntoColumn, merge_column, merge_columns};
