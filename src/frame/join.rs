//! Hash equi-join between two tables.
//!
//! Keys are either the row index or a named column on each side. The build
//! side is hashed on its key values and the other side probes it row by row,
//! so output rows follow the probe side's order with matches in build order.

use log::trace;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::frame::{FrameError, Result, Value, column::ColumnData, table::Table};

/// Type of join to perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum JoinType {
    /// Emit only matching row pairs.
    #[default]
    Inner,
    /// Emit all left rows; unmatched left rows have null right columns.
    Left,
    /// Emit all right rows; unmatched right rows have null left columns.
    Right,
    /// Emit all rows from both sides; unmatched rows have nulls.
    Outer,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "inner"),
            JoinType::Left => write!(f, "left"),
            JoinType::Right => write!(f, "right"),
            JoinType::Outer => write!(f, "outer"),
        }
    }
}

impl FromStr for JoinType {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "inner" => Ok(JoinType::Inner),
            "left" => Ok(JoinType::Left),
            "right" => Ok(JoinType::Right),
            "outer" => Ok(JoinType::Outer),
            other => Err(FrameError::InvalidTag(other.to_string())),
        }
    }
}

/// Which values one side of a join is matched on.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum JoinKey {
    /// The row labels.
    #[default]
    Index,
    /// A named column.
    Column(String),
}

/// Options controlling join execution.
///
/// Merge helpers forward these unchanged, but reject a column key on the
/// side that holds the wrapped column, which always joins on its index.
#[derive(Clone, Debug, PartialEq)]
pub struct JoinOptions {
    /// Type of join to perform.
    pub join_type: JoinType,
    /// Key of the left table.
    pub left_on: JoinKey,
    /// Key of the right table.
    pub right_on: JoinKey,
    /// Appended to overlapping column names, left then right.
    pub suffixes: (String, String),
}

impl Default for JoinOptions {
    fn default() -> Self {
        JoinOptions {
            join_type: JoinType::Inner,
            left_on: JoinKey::Index,
            right_on: JoinKey::Index,
            suffixes: ("_x".to_string(), "_y".to_string()),
        }
    }
}

impl JoinOptions {
    pub fn how(mut self, join_type: JoinType) -> Self {
        self.join_type = join_type;
        self
    }

    pub fn left_on(mut self, column: &str) -> Self {
        self.left_on = JoinKey::Column(column.to_string());
        self
    }

    pub fn right_on(mut self, column: &str) -> Self {
        self.right_on = JoinKey::Column(column.to_string());
        self
    }

    pub fn suffixes(mut self, left: &str, right: &str) -> Self {
        self.suffixes = (left.to_string(), right.to_string());
        self
    }
}

fn key_values(table: &Table, key: &JoinKey) -> Result<Vec<Value>> {
    match key {
        JoinKey::Index => Ok(table.index().to_vec()),
        JoinKey::Column(name) => Ok(table.get_col(name)?.values()),
    }
}

/// Hash the build side: key value -> row positions in order. Nulls never match.
fn build_hash(keys: &[Value]) -> HashMap<&Value, Vec<usize>> {
    let mut map: HashMap<&Value, Vec<usize>> = HashMap::new();
    for (pos, key) in keys.iter().enumerate() {
        if !key.is_null() {
            map.entry(key).or_default().push(pos);
        }
    }
    map
}

/// Probe `probe` against `build`, yielding (probe, build) position pairs.
fn probe(
    probe: &[Value],
    build: &HashMap<&Value, Vec<usize>>,
    keep_unmatched: bool,
) -> Vec<(Option<usize>, Option<usize>)> {
    let mut pairs = Vec::with_capacity(probe.len());
    for (pos, key) in probe.iter().enumerate() {
        match build.get(key) {
            Some(matches) => pairs.extend(matches.iter().map(|&b| (Some(pos), Some(b)))),
            None if keep_unmatched => pairs.push((Some(pos), None)),
            None => {}
        }
    }
    pairs
}

impl Table {
    /// Equi-join `other` onto this table.
    ///
    /// # Errors
    /// [`FrameError::MissingColumn`] for an unknown key column,
    /// [`FrameError::DuplicateColumn`] if suffixing still leaves a name clash.
    pub fn join(&self, other: &Table, options: &JoinOptions) -> Result<Table> {
        let left_keys = key_values(self, &options.left_on)?;
        let right_keys = key_values(other, &options.right_on)?;

        // (left position, right position)
        let pairs: Vec<(Option<usize>, Option<usize>)> = match options.join_type {
            JoinType::Inner | JoinType::Left => {
                let build = build_hash(&right_keys);
                probe(&left_keys, &build, options.join_type == JoinType::Left)
            }
            JoinType::Right => {
                let build = build_hash(&left_keys);
                probe(&right_keys, &build, true)
                    .into_iter()
                    .map(|(r, l)| (l, r))
                    .collect()
            }
            JoinType::Outer => {
                let build = build_hash(&right_keys);
                let mut pairs = probe(&left_keys, &build, true);
                let matched: HashSet<usize> = pairs.iter().filter_map(|&(_, r)| r).collect();
                pairs.extend(
                    (0..other.len())
                        .filter(|r| !matched.contains(r))
                        .map(|r| (None, Some(r))),
                );
                pairs
            }
        };

        trace!(
            "{} join {}x{} rows produced {} rows",
            options.join_type,
            self.len(),
            other.len(),
            pairs.len()
        );

        let left_pos: Vec<Option<usize>> = pairs.iter().map(|&(l, _)| l).collect();
        let right_pos: Vec<Option<usize>> = pairs.iter().map(|&(_, r)| r).collect();

        let index: Vec<Value> = pairs
            .iter()
            .map(|&(l, r)| {
                let from_left = l.map(|i| self.index()[i].clone());
                let from_right = r.map(|i| other.index()[i].clone());
                let label = if options.join_type == JoinType::Right {
                    from_right.or(from_left)
                } else {
                    from_left.or(from_right)
                };
                label.unwrap_or(Value::Null)
            })
            .collect();

        // A key column named the same on both sides is emitted once.
        let shared_key = match (&options.left_on, &options.right_on) {
            (JoinKey::Column(l), JoinKey::Column(r)) if l == r => Some(l.as_str()),
            _ => None,
        };

        let mut left_cols: Vec<(String, ColumnData)> = self
            .column_names()
            .iter()
            .zip(self.columns())
            .map(|(name, col)| (name.clone(), col.take_optional(&left_pos)))
            .collect();

        let mut right_cols: Vec<(String, ColumnData)> = Vec::with_capacity(other.width());
        for (name, col) in other.column_names().iter().zip(other.columns()) {
            let taken = col.take_optional(&right_pos);
            if Some(name.as_str()) == shared_key {
                if let Some((_, left_key)) = left_cols.iter_mut().find(|(n, _)| n == name) {
                    if let Some(merged) = left_key.coalesce(&taken) {
                        *left_key = merged;
                        continue;
                    }
                }
            }
            right_cols.push((name.clone(), taken));
        }

        let left_names: HashSet<String> = left_cols.iter().map(|(n, _)| n.clone()).collect();
        let right_names: HashSet<String> = right_cols.iter().map(|(n, _)| n.clone()).collect();
        let (left_suffix, right_suffix) = &options.suffixes;

        for (name, _) in left_cols.iter_mut() {
            if right_names.contains(name.as_str()) {
                name.push_str(left_suffix);
            }
        }
        for (name, _) in right_cols.iter_mut() {
            if left_names.contains(name.as_str()) {
                name.push_str(right_suffix);
            }
        }

        let mut names = Vec::with_capacity(left_cols.len() + right_cols.len());
        let mut columns = Vec::with_capacity(left_cols.len() + right_cols.len());
        for (name, col) in left_cols.into_iter().chain(right_cols) {
            if names.contains(&name) {
                return Err(FrameError::DuplicateColumn(name));
            }
            names.push(name);
            columns.push(col);
        }

        Ok(Table::from_parts(index, names, columns))
    }
}
