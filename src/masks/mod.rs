//! Row masks over tables.
//!
//! Every mask computes a boolean predicate over one or more columns and
//! applies it immediately through [`Table::filter_rows`]. Operations that
//! take the union of several masks drop rows whose values repeat an earlier
//! row and emit the survivors in the table's original row order.

use log::{debug, trace};

use crate::frame::{
    Comparator, FilterPredicate, FrameError, Result, Value, ensure_same_len, table::Table,
};
use crate::helpers::compare_helpers::union_into;
use crate::helpers::percentile::{is_valid_rank, percentile};

pub mod series;

/// Predicate-based row selection, available on [`Table`].
pub trait TableMasks: Sized {
    /// Rows where `self[key] <cmp> value`.
    fn compare_mask(&self, key: &str, cmp: Comparator, value: &Value) -> Result<Self>;

    /// Rows where `self[key] == value`.
    fn eq_mask(&self, key: &str, value: &Value) -> Result<Self> {
        self.compare_mask(key, Comparator::Eq, value)
    }

    fn ne_mask(&self, key: &str, value: &Value) -> Result<Self> {
        self.compare_mask(key, Comparator::Ne, value)
    }

    fn lt_mask(&self, key: &str, value: &Value) -> Result<Self> {
        self.compare_mask(key, Comparator::Lt, value)
    }

    fn le_mask(&self, key: &str, value: &Value) -> Result<Self> {
        self.compare_mask(key, Comparator::Le, value)
    }

    fn gt_mask(&self, key: &str, value: &Value) -> Result<Self> {
        self.compare_mask(key, Comparator::Gt, value)
    }

    fn ge_mask(&self, key: &str, value: &Value) -> Result<Self> {
        self.compare_mask(key, Comparator::Ge, value)
    }

    /// Rows selected by an arbitrary predicate over the whole table.
    ///
    /// # Errors
    /// [`FrameError::LengthMismatch`] if `f` does not return one flag per row.
    fn gen_mask<F>(&self, f: F) -> Result<Self>
    where
        F: FnOnce(&Self) -> Vec<bool>;

    /// Rows where `self[key]` equals any of `values`.
    fn in_eqmask(&self, key: &str, values: &[Value]) -> Result<Self>;

    /// Rows where `self[keys[i]] == values[i]` for at least one `i`.
    fn mix_eqmask(&self, keys: &[&str], values: &[Value]) -> Result<Self>;

    /// Rows where `self[keys[i]] <comparators[i]> values[i]` for at least one `i`.
    fn mixbool_mask(
        &self,
        keys: &[&str],
        comparators: &[Comparator],
        values: &[Value],
    ) -> Result<Self>;

    /// Rows where `self[key]` lies between `low` and `high`.
    ///
    /// Applied as two masks in sequence, lower bound first.
    fn bet_mask(&self, key: &str, (low, high): (&Value, &Value), inclusive: bool) -> Result<Self> {
        if inclusive {
            self.ge_mask(key, low)?.le_mask(key, high)
        } else {
            self.gt_mask(key, low)?.lt_mask(key, high)
        }
    }

    /// Dispatch on a predicate built from a mode tag.
    ///
    /// Kept for callers that still select the comparison at runtime; prefer
    /// the named masks.
    fn mask(&self, key: &str, predicate: &FilterPredicate) -> Result<Self> {
        match predicate {
            FilterPredicate::Compare(cmp, value) => self.compare_mask(key, *cmp, value),
            FilterPredicate::In(values) => self.in_eqmask(key, values),
        }
    }

    /// Rows in the top `percentile` percent of `key`.
    ///
    /// The threshold is the linearly interpolated value at rank
    /// `100 - percentile`. With `sort` the result follows ascending `key`
    /// order, otherwise the original row order.
    fn top_mask(&self, key: &str, percentile: f64, sort: bool) -> Result<Self>;

    /// Rows in the bottom `percentile` percent of `key`.
    fn bot_mask(&self, key: &str, percentile: f64, sort: bool) -> Result<Self>;

    /// Rows in the central `percentile` percent of `key`, bounds inclusive.
    fn mid_mask(&self, key: &str, percentile: f64, sort: bool) -> Result<Self>;
}

impl Table {
    /// Union of several comparisons, deduplicated, in original row order.
    fn union_mask<'a, I>(&self, op: &str, terms: I) -> Result<Table>
    where
        I: IntoIterator<Item = (&'a str, Comparator, &'a Value)>,
    {
        let mut selected = vec![false; self.len()];
        for (key, cmp, value) in terms {
            let mask = self.get_col(key)?.compare_mask(key, cmp, value)?;
            union_into(&mut selected, &mask);
        }

        let out = self.filter_rows(&selected)?.drop_duplicates();
        debug!("{op} kept {}/{} rows", out.len(), self.len());
        Ok(out)
    }

    /// Sort by `key` and rank its numeric values.
    fn ranked(&self, key: &str, ranks: &[f64]) -> Result<(Table, Vec<f64>)> {
        let sorted = self.sort_by(key)?;
        let values = sorted.get_col(key)?.numeric_values(key)?;

        let thresholds = ranks
            .iter()
            .map(|&rank| {
                percentile(&values, rank).ok_or_else(|| FrameError::EmptyColumn(key.to_string()))
            })
            .collect::<Result<Vec<f64>>>()?;

        trace!("percentile ranks {ranks:?} of '{key}' -> {thresholds:?}");
        Ok((sorted, thresholds))
    }
}

fn check_rank(percentile: f64) -> Result<()> {
    if !is_valid_rank(percentile) {
        return Err(FrameError::InvalidPercentile(percentile));
    }
    Ok(())
}

impl TableMasks for Table {
    fn compare_mask(&self, key: &str, cmp: Comparator, value: &Value) -> Result<Table> {
        let mask = self.get_col(key)?.compare_mask(key, cmp, value)?;
        let out = self.filter_rows(&mask)?;
        debug!("{cmp}_mask on '{key}' kept {}/{} rows", out.len(), self.len());
        Ok(out)
    }

    fn gen_mask<F>(&self, f: F) -> Result<Table>
    where
        F: FnOnce(&Table) -> Vec<bool>,
    {
        let mask = f(self);
        let out = self.filter_rows(&mask)?;
        debug!("gen_mask kept {}/{} rows", out.len(), self.len());
        Ok(out)
    }

    fn in_eqmask(&self, key: &str, values: &[Value]) -> Result<Table> {
        self.union_mask("in_eqmask", values.iter().map(|v| (key, Comparator::Eq, v)))
    }

    fn mix_eqmask(&self, keys: &[&str], values: &[Value]) -> Result<Table> {
        ensure_same_len(keys.len(), values.len())?;
        self.union_mask(
            "mix_eqmask",
            keys.iter().zip(values).map(|(&k, v)| (k, Comparator::Eq, v)),
        )
    }

    fn mixbool_mask(
        &self,
        keys: &[&str],
        comparators: &[Comparator],
        values: &[Value],
    ) -> Result<Table> {
        ensure_same_len(keys.len(), comparators.len())?;
        ensure_same_len(keys.len(), values.len())?;
        self.union_mask(
            "mixbool_mask",
            keys.iter()
                .zip(comparators)
                .zip(values)
                .map(|((&k, &cmp), v)| (k, cmp, v)),
        )
    }

    fn top_mask(&self, key: &str, percentile: f64, sort: bool) -> Result<Table> {
        check_rank(percentile)?;
        let (sorted, thresholds) = self.ranked(key, &[100.0 - percentile])?;
        let base = if sort { &sorted } else { self };
        base.ge_mask(key, &Value::Float(thresholds[0]))
    }

    fn bot_mask(&self, key: &str, percentile: f64, sort: bool) -> Result<Table> {
        check_rank(percentile)?;
        let (sorted, thresholds) = self.ranked(key, &[percentile])?;
        let base = if sort { &sorted } else { self };
        base.le_mask(key, &Value::Float(thresholds[0]))
    }

    fn mid_mask(&self, key: &str, percentile: f64, sort: bool) -> Result<Table> {
        check_rank(percentile)?;
        let half = percentile / 2.0;
        let (sorted, thresholds) = self.ranked(key, &[50.0 - half, 50.0 + half])?;
        let base = if sort { &sorted } else { self };
        base.ge_mask(key, &Value::Float(thresholds[0]))?
            .le_mask(key, &Value::Float(thresholds[1]))
    }
}
