use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};
use std::cmp::Ordering;

use crate::frame::Comparator;

// Below this many rows the rayon split costs more than the comparisons.
const PARALLEL_THRESHOLD: usize = 64 * 1024;

/// Evaluate `cmp` for every element of a nullable column.
///
/// `order` maps a present element to its ordering relative to the operand;
/// missing elements are unordered.
pub fn mask_by<T, F>(values: &[Option<T>], cmp: Comparator, order: F) -> Vec<bool>
where
    T: Sync,
    F: Fn(&T) -> Option<Ordering> + Sync,
{
    if values.len() < PARALLEL_THRESHOLD {
        return values
            .iter()
            .map(|v| cmp.holds(v.as_ref().and_then(&order)))
            .collect();
    }

    values
        .par_iter()
        .with_min_len(PARALLEL_THRESHOLD / 4)
        .map(|v| cmp.holds(v.as_ref().and_then(&order)))
        .collect()
}

/// Element-wise OR of `other` into `acc`.
pub fn union_into(acc: &mut [bool], other: &[bool]) {
    for (a, &b) in acc.iter_mut().zip(other) {
        *a |= b;
    }
}

/// Positions of the set entries of a mask, in order.
pub fn selected_positions(mask: &[bool]) -> Vec<usize> {
    mask.iter()
        .enumerate()
        .filter_map(|(i, &keep)| if keep { Some(i) } else { None })
        .collect()
}
