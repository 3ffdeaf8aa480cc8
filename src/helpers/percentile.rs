/// Value at `rank` (0..=100) using linear interpolation between closest ranks.
///
/// Same definition as numpy's default `percentile`: the position is
/// `rank / 100 * (n - 1)` in the ascending order of `values`.
/// Returns `None` when `values` is empty or `rank` is outside `0..=100`.
pub fn percentile(values: &[f64], rank: f64) -> Option<f64> {
    if values.is_empty() || !is_valid_rank(rank) {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    if sorted.len() == 1 {
        return Some(sorted[0]);
    }

    let pos = rank / 100.0 * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }

    let (a, b) = (sorted[lower], sorted[upper]);
    let frac = pos - lower as f64;
    if a == b {
        return Some(a);
    }
    // `b - a` is NaN or infinite once an endpoint is infinite
    if a.is_infinite() || b.is_infinite() {
        return Some(a * (1.0 - frac) + b * frac);
    }
    Some(a + (b - a) * frac)
}

pub fn is_valid_rank(rank: f64) -> bool {
    (0.0..=100.0).contains(&rank)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_to_ten() -> Vec<f64> {
        (1..=10).map(|v| v as f64).collect()
    }

    #[test]
    fn test_interpolates_between_ranks() {
        let p80 = percentile(&one_to_ten(), 80.0).unwrap();
        assert!((p80 - 8.2).abs() < 1e-9);

        let p25 = percentile(&one_to_ten(), 25.0).unwrap();
        assert!((p25 - 3.25).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_hit_extremes() {
        let values = vec![5.0, -1.0, 3.0];
        assert_eq!(percentile(&values, 0.0), Some(-1.0));
        assert_eq!(percentile(&values, 100.0), Some(5.0));
        assert_eq!(percentile(&values, 50.0), Some(3.0));
    }

    #[test]
    fn test_empty_and_single() {
        assert_eq!(percentile(&[], 50.0), None);
        assert_eq!(percentile(&[7.5], 90.0), Some(7.5));
    }

    #[test]
    fn test_out_of_range_rank_is_none() {
        let values = vec![1.0, 2.0];
        assert_eq!(percentile(&values, 150.0), None);
        assert_eq!(percentile(&values, -50.0), None);
        assert_eq!(percentile(&values, f64::NAN), None);
        assert_eq!(percentile(&[3.0], 101.0), None);
    }

    #[test]
    fn test_infinite_neighbours() {
        let values = vec![f64::NEG_INFINITY, 1.0];
        assert_eq!(percentile(&values, 50.0), Some(f64::NEG_INFINITY));
        assert_eq!(percentile(&values, 100.0), Some(1.0));

        let values = vec![1.0, f64::INFINITY, f64::INFINITY];
        assert_eq!(percentile(&values, 25.0), Some(f64::INFINITY));
        assert_eq!(percentile(&values, 75.0), Some(f64::INFINITY));
    }

    #[test]
    fn test_rank_validation() {
        assert!(is_valid_rank(0.0));
        assert!(is_valid_rank(100.0));
        assert!(!is_valid_rank(-0.5));
        assert!(!is_valid_rank(f64::NAN));
    }
}
