pub mod compare_helpers;
pub mod percentile;
