// Percentile ranking with average ranks for ties.

use serde::Deserialize;

/// Which way a metric points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Larger raw values earn higher percentiles.
    Ascending,
    /// Smaller raw values earn higher percentiles.
    Descending,
}

/// How an average rank `r` among `n` present values maps onto 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankScale {
    /// `(r - 1) / (n - 1) * 100`: the worst value scores 0 and the best 100.
    /// A lone value scores 100.
    #[default]
    Spread,
    /// `r / n * 100`, the same numbers as pandas `rank(pct=True) * 100`.
    Fraction,
}

impl RankScale {
    fn apply(self, rank: f64, n: usize) -> f64 {
        let n = n as f64;
        match self {
            RankScale::Spread if n <= 1.0 => 100.0,
            RankScale::Spread => (rank - 1.0) / (n - 1.0) * 100.0,
            RankScale::Fraction => rank / n * 100.0,
        }
    }
}

/// Percentile of every value within `values`, in input order.
///
/// Missing values get a missing percentile and are left out of `n`. Equal
/// values share the mean of the ranks they span.
pub fn percentile_ranks(
    values: &[Option<f64>],
    direction: Direction,
    scale: RankScale,
) -> Vec<Option<f64>> {
    let mut present: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect();
    present.sort_by(|a, b| a.1.total_cmp(&b.1));

    let n = present.len();
    let mut out = vec![None; values.len()];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j + 1 < n && present[j + 1].1 == present[i].1 {
            j += 1;
        }
        // Ascending ranks are 1-based; ties share (first + last) / 2
        let asc_rank = (i + j + 2) as f64 / 2.0;
        let rank = match direction {
            Direction::Ascending => asc_rank,
            Direction::Descending => (n + 1) as f64 - asc_rank,
        };
        let pct = scale.apply(rank, n);
        for &(idx, _) in &present[i..=j] {
            out[idx] = Some(pct);
        }
        i = j + 1;
    }
    out
}

/// Mean of the present values, `None` when there are none.
pub fn mean_present(values: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    fn unwrap_all(values: Vec<Option<f64>>) -> Vec<f64> {
        values.into_iter().map(|v| v.unwrap()).collect()
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "got {actual:?}, expected {expected:?}");
        }
    }

    #[test]
    fn spread_ascending_distinct() {
        let p = unwrap_all(percentile_ranks(
            &some(&[30.0, 10.0, 20.0]),
            Direction::Ascending,
            RankScale::Spread,
        ));
        assert_close(&p, &[100.0, 0.0, 50.0]);
    }

    #[test]
    fn spread_distinct_is_permutation_of_even_steps() {
        let values = some(&[4.2, -1.0, 9.9, 3.3, 0.0]);
        let mut p = unwrap_all(percentile_ranks(&values, Direction::Ascending, RankScale::Spread));
        p.sort_by(f64::total_cmp);
        assert_close(&p, &[0.0, 25.0, 50.0, 75.0, 100.0]);
    }

    #[test]
    fn reversing_direction_mirrors_percentiles() {
        let values = some(&[4.2, -1.0, 9.9, 3.3, 0.0, 7.5]);
        let asc = unwrap_all(percentile_ranks(&values, Direction::Ascending, RankScale::Spread));
        let desc = unwrap_all(percentile_ranks(&values, Direction::Descending, RankScale::Spread));
        for (a, d) in asc.iter().zip(&desc) {
            assert!((d - (100.0 - a)).abs() < 1e-9);
        }
    }

    #[test]
    fn ties_share_average_rank() {
        // ranks: 10 -> 1, 20/20 -> 2.5, 40 -> 4
        let values = some(&[20.0, 10.0, 20.0, 40.0]);
        let spread = unwrap_all(percentile_ranks(&values, Direction::Ascending, RankScale::Spread));
        assert_close(&spread, &[50.0, 0.0, 50.0, 100.0]);
        let fraction =
            unwrap_all(percentile_ranks(&values, Direction::Ascending, RankScale::Fraction));
        assert_close(&fraction, &[62.5, 25.0, 62.5, 100.0]);
    }

    #[test]
    fn fraction_matches_pandas_descending() {
        // pandas: Series([1, 2, 3, 4]).rank(ascending=False, pct=True) * 100
        let values = some(&[1.0, 2.0, 3.0, 4.0]);
        let p = unwrap_all(percentile_ranks(&values, Direction::Descending, RankScale::Fraction));
        assert_close(&p, &[100.0, 75.0, 50.0, 25.0]);
    }

    #[test]
    fn missing_values_excluded_from_n() {
        let values = vec![Some(5.0), None, Some(1.0), None];
        let p = percentile_ranks(&values, Direction::Ascending, RankScale::Fraction);
        assert_eq!(p[1], None);
        assert_eq!(p[3], None);
        assert!((p[0].unwrap() - 100.0).abs() < 1e-9);
        assert!((p[2].unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn single_value_scores_top() {
        let p = percentile_ranks(&[Some(3.0)], Direction::Descending, RankScale::Spread);
        assert_eq!(p, vec![Some(100.0)]);
        let p = percentile_ranks(&[Some(3.0)], Direction::Ascending, RankScale::Fraction);
        assert_eq!(p, vec![Some(100.0)]);
    }

    #[test]
    fn all_equal_values_share_midpoint() {
        let p = unwrap_all(percentile_ranks(
            &some(&[2.0, 2.0, 2.0]),
            Direction::Ascending,
            RankScale::Spread,
        ));
        assert_close(&p, &[50.0, 50.0, 50.0]);
    }

    #[test]
    fn empty_input() {
        assert!(percentile_ranks(&[], Direction::Ascending, RankScale::Spread).is_empty());
    }

    #[test]
    fn percentiles_within_bounds() {
        let values = some(&[0.3, 0.3, -2.0, 8.0, 8.0, 8.0, 1.0]);
        for scale in [RankScale::Spread, RankScale::Fraction] {
            for dir in [Direction::Ascending, Direction::Descending] {
                for p in percentile_ranks(&values, dir, scale).into_iter().flatten() {
                    assert!((0.0..=100.0).contains(&p));
                }
            }
        }
    }

    #[test]
    fn mean_present_skips_missing() {
        assert_eq!(mean_present(&[Some(10.0), None, Some(20.0)]), Some(15.0));
        assert_eq!(mean_present(&[None, None]), None);
        assert_eq!(mean_present(&[]), None);
    }
}
