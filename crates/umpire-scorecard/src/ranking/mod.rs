// Percentile ranking of qualified umpires.

pub mod metric;
pub mod percentile;

use crate::aggregate::UmpireSummary;
use crate::config::RankingConfig;
use crate::normalize::normalize_identity;
use metric::{incorrect_calls_per_100, Metric, MetricSpec};
use percentile::{mean_present, percentile_ranks, Direction};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Percentile of one tracked metric. Higher always means better.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricPercentile {
    pub metric: Metric,
    pub value: Option<f64>,
}

/// A qualified umpire with percentile scores relative to the other
/// qualified umpires.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedUmpire {
    pub summary: UmpireSummary,
    pub ic_per_100: f64,
    /// One entry per configured metric, in configuration order.
    pub percentiles: Vec<MetricPercentile>,
    /// Mean of the present metric percentiles.
    pub avg_pct: Option<f64>,
    /// Percentile of `|Fav [H]|`, closer to zero scoring higher.
    pub fav_pct: Option<f64>,
}

impl RankedUmpire {
    pub fn umpire(&self) -> &str {
        &self.summary.umpire
    }

    pub fn percentile(&self, metric: Metric) -> Option<f64> {
        self.percentiles
            .iter()
            .find(|p| p.metric == metric)
            .and_then(|p| p.value)
    }
}

/// Qualified umpires sorted best-first by composite percentile.
#[derive(Debug, Clone, Default)]
pub struct RankedTable {
    rows: Vec<RankedUmpire>,
    index: HashMap<String, usize>,
    metrics: Vec<MetricSpec>,
}

impl RankedTable {
    pub fn rows(&self) -> &[RankedUmpire] {
        &self.rows
    }

    pub fn metrics(&self) -> &[MetricSpec] {
        &self.metrics
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a ranked umpire by name (normalized before lookup).
    pub fn get(&self, name: &str) -> Option<&RankedUmpire> {
        self.position(name).map(|i| &self.rows[i])
    }

    /// 0-based position of an umpire in the sorted table.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(&normalize_identity(name)).copied()
    }
}

// ---------------------------------------------------------------------------
// Pipeline steps
// ---------------------------------------------------------------------------

/// Summaries with at least `min_pitches_called` pitches, in input order.
pub fn filter_qualified<'a>(
    summaries: &'a [UmpireSummary],
    min_pitches_called: f64,
) -> Vec<&'a UmpireSummary> {
    summaries
        .iter()
        .filter(|s| s.pitches_called >= min_pitches_called)
        .collect()
}

/// Descending by composite, missing composites last, then identity ascending.
fn compare_ranked(a: &RankedUmpire, b: &RankedUmpire) -> Ordering {
    let by_score = match (a.avg_pct, b.avg_pct) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_score.then_with(|| a.summary.umpire.cmp(&b.summary.umpire))
}

/// Filter, score and sort the summaries.
///
/// Percentiles are relative to the qualified subset only. An empty subset
/// yields an empty table.
pub fn rank_umpires(summaries: &[UmpireSummary], config: &RankingConfig) -> RankedTable {
    let qualified = filter_qualified(summaries, config.min_pitches_called);
    info!(
        "{} of {} umpires meet the {} pitch threshold",
        qualified.len(),
        summaries.len(),
        config.min_pitches_called
    );

    let per_metric: Vec<Vec<Option<f64>>> = config
        .metrics
        .iter()
        .map(|spec| {
            let values: Vec<Option<f64>> =
                qualified.iter().map(|s| spec.field.value(s)).collect();
            percentile_ranks(&values, spec.direction, config.scale)
        })
        .collect();

    let mut rows: Vec<RankedUmpire> = qualified
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let percentiles: Vec<MetricPercentile> = config
                .metrics
                .iter()
                .zip(&per_metric)
                .map(|(spec, pcts)| MetricPercentile {
                    metric: spec.field,
                    value: pcts[i],
                })
                .collect();
            let values: Vec<Option<f64>> = percentiles.iter().map(|p| p.value).collect();
            RankedUmpire {
                summary: (*s).clone(),
                ic_per_100: incorrect_calls_per_100(s),
                avg_pct: mean_present(&values),
                percentiles,
                fav_pct: None,
            }
        })
        .collect();

    rows.sort_by(compare_ranked);

    let bias: Vec<Option<f64>> = rows
        .iter()
        .map(|r| r.summary.home_favor.map(f64::abs))
        .collect();
    let bias_pct = percentile_ranks(&bias, Direction::Descending, config.scale);
    for (row, pct) in rows.iter_mut().zip(bias_pct) {
        row.fav_pct = pct;
    }

    let index = rows
        .iter()
        .enumerate()
        .map(|(i, r)| (r.summary.umpire.clone(), i))
        .collect();

    if let Some(top) = rows.first() {
        debug!("top ranked umpire: {} ({:?})", top.umpire(), top.avg_pct);
    }

    RankedTable {
        rows,
        index,
        metrics: config.metrics.clone(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
