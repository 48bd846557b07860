// Per-umpire aggregation: skip-missing sums, skip-missing means, game counts.

use crate::ingest::GameRecord;
use crate::normalize::normalize_identity;
use std::collections::{BTreeMap, HashMap};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Career totals and averages for one umpire.
///
/// Counting fields are summed with missing values contributing nothing, so
/// they are never missing themselves. Rate fields are averaged over the
/// games where they are present and are `None` when no game had a value.
#[derive(Debug, Clone, PartialEq)]
pub struct UmpireSummary {
    pub umpire: String,
    pub games_called: usize,
    pub pitches_called: f64,
    pub incorrect_calls: f64,
    pub expected_incorrect_calls: f64,
    pub correct_calls: f64,
    pub expected_correct_calls: f64,
    pub correct_calls_above_expected: Option<f64>,
    pub accuracy: Option<f64>,
    pub expected_accuracy: Option<f64>,
    pub accuracy_above_expected: Option<f64>,
    pub consistency: Option<f64>,
    pub home_favor: Option<f64>,
    pub total_run_impact: Option<f64>,
}

/// All umpire summaries, ordered by identity ascending, with lookup by name.
#[derive(Debug, Clone, Default)]
pub struct SummaryTable {
    rows: Vec<UmpireSummary>,
    index: HashMap<String, usize>,
}

impl SummaryTable {
    pub fn rows(&self) -> &[UmpireSummary] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up an umpire by name. The name is normalized first, so accented
    /// or capitalized spellings find the same row.
    pub fn get(&self, name: &str) -> Option<&UmpireSummary> {
        self.index
            .get(&normalize_identity(name))
            .map(|&i| &self.rows[i])
    }
}

// ---------------------------------------------------------------------------
// Accumulators
// ---------------------------------------------------------------------------

/// Running mean that ignores missing values.
#[derive(Debug, Clone, Copy, Default)]
struct MeanAcc {
    sum: f64,
    count: usize,
}

impl MeanAcc {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn finish(self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

#[derive(Debug, Default)]
struct UmpireAcc {
    games: usize,
    pc: f64,
    ic: f64,
    xic: f64,
    cc: f64,
    xcc: f64,
    ccax: MeanAcc,
    acc: MeanAcc,
    xacc: MeanAcc,
    aax: MeanAcc,
    con: MeanAcc,
    fav: MeanAcc,
    tot_ri: MeanAcc,
}

impl UmpireAcc {
    fn push(&mut self, g: &GameRecord) {
        self.games += 1;
        self.pc += g.pitches_called.unwrap_or(0.0);
        self.ic += g.incorrect_calls.unwrap_or(0.0);
        self.xic += g.expected_incorrect_calls.unwrap_or(0.0);
        self.cc += g.correct_calls.unwrap_or(0.0);
        self.xcc += g.expected_correct_calls.unwrap_or(0.0);
        self.ccax.push(g.correct_calls_above_expected);
        self.acc.push(g.accuracy);
        self.xacc.push(g.expected_accuracy);
        self.aax.push(g.accuracy_above_expected);
        self.con.push(g.consistency);
        self.fav.push(g.home_favor);
        self.tot_ri.push(g.total_run_impact);
    }

    fn finish(self, umpire: String) -> UmpireSummary {
        UmpireSummary {
            umpire,
            games_called: self.games,
            pitches_called: self.pc,
            incorrect_calls: self.ic,
            expected_incorrect_calls: self.xic,
            correct_calls: self.cc,
            expected_correct_calls: self.xcc,
            correct_calls_above_expected: self.ccax.finish(),
            accuracy: self.acc.finish(),
            expected_accuracy: self.xacc.finish(),
            accuracy_above_expected: self.aax.finish(),
            consistency: self.con.finish(),
            home_favor: self.fav.finish(),
            total_run_impact: self.tot_ri.finish(),
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Group game records by umpire and produce one summary per identity.
pub fn aggregate(games: &[GameRecord]) -> SummaryTable {
    let mut groups: BTreeMap<&str, UmpireAcc> = BTreeMap::new();
    for g in games {
        groups.entry(g.umpire.as_str()).or_default().push(g);
    }

    let rows: Vec<UmpireSummary> = groups
        .into_iter()
        .map(|(name, acc)| acc.finish(name.to_string()))
        .collect();
    let index = rows
        .iter()
        .enumerate()
        .map(|(i, s)| (s.umpire.clone(), i))
        .collect();

    SummaryTable { rows, index }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
