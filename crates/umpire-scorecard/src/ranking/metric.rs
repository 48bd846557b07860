// Rankable umpire metrics and their configured direction.

use crate::aggregate::UmpireSummary;
use crate::ranking::percentile::Direction;
use serde::Deserialize;

/// A column of the summary table (or the derived `IC_per_100`) that can be
/// ranked. Serde names match the scorecard column headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Metric {
    #[serde(rename = "GC")]
    GamesCalled,
    #[serde(rename = "PC")]
    PitchesCalled,
    #[serde(rename = "IC")]
    IncorrectCalls,
    #[serde(rename = "xIC")]
    ExpectedIncorrectCalls,
    #[serde(rename = "CC")]
    CorrectCalls,
    #[serde(rename = "xCC")]
    ExpectedCorrectCalls,
    #[serde(rename = "CCAx")]
    CorrectCallsAboveExpected,
    #[serde(rename = "Acc")]
    Accuracy,
    #[serde(rename = "xAcc")]
    ExpectedAccuracy,
    #[serde(rename = "AAx")]
    AccuracyAboveExpected,
    #[serde(rename = "Con")]
    Consistency,
    #[serde(rename = "Fav [H]")]
    HomeFavor,
    #[serde(rename = "totRI")]
    TotalRunImpact,
    #[serde(rename = "IC_per_100")]
    IncorrectCallsPer100,
}

impl Metric {
    /// Column header used in exports and config.
    pub fn label(self) -> &'static str {
        match self {
            Metric::GamesCalled => "GC",
            Metric::PitchesCalled => "PC",
            Metric::IncorrectCalls => "IC",
            Metric::ExpectedIncorrectCalls => "xIC",
            Metric::CorrectCalls => "CC",
            Metric::ExpectedCorrectCalls => "xCC",
            Metric::CorrectCallsAboveExpected => "CCAx",
            Metric::Accuracy => "Acc",
            Metric::ExpectedAccuracy => "xAcc",
            Metric::AccuracyAboveExpected => "AAx",
            Metric::Consistency => "Con",
            Metric::HomeFavor => "Fav [H]",
            Metric::TotalRunImpact => "totRI",
            Metric::IncorrectCallsPer100 => "IC_per_100",
        }
    }

    /// Header of this metric's percentile column, e.g. `Acc_pct`.
    pub fn pct_label(self) -> String {
        format!("{}_pct", self.label())
    }

    /// Raw value of this metric for one summary.
    pub fn value(self, s: &UmpireSummary) -> Option<f64> {
        match self {
            Metric::GamesCalled => Some(s.games_called as f64),
            Metric::PitchesCalled => Some(s.pitches_called),
            Metric::IncorrectCalls => Some(s.incorrect_calls),
            Metric::ExpectedIncorrectCalls => Some(s.expected_incorrect_calls),
            Metric::CorrectCalls => Some(s.correct_calls),
            Metric::ExpectedCorrectCalls => Some(s.expected_correct_calls),
            Metric::CorrectCallsAboveExpected => s.correct_calls_above_expected,
            Metric::Accuracy => s.accuracy,
            Metric::ExpectedAccuracy => s.expected_accuracy,
            Metric::AccuracyAboveExpected => s.accuracy_above_expected,
            Metric::Consistency => s.consistency,
            Metric::HomeFavor => s.home_favor,
            Metric::TotalRunImpact => s.total_run_impact,
            Metric::IncorrectCallsPer100 => Some(incorrect_calls_per_100(s)),
        }
    }
}

/// Incorrect calls divided by a flat 100, as the scorecard analysis defines
/// `IC_per_100`. It is not normalized by pitches called.
pub fn incorrect_calls_per_100(s: &UmpireSummary) -> f64 {
    s.incorrect_calls / 100.0
}

/// One tracked metric and the direction in which it is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MetricSpec {
    pub field: Metric,
    pub direction: Direction,
}

impl MetricSpec {
    pub const fn new(field: Metric, direction: Direction) -> Self {
        Self { field, direction }
    }
}

/// The five metrics of the umpire review, in column order.
pub fn default_metrics() -> Vec<MetricSpec> {
    vec![
        MetricSpec::new(Metric::Accuracy, Direction::Ascending),
        MetricSpec::new(Metric::Consistency, Direction::Ascending),
        MetricSpec::new(Metric::AccuracyAboveExpected, Direction::Ascending),
        MetricSpec::new(Metric::IncorrectCallsPer100, Direction::Descending),
        MetricSpec::new(Metric::TotalRunImpact, Direction::Descending),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::GameRecord;

    #[test]
    fn labels_and_pct_labels() {
        assert_eq!(Metric::HomeFavor.label(), "Fav [H]");
        assert_eq!(Metric::IncorrectCallsPer100.pct_label(), "IC_per_100_pct");
        assert_eq!(Metric::Accuracy.pct_label(), "Acc_pct");
    }

    #[test]
    fn per_100_is_flat_division() {
        let mut g = GameRecord::empty("joe west");
        g.incorrect_calls = Some(2450.0);
        g.pitches_called = Some(30000.0);
        let table = crate::aggregate::aggregate(&[g]);
        let s = &table.rows()[0];
        assert!((incorrect_calls_per_100(s) - 24.5).abs() < 1e-9);
        assert_eq!(Metric::IncorrectCallsPer100.value(s), Some(24.5));
        assert_eq!(Metric::GamesCalled.value(s), Some(1.0));
        assert_eq!(Metric::Accuracy.value(s), None);
    }

    #[test]
    fn metric_spec_deserializes_from_column_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            metrics: Vec<MetricSpec>,
        }
        let parsed: Wrapper = toml::from_str(
            r#"
            [[metrics]]
            field = "Fav [H]"
            direction = "descending"

            [[metrics]]
            field = "IC_per_100"
            direction = "ascending"
            "#,
        )
        .unwrap();
        assert_eq!(
            parsed.metrics,
            vec![
                MetricSpec::new(Metric::HomeFavor, Direction::Descending),
                MetricSpec::new(Metric::IncorrectCallsPer100, Direction::Ascending),
            ]
        );
    }

    #[test]
    fn default_metric_directions() {
        let metrics = default_metrics();
        assert_eq!(metrics.len(), 5);
        let descending: Vec<Metric> = metrics
            .iter()
            .filter(|m| m.direction == Direction::Descending)
            .map(|m| m.field)
            .collect();
        assert_eq!(
            descending,
            vec![Metric::IncorrectCallsPer100, Metric::TotalRunImpact]
        );
    }
}
