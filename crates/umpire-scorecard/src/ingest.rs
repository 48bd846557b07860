// Scorecard CSV loading and numeric coercion.
//
// Reads UmpScorecards-format game rows. Numeric columns are coerced leniently:
// anything that does not parse to a finite number becomes missing. The umpire
// column is the only hard requirement.

use crate::normalize::normalize_identity;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Header of the identity column.
pub const UMPIRE_COLUMN: &str = "Umpire";

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One umpire-game row after coercion. `None` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    /// Normalized umpire identity, never empty.
    pub umpire: String,
    pub home_runs: Option<f64>,
    pub away_runs: Option<f64>,
    pub pitches_called: Option<f64>,
    pub incorrect_calls: Option<f64>,
    pub expected_incorrect_calls: Option<f64>,
    pub correct_calls: Option<f64>,
    pub expected_correct_calls: Option<f64>,
    pub correct_calls_above_expected: Option<f64>,
    pub accuracy: Option<f64>,
    pub expected_accuracy: Option<f64>,
    pub accuracy_above_expected: Option<f64>,
    pub consistency: Option<f64>,
    pub home_favor: Option<f64>,
    pub total_run_impact: Option<f64>,
}

impl GameRecord {
    /// A record with the given identity and every numeric field missing.
    pub fn empty(umpire: impl Into<String>) -> Self {
        Self {
            umpire: umpire.into(),
            home_runs: None,
            away_runs: None,
            pitches_called: None,
            incorrect_calls: None,
            expected_incorrect_calls: None,
            correct_calls: None,
            expected_correct_calls: None,
            correct_calls_above_expected: None,
            accuracy: None,
            expected_accuracy: None,
            accuracy_above_expected: None,
            consistency: None,
            home_favor: None,
            total_run_impact: None,
        }
    }

    fn numeric_fields(&self) -> [Option<f64>; 14] {
        [
            self.home_runs,
            self.away_runs,
            self.pitches_called,
            self.incorrect_calls,
            self.expected_incorrect_calls,
            self.correct_calls,
            self.expected_correct_calls,
            self.correct_calls_above_expected,
            self.accuracy,
            self.expected_accuracy,
            self.accuracy_above_expected,
            self.consistency,
            self.home_favor,
            self.total_run_impact,
        ]
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("required column `{column}` is absent from the header")]
    MissingColumn { column: String },

    #[error("row {row} has no umpire identity")]
    MissingIdentity { row: usize },
}

// ---------------------------------------------------------------------------
// Raw CSV serde struct (private)
// ---------------------------------------------------------------------------

/// Scorecard CSV row. Columns not named here (date, teams, ids) are ignored.
#[derive(Debug, Deserialize)]
struct RawGameRow {
    #[serde(rename = "Umpire", default)]
    umpire: Option<String>,
    #[serde(rename = "R [H]", default, deserialize_with = "coerce_numeric")]
    home_runs: Option<f64>,
    #[serde(rename = "R [A]", default, deserialize_with = "coerce_numeric")]
    away_runs: Option<f64>,
    #[serde(rename = "PC", default, deserialize_with = "coerce_numeric")]
    pc: Option<f64>,
    #[serde(rename = "IC", default, deserialize_with = "coerce_numeric")]
    ic: Option<f64>,
    #[serde(rename = "xIC", default, deserialize_with = "coerce_numeric")]
    xic: Option<f64>,
    #[serde(rename = "CC", default, deserialize_with = "coerce_numeric")]
    cc: Option<f64>,
    #[serde(rename = "xCC", default, deserialize_with = "coerce_numeric")]
    xcc: Option<f64>,
    #[serde(rename = "CCAx", default, deserialize_with = "coerce_numeric")]
    ccax: Option<f64>,
    #[serde(rename = "Acc", default, deserialize_with = "coerce_numeric")]
    acc: Option<f64>,
    #[serde(rename = "xAcc", default, deserialize_with = "coerce_numeric")]
    xacc: Option<f64>,
    #[serde(rename = "AAx", default, deserialize_with = "coerce_numeric")]
    aax: Option<f64>,
    #[serde(rename = "Con", default, deserialize_with = "coerce_numeric")]
    con: Option<f64>,
    #[serde(rename = "Fav [H]", default, deserialize_with = "coerce_numeric")]
    fav_home: Option<f64>,
    #[serde(rename = "totRI", default, deserialize_with = "coerce_numeric")]
    tot_ri: Option<f64>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a numeric cell. Blank, unparseable, and non-finite text all map to
/// `None`.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn coerce_numeric<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_numeric))
}

// ---------------------------------------------------------------------------
// Reader-based loader
// ---------------------------------------------------------------------------

/// Load game records from any CSV source. `source` names the input in errors.
pub fn load_games_from_reader<R: Read>(
    rdr: R,
    source: &str,
) -> Result<Vec<GameRecord>, IngestError> {
    let csv_err = |e: csv::Error| IngestError::Csv {
        path: source.to_string(),
        source: e,
    };

    let mut reader = csv::Reader::from_reader(rdr);
    let headers = reader.headers().map_err(csv_err)?;
    if !headers.iter().any(|h| h.trim() == UMPIRE_COLUMN) {
        return Err(IngestError::MissingColumn {
            column: UMPIRE_COLUMN.to_string(),
        });
    }

    let mut records = Vec::new();
    let mut missing_cells = 0usize;
    for (idx, result) in reader.deserialize::<RawGameRow>().enumerate() {
        // 1-based data row, header excluded
        let row = idx + 1;
        let raw = result.map_err(csv_err)?;

        let umpire = raw
            .umpire
            .as_deref()
            .map(normalize_identity)
            .filter(|name| !name.is_empty())
            .ok_or(IngestError::MissingIdentity { row })?;

        let record = GameRecord {
            umpire,
            home_runs: raw.home_runs,
            away_runs: raw.away_runs,
            pitches_called: raw.pc,
            incorrect_calls: raw.ic,
            expected_incorrect_calls: raw.xic,
            correct_calls: raw.cc,
            expected_correct_calls: raw.xcc,
            correct_calls_above_expected: raw.ccax,
            accuracy: raw.acc,
            expected_accuracy: raw.xacc,
            accuracy_above_expected: raw.aax,
            consistency: raw.con,
            home_favor: raw.fav_home,
            total_run_impact: raw.tot_ri,
        };
        missing_cells += record.numeric_fields().iter().filter(|v| v.is_none()).count();
        records.push(record);
    }

    debug!(
        "{}: ingested {} rows, {} numeric cells missing",
        source,
        records.len(),
        missing_cells
    );
    Ok(records)
}

// ---------------------------------------------------------------------------
// Public path-based loader
// ---------------------------------------------------------------------------

/// Load game records from a CSV file.
pub fn load_games(path: &Path) -> Result<Vec<GameRecord>, IngestError> {
    let file = std::fs::File::open(path).map_err(|e| IngestError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_games_from_reader(file, &path.display().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "id,Date,Umpire,Home,Away,R [H],R [A],PC,IC,xIC,CC,xCC,CCAx,Acc,xAcc,AAx,Con,Fav [H],totRI";

    fn csv_with(rows: &[&str]) -> String {
        let mut out = HEADER.to_string();
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out
    }

    #[test]
    fn parses_full_row() {
        let data = csv_with(&[
            "1,2023-04-01,Ángel Hernández,PHI,MIL,3,4,150,10,9.5,140,140.5,-0.5,93.3,93.7,-0.4,94.1,0.21,1.05",
        ]);
        let games = load_games_from_reader(data.as_bytes(), "test").unwrap();
        assert_eq!(games.len(), 1);

        let g = &games[0];
        assert_eq!(g.umpire, "angel hernandez");
        assert_eq!(g.home_runs, Some(3.0));
        assert_eq!(g.away_runs, Some(4.0));
        assert_eq!(g.pitches_called, Some(150.0));
        assert_eq!(g.incorrect_calls, Some(10.0));
        assert_eq!(g.expected_incorrect_calls, Some(9.5));
        assert_eq!(g.correct_calls, Some(140.0));
        assert_eq!(g.expected_correct_calls, Some(140.5));
        assert_eq!(g.correct_calls_above_expected, Some(-0.5));
        assert_eq!(g.accuracy, Some(93.3));
        assert_eq!(g.expected_accuracy, Some(93.7));
        assert_eq!(g.accuracy_above_expected, Some(-0.4));
        assert_eq!(g.consistency, Some(94.1));
        assert_eq!(g.home_favor, Some(0.21));
        assert_eq!(g.total_run_impact, Some(1.05));
    }

    #[test]
    fn malformed_numbers_become_missing() {
        let data = csv_with(&[
            "1,2023-04-01,Joe West,PHI,MIL,--,4,n/a,10,,140,abc,1.0,93.3,93.7,0.1,94.1,NaN,inf",
        ]);
        let games = load_games_from_reader(data.as_bytes(), "test").unwrap();
        let g = &games[0];
        assert_eq!(g.home_runs, None);
        assert_eq!(g.pitches_called, None);
        assert_eq!(g.expected_incorrect_calls, None);
        assert_eq!(g.expected_correct_calls, None);
        assert_eq!(g.home_favor, None);
        assert_eq!(g.total_run_impact, None);
        // The rest of the row survives
        assert_eq!(g.incorrect_calls, Some(10.0));
        assert_eq!(g.accuracy, Some(93.3));
    }

    #[test]
    fn preserves_row_count_and_order() {
        let data = csv_with(&[
            "1,d,Joe West,A,B,1,1,100,5,5,95,95,0,95,95,0,95,0,0",
            "2,d,CB Bucknor,A,B,1,1,bad,5,5,95,95,0,95,95,0,95,0,0",
            "3,d,Joe West,A,B,1,1,120,5,5,95,95,0,95,95,0,95,0,0",
        ]);
        let games = load_games_from_reader(data.as_bytes(), "test").unwrap();
        let names: Vec<&str> = games.iter().map(|g| g.umpire.as_str()).collect();
        assert_eq!(names, vec!["joe west", "cb bucknor", "joe west"]);
    }

    #[test]
    fn absent_numeric_column_is_missing() {
        let data = "Umpire,PC\nJoe West,150";
        let games = load_games_from_reader(data.as_bytes(), "test").unwrap();
        assert_eq!(games[0].pitches_called, Some(150.0));
        assert_eq!(games[0].accuracy, None);
        assert_eq!(games[0].total_run_impact, None);
    }

    #[test]
    fn numeric_cells_are_trimmed() {
        let data = "Umpire,PC,IC\nJoe West, 150 ,\t7";
        let games = load_games_from_reader(data.as_bytes(), "test").unwrap();
        assert_eq!(games[0].pitches_called, Some(150.0));
        assert_eq!(games[0].incorrect_calls, Some(7.0));
    }

    #[test]
    fn missing_umpire_column_is_fatal() {
        let data = "Name,PC\nJoe West,150";
        let err = load_games_from_reader(data.as_bytes(), "test").unwrap_err();
        match err {
            IngestError::MissingColumn { column } => assert_eq!(column, "Umpire"),
            other => panic!("expected MissingColumn, got: {other}"),
        }
    }

    #[test]
    fn blank_identity_is_fatal() {
        let data = "Umpire,PC\nJoe West,150\n   ,120";
        let err = load_games_from_reader(data.as_bytes(), "test").unwrap_err();
        match err {
            IngestError::MissingIdentity { row } => assert_eq!(row, 2),
            other => panic!("expected MissingIdentity, got: {other}"),
        }
    }

    #[test]
    fn ragged_row_is_csv_error() {
        let data = "Umpire,PC\nJoe West,150,extra";
        let err = load_games_from_reader(data.as_bytes(), "games.csv").unwrap_err();
        assert!(matches!(err, IngestError::Csv { ref path, .. } if path == "games.csv"));
    }

    #[test]
    fn header_only_yields_empty() {
        let games = load_games_from_reader(HEADER.as_bytes(), "test").unwrap();
        assert!(games.is_empty());
    }

    #[test]
    fn parse_numeric_edge_cases() {
        assert_eq!(parse_numeric("1e3"), Some(1000.0));
        assert_eq!(parse_numeric("-0.25"), Some(-0.25));
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("   "), None);
        assert_eq!(parse_numeric("12%"), None);
        assert_eq!(parse_numeric("-inf"), None);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_games(Path::new("/nonexistent/games.csv")).unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }
}
