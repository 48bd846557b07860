// Spotlight selection: side-by-side rows for named umpires.

use crate::aggregate::{SummaryTable, UmpireSummary};
use crate::export::round_to;
use crate::normalize::normalize_identity;
use crate::ranking::{RankedTable, RankedUmpire};
use std::fmt::Write;
use tracing::warn;

/// Everything known about one requested umpire.
#[derive(Debug, Clone)]
pub struct SpotlightEntry<'a> {
    /// Normalized form of the requested name.
    pub umpire: String,
    pub summary: Option<&'a UmpireSummary>,
    pub ranked: Option<&'a RankedUmpire>,
    /// 0-based position among qualified umpires.
    pub position: Option<usize>,
    pub qualified_count: usize,
}

impl SpotlightEntry<'_> {
    pub fn found(&self) -> bool {
        self.summary.is_some()
    }
}

/// Look up each requested name in both tables. Unknown names produce an
/// entry with nothing found.
pub fn spotlight<'a, S: AsRef<str>>(
    names: &[S],
    summary: &'a SummaryTable,
    ranked: &'a RankedTable,
) -> Vec<SpotlightEntry<'a>> {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let entry = SpotlightEntry {
                umpire: normalize_identity(name),
                summary: summary.get(name),
                ranked: ranked.get(name),
                position: ranked.position(name),
                qualified_count: ranked.len(),
            };
            if !entry.found() {
                warn!("spotlight umpire '{}' not found in data", name);
            }
            entry
        })
        .collect()
}

fn cell(value: Option<f64>) -> String {
    value.map(|v| round_to(v, 3).to_string()).unwrap_or_else(|| "-".into())
}

/// Fixed-width text table of the spotlight entries.
pub fn render_spotlight(entries: &[SpotlightEntry<'_>], ranked: &RankedTable) -> String {
    let mut header = vec![
        "Umpire".to_string(),
        "Rank".into(),
        "GC".into(),
        "PC".into(),
        "IC_per_100".into(),
    ];
    header.extend(ranked.metrics().iter().map(|m| m.field.pct_label()));
    header.push("avg_pct".into());
    header.push("Fav_pct".into());

    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            let mut row = vec![e.umpire.clone()];
            match (e.summary, e.ranked, e.position) {
                (Some(s), Some(r), Some(pos)) => {
                    row.push(format!("{}/{}", pos + 1, e.qualified_count));
                    row.push(s.games_called.to_string());
                    row.push(cell(Some(s.pitches_called)));
                    row.push(cell(Some(r.ic_per_100)));
                    row.extend(r.percentiles.iter().map(|p| cell(p.value)));
                    row.push(cell(r.avg_pct));
                    row.push(cell(r.fav_pct));
                }
                (Some(s), _, _) => {
                    row.push("unranked".into());
                    row.push(s.games_called.to_string());
                    row.push(cell(Some(s.pitches_called)));
                }
                _ => row.push("not found".into()),
            }
            row
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, c) in row.iter().enumerate() {
            widths[i] = widths[i].max(c.len());
        }
    }

    let mut out = String::new();
    for line in std::iter::once(&header).chain(rows.iter()) {
        let cells: Vec<String> = line
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:<width$}", c, width = widths[i]))
            .collect();
        let _ = writeln!(out, "{}", cells.join("  ").trim_end());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::config::RankingConfig;
    use crate::ingest::GameRecord;
    use crate::ranking::rank_umpires;

    fn game(umpire: &str, pc: f64, acc: f64) -> GameRecord {
        GameRecord {
            pitches_called: Some(pc),
            incorrect_calls: Some(pc * 0.07),
            accuracy: Some(acc),
            consistency: Some(93.0),
            accuracy_above_expected: Some(acc - 93.0),
            total_run_impact: Some(1.0),
            home_favor: Some(0.1),
            ..GameRecord::empty(umpire)
        }
    }

    fn tables() -> (SummaryTable, RankedTable) {
        let summary = aggregate(&[
            game("angel hernandez", 34592.0, 92.0),
            game("joe west", 40000.0, 93.5),
            game("pat hoberg", 31000.0, 95.0),
            game("rookie", 1000.0, 96.0),
        ]);
        let ranked = rank_umpires(summary.rows(), &RankingConfig::default());
        (summary, ranked)
    }

    #[test]
    fn finds_ranked_umpires_by_display_name() {
        let (summary, ranked) = tables();
        let entries = spotlight(&["Ángel Hernández", "Joe West"], &summary, &ranked);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].umpire, "angel hernandez");
        assert!(entries[0].ranked.is_some());
        assert_eq!(entries[0].qualified_count, 3);
        assert_eq!(entries[0].position, ranked.position("angel hernandez"));
        assert!(entries[1].found());
    }

    #[test]
    fn unqualified_and_unknown_names() {
        let (summary, ranked) = tables();
        let entries = spotlight(&["rookie", "nobody"], &summary, &ranked);
        assert!(entries[0].found());
        assert!(entries[0].ranked.is_none());
        assert!(!entries[1].found());

        let text = render_spotlight(&entries, &ranked);
        assert!(text.contains("unranked"));
        assert!(text.contains("not found"));
    }

    #[test]
    fn render_has_header_and_rank() {
        let (summary, ranked) = tables();
        let entries = spotlight(&["pat hoberg"], &summary, &ranked);
        let text = render_spotlight(&entries, &ranked);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Umpire"));
        assert!(lines[0].contains("Acc_pct"));
        assert!(lines[0].ends_with("Fav_pct"));
        assert!(lines[1].starts_with("pat hoberg"));
        assert!(lines[1].contains("1/3"));
    }
}
