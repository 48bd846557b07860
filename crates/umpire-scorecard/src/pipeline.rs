// End-to-end scorecard pipeline: ingest -> aggregate -> rank -> export.

use crate::aggregate::{aggregate, SummaryTable};
use crate::config::{Config, RankingConfig};
use crate::export::{export_ranked, export_summary};
use crate::ingest::{load_games, load_games_from_reader, GameRecord};
use crate::ranking::{rank_umpires, RankedTable};
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Output of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub games_ingested: usize,
    pub summary: SummaryTable,
    pub ranked: RankedTable,
}

/// Aggregate and rank games read from `rdr`. Nothing is written to disk.
pub fn analyze_reader<R: Read>(
    rdr: R,
    source: &str,
    ranking: &RankingConfig,
) -> Result<PipelineOutput> {
    let games = load_games_from_reader(rdr, source)
        .with_context(|| format!("failed to ingest {source}"))?;
    Ok(analyze_games(&games, ranking))
}

fn analyze_games(games: &[GameRecord], ranking: &RankingConfig) -> PipelineOutput {
    let games_ingested = games.len();
    let summary = aggregate(games);
    info!(
        "Aggregated {} games into {} umpire summaries",
        games_ingested,
        summary.len()
    );
    let ranked = rank_umpires(summary.rows(), ranking);
    PipelineOutput {
        games_ingested,
        summary,
        ranked,
    }
}

/// Run the full pipeline described by `config`, relative to `base_dir`.
pub fn run(config: &Config, base_dir: &Path) -> Result<PipelineOutput> {
    let games_path = base_dir.join(&config.data_paths.games);
    info!("Loading games from {}", games_path.display());
    let games = load_games(&games_path).context("failed to load scorecard games")?;

    let output = analyze_games(&games, &config.ranking);

    if config.export.enabled {
        let decimals = config.export.decimals;
        export_summary(&base_dir.join(&config.export.summary), &output.summary, decimals)
            .context("failed to export umpire summary")?;
        export_ranked(&base_dir.join(&config.export.ranked), &output.ranked, decimals)
            .context("failed to export ranked umpires")?;
    }

    Ok(output)
}
