// Umpire scorecard entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr; stdout carries the report)
// 2. Load config (seeding config/ from defaults/ on first run)
// 3. Run the pipeline: ingest, aggregate, rank, export
// 4. Print the spotlight table

use umpire_scorecard::config;
use umpire_scorecard::pipeline;
use umpire_scorecard::report;

use anyhow::Context;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Umpire scorecard starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: games={}, min_pitches_called={}, {} metrics",
        config.data_paths.games,
        config.ranking.min_pitches_called,
        config.ranking.metrics.len()
    );

    // 3. Run the pipeline
    let base_dir = std::env::current_dir().context("failed to resolve working directory")?;
    let output = pipeline::run(&config, &base_dir).context("scorecard pipeline failed")?;
    info!(
        "Ranked {} of {} umpires from {} games",
        output.ranked.len(),
        output.summary.len(),
        output.games_ingested
    );

    // 4. Spotlight
    if !config.report.spotlight.is_empty() {
        let entries = report::spotlight(&config.report.spotlight, &output.summary, &output.ranked);
        print!("{}", report::render_spotlight(&entries, &output.ranked));
    }

    Ok(())
}

/// Initialize tracing to stderr with an env-overridable filter.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("umpire_scorecard=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
