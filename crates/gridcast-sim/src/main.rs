// Gridcast entry point: a bot-driven auction draft.
//
// Startup sequence:
// 1. Initialize tracing (stderr, so stdout carries only the report)
// 2. Copy missing config from defaults/ and load it
// 3. Load the player pool from the cheatsheet
// 4. Build the auction and one bot per owner
// 5. Run the draft to completion
// 6. Print the final board and standings (or JSON)

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use gridcast_core::{Auction, RandomTieBreaker};
use gridcast_sim::bot::ValueBot;
use gridcast_sim::config::{self, ReportFormat};
use gridcast_sim::runner::{self, DraftReport};
use gridcast_sim::{cheatsheet, render};

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    // Optional first argument: directory holding defaults/, config/, data/.
    let base_dir = match std::env::args_os().nth(1) {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir().context("failed to resolve working directory")?,
    };

    config::ensure_config_files(&base_dir).context("failed to initialize config")?;
    let config = config::load_config_from(&base_dir).context("failed to load configuration")?;
    info!(league = %config.league.name, owners = config.league.owners, "configuration loaded");

    let cheatsheet_path = config.cheatsheet_path();
    let players = cheatsheet::load_players(&cheatsheet_path)
        .with_context(|| format!("failed to load players from {}", cheatsheet_path.display()))?;
    info!(players = players.len(), "player pool loaded");

    let tie_breaker = match config.draft.seed {
        Some(seed) => RandomTieBreaker::seeded(seed),
        None => RandomTieBreaker::from_entropy(),
    };
    let mut auction = Auction::new(
        players,
        config.league.owners,
        config.league.money,
        config.roster_template()?,
        tie_breaker,
    )
    .context("failed to set up auction")?;

    let bots: Vec<ValueBot> = (0..config.league.owners)
        .map(|id| ValueBot::new(id, config.bots.value_scale))
        .collect();

    runner::run_draft(&mut auction, &bots, config.draft.max_ticks).context("draft failed")?;

    let report = DraftReport::from_auction(&config.league.name, &auction, config.league.starter_weight);
    match config.draft.report {
        ReportFormat::Text => {
            println!("{}", render::render_auction(&auction));
            print!("{}", render::render_standings(&report));
        }
        ReportFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize report")?
            );
        }
    }

    if let Some(leader) = report.leader() {
        info!(owner = leader, "draft winner");
    }
    Ok(())
}

fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gridcast=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
