use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use rankboard::api::state::AppState;
use rankboard::api::build_router;
use rankboard::cache::SubmissionCache;
use rankboard::config::AppConfig;
use rankboard::engine;
use rankboard::models::{CategoryConfig, Level, RecordType, Submission, TimeParts};
use rankboard::source::{HttpSource, JsonlSource, SubmissionSource};
use rankboard::storage::StorageConfig;

#[derive(Parser)]
#[command(name = "rankboard")]
#[command(about = "Speedrun leaderboard service: world records, medals, totalizers")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides config)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error; overrides config)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print a board to stdout
    Board {
        /// Game to query
        #[arg(long)]
        game: String,

        /// Category within the game
        #[arg(long)]
        category: String,

        /// Board to print: "records", "medals", or "totals"
        #[arg(long, default_value = "records")]
        view: String,

        /// Level for the records view
        #[arg(long)]
        level: Option<String>,

        /// Record type: "score" or "time"
        #[arg(long = "type", default_value = "time")]
        record_type: RecordType,

        /// Show the full submission history instead of the ranked board
        #[arg(long)]
        show_obsolete: bool,
    },

    /// Check a game's stored submissions for integrity problems
    Validate {
        /// Game to check
        #[arg(long)]
        game: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if std::path::Path::new(&cli.config).exists() {
        AppConfig::from_file(std::path::Path::new(&cli.config))
            .with_context(|| format!("loading config from {}", cli.config))?
    } else {
        AppConfig::default()
    };
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = PathBuf::from(data_dir);
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone();
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let storage = StorageConfig::new(config.data_dir.clone());
            let source: Arc<dyn SubmissionSource> = match config.source.backend.as_str() {
                "remote" => {
                    let base = Url::parse(&config.source.base_url)
                        .with_context(|| format!("parsing {}", config.source.base_url))?;
                    tracing::info!("Using remote source: {}", base);
                    Arc::new(HttpSource::new(
                        base,
                        Duration::from_secs(config.source.timeout_seconds),
                    )?)
                }
                _ => Arc::new(JsonlSource::new(storage.clone())),
            };

            let state = AppState {
                storage: Arc::new(storage),
                source,
                cache: Arc::new(SubmissionCache::new()),
            };
            let app = build_router(state);

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Boards: http://{}/api/games", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Board {
            game,
            category,
            view,
            level,
            record_type,
            show_obsolete,
        } => {
            let storage = StorageConfig::new(config.data_dir.clone());
            let source = JsonlSource::new(storage);
            let ctx = load_category(&source, &game, &category, record_type).await?;

            match view.as_str() {
                "records" => {
                    let Some(level_id) = level else {
                        bail!("--level is required for the records view");
                    };
                    print_records(&ctx, &level_id, record_type, show_obsolete)?;
                }
                "medals" => print_medals(&ctx, record_type)?,
                "totals" => print_totals(&ctx, record_type)?,
                other => bail!("Unknown view: {other} (expected records, medals, or totals)"),
            }
        }
        Commands::Validate { game } => {
            let storage = StorageConfig::new(config.data_dir.clone());
            let source = JsonlSource::new(storage);

            let profiles = source.fetch_profiles(&game).await?;
            let levels = source.fetch_levels(&game).await?;
            let scores = source.fetch_submissions(&game, RecordType::Score).await?;
            let times = source.fetch_submissions(&game, RecordType::Time).await?;

            let report = engine::normalize(&scores, &times, &profiles, &levels);

            println!("=== Integrity Report ({}) ===\n", game);
            println!("Profiles:         {}", profiles.len());
            println!("Levels:           {}", levels.len());
            println!("Score rows:       {}", scores.len());
            println!("Time rows:        {}", times.len());
            println!("Normalized:       {}", report.submissions.len());
            println!("Dropped:          {}", report.dropped.len());

            if !report.dropped.is_empty() {
                println!("\nDropped rows:");
                for row in &report.dropped {
                    println!("  {} — {}", row.id, row.reason);
                }
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// A category's levels and normalized submissions, loaded from the store.
struct CategoryData {
    category: CategoryConfig,
    levels: Vec<Level>,
    submissions: Vec<Submission>,
}

async fn load_category(
    source: &JsonlSource,
    game: &str,
    category_id: &str,
    record_type: RecordType,
) -> Result<CategoryData> {
    let categories = source.fetch_categories(game).await?;
    let Some(category) = categories.into_iter().find(|c| c.id.as_str() == category_id) else {
        bail!("No category {category_id} in game {game}");
    };

    let levels: Vec<Level> = source
        .fetch_levels(game)
        .await?
        .into_iter()
        .filter(|l| l.misc == category.misc)
        .collect();
    let profiles = source.fetch_profiles(game).await?;
    let rows = source.fetch_submissions(game, record_type).await?;

    let all_levels = source.fetch_levels(game).await?;
    let report = match record_type {
        RecordType::Score => engine::normalize(&rows, &[], &profiles, &all_levels),
        RecordType::Time => engine::normalize(&[], &rows, &profiles, &all_levels),
    };

    let level_ids: std::collections::HashSet<&str> =
        levels.iter().map(|l| l.id.as_str()).collect();
    let submissions = report
        .submissions
        .into_iter()
        .filter(|s| level_ids.contains(s.level.id.as_str()))
        .collect();

    Ok(CategoryData {
        category,
        levels,
        submissions,
    })
}

fn fmt_record(record_type: RecordType, value: f64) -> String {
    match record_type {
        RecordType::Time => format!("{:.2}", value),
        RecordType::Score => format!("{}", value),
    }
}

fn print_records(
    ctx: &CategoryData,
    level_id: &str,
    record_type: RecordType,
    show_obsolete: bool,
) -> Result<()> {
    let Some(level) = ctx.levels.iter().find(|l| l.id.as_str() == level_id) else {
        bail!("No level {level_id} in category {}", ctx.category.name);
    };
    if !level.chart.allows(record_type) {
        bail!("Level {} has no {} chart", level.name, record_type);
    }

    let level_subs: Vec<Submission> = ctx
        .submissions
        .iter()
        .filter(|s| s.level.id == level.id)
        .cloned()
        .collect();

    if show_obsolete {
        println!("=== Submission History: {} ({}) ===\n", level.name, record_type);
        for s in engine::submission_history(&level_subs) {
            println!(
                "  {}  {:>10}  {}{}",
                s.submitted_at.format("%Y-%m-%d %H:%M"),
                fmt_record(record_type, s.record),
                s.profile.username,
                if s.live { "  [live]" } else { "" }
            );
        }
        return Ok(());
    }

    let direction = ctx.category.direction(record_type);
    let adjacent = engine::adjacent_levels(&ctx.levels, &level.id);
    let board = engine::world_record_board(&level_subs, direction, adjacent);

    println!("=== World Records: {} ({}) ===\n", level.name, record_type);
    if board.all.is_empty() {
        println!("  (no submissions)");
    }
    for entry in &board.all {
        let s = &entry.submission;
        println!(
            "  #{:<3} {:>10}  {}{}",
            entry.position,
            fmt_record(record_type, s.record),
            s.profile.username,
            if s.live { "  [live]" } else { "" }
        );
    }

    println!("\n--- Live only ---");
    for entry in &board.live {
        let s = &entry.submission;
        println!(
            "  #{:<3} {:>10}  {}",
            entry.position,
            fmt_record(record_type, s.record),
            s.profile.username
        );
    }

    if let Some(prev) = &board.adjacent.prev {
        println!("\nPrev: {}", prev);
    }
    if let Some(next) = &board.adjacent.next {
        println!("Next: {}", next);
    }
    Ok(())
}

fn print_medals(ctx: &CategoryData, record_type: RecordType) -> Result<()> {
    if !ctx.category.practice_style {
        bail!("Category {} has world records only", ctx.category.name);
    }

    let direction = ctx.category.direction(record_type);
    let rows = engine::medal_table_for_category(&ctx.submissions, &ctx.levels, direction);

    println!(
        "=== Medal Table: {} ({}) ===\n",
        ctx.category.name, record_type
    );
    println!("  Pos  {:<20} {:>4} {:>4} {:>4} {:>4}", "Player", "P", "G", "S", "B");
    for row in &rows {
        println!(
            "  #{:<3} {:<20} {:>4} {:>4} {:>4} {:>4}",
            row.position,
            row.profile.username,
            row.counts.platinum,
            row.counts.gold,
            row.counts.silver,
            row.counts.bronze
        );
    }
    Ok(())
}

fn print_totals(ctx: &CategoryData, record_type: RecordType) -> Result<()> {
    if !ctx.category.practice_style {
        bail!("Category {} has world records only", ctx.category.name);
    }

    let direction = ctx.category.direction(record_type);
    let board = engine::totalizer_board(&ctx.submissions, &ctx.levels, direction);

    println!(
        "=== Totalizer: {} ({}) ===\n",
        ctx.category.name, record_type
    );
    for (label, rows) in [("All records", &board.all), ("Live only", &board.live)] {
        println!("--- {} ---", label);
        for row in rows {
            let total = match record_type {
                RecordType::Time => TimeParts::from_seconds(row.total).to_string(),
                RecordType::Score => fmt_record(record_type, row.total),
            };
            println!(
                "  #{:<3} {:<20} {:>14}  ({} levels)",
                row.position, row.profile.username, total, row.levels_counted
            );
        }
        println!();
    }
    if record_type == RecordType::Time && board.par_total > 0.0 {
        println!(
            "Par total: {}",
            TimeParts::from_seconds(board.par_total)
        );
    }
    Ok(())
}
