use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bracket_engine::config::AppConfig;
use bracket_engine::models::{
    Entrant, EntrantId, Format, FormatSpec, Match, MatchId, PlayoffMode, ScoreRecord, Side,
};
use bracket_engine::storage::{
    append_score, read_format, read_roster, read_scores, write_format, write_roster,
    JsonlReader, JsonlWriter, StorageConfig,
};
use bracket_engine::TournamentSession;

#[derive(Parser)]
#[command(name = "bracket-engine")]
#[command(about = "Tournament bracket engine: elimination brackets, round-robin groups and playoffs")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error)
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
    /// Start a tournament from a roster file
    Init {
        /// JSONL roster, one entrant per line
        #[arg(long)]
        roster: PathBuf,

        /// Tournament format (single, double, round-robin)
        #[arg(long, default_value = "double")]
        format: String,

        /// Number of round-robin groups
        #[arg(long)]
        groups: Option<usize>,

        /// Entrants advancing from each group
        #[arg(long)]
        advance: Option<usize>,

        /// Playoff bracket after the group stage (none, single, double)
        #[arg(long)]
        playoffs: Option<String>,

        /// Best-of for group matches
        #[arg(long)]
        best_of: Option<u32>,
    },

    /// Record a match score
    Score {
        /// Match id, e.g. W1-M2
        match_id: String,
        score_a: u32,
        score_b: u32,
    },

    /// Award a match without playing it
    Walkover {
        match_id: String,

        /// Side awarded the match (a or b)
        side: String,
    },

    /// Clear a recorded result
    Clear { match_id: String },

    /// Print the bracket
    Show,

    /// Print group standings
    Standings,

    /// Promote a finished group stage into playoffs
    Promote,

    /// Print final placements
    Placements,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(&PathBuf::from(&cli.config))
        .with_context(|| format!("loading {}", cli.config))?;
    let log_level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            cli.json_logs
                .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)),
        )
        .with(
            (!cli.json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
        )
        .init();

    tracing::debug!("Starting bracket-engine v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(
        cli.data_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| config.data_dir.clone()),
    );

    match cli.command {
        Commands::Init {
            roster,
            format,
            groups,
            advance,
            playoffs,
            best_of,
        } => {
            let entrants: Vec<Entrant> = JsonlReader::new(roster.clone()).read_all()?;
            if entrants.is_empty() {
                return Err(anyhow!("No entrants found in {:?}", roster));
            }

            let format: Format = format.parse().map_err(|e: String| anyhow!(e))?;
            let spec = match format {
                Format::RoundRobin => {
                    let mut settings = config.round_robin.clone();
                    if let Some(groups) = groups {
                        settings.groups = groups;
                    }
                    if let Some(advance) = advance {
                        settings.advance_per_group = advance;
                    }
                    if let Some(playoffs) = playoffs {
                        settings.playoffs = PlayoffMode::parse_lenient(&playoffs);
                    }
                    if let Some(best_of) = best_of {
                        settings.best_of = best_of;
                    }
                    FormatSpec::round_robin(settings)
                }
                Format::SingleElimination => FormatSpec::single_elimination(),
                Format::DoubleElimination => FormatSpec::double_elimination(),
            };

            write_roster(&storage, &entrants)?;
            write_format(&storage.format_path(), &spec)?;
            JsonlWriter::<ScoreRecord>::new(storage.scores_path()).write_all(&[])?;

            let session = load_session(&config, &storage)?;
            save_snapshot(&session, &storage)?;

            println!("\n=== Tournament Created ===");
            println!("Format:           {}", spec.format);
            println!("Entrants:         {}", session.roster().len());
            println!("Matches:          {}", session.bracket().all_matches().count());
            println!("Data directory:   {:?}", storage.data_dir);
        }
        Commands::Score {
            match_id,
            score_a,
            score_b,
        } => {
            let record = ScoreRecord::score(MatchId::from(match_id), score_a, score_b, Utc::now());
            record_result(&config, &storage, record)?;
        }
        Commands::Walkover { match_id, side } => {
            let side: Side = side.parse().map_err(|e: String| anyhow!(e))?;
            let record = ScoreRecord::walkover(MatchId::from(match_id), side, Utc::now());
            record_result(&config, &storage, record)?;
        }
        Commands::Clear { match_id } => {
            // A 0-0 record clears the match on replay.
            let record = ScoreRecord::score(MatchId::from(match_id), 0, 0, Utc::now());
            record_result(&config, &storage, record)?;
        }
        Commands::Show => {
            let session = load_session(&config, &storage)?;
            save_snapshot(&session, &storage)?;
            print_bracket(&session);
        }
        Commands::Standings => {
            let session = load_session(&config, &storage)?;
            save_snapshot(&session, &storage)?;

            let bracket = session.bracket();
            if bracket.groups.is_empty() {
                println!("No group stage in this tournament.");
            }
            for (group, rows) in bracket.groups.iter().zip(session.standings()) {
                println!("\n=== {} ===", group.name);
                println!(
                    "{:<4} {:<24} {:>3} {:>3} {:>5} {:>5} {:>5}",
                    "#", "Name", "W", "L", "For", "Agst", "Diff"
                );
                for (idx, row) in rows.iter().enumerate() {
                    println!(
                        "{:<4} {:<24} {:>3} {:>3} {:>5} {:>5} {:>+5}",
                        idx + 1,
                        row.name,
                        row.wins,
                        row.losses,
                        row.maps_for,
                        row.maps_against,
                        row.map_diff
                    );
                }
            }
        }
        Commands::Promote => {
            let mut session = load_session(&config, &storage)?;
            let rebuilt = session.promote_playoffs();
            save_snapshot(&session, &storage)?;

            match &session.bracket().playoffs {
                Some(playoffs) => {
                    if rebuilt {
                        println!("Playoffs promoted.");
                    } else {
                        println!("Playoffs already up to date.");
                    }
                    println!("Mode:             {}", playoffs.mode);
                    println!("Seeded entrants:  {}", playoffs.seeded_ids.len());
                    for (idx, id) in playoffs.seeded_ids.iter().enumerate() {
                        println!("  {:>2}. {}", idx + 1, display_name(&session, Some(id)));
                    }
                }
                None => println!("No playoffs: the group stage is not finished or has no playoff mode."),
            }
        }
        Commands::Placements => {
            let session = load_session(&config, &storage)?;
            save_snapshot(&session, &storage)?;

            match session.placements() {
                Some(placements) => {
                    let mut ordered: Vec<(EntrantId, u32)> = placements.into_iter().collect();
                    ordered.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
                    println!("\n=== Final Placements ===");
                    for (id, place) in ordered {
                        println!("  {:>3}  {}", place, display_name(&session, Some(&id)));
                    }
                }
                None => println!("The tournament is not decided yet."),
            }
        }
    }

    Ok(())
}

/// Rebuild the session from the roster, format and score log.
fn load_session(config: &AppConfig, storage: &StorageConfig) -> Result<TournamentSession> {
    let roster = read_roster(storage)?;
    let format = read_format(&storage.format_path())
        .context("no tournament found; run `init` first")?;
    let catalog = config.load_catalog()?;

    let mut session = TournamentSession::new(roster, format, Arc::new(catalog), config.best_of.clone());
    let records = read_scores(storage)?;
    session.replay(&records);
    Ok(session)
}

fn save_snapshot(session: &TournamentSession, storage: &StorageConfig) -> Result<()> {
    session.snapshot().write(&storage.bracket_path())?;
    Ok(())
}

/// Apply a result to the current bracket and append it to the score log.
fn record_result(config: &AppConfig, storage: &StorageConfig, record: ScoreRecord) -> Result<()> {
    let mut session = load_session(config, storage)?;
    let m = session.apply(&record)?;
    append_score(storage, &record)?;
    save_snapshot(&session, storage)?;

    println!("{}", describe_match(&session, &m));
    Ok(())
}

fn display_name(session: &TournamentSession, id: Option<&EntrantId>) -> String {
    match id {
        Some(id) => session
            .entrant(id)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| id.to_string()),
        None => "TBD".to_string(),
    }
}

fn describe_match(session: &TournamentSession, m: &Match) -> String {
    let [a, b] = session.participants(&m.id).unwrap_or([None, None]);
    let mut line = format!(
        "{:<7} {:>20} {} - {} {:<20}",
        m.id.as_str(),
        display_name(session, a.as_ref()),
        m.scores[0],
        m.scores[1],
        display_name(session, b.as_ref())
    );
    if let Some(side) = m.walkover {
        line.push_str(&format!("  (walkover {:?})", side));
    }
    if let Some(winner) = &m.winner_id {
        line.push_str(&format!("  winner: {}", display_name(session, Some(winner))));
    }
    line
}

fn print_bracket(session: &TournamentSession) {
    let bracket = session.bracket();
    println!("Format: {} ({} entrants)", bracket.format, session.roster().len());

    for group in &bracket.groups {
        println!("\n=== {} ===", group.name);
        for m in &group.matches {
            println!("  {}", describe_match(session, m));
        }
    }
    for (idx, round) in bracket.winners.iter().enumerate() {
        println!("\n=== Winners Round {} ===", idx + 1);
        for m in round {
            println!("  {}", describe_match(session, m));
        }
    }
    for (idx, round) in bracket.losers.iter().enumerate() {
        println!("\n=== Losers Round {} ===", idx + 1);
        for m in round {
            println!("  {}", describe_match(session, m));
        }
    }
    if let Some(finals) = &bracket.finals {
        println!("\n=== Grand Final ===");
        println!("  {}", describe_match(session, finals));
    }
}
