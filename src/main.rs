//! Command-line front end for the arena-elo rating core
//!
//! Route handlers call the library directly; this binary exists for admins
//! and scripts that want to settle a match or rebalance a lobby from JSON.

use anyhow::{Context, Result};
use arena_elo::config::AppConfig;
use arena_elo::matchmaking::{can_play_together, BalancedTeams, TeamBalancer};
use arena_elo::rating::{
    calculator_for, expected_score, update_rating, SettlementAlgorithm, SettlementReport,
};
use arena_elo::types::{Outcome, Rating, RosterEntry, TeamMatchOutcome};
use arena_elo::utils::rating_difference;
use clap::{CommandFactory, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Arena ELO - rating core for FPS community matchmaking
#[derive(Parser)]
#[command(
    name = "arena-elo",
    version,
    about = "ELO updates, team settlement, tiers and team balancing",
    long_about = "Arena ELO computes rating changes for 1v1 and team matches, classifies ratings \
                 into ranked and icon tiers, and balances player pools into even teams. Input and \
                 output are JSON so the tool can sit next to the web application's API."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        global = true,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, global = true, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit")]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Rating after a single 1v1 game
    Update {
        /// Player's current rating
        #[arg(long, allow_negative_numbers = true)]
        rating: Rating,
        /// Opponent's current rating
        #[arg(long, allow_negative_numbers = true)]
        opponent: Rating,
        /// win, loss or draw
        #[arg(long)]
        outcome: Outcome,
        /// K-factor (defaults to the configured base K-factor)
        #[arg(long)]
        k_factor: Option<f64>,
    },
    /// Settle a team match read from a JSON file
    Settle {
        /// JSON file with winning_roster, losing_roster and optional margin
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
        /// weighted or uniform (defaults to the configured algorithm)
        #[arg(short, long)]
        algorithm: Option<SettlementAlgorithm>,
    },
    /// Ranked and icon tier for a rating
    Tier {
        #[arg(long, allow_negative_numbers = true)]
        rating: Rating,
    },
    /// Check whether two players are close enough to share a match
    Compat {
        #[arg(long, allow_negative_numbers = true)]
        rating_a: Rating,
        #[arg(long, allow_negative_numbers = true)]
        rating_b: Rating,
        /// Largest allowed gap (defaults to the configured maximum)
        #[arg(long)]
        max_diff: Option<i64>,
    },
    /// Split a JSON list of players into two balanced teams
    Balance {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
    },
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from file/environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    arena_elo::config::validate_config(&config)?;
    Ok(config)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn update_summary(
    rating: Rating,
    opponent: Rating,
    outcome: Outcome,
    k_factor: Option<f64>,
    config: &AppConfig,
) -> serde_json::Value {
    let k_factor = k_factor.unwrap_or(config.rating.base_k_factor);
    let new_rating = update_rating(rating, opponent, outcome, k_factor);
    serde_json::json!({
        "rating": rating,
        "opponent": opponent,
        "outcome": outcome,
        "k_factor": k_factor,
        "expected": expected_score(rating, opponent),
        "new_rating": new_rating,
        "delta": new_rating - rating,
    })
}

fn settle_match(
    outcome: &TeamMatchOutcome,
    algorithm: Option<SettlementAlgorithm>,
    config: &AppConfig,
) -> Result<SettlementReport> {
    let algorithm = algorithm.unwrap_or(config.rating.settlement_algorithm);
    let calculator = calculator_for(algorithm, &config.rating)?;

    info!(
        %algorithm,
        winners = outcome.winning_roster.len(),
        losers = outcome.losing_roster.len(),
        "Settling team match"
    );
    calculator.calculate_rating_changes(outcome)
}

fn tier_summary(rating: Rating, config: &AppConfig) -> serde_json::Value {
    serde_json::json!({
        "rating": rating,
        "ranked_tier": config.rating.ranked_tiers.classify(rating).to_string(),
        "icon_tier": config.rating.icon_tiers.classify(rating).to_string(),
    })
}

fn compat_summary(
    rating_a: Rating,
    rating_b: Rating,
    max_diff: Option<i64>,
    config: &AppConfig,
) -> serde_json::Value {
    let max_diff = max_diff.unwrap_or(config.matchmaking.max_rating_difference);
    serde_json::json!({
        "rating_a": rating_a,
        "rating_b": rating_b,
        "difference": rating_difference(rating_a, rating_b),
        "max_diff": max_diff,
        "compatible": can_play_together(rating_a, rating_b, max_diff),
    })
}

fn balance_pool(pool: &[RosterEntry], config: &AppConfig) -> Result<BalancedTeams> {
    let balancer = TeamBalancer::new(
        config.matchmaking.exhaustive_balance_limit,
        config.rating.default_rating,
    );
    balancer.balance(pool)
}

fn run(command: Command, config: &AppConfig) -> Result<()> {
    match command {
        Command::Update {
            rating,
            opponent,
            outcome,
            k_factor,
        } => print_json(&update_summary(rating, opponent, outcome, k_factor, config)),
        Command::Settle { input, algorithm } => {
            let outcome: TeamMatchOutcome = read_json(&input)?;
            print_json(&settle_match(&outcome, algorithm, config)?)
        }
        Command::Tier { rating } => print_json(&tier_summary(rating, config)),
        Command::Compat {
            rating_a,
            rating_b,
            max_diff,
        } => print_json(&compat_summary(rating_a, rating_b, max_diff, config)),
        Command::Balance { input } => {
            let pool: Vec<RosterEntry> = read_json(&input)?;
            print_json(&balance_pool(&pool, config)?)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    debug!(
        service = %config.service.name,
        algorithm = %config.rating.settlement_algorithm,
        "Configuration loaded"
    );

    if args.dry_run {
        info!("Configuration validation successful");
        return Ok(());
    }

    match args.command {
        Some(command) => run(command, &config),
        None => {
            Args::command().print_help()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(prefix: &str, ratings: &[Rating]) -> Vec<RosterEntry> {
        ratings
            .iter()
            .enumerate()
            .map(|(i, &r)| RosterEntry::new(format!("{}{}", prefix, i), r))
            .collect()
    }

    #[test]
    fn test_args_parse_subcommands() {
        let args = Args::try_parse_from([
            "arena-elo",
            "--debug",
            "update",
            "--rating",
            "1500",
            "--opponent",
            "-20",
            "--outcome",
            "win",
        ])
        .unwrap();
        assert!(args.debug);
        assert!(matches!(
            args.command,
            Some(Command::Update {
                rating: 1500,
                opponent: -20,
                outcome: Outcome::Win,
                k_factor: None,
            })
        ));

        let args =
            Args::try_parse_from(["arena-elo", "settle", "-i", "match.json", "-a", "uniform"])
                .unwrap();
        assert!(matches!(
            args.command,
            Some(Command::Settle {
                algorithm: Some(SettlementAlgorithm::Uniform),
                ..
            })
        ));

        assert!(Args::try_parse_from(["arena-elo", "update", "--rating", "1500"]).is_err());
    }

    #[test]
    fn test_update_summary_uses_configured_k() {
        let config = AppConfig::default();
        let summary = update_summary(1500, 1900, Outcome::Win, None, &config);
        assert_eq!(summary["k_factor"], 32.0);
        assert_eq!(summary["new_rating"], 1529);
        assert_eq!(summary["delta"], 29);
        assert_eq!(summary["outcome"], "win");

        let summary = update_summary(1500, 1500, Outcome::Win, Some(16.0), &config);
        assert_eq!(summary["new_rating"], 1508);
    }

    #[test]
    fn test_settle_match_report_json() {
        let config = AppConfig::default();
        let outcome = TeamMatchOutcome::new(
            roster("w", &[1400, 1400, 1400, 1400]),
            roster("l", &[1400, 1400, 1400, 1400]),
        )
        .with_margin(6.0);

        let report = settle_match(&outcome, None, &config).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["algorithm"], "weighted");
        assert_eq!(json["winning_changes"][0]["delta"], 16);
        assert_eq!(json["losing_changes"][3]["new_rating"], 1384);

        let report = settle_match(&outcome, Some(SettlementAlgorithm::Uniform), &config).unwrap();
        assert_eq!(report.algorithm, SettlementAlgorithm::Uniform);
        assert!(report.winning_changes.iter().all(|c| c.delta == 16));
    }

    #[test]
    fn test_settle_match_rejects_empty_roster() {
        let outcome = TeamMatchOutcome::new(Vec::new(), roster("l", &[1500]));
        assert!(settle_match(&outcome, None, &AppConfig::default()).is_err());
    }

    #[test]
    fn test_tier_summary() {
        let summary = tier_summary(1529, &AppConfig::default());
        assert_eq!(summary["ranked_tier"], "GOLD");
        assert_eq!(summary["icon_tier"], "PLATINUM");

        let summary = tier_summary(-5, &AppConfig::default());
        assert_eq!(summary["ranked_tier"], "UNRANKED");
    }

    #[test]
    fn test_compat_summary() {
        let config = AppConfig::default();
        let summary = compat_summary(1500, 1950, None, &config);
        assert_eq!(summary["difference"], 450);
        assert_eq!(summary["max_diff"], 400);
        assert_eq!(summary["compatible"], false);

        let summary = compat_summary(1500, 1950, Some(500), &config);
        assert_eq!(summary["compatible"], true);
    }

    #[test]
    fn test_balance_pool_uses_config() {
        let pool = roster("p", &[2000, 1600, 1400, 1000]);
        let teams = balance_pool(&pool, &AppConfig::default()).unwrap();
        assert_eq!(teams.team_a.len(), 2);
        assert_eq!(teams.rating_gap, 0.0);
    }
}
