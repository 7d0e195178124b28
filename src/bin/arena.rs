//! Arena CLI: run bot-only Crypto Poly games from the command line.
//!
//! Usage:
//!   cargo run --release --bin arena -- --games 500 --turns 120
//!   cargo run --release --bin arena -- --games 200 --strategy cheapest --threshold 300

use std::path::PathBuf;

use clap::Parser;

use crypto_poly_engine::engine::arena::run_arena;
use crypto_poly_engine::engine::config::{load_config, load_default_config};
use crypto_poly_engine::games::crypto_poly::players::BotSeat;

#[derive(Parser)]
#[command(name = "arena", about = "Run bot-only Crypto Poly simulations")]
struct Cli {
    /// Number of games to play
    #[arg(long, default_value = "100")]
    games: usize,

    /// Turns per game (all seats combined)
    #[arg(long, default_value = "120")]
    turns: u64,

    /// Random seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Rotate seat order between games
    #[arg(long, default_value = "true")]
    alternate_seats: bool,

    /// Path to crypto_poly.toml
    #[arg(long, env = "CRYPTO_POLY_CONFIG")]
    config: Option<PathBuf>,

    /// Override strategy type: "random" or "cheapest"
    #[arg(long)]
    strategy: Option<String>,

    /// Override purchase threshold
    #[arg(long)]
    threshold: Option<i64>,

    /// Bot names; replaces the configured roster when given
    #[arg(long, value_delimiter = ',')]
    bots: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path).unwrap_or_else(|e| {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }),
        None => load_default_config(),
    };

    if let Some(s) = cli.strategy {
        config.bot.strategy_type = s;
    }
    if let Some(t) = cli.threshold {
        config.bot.purchase_threshold = t;
    }
    if !cli.bots.is_empty() {
        config.bots = cli
            .bots
            .iter()
            .map(|name| BotSeat { name: name.clone(), token_color: "purple".into() })
            .collect();
    }
    if config.bots.len() < 2 {
        let filler = if config.bots.iter().any(|b| b.name == "Hal") { "Satoshi" } else { "Hal" };
        config.bots.push(BotSeat { name: filler.into(), token_color: "orange".into() });
    }
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    eprintln!(
        "Arena: {} games x {} turns, seed={}, alternate_seats={}",
        cli.games, cli.turns, cli.seed, cli.alternate_seats
    );
    eprintln!(
        "  bots: {}  strategy={} threshold={}",
        config.bots.iter().map(|b| b.name.as_str()).collect::<Vec<_>>().join(", "),
        config.bot.strategy_type,
        config.bot.purchase_threshold,
    );
    eprintln!();

    let total = cli.games;
    let progress_cb = move |done: usize, _total: usize| {
        eprint!("\r  [{}/{}] games completed", done, total);
    };

    let result = run_arena(
        &config,
        cli.games,
        cli.seed,
        cli.turns,
        cli.alternate_seats,
        Some(&progress_cb),
    );

    eprintln!("\r                                    "); // clear progress line
    println!("{}", result.summary());
}
