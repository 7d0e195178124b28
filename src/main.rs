use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;
use tracing_subscriber::EnvFilter;

use crypto_poly_engine::engine::bot_driver::BotDriver;
use crypto_poly_engine::engine::capabilities::{DecliningSigner, MockChain, Signer, TestModeSigner};
use crypto_poly_engine::engine::config::{load_config, load_default_config};
use crypto_poly_engine::engine::session::{GameSession, SignOutcome};
use crypto_poly_engine::games::crypto_poly::players::create_initial_players;
use crypto_poly_engine::games::crypto_poly::rules::CryptoPolyRules;
use crypto_poly_engine::games::crypto_poly::types::{GameState, PlayerAction, Side};

#[derive(Parser)]
#[command(name = "crypto-poly", about = "Play Crypto Poly against bots in the terminal")]
struct Cli {
    /// Your display name
    #[arg(long, default_value = "Player")]
    name: String,

    /// Wallet address (empty plays in test mode)
    #[arg(long, default_value = "", env = "CRYPTO_POLY_ADDRESS")]
    address: String,

    /// Path to crypto_poly.toml (default: auto-discover)
    #[arg(long, env = "CRYPTO_POLY_CONFIG")]
    config: Option<PathBuf>,

    /// Skip bot pacing delays
    #[arg(long)]
    fast: bool,

    /// Use a wallet that rejects every signature request
    #[arg(long)]
    decline: bool,

    /// Simulate an unreachable chain; purchases stay local
    #[arg(long)]
    offline: bool,

    /// Print `status` as JSON
    #[arg(long)]
    json: bool,

    /// Seed for bot dice
    #[arg(long)]
    seed: Option<u64>,
}

const HELP: &str = "Commands: roll | yes | no | sign | cancel | end | sell <market-id> | status | help | quit";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_default_config(),
    };
    if cli.fast {
        config.bot.think_ms = 0;
        config.bot.move_ms = 0;
        config.bot.purchase_ms = 0;
        config.bot.end_turn_ms = 0;
    }

    let rules = CryptoPolyRules::from_config(&config);
    let players = create_initial_players(&cli.name, &cli.address, &config.bots, config.starting_money);
    let session = Arc::new(GameSession::new(rules, rules.create_initial_state(players)));
    tracing::info!(bots = config.bots.len(), strategy = %config.bot.strategy_type, "game created");

    let signer: Arc<dyn Signer> = if cli.decline {
        Arc::new(DecliningSigner)
    } else {
        Arc::new(TestModeSigner)
    };
    let chain = Arc::new(if cli.offline {
        MockChain::offline("offline mode")
    } else {
        MockChain::new()
    });

    let bots = tokio::spawn(BotDriver::from_profile(&config.bot, cli.seed).run(session.clone()));
    let printer = tokio::spawn(print_updates(session.subscribe()));

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut words = line.split_whitespace();
        let accepted = match (words.next(), words.next()) {
            (None, _) => continue,
            (Some("roll"), _) => session.roll(),
            (Some("yes"), _) => session.choose_outcome(Side::Yes),
            (Some("no"), _) => session.choose_outcome(Side::No),
            (Some("sign"), _) => {
                let (session, signer, chain) = (session.clone(), signer.clone(), chain.clone());
                tokio::spawn(async move {
                    match session.sign_pending(signer.as_ref(), chain.as_ref()).await {
                        SignOutcome::Confirmed { tx_hash: Some(tx) } => println!("  submitted: {tx}"),
                        SignOutcome::Confirmed { tx_hash: None } => println!("  submission failed; purchase kept"),
                        SignOutcome::Cancelled => println!("  signature rejected"),
                        SignOutcome::Stale => println!("  choice was withdrawn before signing finished"),
                        SignOutcome::NothingPending => println!("  nothing to sign"),
                    }
                });
                true
            }
            (Some("cancel"), _) => session.cancel(),
            (Some("end"), _) => session.end_turn(),
            (Some("sell"), Some(id)) => session.sell(id.to_string()),
            (Some("status"), _) => {
                print_status(&session.snapshot(), cli.json)?;
                true
            }
            (Some("help"), _) => {
                println!("{HELP}");
                true
            }
            (Some("quit" | "exit"), _) => break,
            _ => {
                println!("Unknown command. {HELP}");
                true
            }
        };
        if !accepted {
            println!("  not now ({})", prompt(&session.snapshot()));
        }
    }

    bots.abort();
    printer.abort();
    Ok(())
}

/// Print new log lines and a prompt whenever the state changes.
async fn print_updates(rx: watch::Receiver<GameState>) {
    let mut next_seq = 0;
    let mut updates = WatchStream::new(rx);
    while let Some(state) = updates.next().await {
        for entry in state.log.since(next_seq) {
            println!("{entry}");
        }
        next_seq = state.log.total_pushed();
        if !state.current_player().is_bot {
            println!("> {}", prompt(&state));
        }
    }
}

fn prompt(state: &GameState) -> String {
    match state.action {
        PlayerAction::CanRoll if state.current_player().is_bot => "waiting for bots".into(),
        PlayerAction::CanRoll => "type `roll`".into(),
        PlayerAction::AwaitingChoice => match state.current_market() {
            Some(m) => format!(
                "{}  YES ${} / NO ${}  -> `yes` or `no`",
                m.question,
                m.price(Side::Yes),
                m.price(Side::No)
            ),
            None => "choose `yes` or `no`".into(),
        },
        PlayerAction::AwaitingSignature => "type `sign` to approve in your wallet, or `cancel`".into(),
        PlayerAction::CanEndTurn => "type `end` to finish your turn".into(),
        PlayerAction::BotTurn => "bot is playing".into(),
    }
}

fn print_status(state: &GameState, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(state)?);
        return Ok(());
    }
    println!("Turn {}  |  dice {} + {}", state.turn_number, state.dice.0, state.dice.1);
    for (i, p) in state.players.iter().enumerate() {
        let marker = if i == state.current_player_index { "*" } else { " " };
        println!(
            " {marker} {:<10} ${:<6} worth ${:<6} {:<40} nfts={}{}",
            p.name,
            p.money,
            state.net_worth(p.id),
            state.tile_label(p.position),
            p.nfts.len(),
            if p.in_jail { "  [rugpulled]" } else { "" },
        );
    }
    let me = state.human().map(|p| p.id);
    let owned: Vec<_> = state
        .markets
        .iter()
        .filter(|m| m.is_property() && m.owner.zip(me).is_some_and(|(o, id)| o.player_id == id))
        .map(|m| m.id.as_str())
        .collect();
    if !owned.is_empty() {
        println!("   sellable: {}", owned.join(", "));
    }
    Ok(())
}
