//! Bot-only arena: plays many instant games and aggregates who ends up richest.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::engine::bot_strategy::strategy_from_profile;
use crate::engine::config::GameConfig;
use crate::games::crypto_poly::bot::BotPlanner;
use crate::games::crypto_poly::players::{create_bot_players, BotSeat};
use crate::games::crypto_poly::rules::CryptoPolyRules;
use crate::games::crypto_poly::types::GameState;

/// Aggregated results from an arena run.
pub struct ArenaResult {
    pub num_games: usize,
    pub wins: HashMap<String, usize>,
    pub draws: usize,
    pub final_net_worth: HashMap<String, Vec<i64>>,
    pub purchases: HashMap<String, Vec<usize>>,
    pub game_durations_ms: Vec<f64>,
}

impl ArenaResult {
    pub fn win_rate(&self, name: &str) -> f64 {
        *self.wins.get(name).unwrap_or(&0) as f64 / self.num_games.max(1) as f64
    }

    pub fn avg_net_worth(&self, name: &str) -> f64 {
        match self.final_net_worth.get(name) {
            Some(v) if !v.is_empty() => v.iter().sum::<i64>() as f64 / v.len() as f64,
            _ => 0.0,
        }
    }

    pub fn net_worth_stddev(&self, name: &str) -> f64 {
        let values = match self.final_net_worth.get(name) {
            Some(v) if v.len() >= 2 => v,
            _ => return 0.0,
        };
        let avg = self.avg_net_worth(name);
        let variance = values
            .iter()
            .map(|&v| (v as f64 - avg).powi(2))
            .sum::<f64>()
            / (values.len() - 1) as f64;
        variance.sqrt()
    }

    pub fn avg_purchases(&self, name: &str) -> f64 {
        match self.purchases.get(name) {
            Some(v) if !v.is_empty() => v.iter().sum::<usize>() as f64 / v.len() as f64,
            _ => 0.0,
        }
    }

    /// Wilson score interval on the win rate.
    pub fn confidence_interval_95(&self, name: &str) -> (f64, f64) {
        let n = self.num_games;
        if n == 0 {
            return (0.0, 0.0);
        }
        let p = self.win_rate(name);
        let z = 1.96_f64;
        let denom = 1.0 + z * z / n as f64;
        let center = (p + z * z / (2.0 * n as f64)) / denom;
        let margin = z * ((p * (1.0 - p) + z * z / (4.0 * n as f64)) / n as f64).sqrt() / denom;
        ((center - margin).max(0.0), (center + margin).min(1.0))
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Arena Results ({} games)", self.num_games)];
        lines.push("=".repeat(72));
        let mut names: Vec<&String> = self.wins.keys().collect();
        names.sort();
        for name in names {
            let (ci_lo, ci_hi) = self.confidence_interval_95(name);
            lines.push(format!(
                "  {:>12}: {:3} wins ({:5.1}%)  [95% CI: {:.1}%-{:.1}%]  worth={:7.1} +/- {:6.1}  buys={:4.1}",
                name,
                self.wins[name],
                self.win_rate(name) * 100.0,
                ci_lo * 100.0,
                ci_hi * 100.0,
                self.avg_net_worth(name),
                self.net_worth_stddev(name),
                self.avg_purchases(name),
            ));
        }
        lines.push(format!("  {:>12}: {}", "Draws", self.draws));
        if !self.game_durations_ms.is_empty() {
            let avg_ms = self.game_durations_ms.iter().sum::<f64>() / self.game_durations_ms.len() as f64;
            let total_s = self.game_durations_ms.iter().sum::<f64>() / 1000.0;
            lines.push(format!("  Avg game: {:.2}ms  |  Total: {:.1}s", avg_ms, total_s));
        }
        lines.join("\n")
    }
}

struct GameOutcome {
    final_state: GameState,
    duration_ms: f64,
}

/// Run `num_games` bot-only games of `max_turns` turns each, in parallel.
///
/// Game `i` uses seed `base_seed + i`. With `alternate_seats`, the roster is
/// rotated by one seat per game so no bot always moves first. Results are keyed
/// by bot name, so `config` should have passed [`GameConfig::validate`].
pub fn run_arena(
    config: &GameConfig,
    num_games: usize,
    base_seed: u64,
    max_turns: u64,
    alternate_seats: bool,
    progress_callback: Option<&(dyn Fn(usize, usize) + Sync)>,
) -> ArenaResult {
    let names: Vec<String> = config.bots.iter().map(|b| b.name.clone()).collect();
    let completed = AtomicUsize::new(0);

    let outcomes: Vec<GameOutcome> = (0..num_games)
        .into_par_iter()
        .map(|game_idx| {
            let mut roster = config.bots.clone();
            if alternate_seats && !roster.is_empty() {
                let shift = game_idx % roster.len();
                roster.rotate_left(shift);
            }
            let t0 = Instant::now();
            let final_state = play_one_game(config, &roster, base_seed + game_idx as u64, max_turns);
            let duration_ms = t0.elapsed().as_secs_f64() * 1000.0;

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(cb) = progress_callback {
                cb(done, num_games);
            }
            GameOutcome { final_state, duration_ms }
        })
        .collect();

    let mut result = ArenaResult {
        num_games,
        wins: names.iter().map(|n| (n.clone(), 0)).collect(),
        draws: 0,
        final_net_worth: names.iter().map(|n| (n.clone(), Vec::new())).collect(),
        purchases: names.iter().map(|n| (n.clone(), Vec::new())).collect(),
        game_durations_ms: Vec::with_capacity(num_games),
    };

    for outcome in outcomes {
        result.game_durations_ms.push(outcome.duration_ms);
        let state = &outcome.final_state;

        let mut best: Option<i64> = None;
        let mut leaders: Vec<&str> = Vec::new();
        for player in &state.players {
            let worth = state.net_worth(player.id);
            result
                .final_net_worth
                .entry(player.name.clone())
                .or_default()
                .push(worth);
            result
                .purchases
                .entry(player.name.clone())
                .or_default()
                .push(player.nfts.len());
            match best {
                Some(b) if worth < b => {}
                Some(b) if worth == b => leaders.push(player.name.as_str()),
                _ => {
                    best = Some(worth);
                    leaders = vec![player.name.as_str()];
                }
            }
        }

        if let [winner] = leaders.as_slice() {
            *result.wins.entry(winner.to_string()).or_default() += 1;
        } else {
            result.draws += 1;
        }
    }

    result
}

/// Play one instant bot-only game from `roster` for up to `max_turns` turns.
pub fn play_one_game(config: &GameConfig, roster: &[BotSeat], seed: u64, max_turns: u64) -> GameState {
    let rules = CryptoPolyRules::from_config(config);
    let planner = BotPlanner::new(strategy_from_profile(&config.bot));
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = rules.create_initial_state(create_bot_players(roster, config.starting_money));

    while state.turn_number < max_turns {
        let next = planner.play_turn(&rules, &state, &mut rng);
        if next.turn_number == state.turn_number {
            tracing::warn!(seed, turn = state.turn_number, "bot turn did not complete, stopping game");
            break;
        }
        state = next;
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::crypto_poly::types::PlayerAction;

    fn two_bot_config() -> GameConfig {
        GameConfig {
            bots: vec![
                BotSeat { name: "Satoshi".into(), token_color: "purple".into() },
                BotSeat { name: "Hal".into(), token_color: "orange".into() },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_play_one_game_is_deterministic() {
        let config = two_bot_config();
        let a = play_one_game(&config, &config.bots, 5, 40);
        let b = play_one_game(&config, &config.bots, 5, 40);
        assert_eq!(a.players, b.players);
        assert_eq!(a.turn_number, 40);
        assert_eq!(a.action, PlayerAction::CanRoll);
    }

    #[test]
    fn test_arena_accounts_every_game() {
        let config = two_bot_config();
        let calls = AtomicUsize::new(0);
        let result = run_arena(
            &config,
            8,
            42,
            30,
            true,
            Some(&|_done, total| {
                assert_eq!(total, 8);
                calls.fetch_add(1, Ordering::Relaxed);
            }),
        );

        assert_eq!(calls.load(Ordering::Relaxed), 8);
        assert_eq!(result.wins.values().sum::<usize>() + result.draws, 8);
        assert_eq!(result.final_net_worth["Satoshi"].len(), 8);
        assert_eq!(result.game_durations_ms.len(), 8);
        assert!(result.summary().contains("Hal"));
    }

    #[test]
    fn test_empty_arena() {
        let result = run_arena(&two_bot_config(), 0, 1, 10, false, None);
        assert_eq!(result.win_rate("Satoshi"), 0.0);
        assert_eq!(result.confidence_interval_95("Satoshi"), (0.0, 0.0));
    }
}
