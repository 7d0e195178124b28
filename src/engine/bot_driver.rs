//! Async bot driver: watches the session and plays bot turns with pacing.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engine::bot_strategy::strategy_from_profile;
use crate::engine::config::BotProfile;
use crate::engine::pacing::{FixedPacing, Pacing};
use crate::engine::session::GameSession;
use crate::games::crypto_poly::bot::BotPlanner;
use crate::games::crypto_poly::types::Action;

pub struct BotDriver {
    planner: BotPlanner,
    pacing: Box<dyn Pacing>,
    rng: StdRng,
}

impl BotDriver {
    pub fn new(planner: BotPlanner, pacing: Box<dyn Pacing>, rng: StdRng) -> Self {
        Self { planner, pacing, rng }
    }

    /// Driver for `profile` with wall-clock pacing. A `seed` makes dice reproducible.
    pub fn from_profile(profile: &BotProfile, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self::new(
            BotPlanner::new(strategy_from_profile(profile)),
            Box::new(FixedPacing::from_profile(profile)),
            rng,
        )
    }

    /// Claim and play one bot turn. Returns false if no bot turn could be claimed.
    pub async fn play_turn(&mut self, session: &GameSession) -> bool {
        if !session.dispatch(&Action::ClaimBotTurn) {
            return false;
        }
        loop {
            let step = {
                let state = session.snapshot();
                self.planner.next_step(&state, &mut self.rng)
            };
            let Some(step) = step else { break };
            self.pacing.pause(step.pause).await;
            if !session.dispatch(&step.action) {
                tracing::warn!(action = ?step.action, "bot step refused, abandoning turn");
                break;
            }
        }
        true
    }

    /// Play every bot turn as it comes up. Runs until the session is dropped by
    /// all other holders and the channel closes, or the task is aborted.
    pub async fn run(mut self, session: Arc<GameSession>) {
        let mut updates = session.subscribe();
        loop {
            let bot_to_move = updates.borrow_and_update().is_bot_to_move();
            if bot_to_move {
                self.play_turn(&session).await;
                continue;
            }
            if updates.changed().await.is_err() {
                break;
            }
        }
        tracing::debug!("bot driver stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::bot_strategy::RandomStrategy;
    use crate::engine::pacing::NoPacing;
    use crate::games::crypto_poly::players::{create_initial_players, default_roster, BotSeat};
    use crate::games::crypto_poly::rules::CryptoPolyRules;
    use crate::games::crypto_poly::types::{Dice, PlayerAction};

    fn quick_driver(seed: u64) -> BotDriver {
        BotDriver::new(
            BotPlanner::new(Box::new(RandomStrategy { purchase_threshold: 500 })),
            Box::new(NoPacing),
            StdRng::seed_from_u64(seed),
        )
    }

    fn session_with(roster: &[BotSeat]) -> GameSession {
        let rules = CryptoPolyRules::default();
        let players = create_initial_players("Alice", "", roster, 1500);
        GameSession::new(rules, rules.create_initial_state(players))
    }

    fn human_passes(session: &GameSession) {
        assert!(session.dispatch(&Action::Roll(Dice(2, 2))));
        // Gas Fees tax at index 4, no choice needed
        assert!(session.end_turn());
    }

    #[tokio::test]
    async fn test_play_turn_refused_on_human_turn() {
        let session = session_with(&default_roster());
        let mut driver = quick_driver(1);
        assert!(!driver.play_turn(&session).await);
        assert_eq!(session.snapshot().turn_number, 0);
    }

    #[tokio::test]
    async fn test_play_turn_returns_control() {
        let session = session_with(&default_roster());
        human_passes(&session);

        let mut driver = quick_driver(1);
        assert!(driver.play_turn(&session).await);

        let state = session.snapshot();
        assert_eq!(state.current_player_index, 0);
        assert_eq!(state.action, PlayerAction::CanRoll);
        assert_eq!(state.turn_number, 2);
        assert!(state.log.messages().iter().any(|m| m.contains("(bot) turn")));
    }

    #[tokio::test]
    async fn test_run_plays_consecutive_bots() {
        let roster = vec![
            BotSeat { name: "Satoshi".into(), token_color: "purple".into() },
            BotSeat { name: "Vitalik".into(), token_color: "orange".into() },
        ];
        let session = Arc::new(session_with(&roster));
        let mut updates = session.subscribe();
        let handle = tokio::spawn(quick_driver(7).run(session.clone()));

        human_passes(&session);
        while updates.borrow_and_update().turn_number < 3 {
            updates.changed().await.unwrap();
        }
        handle.abort();

        let state = session.snapshot();
        assert_eq!(state.current_player_index, 0);
        assert_eq!(state.action, PlayerAction::CanRoll);
        assert!(state.players[1].position > 0);
        assert!(state.players[2].position > 0);
    }
}
