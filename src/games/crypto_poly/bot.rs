//! Bot turn planner: decides the next engine action for a bot that holds the turn.
//!
//! The planner is synchronous and pure apart from the RNG it is handed, so the
//! same sequence drives both the paced async driver and instant simulations.

use rand::RngCore;

use crate::engine::bot_strategy::BotStrategy;
use crate::engine::pacing::Pause;

use super::rules::CryptoPolyRules;
use super::types::{Action, BotStage, Dice, GameState, PlayerAction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotStep {
    /// Pacing gap to observe before dispatching `action`.
    pub pause: Pause,
    pub action: Action,
}

pub struct BotPlanner {
    strategy: Box<dyn BotStrategy>,
}

impl BotPlanner {
    pub fn new(strategy: Box<dyn BotStrategy>) -> Self {
        Self { strategy }
    }

    /// Next step of a claimed bot turn; `None` once the bot no longer holds the turn.
    pub fn next_step(&self, state: &GameState, rng: &mut dyn RngCore) -> Option<BotStep> {
        if state.action != PlayerAction::BotTurn {
            return None;
        }
        let step = match state.bot_stage? {
            BotStage::Claimed => BotStep {
                pause: Pause::Think,
                action: Action::BotRoll(Dice::roll(rng)),
            },
            BotStage::Moved => BotStep {
                pause: Pause::Move,
                action: Action::BotLand,
            },
            BotStage::Landed => match self.purchase(state, rng) {
                Some(action) => BotStep {
                    pause: Pause::Purchase,
                    action,
                },
                None => end_turn(),
            },
            BotStage::Settled => end_turn(),
        };
        Some(step)
    }

    fn purchase(&self, state: &GameState, rng: &mut dyn RngCore) -> Option<Action> {
        let market = state.current_market().filter(|m| m.owner.is_none())?;
        let bot = state.current_player();
        let side = self.strategy.choose_side(market, bot, rng)?;
        let price = market.price(side);
        if bot.money > price {
            Some(Action::BotPurchase(side))
        } else {
            tracing::debug!(bot = %bot.name, market = %market.id, price, "bot cannot afford side");
            None
        }
    }

    /// Claim and play a whole bot turn without pacing. Returns the input state
    /// unchanged if it isn't a bot's turn to move.
    pub fn play_turn(
        &self,
        rules: &CryptoPolyRules,
        state: &GameState,
        rng: &mut dyn RngCore,
    ) -> GameState {
        let mut state = rules.apply_action(state, &Action::ClaimBotTurn);
        while let Some(step) = self.next_step(&state, rng) {
            if let Some(reason) = rules.validate_action(&state, &step.action) {
                tracing::warn!(action = ?step.action, %reason, "bot step refused");
                break;
            }
            state = rules.apply_action(&state, &step.action);
        }
        state
    }
}

fn end_turn() -> BotStep {
    BotStep {
        pause: Pause::EndTurn,
        action: Action::BotEndTurn,
    }
}
