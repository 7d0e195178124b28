//! Bot strategy trait and implementations.

use rand::{Rng, RngCore};

use crate::engine::config::BotProfile;
use crate::games::crypto_poly::catalog::Market;
use crate::games::crypto_poly::players::Player;
use crate::games::crypto_poly::types::Side;

/// Picks a side to buy on an unowned market, or `None` to pass.
/// Affordability is checked by the caller; strategies only express intent.
pub trait BotStrategy: Send + Sync {
    fn choose_side(&self, market: &Market, player: &Player, rng: &mut dyn RngCore) -> Option<Side>;
}

/// Coin flip between YES and NO once the bot holds more than the threshold.
#[derive(Debug, Clone, Copy)]
pub struct RandomStrategy {
    pub purchase_threshold: i64,
}

impl BotStrategy for RandomStrategy {
    fn choose_side(&self, _market: &Market, player: &Player, rng: &mut dyn RngCore) -> Option<Side> {
        if player.money <= self.purchase_threshold {
            return None;
        }
        Some(if rng.gen_bool(0.5) { Side::Yes } else { Side::No })
    }
}

/// Always takes the cheaper side (YES on ties) once above the threshold.
#[derive(Debug, Clone, Copy)]
pub struct CheapestStrategy {
    pub purchase_threshold: i64,
}

impl BotStrategy for CheapestStrategy {
    fn choose_side(&self, market: &Market, player: &Player, _rng: &mut dyn RngCore) -> Option<Side> {
        if player.money <= self.purchase_threshold {
            return None;
        }
        if market.price(Side::No) < market.price(Side::Yes) {
            Some(Side::No)
        } else {
            Some(Side::Yes)
        }
    }
}

/// Build the strategy named by a profile. Unknown names fall back to random.
pub fn strategy_from_profile(profile: &BotProfile) -> Box<dyn BotStrategy> {
    let purchase_threshold = profile.purchase_threshold;
    match profile.strategy_type.as_str() {
        "cheapest" => Box::new(CheapestStrategy { purchase_threshold }),
        "random" => Box::new(RandomStrategy { purchase_threshold }),
        other => {
            tracing::warn!(strategy_type = other, "unknown bot strategy, using random");
            Box::new(RandomStrategy { purchase_threshold })
        }
    }
}
