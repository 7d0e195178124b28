//! Pacing delays between bot steps. Pacing only: correctness never depends on them.

use std::time::Duration;

use async_trait::async_trait;

use crate::engine::config::BotProfile;

/// Which gap in the bot's turn is being paced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// Before rolling.
    Think,
    /// Between moving and resolving the landing.
    Move,
    /// Before finalizing a purchase.
    Purchase,
    /// Before handing the turn on.
    EndTurn,
}

#[async_trait]
pub trait Pacing: Send + Sync {
    async fn pause(&self, pause: Pause);
}

/// Real wall-clock delays on the tokio timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPacing {
    pub think: Duration,
    pub movement: Duration,
    pub purchase: Duration,
    pub end_turn: Duration,
}

impl FixedPacing {
    pub fn from_profile(profile: &BotProfile) -> Self {
        Self {
            think: Duration::from_millis(profile.think_ms),
            movement: Duration::from_millis(profile.move_ms),
            purchase: Duration::from_millis(profile.purchase_ms),
            end_turn: Duration::from_millis(profile.end_turn_ms),
        }
    }

    pub fn duration(&self, pause: Pause) -> Duration {
        match pause {
            Pause::Think => self.think,
            Pause::Move => self.movement,
            Pause::Purchase => self.purchase,
            Pause::EndTurn => self.end_turn,
        }
    }
}

#[async_trait]
impl Pacing for FixedPacing {
    async fn pause(&self, pause: Pause) {
        let d = self.duration(pause);
        if !d.is_zero() {
            tokio::time::sleep(d).await;
        }
    }
}

/// No delay at all, for tests and simulations.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

#[async_trait]
impl Pacing for NoPacing {
    async fn pause(&self, _pause: Pause) {
        tokio::task::yield_now().await;
    }
}
