//! Crypto Poly core types: sides, dice, action-state, receipts and the game state value.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::log::GameLog;

use super::board::{Board, MarketId, Tile};
use super::catalog::{self, Market};
use super::players::Player;

pub type PlayerId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Yes,
    No,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Yes => "YES",
            Side::No => "NO",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two six-sided dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dice(pub u8, pub u8);

impl Dice {
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Dice(rng.gen_range(1..=6), rng.gen_range(1..=6))
    }

    pub fn total(self) -> usize {
        usize::from(self.0) + usize::from(self.1)
    }

    pub fn is_valid(self) -> bool {
        (1..=6).contains(&self.0) && (1..=6).contains(&self.1)
    }
}

impl Default for Dice {
    fn default() -> Self {
        Dice(1, 1)
    }
}

/// The engine's single piece of explicit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerAction {
    CanRoll,
    AwaitingChoice,
    AwaitingSignature,
    CanEndTurn,
    BotTurn,
}

/// Progress of a bot through its turn while the action-state is `BotTurn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BotStage {
    Claimed,
    Moved,
    Landed,
    Settled,
}

/// NFT-style receipt for a purchased market position. Never mutated once minted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetReceipt {
    pub id: String,
    pub market_id: MarketId,
    pub market_question: String,
    pub side: Side,
    pub purchase_price: i64,
    pub image_url: String,
}

impl AssetReceipt {
    pub fn for_purchase(market: &Market, side: Side, price: i64) -> Self {
        Self {
            id: format!("{}-{}", market.id, side),
            market_id: market.id.clone(),
            market_question: market.question.clone(),
            side,
            purchase_price: price,
            image_url: market.image_url.clone(),
        }
    }
}

/// A human's chosen outcome, held while the signature is outstanding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingChoice {
    pub market_id: MarketId,
    pub side: Side,
    pub price: i64,
    /// Turn in which the choice was made; distinguishes otherwise equal choices.
    pub turn_number: u64,
}

/// Every write the engine accepts. `EndTurn` is the human's; the bot ends its
/// own turn with `BotEndTurn`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Action {
    Roll(Dice),
    ChooseOutcome(Side),
    Confirm,
    Cancel,
    EndTurn,
    Sell(MarketId),
    ClaimBotTurn,
    BotRoll(Dice),
    BotLand,
    BotPurchase(Side),
    BotEndTurn,
}

/// The single authoritative game state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameState {
    pub players: Vec<Player>,
    pub board: Board,
    pub markets: Vec<Market>,
    pub current_player_index: usize,
    pub dice: Dice,
    pub log: GameLog,
    pub action: PlayerAction,
    pub pending: Option<PendingChoice>,
    pub bot_stage: Option<BotStage>,
    /// Completed turns so far.
    pub turn_number: u64,
}

impl GameState {
    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player_index]
    }

    pub fn current_tile(&self) -> &Tile {
        self.board.tile(self.current_player().position)
    }

    /// The catalog entry under the current player, if standing on a market tile.
    pub fn current_market(&self) -> Option<&Market> {
        self.current_tile()
            .market_id()
            .and_then(|id| catalog::find(&self.markets, id))
    }

    pub fn market(&self, id: &str) -> Option<&Market> {
        catalog::find(&self.markets, id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// True when a bot is up and nobody has claimed the turn yet.
    pub fn is_bot_to_move(&self) -> bool {
        self.current_player().is_bot && self.action == PlayerAction::CanRoll
    }

    /// Cash plus what was paid for every catalog slot the player still owns.
    pub fn net_worth(&self, id: PlayerId) -> i64 {
        let held: i64 = self
            .markets
            .iter()
            .filter_map(|m| m.owner)
            .filter(|o| o.player_id == id)
            .map(|o| o.price_paid)
            .sum();
        self.player(id).map_or(0, |p| p.money) + held
    }

    pub fn human(&self) -> Option<&Player> {
        self.players.iter().find(|p| !p.is_bot)
    }

    /// Display name for a tile, resolving market tiles through the catalog.
    pub fn tile_label(&self, index: usize) -> String {
        let tile = self.board.tile(index);
        match tile.market_id() {
            Some(id) => match self.market(id) {
                Some(m) if m.is_property() => format!("Property: {}", m.question),
                Some(m) => format!("Market: {}", m.question),
                None => format!("Market: {id}"),
            },
            None => tile.name().to_string(),
        }
    }
}
