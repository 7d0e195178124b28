//! The fixed ring of tiles players move around.

use once_cell::sync::Lazy;
use serde::Serialize;

pub type MarketId = String;

/// One square of the board. Closed set: tile resolution matches exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Tile {
    Go,
    Market { market_id: MarketId },
    Tax { name: String, amount: i64 },
    Chance,
    CommunityChest,
    Jail,
    FreeParking,
    GoToJail,
}

impl Tile {
    /// Display name; market tiles are named through the catalog instead.
    pub fn name(&self) -> &str {
        match self {
            Tile::Go => "GO",
            Tile::Market { market_id } => market_id,
            Tile::Tax { name, .. } => name,
            Tile::Chance => "Chance",
            Tile::CommunityChest => "Community Chest",
            Tile::Jail => "Rugpull",
            Tile::FreeParking => "Airdrop",
            Tile::GoToJail => "Go to Rugpull",
        }
    }

    pub fn market_id(&self) -> Option<&str> {
        match self {
            Tile::Market { market_id } => Some(market_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    tiles: Vec<Tile>,
    jail_index: usize,
}

impl Board {
    /// Build a board. Position 0 must be `Go` and exactly one `Jail` must exist.
    pub fn new(tiles: Vec<Tile>) -> Option<Self> {
        if tiles.first() != Some(&Tile::Go) {
            return None;
        }
        let mut jails = tiles.iter().enumerate().filter(|(_, t)| **t == Tile::Jail);
        let (jail_index, _) = jails.next()?;
        if jails.next().is_some() {
            return None;
        }
        Some(Self { tiles, jail_index })
    }

    pub fn standard() -> Self {
        STANDARD_BOARD.clone()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tile(&self, index: usize) -> &Tile {
        &self.tiles[index % self.tiles.len()]
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn jail_index(&self) -> usize {
        self.jail_index
    }

    /// Position reached after `steps`, and whether GO was passed on the way.
    pub fn advance(&self, from: usize, steps: usize) -> (usize, bool) {
        let to = (from + steps) % self.tiles.len();
        (to, to < from)
    }
}

// --- Standard layout ---

/// Catalog ids in board order, one per market tile.
pub const STANDARD_MARKET_IDS: [&str; 28] = [
    "btc-100k",      // 1
    "eth-etf",       // 3
    "mining-farm",   // 5 (property)
    "sol-flip-eth",  // 6
    "doge-dollar",   // 8
    "stablecoin-depeg", // 9
    "l2-summer",     // 11
    "nft-revival",   // 12
    "fed-rate-cut",  // 13
    "airdrop-season", // 14
    "validator-node", // 15 (property)
    "dao-hack",      // 16
    "btc-halving-ath", // 18
    "memecoin-top10", // 19
    "cbdc-launch",   // 21
    "defi-tvl-200b", // 23
    "exchange-insolvency", // 24
    "data-center",   // 25 (property)
    "gas-under-5",   // 26
    "rwa-tokenization", // 27
    "eth-flippening", // 28
    "zk-mainnet",    // 29
    "sec-approval",  // 31
    "ordinals-volume", // 32
    "restaking-boom", // 34
    "bridge-exploit", // 35 (property)
    "ai-agent-tokens", // 37
    "satoshi-reveal", // 39
];

static STANDARD_BOARD: Lazy<Board> = Lazy::new(|| {
    let mut markets = STANDARD_MARKET_IDS.iter();
    let tiles = (0..40)
        .map(|i| match i {
            0 => Tile::Go,
            2 | 17 | 33 => Tile::CommunityChest,
            4 => Tile::Tax { name: "Gas Fees".into(), amount: 200 },
            7 | 22 | 36 => Tile::Chance,
            10 => Tile::Jail,
            20 => Tile::FreeParking,
            30 => Tile::GoToJail,
            38 => Tile::Tax { name: "Slippage Tax".into(), amount: 100 },
            _ => Tile::Market {
                market_id: markets.next().map(|id| id.to_string()).unwrap_or_default(),
            },
        })
        .collect();
    Board { tiles, jail_index: 10 }
});
