//! Investable entities behind market tiles: prediction markets and plain properties.

use once_cell::sync::Lazy;
use serde::Serialize;

use super::board::MarketId;
use super::types::{PlayerId, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "style", rename_all = "lowercase")]
pub enum Pricing {
    /// Prediction market: each outcome has its own price.
    Market { yes: i64, no: i64 },
    /// Plain property: one price whichever side is taken; charges rent when owned.
    Property { price: i64, rent: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ownership {
    pub player_id: PlayerId,
    pub side: Side,
    pub price_paid: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Market {
    pub id: MarketId,
    pub question: String,
    pub image_url: String,
    pub pricing: Pricing,
    pub owner: Option<Ownership>,
}

impl Market {
    pub fn new(id: &str, question: &str, pricing: Pricing) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            image_url: format!("https://api.dicebear.com/7.x/shapes/svg?seed={id}"),
            pricing,
            owner: None,
        }
    }

    pub fn price(&self, side: Side) -> i64 {
        match (self.pricing, side) {
            (Pricing::Market { yes, .. }, Side::Yes) => yes,
            (Pricing::Market { no, .. }, Side::No) => no,
            (Pricing::Property { price, .. }, _) => price,
        }
    }

    pub fn is_property(&self) -> bool {
        matches!(self.pricing, Pricing::Property { .. })
    }

    pub fn rent(&self) -> Option<i64> {
        match self.pricing {
            Pricing::Property { rent, .. } => Some(rent),
            Pricing::Market { .. } => None,
        }
    }
}

pub fn find<'a>(markets: &'a [Market], id: &str) -> Option<&'a Market> {
    markets.iter().find(|m| m.id == id)
}

pub fn position(markets: &[Market], id: &str) -> Option<usize> {
    markets.iter().position(|m| m.id == id)
}

pub fn standard_catalog() -> Vec<Market> {
    STANDARD_CATALOG.clone()
}

fn market(id: &str, question: &str, yes: i64, no: i64) -> Market {
    Market::new(id, question, Pricing::Market { yes, no })
}

fn property(id: &str, question: &str, price: i64, rent: i64) -> Market {
    Market::new(id, question, Pricing::Property { price, rent })
}

// Prices are outcome probabilities scaled to 200 currency units.
static STANDARD_CATALOG: Lazy<Vec<Market>> = Lazy::new(|| {
    vec![
        market("btc-100k", "Will Bitcoin close above $100k this year?", 130, 70),
        market("eth-etf", "Will a spot ETH ETF see net inflows this quarter?", 110, 90),
        property("mining-farm", "Bitcoin Mining Farm", 200, 25),
        market("sol-flip-eth", "Will Solana flip Ethereum in daily volume?", 60, 140),
        market("doge-dollar", "Will DOGE reach $1?", 20, 180),
        market("stablecoin-depeg", "Will a top-5 stablecoin depeg below $0.95?", 30, 170),
        market("l2-summer", "Will L2 TVL double by year end?", 90, 110),
        market("nft-revival", "Will NFT monthly volume exceed $2B?", 50, 150),
        market("fed-rate-cut", "Will the Fed cut rates at the next meeting?", 120, 80),
        market("airdrop-season", "Will a new airdrop top $1B in value?", 100, 100),
        property("validator-node", "Validator Node Cluster", 200, 25),
        market("dao-hack", "Will a DAO lose over $50M to an exploit?", 70, 130),
        market("btc-halving-ath", "Will BTC set a new ATH within a year of the halving?", 140, 60),
        market("memecoin-top10", "Will a memecoin enter the top 10 by market cap?", 80, 120),
        market("cbdc-launch", "Will a G7 country launch a retail CBDC?", 40, 160),
        market("defi-tvl-200b", "Will DeFi TVL pass $200B?", 70, 130),
        market("exchange-insolvency", "Will a top-20 exchange halt withdrawals?", 40, 160),
        property("data-center", "Decentralized Data Center", 200, 25),
        market("gas-under-5", "Will mainnet gas average under 5 gwei for a month?", 90, 110),
        market("rwa-tokenization", "Will tokenized treasuries pass $10B?", 120, 80),
        market("eth-flippening", "Will ETH market cap flip BTC?", 10, 190),
        market("zk-mainnet", "Will a zkEVM reach stage 2 decentralization?", 60, 140),
        market("sec-approval", "Will the SEC approve another crypto ETF?", 130, 70),
        market("ordinals-volume", "Will Ordinals volume hit a new monthly high?", 50, 150),
        market("restaking-boom", "Will restaking TVL exceed $30B?", 90, 110),
        property("bridge-exploit", "Cross-Chain Bridge", 200, 25),
        market("ai-agent-tokens", "Will AI agent tokens reach $20B combined cap?", 100, 100),
        market("satoshi-reveal", "Will Satoshi's identity be confirmed?", 10, 190),
    ]
});
