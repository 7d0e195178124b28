//! Player records and game bootstrap.

use serde::{Deserialize, Serialize};

use super::types::{AssetReceipt, PlayerId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// May go negative: there is no bankruptcy rule.
    pub money: i64,
    pub position: usize,
    pub nfts: Vec<AssetReceipt>,
    pub in_jail: bool,
    pub token_color: String,
    pub is_bot: bool,
    pub wallet_address: Option<String>,
}

impl Player {
    fn new(id: PlayerId, name: &str, token_color: &str, money: i64, is_bot: bool) -> Self {
        Self {
            id,
            name: name.into(),
            money,
            position: 0,
            nfts: Vec::new(),
            in_jail: false,
            token_color: token_color.into(),
            is_bot,
            wallet_address: None,
        }
    }
}

/// One entry of the bot roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotSeat {
    pub name: String,
    #[serde(default = "default_bot_color")]
    pub token_color: String,
}

fn default_bot_color() -> String {
    "purple".into()
}

pub fn default_roster() -> Vec<BotSeat> {
    vec![BotSeat {
        name: "Satoshi".into(),
        token_color: default_bot_color(),
    }]
}

/// Human first (id 0, seat 0), then the roster in order.
pub fn create_initial_players(
    name: &str,
    address: &str,
    roster: &[BotSeat],
    starting_money: i64,
) -> Vec<Player> {
    let mut human = Player::new(0, name, "cyan", starting_money, false);
    human.wallet_address = (!address.is_empty()).then(|| address.to_string());

    std::iter::once(human)
        .chain(bots_from_roster(roster, 1, starting_money))
        .collect()
}

/// A bot-only table, used for arena simulations.
pub fn create_bot_players(roster: &[BotSeat], starting_money: i64) -> Vec<Player> {
    bots_from_roster(roster, 0, starting_money).collect()
}

fn bots_from_roster(
    roster: &[BotSeat],
    first_id: PlayerId,
    starting_money: i64,
) -> impl Iterator<Item = Player> + '_ {
    (first_id..).zip(roster).map(move |(id, seat)| {
        Player::new(id, &seat.name, &seat.token_color, starting_money, true)
    })
}
