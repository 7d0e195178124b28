//! Turn engine for Crypto Poly.
//!
//! Every write goes through [`CryptoPolyRules::apply_action`], which takes the
//! current [`GameState`] and returns the next one. Actions that don't match the
//! current action-state are ignored: the returned state equals the input and
//! nothing is logged, so duplicate or stale triggers are harmless.
//!
//! Human turn: `CanRoll` -> roll -> (`AwaitingChoice` -> choose ->
//! `AwaitingSignature` -> confirm/cancel ->) `CanEndTurn` -> end turn.
//! Bot turn: `CanRoll` -> claim -> `BotTurn` (roll, land, maybe buy) -> end turn.

use crate::engine::config::GameConfig;
use crate::engine::log::{GameLog, DEFAULT_LOG_CAPACITY};

use super::board::{Board, Tile};
use super::catalog::{self, standard_catalog, Market, Ownership};
use super::players::Player;
use super::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CryptoPolyRules {
    pub pass_go_bonus: i64,
    pub log_capacity: usize,
}

impl Default for CryptoPolyRules {
    fn default() -> Self {
        Self {
            pass_go_bonus: 200,
            log_capacity: DEFAULT_LOG_CAPACITY,
        }
    }
}

impl CryptoPolyRules {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            pass_go_bonus: config.pass_go_bonus,
            log_capacity: config.log_capacity,
        }
    }

    /// Fresh game on the standard board and catalog. `players` must not be empty.
    pub fn create_initial_state(&self, players: Vec<Player>) -> GameState {
        self.create_state_with(players, Board::standard(), standard_catalog())
    }

    /// Panics if `players` is empty; every later turn indexes the current seat.
    pub fn create_state_with(
        &self,
        players: Vec<Player>,
        board: Board,
        markets: Vec<Market>,
    ) -> GameState {
        assert!(!players.is_empty(), "a game needs at least one player");
        let mut log = GameLog::new(self.log_capacity);
        log.push(format!("Game started! {}'s turn.", players[0].name));
        GameState {
            players,
            board,
            markets,
            current_player_index: 0,
            dice: Dice::default(),
            log,
            action: PlayerAction::CanRoll,
            pending: None,
            bot_stage: None,
            turn_number: 0,
        }
    }

    /// Returns `None` if the action is allowed now, `Some(reason)` otherwise.
    pub fn validate_action(&self, state: &GameState, action: &Action) -> Option<String> {
        let current = state.current_player();
        let human_only = || current.is_bot.then(|| "current player is a bot".to_string());

        match action {
            Action::Roll(dice) => human_only()
                .or_else(|| expect_action(state, PlayerAction::CanRoll))
                .or_else(|| check_dice(*dice)),
            Action::ChooseOutcome(_) => human_only()
                .or_else(|| expect_action(state, PlayerAction::AwaitingChoice))
                .or_else(|| unowned_market_here(state).err()),
            Action::Confirm => human_only()
                .or_else(|| expect_action(state, PlayerAction::AwaitingSignature))
                .or_else(|| state.pending.is_none().then(|| "no pending choice".to_string())),
            Action::Cancel => human_only()
                .or_else(|| expect_action(state, PlayerAction::AwaitingSignature)),
            Action::EndTurn => human_only()
                .or_else(|| expect_action(state, PlayerAction::CanEndTurn)),
            Action::Sell(market_id) => human_only()
                .or_else(|| match state.action {
                    PlayerAction::CanRoll | PlayerAction::CanEndTurn => None,
                    other => Some(format!("cannot sell in {other:?}")),
                })
                .or_else(|| match state.market(market_id) {
                    None => Some(format!("unknown market: {market_id}")),
                    Some(m) if !m.is_property() => Some("prediction positions cannot be sold".into()),
                    Some(m) if m.owner.map(|o| o.player_id) != Some(current.id) => {
                        Some("not the owner".into())
                    }
                    Some(_) => None,
                }),
            Action::ClaimBotTurn => (!current.is_bot)
                .then(|| "current player is human".to_string())
                .or_else(|| expect_action(state, PlayerAction::CanRoll)),
            Action::BotRoll(dice) => {
                expect_bot_stage(state, BotStage::Claimed).or_else(|| check_dice(*dice))
            }
            Action::BotLand => expect_bot_stage(state, BotStage::Moved),
            Action::BotPurchase(side) => expect_bot_stage(state, BotStage::Landed)
                .or_else(|| match unowned_market_here(state) {
                    Err(reason) => Some(reason),
                    Ok(m) if current.money < m.price(*side) => Some("insufficient funds".into()),
                    Ok(_) => None,
                }),
            Action::BotEndTurn => match (state.action, state.bot_stage) {
                (PlayerAction::BotTurn, Some(stage)) if stage >= BotStage::Landed => None,
                (PlayerAction::BotTurn, _) => Some("bot has not landed yet".into()),
                (other, _) => Some(format!("no bot turn in progress ({other:?})")),
            },
        }
    }

    /// Apply an action, or return an unchanged copy of `state` if it is not allowed.
    pub fn apply_action(&self, state: &GameState, action: &Action) -> GameState {
        if let Some(reason) = self.validate_action(state, action) {
            tracing::debug!(?action, %reason, "ignored action");
            return state.clone();
        }

        let mut next = state.clone();
        match action {
            Action::Roll(dice) => {
                self.move_current(&mut next, *dice);
                self.land(&mut next);
            }
            Action::ChooseOutcome(side) => self.choose_outcome(&mut next, *side),
            Action::Confirm => {
                if let Some(pending) = next.pending.take() {
                    let idx = next.current_player_index;
                    finalize_purchase(&mut next, idx, &pending.market_id, pending.side, pending.price);
                }
                next.action = PlayerAction::CanEndTurn;
            }
            Action::Cancel => {
                next.pending = None;
                next.action = PlayerAction::CanEndTurn;
                next.log.push("Purchase cancelled.");
            }
            Action::EndTurn | Action::BotEndTurn => end_turn(&mut next),
            Action::Sell(market_id) => sell(&mut next, market_id),
            Action::ClaimBotTurn => {
                next.action = PlayerAction::BotTurn;
                next.bot_stage = Some(BotStage::Claimed);
                let name = next.current_player().name.clone();
                next.log.push(format!("It's {name}'s (bot) turn."));
            }
            Action::BotRoll(dice) => {
                self.move_current(&mut next, *dice);
                next.bot_stage = Some(BotStage::Moved);
            }
            Action::BotLand => {
                next.bot_stage = Some(BotStage::Landed);
                self.land(&mut next);
            }
            Action::BotPurchase(side) => {
                let target = next.current_market().map(|m| (m.id.clone(), m.price(*side)));
                if let Some((market_id, price)) = target {
                    let idx = next.current_player_index;
                    finalize_purchase(&mut next, idx, &market_id, *side, price);
                }
                next.bot_stage = Some(BotStage::Settled);
            }
        }
        next
    }

    /// Record the dice, move the current player and pay the GO bonus at most once.
    fn move_current(&self, state: &mut GameState, dice: Dice) {
        state.dice = dice;
        let idx = state.current_player_index;
        let (to, passed_go) = state.board.advance(state.players[idx].position, dice.total());

        let player = &mut state.players[idx];
        player.position = to;
        player.in_jail = false;
        let name = player.name.clone();
        state.log.push(format!(
            "{name} rolled a {} + {} = {}.",
            dice.0,
            dice.1,
            dice.total()
        ));

        if passed_go {
            state.players[idx].money += self.pass_go_bonus;
            state
                .log
                .push(format!("{name} passed GO and collected ${}.", self.pass_go_bonus));
        }
    }

    /// Resolve the tile under the current player. Always runs after the move is committed.
    fn land(&self, state: &mut GameState) {
        let idx = state.current_player_index;
        let is_bot = state.players[idx].is_bot;
        let name = state.players[idx].name.clone();
        let position = state.players[idx].position;
        let label = state.tile_label(position);
        state.log.push(format!("{name} landed on {label}."));

        let tile = state.board.tile(position).clone();
        match tile {
            Tile::Market { market_id } => match state.market(&market_id).map(|m| m.owner) {
                None => {
                    tracing::warn!(%market_id, "board references a market missing from the catalog");
                }
                Some(None) => {
                    if !is_bot {
                        state.action = PlayerAction::AwaitingChoice;
                        return;
                    }
                }
                Some(Some(owner)) => self.land_on_owned(state, idx, &market_id, owner),
            },
            Tile::Tax { amount, .. } => {
                state.players[idx].money -= amount;
                state.log.push(format!("{name} paid ${amount} in taxes."));
            }
            Tile::GoToJail => {
                state.log.push(format!("{name} is going to Rugpull!"));
                let player = &mut state.players[idx];
                player.position = state.board.jail_index();
                player.in_jail = true;
                end_turn(state);
                return;
            }
            // Card draws are not modelled; these tiles only log the landing.
            Tile::Go | Tile::Chance | Tile::CommunityChest | Tile::Jail | Tile::FreeParking => {}
        }

        if !is_bot {
            state.action = PlayerAction::CanEndTurn;
        }
    }

    fn land_on_owned(&self, state: &mut GameState, idx: usize, market_id: &str, owner: Ownership) {
        let rent = state.market(market_id).and_then(Market::rent);
        let lander_id = state.players[idx].id;

        match rent {
            Some(rent) if owner.player_id != lander_id => {
                let lander = state.players[idx].name.clone();
                let owner_name = match state.players.iter_mut().find(|p| p.id == owner.player_id) {
                    Some(p) => {
                        p.money += rent;
                        p.name.clone()
                    }
                    None => "the bank".into(),
                };
                state.players[idx].money -= rent;
                state
                    .log
                    .push(format!("{lander} paid ${rent} rent to {owner_name}."));
            }
            _ => state.log.push("Market position already taken."),
        }
    }

    fn choose_outcome(&self, state: &mut GameState, side: Side) {
        let Some(market) = state.current_market() else {
            return;
        };
        let (market_id, question, price) = (market.id.clone(), market.question.clone(), market.price(side));

        if state.current_player().money < price {
            state
                .log
                .push(format!("Not enough funds to invest. Needs ${price}."));
            state.action = PlayerAction::CanEndTurn;
            return;
        }

        state.pending = Some(PendingChoice {
            market_id,
            side,
            price,
            turn_number: state.turn_number,
        });
        state.action = PlayerAction::AwaitingSignature;
        state.log.push(format!(
            "Awaiting signature to mint NFT for \"{question} - {side}\"."
        ));
    }
}

fn expect_action(state: &GameState, expected: PlayerAction) -> Option<String> {
    (state.action != expected).then(|| format!("expected {expected:?}, state is {:?}", state.action))
}

fn expect_bot_stage(state: &GameState, expected: BotStage) -> Option<String> {
    expect_action(state, PlayerAction::BotTurn).or_else(|| {
        (state.bot_stage != Some(expected))
            .then(|| format!("expected bot stage {expected:?}, got {:?}", state.bot_stage))
    })
}

fn check_dice(dice: Dice) -> Option<String> {
    (!dice.is_valid()).then(|| format!("dice out of range: {dice:?}"))
}

fn unowned_market_here(state: &GameState) -> Result<&Market, String> {
    match state.current_market() {
        None => Err("not on a market tile".into()),
        Some(m) if m.owner.is_some() => Err("market already owned".into()),
        Some(m) => Ok(m),
    }
}

/// Debit, mint the receipt and lock ownership. Refuses an already-owned slot.
fn finalize_purchase(state: &mut GameState, idx: usize, market_id: &str, side: Side, price: i64) {
    let Some(m_idx) = catalog::position(&state.markets, market_id) else {
        return;
    };
    if state.markets[m_idx].owner.is_some() {
        tracing::warn!(%market_id, "purchase of an owned market refused");
        return;
    }

    let receipt = AssetReceipt::for_purchase(&state.markets[m_idx], side, price);
    let player = &mut state.players[idx];
    player.money -= price;
    player.nfts.push(receipt);
    let (player_id, name) = (player.id, player.name.clone());

    let market = &mut state.markets[m_idx];
    market.owner = Some(Ownership {
        player_id,
        side,
        price_paid: price,
    });

    let message = if market.is_property() {
        format!("{name} bought {} for ${price}.", market.question)
    } else {
        format!(
            "{name} minted an NFT for \"{} - {side}\" for ${price}.",
            market.question
        )
    };
    state.log.push(message);
}

fn sell(state: &mut GameState, market_id: &str) {
    let Some(m_idx) = catalog::position(&state.markets, market_id) else {
        return;
    };
    let Some(owner) = state.markets[m_idx].owner.take() else {
        return;
    };
    let question = state.markets[m_idx].question.clone();
    if let Some(player) = state.players.iter_mut().find(|p| p.id == owner.player_id) {
        player.money += owner.price_paid;
        let name = player.name.clone();
        state
            .log
            .push(format!("{name} sold {question} for ${}.", owner.price_paid));
    }
}

/// Hand the turn to the next seat.
fn end_turn(state: &mut GameState) {
    let next = (state.current_player_index + 1) % state.players.len();
    state
        .log
        .push(format!("Turn ended. It's now {}'s turn.", state.players[next].name));
    state.current_player_index = next;
    state.action = PlayerAction::CanRoll;
    state.pending = None;
    state.bot_stage = None;
    state.turn_number += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::crypto_poly::catalog::Pricing;
    use crate::games::crypto_poly::players::{create_initial_players, default_roster};

    fn new_game() -> (CryptoPolyRules, GameState) {
        let rules = CryptoPolyRules::default();
        let players = create_initial_players("Alice", "0xa11ce", &default_roster(), 1500);
        let state = rules.create_initial_state(players);
        (rules, state)
    }

    fn at(mut state: GameState, position: usize) -> GameState {
        let idx = state.current_player_index;
        state.players[idx].position = position;
        state
    }

    #[test]
    fn test_initial_state() {
        let (_, state) = new_game();
        assert_eq!(state.action, PlayerAction::CanRoll);
        assert_eq!(state.current_player_index, 0);
        assert_eq!(state.log.messages(), vec!["Game started! Alice's turn."]);
    }

    #[test]
    fn test_roll_onto_unowned_market_awaits_choice() {
        let (rules, state) = new_game();
        let next = rules.apply_action(&state, &Action::Roll(Dice(2, 4)));

        assert_eq!(next.dice, Dice(2, 4));
        assert_eq!(next.players[0].position, 6);
        assert_eq!(next.players[0].money, 1500);
        assert_eq!(next.action, PlayerAction::AwaitingChoice);
        let msgs = next.log.messages();
        assert_eq!(msgs[1], "Alice rolled a 2 + 4 = 6.");
        assert!(msgs[0].starts_with("Alice landed on Market: Will Solana flip"));
    }

    #[test]
    fn test_passing_go_pays_once() {
        let (rules, state) = new_game();
        let state = at(state, 38);
        let next = rules.apply_action(&state, &Action::Roll(Dice(2, 3)));

        assert_eq!(next.players[0].position, 3);
        assert_eq!(next.players[0].money, 1700);
        let passes = next.log.messages().iter().filter(|m| m.contains("passed GO")).count();
        assert_eq!(passes, 1);
    }

    #[test]
    fn test_tax_debits_without_floor() {
        let (rules, mut state) = new_game();
        state.players[0].money = 50;
        let next = rules.apply_action(&state, &Action::Roll(Dice(1, 3)));

        assert_eq!(next.players[0].position, 4);
        assert_eq!(next.players[0].money, -150);
        assert_eq!(next.action, PlayerAction::CanEndTurn);
        assert_eq!(next.log.messages()[0], "Alice paid $200 in taxes.");
        assert_eq!(next.log.messages()[1], "Alice landed on Gas Fees.");
    }

    #[test]
    fn test_go_to_jail_ends_turn() {
        let (rules, state) = new_game();
        let state = at(state, 25);
        let next = rules.apply_action(&state, &Action::Roll(Dice(2, 3)));

        assert_eq!(next.players[0].position, 10);
        assert!(next.players[0].in_jail);
        assert_eq!(next.current_player_index, 1);
        assert_eq!(next.action, PlayerAction::CanRoll);
        assert_eq!(next.turn_number, 1);
        let msgs = next.log.messages();
        assert_eq!(msgs[0], "Turn ended. It's now Satoshi's turn.");
        assert_eq!(msgs[1], "Alice is going to Rugpull!");
    }

    #[test]
    fn test_quiet_tiles_allow_end_turn() {
        let (rules, state) = new_game();
        let state = at(state, 15);
        // 15 + 7 = 22, a Chance tile
        let next = rules.apply_action(&state, &Action::Roll(Dice(3, 4)));
        assert_eq!(next.action, PlayerAction::CanEndTurn);
        assert_eq!(next.players[0].money, 1500);
        assert_eq!(next.log.messages()[0], "Alice landed on Chance.");
    }

    #[test]
    fn test_roll_while_awaiting_choice_is_noop() {
        let (rules, state) = new_game();
        let waiting = rules.apply_action(&state, &Action::Roll(Dice(3, 3)));
        assert_eq!(waiting.action, PlayerAction::AwaitingChoice);

        let again = rules.apply_action(&waiting, &Action::Roll(Dice(6, 6)));
        assert_eq!(again, waiting);
    }

    #[test]
    fn test_out_of_range_dice_rejected() {
        let (rules, state) = new_game();
        assert!(rules.validate_action(&state, &Action::Roll(Dice(0, 7))).is_some());
        assert_eq!(rules.apply_action(&state, &Action::Roll(Dice(7, 1))), state);
    }

    #[test]
    fn test_choose_confirm_purchase() {
        let (rules, state) = new_game();
        let s = rules.apply_action(&state, &Action::Roll(Dice(3, 3)));
        let s = rules.apply_action(&s, &Action::ChooseOutcome(Side::Yes));
        assert_eq!(s.action, PlayerAction::AwaitingSignature);
        assert_eq!(s.pending.as_ref().unwrap().price, 60);
        assert_eq!(s.players[0].money, 1500);

        let s = rules.apply_action(&s, &Action::Confirm);
        assert_eq!(s.action, PlayerAction::CanEndTurn);
        assert_eq!(s.players[0].money, 1440);
        assert_eq!(s.players[0].nfts.len(), 1);
        assert_eq!(s.players[0].nfts[0].id, "sol-flip-eth-YES");
        let owner = s.market("sol-flip-eth").unwrap().owner.unwrap();
        assert_eq!((owner.player_id, owner.side), (0, Side::Yes));
        assert!(s.pending.is_none());

        // Second confirm is a no-op
        let again = rules.apply_action(&s, &Action::Confirm);
        assert_eq!(again, s);
    }

    #[test]
    fn test_insufficient_funds_forces_end_turn() {
        let (rules, mut state) = new_game();
        state.players[0].money = 100;
        let s = rules.apply_action(&state, &Action::Roll(Dice(3, 3)));
        let s = rules.apply_action(&s, &Action::ChooseOutcome(Side::No)); // costs 140

        assert_eq!(s.action, PlayerAction::CanEndTurn);
        assert_eq!(s.players[0].money, 100);
        assert!(s.market("sol-flip-eth").unwrap().owner.is_none());
        assert!(s.pending.is_none());
        assert_eq!(s.log.messages()[0], "Not enough funds to invest. Needs $140.");
    }

    #[test]
    fn test_exact_funds_are_enough() {
        let (rules, mut state) = new_game();
        state.players[0].money = 140;
        let s = rules.apply_action(&state, &Action::Roll(Dice(3, 3)));
        let s = rules.apply_action(&s, &Action::ChooseOutcome(Side::No));
        assert_eq!(s.action, PlayerAction::AwaitingSignature);
    }

    #[test]
    fn test_cancel_discards_choice() {
        let (rules, state) = new_game();
        let s = rules.apply_action(&state, &Action::Roll(Dice(3, 3)));
        let s = rules.apply_action(&s, &Action::ChooseOutcome(Side::Yes));
        let s = rules.apply_action(&s, &Action::Cancel);

        assert_eq!(s.action, PlayerAction::CanEndTurn);
        assert!(s.pending.is_none());
        assert_eq!(s.players[0].money, 1500);
        assert!(s.players[0].nfts.is_empty());
        assert_eq!(s.log.messages()[0], "Purchase cancelled.");

        // Cancel outside AwaitingSignature does nothing
        assert_eq!(rules.apply_action(&s, &Action::Cancel), s);
    }

    #[test]
    fn test_owned_market_logs_taken() {
        let (rules, mut state) = new_game();
        let m = catalog::position(&state.markets, "sol-flip-eth").unwrap();
        state.markets[m].owner = Some(Ownership { player_id: 1, side: Side::No, price_paid: 140 });

        let s = rules.apply_action(&state, &Action::Roll(Dice(3, 3)));
        assert_eq!(s.action, PlayerAction::CanEndTurn);
        assert_eq!(s.log.messages()[0], "Market position already taken.");
        assert_eq!(s.players[0].money, 1500);
    }

    #[test]
    fn test_property_rent_goes_to_owner() {
        let (rules, mut state) = new_game();
        let m = catalog::position(&state.markets, "mining-farm").unwrap();
        state.markets[m].owner = Some(Ownership { player_id: 1, side: Side::Yes, price_paid: 200 });

        let s = rules.apply_action(&state, &Action::Roll(Dice(1, 4)));
        assert_eq!(s.players[0].money, 1475);
        assert_eq!(s.players[1].money, 1525);
        assert_eq!(s.log.messages()[0], "Alice paid $25 rent to Satoshi.");
        assert_eq!(s.action, PlayerAction::CanEndTurn);
    }

    #[test]
    fn test_sell_property() {
        let (rules, state) = new_game();
        let s = rules.apply_action(&state, &Action::Roll(Dice(1, 4)));
        let s = rules.apply_action(&s, &Action::ChooseOutcome(Side::Yes));
        let s = rules.apply_action(&s, &Action::Confirm);
        assert_eq!(s.players[0].money, 1300);
        assert_eq!(s.log.messages()[0], "Alice bought Bitcoin Mining Farm for $200.");

        let sold = rules.apply_action(&s, &Action::Sell("mining-farm".into()));
        assert_eq!(sold.players[0].money, 1500);
        assert!(sold.market("mining-farm").unwrap().owner.is_none());
        assert_eq!(sold.players[0].nfts.len(), 1);
        assert_eq!(sold.action, PlayerAction::CanEndTurn);

        // Nothing left to sell, and prediction positions are never sellable
        assert_eq!(rules.apply_action(&sold, &Action::Sell("mining-farm".into())), sold);
        assert!(rules
            .validate_action(&sold, &Action::Sell("btc-100k".into()))
            .is_some());
    }

    #[test]
    fn test_end_turn_advances_and_wraps() {
        let (rules, state) = new_game();
        let s = rules.apply_action(&at(state, 15), &Action::Roll(Dice(3, 4)));
        let s = rules.apply_action(&s, &Action::EndTurn);
        assert_eq!(s.current_player_index, 1);
        assert_eq!(s.action, PlayerAction::CanRoll);
        assert!(s.is_bot_to_move());

        // Humans cannot act for the bot
        assert!(rules.validate_action(&s, &Action::Roll(Dice(1, 1))).is_some());
        assert!(rules.validate_action(&s, &Action::EndTurn).is_some());
        // and the bot's end-turn is not a human shortcut
        let mut human_turn = s.clone();
        human_turn.current_player_index = 0;
        human_turn.action = PlayerAction::CanEndTurn;
        assert!(rules.validate_action(&human_turn, &Action::BotEndTurn).is_some());
    }

    #[test]
    fn test_bot_turn_sequence() {
        let (rules, state) = new_game();
        let s = rules.apply_action(&at(state, 15), &Action::Roll(Dice(3, 4)));
        let s = rules.apply_action(&s, &Action::EndTurn);

        // Out of order bot steps are ignored
        assert_eq!(rules.apply_action(&s, &Action::BotLand), s);

        let s = rules.apply_action(&s, &Action::ClaimBotTurn);
        assert_eq!(s.action, PlayerAction::BotTurn);
        assert_eq!(s.bot_stage, Some(BotStage::Claimed));
        assert!(rules.validate_action(&s, &Action::BotEndTurn).is_some());
        assert!(rules.validate_action(&s, &Action::ChooseOutcome(Side::Yes)).is_some());

        let s = rules.apply_action(&s, &Action::BotRoll(Dice(1, 2)));
        assert_eq!(s.players[1].position, 3);
        let s = rules.apply_action(&s, &Action::BotLand);
        assert_eq!(s.action, PlayerAction::BotTurn);
        assert_eq!(s.bot_stage, Some(BotStage::Landed));

        // Landing does not hand the turn to the human end-turn path
        assert_eq!(rules.apply_action(&s, &Action::EndTurn), s);

        let s = rules.apply_action(&s, &Action::BotPurchase(Side::No));
        assert_eq!(s.players[1].money, 1410);
        assert_eq!(s.market("eth-etf").unwrap().owner.unwrap().player_id, 1);
        assert_eq!(s.bot_stage, Some(BotStage::Settled));

        // A second purchase is refused
        assert_eq!(rules.apply_action(&s, &Action::BotPurchase(Side::Yes)), s);
        assert!(rules.validate_action(&s, &Action::EndTurn).is_some());

        let s = rules.apply_action(&s, &Action::BotEndTurn);
        assert_eq!(s.current_player_index, 0);
        assert_eq!(s.action, PlayerAction::CanRoll);
        assert_eq!(s.bot_stage, None);
    }

    #[test]
    fn test_bot_tax_and_jail() {
        let (rules, mut state) = new_game();
        state.current_player_index = 1;
        let s = rules.apply_action(&state, &Action::ClaimBotTurn);
        let s = rules.apply_action(&s, &Action::BotRoll(Dice(2, 2)));
        let s = rules.apply_action(&s, &Action::BotLand);
        assert_eq!(s.players[1].money, 1300);
        assert_eq!(s.action, PlayerAction::BotTurn);

        let mut state = s;
        state = rules.apply_action(&state, &Action::BotEndTurn);
        assert_eq!(state.current_player_index, 0);
        state.current_player_index = 1;
        state.players[1].position = 24;
        let s = rules.apply_action(&state, &Action::ClaimBotTurn);
        let s = rules.apply_action(&s, &Action::BotRoll(Dice(3, 3)));
        let s = rules.apply_action(&s, &Action::BotLand);
        assert_eq!(s.players[1].position, 10);
        assert!(s.players[1].in_jail);
        assert_eq!(s.action, PlayerAction::CanRoll);
        assert_eq!(s.current_player_index, 0);
    }

    #[test]
    fn test_custom_board_and_catalog() {
        let rules = CryptoPolyRules { pass_go_bonus: 50, log_capacity: 5 };
        let board = Board::new(vec![
            Tile::Go,
            Tile::Market { market_id: "m".into() },
            Tile::Jail,
        ])
        .unwrap();
        let markets = vec![Market::new("m", "M?", Pricing::Market { yes: 10, no: 20 })];
        let players = create_initial_players("Alice", "", &default_roster(), 100);
        let state = rules.create_state_with(players, board, markets);

        // 2 + 2 on a 3-tile board = 1, passing GO once
        let s = rules.apply_action(&at(state, 2), &Action::Roll(Dice(1, 1)));
        assert_eq!(s.players[0].position, 1);
        assert_eq!(s.players[0].money, 150);
        assert_eq!(s.action, PlayerAction::AwaitingChoice);
    }

    #[test]
    #[should_panic(expected = "at least one player")]
    fn test_game_without_players_is_refused() {
        CryptoPolyRules::default().create_state_with(Vec::new(), Board::standard(), Vec::new());
    }
}
