//! Live game session: owns the authoritative state and publishes every change.
//!
//! Human handlers and the bot driver both write through [`GameSession::dispatch`];
//! the action-state guard inside the rules keeps them from interleaving, so no
//! lock is held across an await point. Display surfaces read via
//! [`GameSession::subscribe`].

use tokio::sync::watch;

use crate::engine::capabilities::{Signer, Submitter, CONFIRM_MESSAGE};
use crate::games::crypto_poly::board::MarketId;
use crate::games::crypto_poly::rules::CryptoPolyRules;
use crate::games::crypto_poly::types::{Action, Dice, GameState, PendingChoice, PlayerAction, Side};

/// How an attempt to sign the pending choice ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignOutcome {
    /// Not in `AwaitingSignature`; nothing was asked of the signer.
    NothingPending,
    /// Purchase finalized. `tx_hash` is `None` when submission failed.
    Confirmed { tx_hash: Option<String> },
    /// Signer failed or declined; the choice was discarded.
    Cancelled,
    /// The signer resolved after the choice had already been cancelled or replaced.
    Stale,
}

pub struct GameSession {
    rules: CryptoPolyRules,
    state: watch::Sender<GameState>,
}

impl GameSession {
    pub fn new(rules: CryptoPolyRules, initial: GameState) -> Self {
        let (state, _) = watch::channel(initial);
        Self { rules, state }
    }

    pub fn rules(&self) -> &CryptoPolyRules {
        &self.rules
    }

    pub fn subscribe(&self) -> watch::Receiver<GameState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> GameState {
        self.state.borrow().clone()
    }

    /// Apply `action` if the engine accepts it now. Returns whether anything changed.
    pub fn dispatch(&self, action: &Action) -> bool {
        self.dispatch_if(action, |_| true)
    }

    fn dispatch_if(&self, action: &Action, guard: impl FnOnce(&GameState) -> bool) -> bool {
        let rules = &self.rules;
        self.state.send_if_modified(|state| {
            if !guard(state) {
                return false;
            }
            if let Some(reason) = rules.validate_action(state, action) {
                tracing::debug!(?action, %reason, "ignored action");
                return false;
            }
            *state = rules.apply_action(state, action);
            true
        })
    }

    // --- Human write surface ---

    pub fn roll(&self) -> bool {
        let dice = Dice::roll(&mut rand::thread_rng());
        self.dispatch(&Action::Roll(dice))
    }

    pub fn choose_outcome(&self, side: Side) -> bool {
        self.dispatch(&Action::ChooseOutcome(side))
    }

    /// Finalize the pending choice without consulting a signer.
    pub fn confirm(&self) -> bool {
        self.dispatch(&Action::Confirm)
    }

    pub fn cancel(&self) -> bool {
        self.dispatch(&Action::Cancel)
    }

    pub fn end_turn(&self) -> bool {
        self.dispatch(&Action::EndTurn)
    }

    pub fn sell(&self, market_id: MarketId) -> bool {
        self.dispatch(&Action::Sell(market_id))
    }

    /// Ask `signer` to approve the pending choice, then confirm or cancel.
    ///
    /// The engine stays in `AwaitingSignature` for as long as the signer takes;
    /// the player may cancel meanwhile, in which case a late signature is ignored.
    /// After a confirm the choice is submitted to `submitter`; a failed submission
    /// is only reported, the local purchase stands.
    pub async fn sign_pending(&self, signer: &dyn Signer, submitter: &dyn Submitter) -> SignOutcome {
        let (pending, address) = {
            let state = self.state.borrow();
            match (state.action, &state.pending) {
                (PlayerAction::AwaitingSignature, Some(p)) => {
                    (p.clone(), state.current_player().wallet_address.clone())
                }
                _ => return SignOutcome::NothingPending,
            }
        };
        let same_choice = |state: &GameState| state.pending.as_ref() == Some(&pending);

        let signature = match signer.sign(CONFIRM_MESSAGE).await {
            Ok(signature) => signature,
            Err(e) => {
                tracing::warn!(error = %e, market = %pending.market_id, "signing failed");
                return if self.dispatch_if(&Action::Cancel, same_choice) {
                    SignOutcome::Cancelled
                } else {
                    SignOutcome::Stale
                };
            }
        };

        if !self.dispatch_if(&Action::Confirm, same_choice) {
            tracing::info!(market = %pending.market_id, "signature arrived for a withdrawn choice");
            return SignOutcome::Stale;
        }

        submit(submitter, address, &pending, &signature).await
    }
}

async fn submit(
    submitter: &dyn Submitter,
    address: Option<String>,
    pending: &PendingChoice,
    signature: &str,
) -> SignOutcome {
    let address = address.unwrap_or_else(|| "0x0".into());
    match submitter
        .submit_prediction(&address, &pending.market_id, pending.side, signature)
        .await
    {
        Ok(receipt) => {
            tracing::info!(tx_hash = %receipt.tx_hash, market = %pending.market_id, "purchase submitted");
            SignOutcome::Confirmed {
                tx_hash: Some(receipt.tx_hash),
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, market = %pending.market_id, "submission failed, keeping local purchase");
            SignOutcome::Confirmed { tx_hash: None }
        }
    }
}
