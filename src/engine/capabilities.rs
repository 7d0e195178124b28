//! Injected capabilities: wallet signing and best-effort on-chain submission.
//!
//! Nothing here touches a real chain. `MockChain` stands in for the contract
//! and `TestModeSigner` for a wallet that isn't connected.

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::Mutex;

use crate::engine::error::{SignError, SubmitError};
use crate::games::crypto_poly::types::Side;

/// Message shown in the wallet prompt when confirming a purchase.
pub const CONFIRM_MESSAGE: &str = "Confirm your investment to mint this outcome as an NFT.";

#[async_trait]
pub trait Signer: Send + Sync {
    /// Sign `message`. May never resolve; callers must not rely on a timeout here.
    async fn sign(&self, message: &str) -> Result<String, SignError>;
}

/// Stands in for a disconnected wallet: signing is skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestModeSigner;

#[async_trait]
impl Signer for TestModeSigner {
    async fn sign(&self, _message: &str) -> Result<String, SignError> {
        tracing::info!("wallet not connected, signing skipped in test mode");
        Ok("0xtest-mode".into())
    }
}

/// A wallet whose user always rejects the prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecliningSigner;

#[async_trait]
impl Signer for DecliningSigner {
    async fn sign(&self, _message: &str) -> Result<String, SignError> {
        Err(SignError::Declined)
    }
}

/// A wallet that cannot be reached, e.g. the extension was closed mid-game.
#[derive(Debug, Clone, Default)]
pub struct UnreachableSigner {
    pub reason: String,
}

#[async_trait]
impl Signer for UnreachableSigner {
    async fn sign(&self, _message: &str) -> Result<String, SignError> {
        Err(SignError::Unavailable(self.reason.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub tx_hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintedToken {
    pub token_id: String,
    pub tx_hash: String,
}

#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit_prediction(
        &self,
        address: &str,
        market_id: &str,
        side: Side,
        signature: &str,
    ) -> Result<SubmitReceipt, SubmitError>;

    /// Reward mint outside the turn flow, e.g. for a winning prediction.
    async fn mint_free_nft(
        &self,
        address: &str,
        prediction_id: &str,
        rarity: &str,
    ) -> Result<MintedToken, SubmitError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub address: String,
    pub market_id: String,
    pub side: Side,
    pub signature: String,
    pub tx_hash: String,
}

/// In-memory chain: accepts everything (or fails everything) and remembers what it saw.
#[derive(Debug, Default)]
pub struct MockChain {
    failure: Option<SubmitError>,
    submissions: Mutex<Vec<Submission>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// A chain that rejects every call with `reason`.
    pub fn failing(reason: &str) -> Self {
        Self::with_failure(SubmitError::Rejected(reason.into()))
    }

    /// A chain that cannot be reached at all.
    pub fn offline(reason: &str) -> Self {
        Self::with_failure(SubmitError::Unavailable(reason.into()))
    }

    fn with_failure(failure: SubmitError) -> Self {
        Self {
            failure: Some(failure),
            submissions: Mutex::new(Vec::new()),
        }
    }

    pub async fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().await.clone()
    }
}

fn random_tx_hash() -> String {
    let mut rng = rand::thread_rng();
    format!("0x{:032x}{:032x}", rng.gen::<u128>(), rng.gen::<u128>())
}

#[async_trait]
impl Submitter for MockChain {
    async fn submit_prediction(
        &self,
        address: &str,
        market_id: &str,
        side: Side,
        signature: &str,
    ) -> Result<SubmitReceipt, SubmitError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        let tx_hash = random_tx_hash();
        self.submissions.lock().await.push(Submission {
            address: address.into(),
            market_id: market_id.into(),
            side,
            signature: signature.into(),
            tx_hash: tx_hash.clone(),
        });
        tracing::info!(%address, %market_id, %side, %tx_hash, "prediction submitted");
        Ok(SubmitReceipt { tx_hash })
    }

    async fn mint_free_nft(
        &self,
        address: &str,
        prediction_id: &str,
        rarity: &str,
    ) -> Result<MintedToken, SubmitError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let seed: u32 = rand::thread_rng().gen();
        let token = MintedToken {
            token_id: format!("{millis:x}-{seed:08x}"),
            tx_hash: random_tx_hash(),
        };
        tracing::info!(%address, %prediction_id, %rarity, token_id = %token.token_id, "free nft minted");
        Ok(token)
    }
}
