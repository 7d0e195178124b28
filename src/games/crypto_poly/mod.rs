//! Crypto Poly: a Monopoly-style board where market tiles are prediction markets
//! and purchases mint NFT receipts.

pub mod board;
pub mod bot;
pub mod catalog;
pub mod players;
pub mod rules;
pub mod types;
