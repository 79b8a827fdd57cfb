//! Premium Oracle Feed
//!
//! The pool prices trades through an external premium oracle. On-chain that
//! collaborator is a small feed account carrying the spot price a trusted
//! authority publishes; the premium curve itself lives in the pricing module
//! and reads this feed together with the pool's volatility proxy.

use anchor_lang::prelude::*;

/// Spot price feed for one (underlying, strike) pair
///
/// Seeds: ["oracle", underlying_mint, strike_mint]
#[account]
#[derive(InitSpace)]
pub struct PremiumOracle {
    /// Signer allowed to publish price updates
    pub authority: Pubkey,

    /// Underlying asset mint this feed covers
    pub underlying_mint: Pubkey,

    /// Strike asset mint this feed covers
    pub strike_mint: Pubkey,

    /// Strike units per one whole token of the underlying
    pub spot_price: u64,

    /// Unix timestamp of the last update
    pub updated_at: u64,

    /// PDA bump seed
    pub bump: u8,
}

impl PremiumOracle {
    pub const SEED: &'static [u8] = b"oracle";
}
