//! Global Protocol Configuration
//!
//! Protocol-wide settings shared by every pool.

use anchor_lang::prelude::*;

/// Global configuration account (singleton PDA)
///
/// Seeds: ["config"]
#[account]
#[derive(InitSpace)]
pub struct Config {
    /// Protocol administrator
    pub admin: Pubkey,

    /// Total pools created (used as incrementing ID)
    pub pool_count: u64,

    /// Minimum underlying amount accepted by a single deposit
    pub min_liquidity: u64,

    /// PDA bump seed
    pub bump: u8,
}

impl Config {
    pub const SEED: &'static [u8] = b"config";
}
