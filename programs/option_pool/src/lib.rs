//! # Option Pool: an AMM for tokenized option contracts
//!
//! A pool accepts a single underlying asset as liquidity, issues and
//! redeems proportional pool-share tokens, and lets traders buy and sell
//! one option series against the pooled balance. Trades are priced through
//! a utilization-derived volatility proxy fed into a premium oracle.
//!
//! ## How it works
//! - Liquidity providers deposit the underlying and receive share tokens;
//!   withdrawing burns shares for the proportional slice of the pool.
//! - Buying locks pool underlying behind freshly minted option tokens and
//!   charges the oracle premium. Selling returns options at a fixed
//!   discount and accrues redeem-claim tokens to the pool.
//! - Every operation is guarded by a per-pool exclusive-access flag and a
//!   controller-owned kill switch.

use anchor_lang::prelude::*;

pub mod amm;
pub mod errors;
pub mod instructions;
pub mod state;

pub use amm::*;
pub use instructions::*;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

/// Main option pool program
#[program]
pub mod option_pool {
    use super::*;

    /// Initialize the protocol with global configuration
    pub fn initialize(ctx: Context<Initialize>, min_liquidity: u64) -> Result<()> {
        ctx.accounts.initialize(min_liquidity, ctx.bumps)
    }

    /// Create a premium oracle feed for an asset pair
    pub fn create_oracle(ctx: Context<CreateOracle>, spot_price: u64) -> Result<()> {
        ctx.accounts.create_oracle(spot_price, ctx.bumps)
    }

    /// Publish a spot price to a feed (feed authority only)
    pub fn set_spot_price(ctx: Context<SetSpotPrice>, spot_price: u64) -> Result<()> {
        ctx.accounts.set_spot_price(spot_price)
    }

    /// Create pool state and series parameters (Step 1)
    pub fn create_pool_state(
        ctx: Context<CreatePoolState>,
        base: u64,
        price: u64,
        expiry: u64,
    ) -> Result<()> {
        ctx.accounts.create_pool_state(base, price, expiry, ctx.bumps)
    }

    /// Create share, option, and redeem-claim mints (Step 2)
    pub fn create_pool_mints(ctx: Context<CreatePoolMints>) -> Result<()> {
        ctx.accounts.create_pool_mints()
    }

    /// Create vault, escrow, and claim reserve accounts (Step 3)
    pub fn create_pool_vaults(ctx: Context<CreatePoolVaults>) -> Result<()> {
        ctx.accounts.create_pool_vaults()
    }

    /// Deposit underlying, mint proportional pool shares
    pub fn deposit(ctx: Context<Deposit>, amount_in: u64) -> Result<()> {
        ctx.accounts.deposit(amount_in)
    }

    /// Deposit native SOL into a wrapped-native pool
    pub fn deposit_native(ctx: Context<DepositNative>, lamports: u64) -> Result<()> {
        ctx.accounts.deposit_native(lamports)
    }

    /// Burn pool shares for the proportional slice of pool assets
    pub fn withdraw(ctx: Context<Withdraw>, shares_in: u64) -> Result<()> {
        ctx.accounts.withdraw(shares_in)
    }

    /// Buy option tokens, paying the oracle-derived premium
    pub fn buy(ctx: Context<Trade>, amount_s: u64) -> Result<()> {
        ctx.accounts.buy(amount_s)
    }

    /// Sell option tokens back to the pool at the discounted premium
    pub fn sell(ctx: Context<Trade>, amount_p: u64) -> Result<()> {
        ctx.accounts.sell(amount_p)
    }

    /// Toggle the pool's kill switch (controller only)
    pub fn kill(ctx: Context<Kill>) -> Result<()> {
        ctx.accounts.kill()
    }
}
