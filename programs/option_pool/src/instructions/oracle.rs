//! Premium Oracle Feed Maintenance
//!
//! The oracle is an external collaborator with a narrow interface: a feed
//! account per (underlying, strike) pair whose authority publishes spot
//! prices. Pools read the feed when pricing trades and never assume more
//! than the published value.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::Mint;

use crate::errors::PoolError;
use crate::state::PremiumOracle;

/// Event emitted when a spot price is published
#[event]
pub struct SpotPriceSet {
    pub oracle: Pubkey,
    pub spot_price: u64,
    pub updated_at: u64,
}

/// Accounts for creating a price feed
#[derive(Accounts)]
pub struct CreateOracle<'info> {
    /// Feed authority (pays for the account, publishes updates)
    #[account(mut)]
    pub authority: Signer<'info>,

    /// The new feed account
    #[account(
        init,
        payer = authority,
        space = 8 + PremiumOracle::INIT_SPACE,
        seeds = [
            PremiumOracle::SEED,
            underlying_mint.key().as_ref(),
            strike_mint.key().as_ref(),
        ],
        bump,
    )]
    pub oracle: Account<'info, PremiumOracle>,

    /// Underlying asset mint
    pub underlying_mint: InterfaceAccount<'info, Mint>,

    /// Strike asset mint
    pub strike_mint: InterfaceAccount<'info, Mint>,

    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> CreateOracle<'info> {
    pub fn create_oracle(&mut self, spot_price: u64, bumps: CreateOracleBumps) -> Result<()> {
        let clock = Clock::get()?;

        self.oracle.set_inner(PremiumOracle {
            authority: self.authority.key(),
            underlying_mint: self.underlying_mint.key(),
            strike_mint: self.strike_mint.key(),
            spot_price,
            updated_at: clock.unix_timestamp as u64,
            bump: bumps.oracle,
        });

        msg!("Oracle feed created for {}", self.underlying_mint.key());

        Ok(())
    }
}

/// Accounts for publishing a spot price
#[derive(Accounts)]
pub struct SetSpotPrice<'info> {
    /// Feed authority
    pub authority: Signer<'info>,

    /// The feed being updated
    #[account(
        mut,
        has_one = authority @ PoolError::Unauthorized,
    )]
    pub oracle: Account<'info, PremiumOracle>,
}

impl<'info> SetSpotPrice<'info> {
    pub fn set_spot_price(&mut self, spot_price: u64) -> Result<()> {
        let clock = Clock::get()?;

        self.oracle.spot_price = spot_price;
        self.oracle.updated_at = clock.unix_timestamp as u64;

        emit!(SpotPriceSet {
            oracle: self.oracle.key(),
            spot_price,
            updated_at: self.oracle.updated_at,
        });

        Ok(())
    }
}
