//! Pool Creation
//!
//! A pool is created once per (underlying, option series, oracle) tuple and
//! split across three instructions to stay inside account-stack limits:
//!
//! 1. `create_pool_state` - the pool account and series parameters
//! 2. `create_pool_mints` - share, option, and redeem-claim mints
//! 3. `create_pool_vaults` - vault, escrow, and claim reserve accounts
//!
//! The creator becomes the pool's controller and is the only signer allowed
//! to toggle the kill switch.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::errors::PoolError;
use crate::state::{Config, Pool, PremiumOracle};

/// Event emitted when a new pool is created
#[event]
pub struct PoolCreated {
    pub pool_id: u64,
    pub controller: Pubkey,
    pub underlying_mint: Pubkey,
    pub strike_mint: Pubkey,
    pub base: u64,
    pub price: u64,
    pub expiry: u64,
}

/// Accounts for creating pool state (Step 1)
#[derive(Accounts)]
pub struct CreatePoolState<'info> {
    /// Pool creator (pays for accounts, becomes controller)
    #[account(mut)]
    pub creator: Signer<'info>,

    /// Global protocol configuration
    #[account(
        mut,
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    /// The new pool account
    #[account(
        init,
        payer = creator,
        space = 8 + Pool::INIT_SPACE,
        seeds = [Pool::SEED, config.pool_count.to_le_bytes().as_ref()],
        bump,
    )]
    pub pool: Account<'info, Pool>,

    /// Underlying asset mint
    pub underlying_mint: InterfaceAccount<'info, Mint>,

    /// Strike asset mint
    pub strike_mint: InterfaceAccount<'info, Mint>,

    /// Premium oracle feed for this asset pair
    #[account(
        constraint = oracle.underlying_mint == underlying_mint.key()
            && oracle.strike_mint == strike_mint.key()
            @ PoolError::UnsupportedAsset,
    )]
    pub oracle: Account<'info, PremiumOracle>,

    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> CreatePoolState<'info> {
    pub fn create_pool_state(
        &mut self,
        base: u64,
        price: u64,
        expiry: u64,
        bumps: CreatePoolStateBumps,
    ) -> Result<()> {
        let clock = Clock::get()?;

        require!(base > 0 && price > 0, PoolError::InvalidSeries);
        require!(expiry > clock.unix_timestamp as u64, PoolError::SeriesExpired);

        let unit = 10u64
            .checked_pow(self.underlying_mint.decimals as u32)
            .ok_or(PoolError::InvalidSeries)?;

        let pool_id = self.config.pool_count;

        self.pool.set_inner(Pool {
            id: pool_id,
            controller: self.creator.key(),
            oracle: self.oracle.key(),
            underlying_mint: self.underlying_mint.key(),
            strike_mint: self.strike_mint.key(),
            share_mint: Pubkey::default(),
            option_mint: Pubkey::default(),
            claim_mint: Pubkey::default(),
            vault: Pubkey::default(),
            escrow: Pubkey::default(),
            claim_reserve: Pubkey::default(),
            base,
            price,
            expiry,
            unit,
            underlying_balance: 0,
            utilized: 0,
            total_shares: 0,
            volatility: Pool::INITIAL_VOLATILITY_BPS,
            paused: false,
            locked: false,
            bump: bumps.pool,
        });

        self.config.pool_count += 1;

        emit!(PoolCreated {
            pool_id,
            controller: self.creator.key(),
            underlying_mint: self.underlying_mint.key(),
            strike_mint: self.strike_mint.key(),
            base,
            price,
            expiry,
        });

        Ok(())
    }
}

/// Accounts for creating the pool's token mints (Step 2)
#[derive(Accounts)]
pub struct CreatePoolMints<'info> {
    /// Pool creator
    #[account(mut)]
    pub creator: Signer<'info>,

    /// The pool being set up
    #[account(
        mut,
        constraint = pool.controller == creator.key() @ PoolError::Unauthorized,
    )]
    pub pool: Account<'info, Pool>,

    /// Underlying asset mint (share and option tokens copy its decimals)
    #[account(
        constraint = underlying_mint.key() == pool.underlying_mint,
    )]
    pub underlying_mint: InterfaceAccount<'info, Mint>,

    /// Pool-share token mint
    #[account(
        init,
        payer = creator,
        mint::decimals = underlying_mint.decimals,
        mint::authority = pool,
        seeds = [b"share_mint", pool.id.to_le_bytes().as_ref()],
        bump,
    )]
    pub share_mint: InterfaceAccount<'info, Mint>,

    /// Option token mint for this series
    #[account(
        init,
        payer = creator,
        mint::decimals = underlying_mint.decimals,
        mint::authority = pool,
        seeds = [b"option_mint", pool.id.to_le_bytes().as_ref()],
        bump,
    )]
    pub option_mint: InterfaceAccount<'info, Mint>,

    /// Redeem-claim token mint
    #[account(
        init,
        payer = creator,
        mint::decimals = underlying_mint.decimals,
        mint::authority = pool,
        seeds = [b"claim_mint", pool.id.to_le_bytes().as_ref()],
        bump,
    )]
    pub claim_mint: InterfaceAccount<'info, Mint>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> CreatePoolMints<'info> {
    pub fn create_pool_mints(&mut self) -> Result<()> {
        self.pool.share_mint = self.share_mint.key();
        self.pool.option_mint = self.option_mint.key();
        self.pool.claim_mint = self.claim_mint.key();

        msg!("Pool {} mints created", self.pool.id);

        Ok(())
    }
}

/// Accounts for creating the pool's token accounts (Step 3)
#[derive(Accounts)]
pub struct CreatePoolVaults<'info> {
    /// Pool creator
    #[account(mut)]
    pub creator: Signer<'info>,

    /// The pool being set up
    #[account(
        mut,
        constraint = pool.controller == creator.key() @ PoolError::Unauthorized,
    )]
    pub pool: Account<'info, Pool>,

    /// Underlying asset mint
    #[account(
        constraint = underlying_mint.key() == pool.underlying_mint,
    )]
    pub underlying_mint: InterfaceAccount<'info, Mint>,

    /// Redeem-claim token mint
    #[account(
        constraint = claim_mint.key() == pool.claim_mint,
    )]
    pub claim_mint: InterfaceAccount<'info, Mint>,

    /// Vault for unutilized underlying
    #[account(
        init,
        payer = creator,
        token::mint = underlying_mint,
        token::authority = pool,
        seeds = [b"vault", pool.id.to_le_bytes().as_ref()],
        bump,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    /// Escrow for underlying locked behind minted options
    #[account(
        init,
        payer = creator,
        token::mint = underlying_mint,
        token::authority = pool,
        seeds = [b"escrow", pool.id.to_le_bytes().as_ref()],
        bump,
    )]
    pub escrow: InterfaceAccount<'info, TokenAccount>,

    /// Pool's redeem-claim token account
    #[account(
        init,
        payer = creator,
        associated_token::mint = claim_mint,
        associated_token::authority = pool,
    )]
    pub claim_reserve: InterfaceAccount<'info, TokenAccount>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// Associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,
    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> CreatePoolVaults<'info> {
    pub fn create_pool_vaults(&mut self) -> Result<()> {
        self.pool.vault = self.vault.key();
        self.pool.escrow = self.escrow.key();
        self.pool.claim_reserve = self.claim_reserve.key();

        msg!("Pool {} vaults created", self.pool.id);

        Ok(())
    }
}
