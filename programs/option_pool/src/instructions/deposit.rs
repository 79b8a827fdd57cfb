//! Liquidity Provision
//!
//! Deposits add underlying to the pool and mint pool-share tokens
//! proportional to the contribution. A native variant wraps SOL directly
//! into the vault, allowed only when the pool's underlying is the wrapped
//! native mint.

use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::{
    associated_token::AssociatedToken,
    token::{spl_token::native_mint, sync_native, SyncNative},
    token_interface::{
        mint_to, transfer_checked, Mint, MintTo, TokenAccount, TokenInterface, TransferChecked,
    },
};

use crate::amm::{shares_for_deposit, MathError};
use crate::errors::PoolError;
use crate::state::{Config, Pool};

/// Event emitted when liquidity is added
#[event]
pub struct Deposited {
    pub pool_id: u64,
    pub from: Pubkey,
    pub amount_in: u64,
    pub shares_out: u64,
}

/// Accounts for depositing underlying
#[derive(Accounts)]
pub struct Deposit<'info> {
    /// Liquidity provider
    #[account(mut)]
    pub trader: Signer<'info>,

    /// Global protocol configuration
    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    /// Pool receiving the deposit
    #[account(mut)]
    pub pool: Account<'info, Pool>,

    /// Underlying asset mint
    #[account(
        constraint = underlying_mint.key() == pool.underlying_mint,
    )]
    pub underlying_mint: InterfaceAccount<'info, Mint>,

    /// Pool-share token mint
    #[account(
        mut,
        constraint = share_mint.key() == pool.share_mint,
    )]
    pub share_mint: InterfaceAccount<'info, Mint>,

    /// Provider's underlying token account
    #[account(
        mut,
        associated_token::mint = underlying_mint,
        associated_token::authority = trader,
    )]
    pub trader_underlying: InterfaceAccount<'info, TokenAccount>,

    /// Provider's pool-share token account
    #[account(
        init_if_needed,
        payer = trader,
        associated_token::mint = share_mint,
        associated_token::authority = trader,
    )]
    pub trader_shares: InterfaceAccount<'info, TokenAccount>,

    /// Pool's underlying vault
    #[account(
        mut,
        constraint = vault.key() == pool.vault,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// Associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,
    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> Deposit<'info> {
    /// Deposit underlying, mint proportional pool shares
    pub fn deposit(&mut self, amount_in: u64) -> Result<()> {
        self.pool.lock()?;
        self.pool.require_active()?;

        require!(
            amount_in >= self.config.min_liquidity,
            PoolError::BelowMinimumLiquidity
        );
        require!(
            self.trader_underlying.amount >= amount_in,
            PoolError::InsufficientBalance
        );

        let shares_out = shares_for_deposit(
            amount_in,
            self.pool.total_shares,
            self.pool.total_pool_balance(),
        )?;
        require!(shares_out > 0, PoolError::ZeroLiquidity);

        // Pull the underlying into the vault
        transfer_checked(
            CpiContext::new(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.trader_underlying.to_account_info(),
                    mint: self.underlying_mint.to_account_info(),
                    to: self.vault.to_account_info(),
                    authority: self.trader.to_account_info(),
                },
            ),
            amount_in,
            self.underlying_mint.decimals,
        )?;

        // Mint shares to the provider
        let pool_seeds = &[
            Pool::SEED,
            &self.pool.id.to_le_bytes(),
            &[self.pool.bump],
        ];
        let pool_signer = &[&pool_seeds[..]];

        mint_to(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                MintTo {
                    mint: self.share_mint.to_account_info(),
                    to: self.trader_shares.to_account_info(),
                    authority: self.pool.to_account_info(),
                },
                pool_signer,
            ),
            shares_out,
        )?;

        self.pool.underlying_balance = self
            .pool
            .underlying_balance
            .checked_add(amount_in)
            .ok_or(MathError::Overflow)?;
        self.pool.total_shares = self
            .pool
            .total_shares
            .checked_add(shares_out)
            .ok_or(MathError::Overflow)?;
        self.pool.refresh_volatility();

        emit!(Deposited {
            pool_id: self.pool.id,
            from: self.trader.key(),
            amount_in,
            shares_out,
        });

        self.pool.unlock();
        Ok(())
    }
}

/// Accounts for depositing the native asset
#[derive(Accounts)]
pub struct DepositNative<'info> {
    /// Liquidity provider
    #[account(mut)]
    pub trader: Signer<'info>,

    /// Global protocol configuration
    #[account(
        seeds = [Config::SEED],
        bump = config.bump,
    )]
    pub config: Account<'info, Config>,

    /// Pool receiving the deposit
    #[account(mut)]
    pub pool: Account<'info, Pool>,

    /// Pool-share token mint
    #[account(
        mut,
        constraint = share_mint.key() == pool.share_mint,
    )]
    pub share_mint: InterfaceAccount<'info, Mint>,

    /// Provider's pool-share token account
    #[account(
        init_if_needed,
        payer = trader,
        associated_token::mint = share_mint,
        associated_token::authority = trader,
    )]
    pub trader_shares: InterfaceAccount<'info, TokenAccount>,

    /// Pool's underlying vault (wrapped native token account)
    #[account(
        mut,
        constraint = vault.key() == pool.vault,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// Associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,
    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> DepositNative<'info> {
    /// Deposit native SOL, wrapping it into the vault
    pub fn deposit_native(&mut self, lamports: u64) -> Result<()> {
        self.pool.lock()?;
        self.pool.require_active()?;

        require!(
            self.pool.underlying_mint == native_mint::ID,
            PoolError::UnsupportedAsset
        );
        require!(
            lamports >= self.config.min_liquidity,
            PoolError::BelowMinimumLiquidity
        );
        require!(
            self.trader.lamports() >= lamports,
            PoolError::InsufficientBalance
        );

        let shares_out = shares_for_deposit(
            lamports,
            self.pool.total_shares,
            self.pool.total_pool_balance(),
        )?;
        require!(shares_out > 0, PoolError::ZeroLiquidity);

        // Move lamports into the vault and sync its wrapped balance
        system_program::transfer(
            CpiContext::new(
                self.system_program.to_account_info(),
                system_program::Transfer {
                    from: self.trader.to_account_info(),
                    to: self.vault.to_account_info(),
                },
            ),
            lamports,
        )?;
        sync_native(CpiContext::new(
            self.token_program.to_account_info(),
            SyncNative {
                account: self.vault.to_account_info(),
            },
        ))?;

        let pool_seeds = &[
            Pool::SEED,
            &self.pool.id.to_le_bytes(),
            &[self.pool.bump],
        ];
        let pool_signer = &[&pool_seeds[..]];

        mint_to(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                MintTo {
                    mint: self.share_mint.to_account_info(),
                    to: self.trader_shares.to_account_info(),
                    authority: self.pool.to_account_info(),
                },
                pool_signer,
            ),
            shares_out,
        )?;

        self.pool.underlying_balance = self
            .pool
            .underlying_balance
            .checked_add(lamports)
            .ok_or(MathError::Overflow)?;
        self.pool.total_shares = self
            .pool
            .total_shares
            .checked_add(shares_out)
            .ok_or(MathError::Overflow)?;
        self.pool.refresh_volatility();

        emit!(Deposited {
            pool_id: self.pool.id,
            from: self.trader.key(),
            amount_in: lamports,
            shares_out,
        });

        self.pool.unlock();
        Ok(())
    }
}
