//! Liquidity Withdrawal
//!
//! Burns pool shares for a proportional slice of the pool. The payout comes
//! from the vault; when part of the pool's capital is locked behind sold
//! options the shortfall is covered by handing over the matching slice of
//! the pool's redeem-claim holdings. Shares are burned in full either way,
//! so the residual slippage is the caller's to bound client-side.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{
        burn, transfer_checked, Burn, Mint, TokenAccount, TokenInterface, TransferChecked,
    },
};

use crate::amm::{underlying_for_shares, withdraw_split, MathError};
use crate::errors::PoolError;
use crate::state::Pool;

/// Event emitted when liquidity is removed
#[event]
pub struct Withdrawn {
    pub pool_id: u64,
    pub from: Pubkey,
    pub shares_in: u64,
    pub amount_out: u64,
    pub claim_out: u64,
}

/// Accounts for withdrawing underlying
#[derive(Accounts)]
pub struct Withdraw<'info> {
    /// Liquidity provider
    #[account(mut)]
    pub trader: Signer<'info>,

    /// Pool being withdrawn from
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

    /// Redeem-claim token mint
    #[account(
        constraint = claim_mint.key() == pool.claim_mint,
    )]
    pub claim_mint: InterfaceAccount<'info, Mint>,

    /// Provider's underlying token account
    #[account(
        mut,
        associated_token::mint = underlying_mint,
        associated_token::authority = trader,
    )]
    pub trader_underlying: InterfaceAccount<'info, TokenAccount>,

    /// Provider's pool-share token account
    #[account(
        mut,
        associated_token::mint = share_mint,
        associated_token::authority = trader,
    )]
    pub trader_shares: InterfaceAccount<'info, TokenAccount>,

    /// Provider's redeem-claim token account
    #[account(
        init_if_needed,
        payer = trader,
        associated_token::mint = claim_mint,
        associated_token::authority = trader,
    )]
    pub trader_claim: InterfaceAccount<'info, TokenAccount>,

    /// Pool's underlying vault
    #[account(
        mut,
        constraint = vault.key() == pool.vault,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    /// Pool's redeem-claim token account
    #[account(
        mut,
        constraint = claim_reserve.key() == pool.claim_reserve,
    )]
    pub claim_reserve: InterfaceAccount<'info, TokenAccount>,

    /// Token program
    pub token_program: Interface<'info, TokenInterface>,
    /// Associated token program
    pub associated_token_program: Program<'info, AssociatedToken>,
    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> Withdraw<'info> {
    /// Burn shares, pay out the proportional slice of pool assets
    pub fn withdraw(&mut self, shares_in: u64) -> Result<()> {
        self.pool.lock()?;
        self.pool.require_active()?;

        require!(
            shares_in > 0 && self.trader_shares.amount >= shares_in,
            PoolError::InsufficientBalance
        );

        let amount_out = underlying_for_shares(
            shares_in,
            self.pool.total_shares,
            self.pool.total_pool_balance(),
        )?;

        // The vault covers what it can; the rest is handed over as the
        // matching slice of the pool's redeem-claim holdings. The utilized
        // entitlement behind those claims leaves with them.
        let (paid, claim_out, released) = withdraw_split(
            amount_out,
            self.pool.underlying_balance,
            self.pool.base,
            self.pool.price,
            self.claim_reserve.amount,
        )?;

        burn(
            CpiContext::new(
                self.token_program.to_account_info(),
                Burn {
                    mint: self.share_mint.to_account_info(),
                    from: self.trader_shares.to_account_info(),
                    authority: self.trader.to_account_info(),
                },
            ),
            shares_in,
        )?;

        let pool_seeds = &[
            Pool::SEED,
            &self.pool.id.to_le_bytes(),
            &[self.pool.bump],
        ];
        let pool_signer = &[&pool_seeds[..]];

        if paid > 0 {
            transfer_checked(
                CpiContext::new_with_signer(
                    self.token_program.to_account_info(),
                    TransferChecked {
                        from: self.vault.to_account_info(),
                        mint: self.underlying_mint.to_account_info(),
                        to: self.trader_underlying.to_account_info(),
                        authority: self.pool.to_account_info(),
                    },
                    pool_signer,
                ),
                paid,
                self.underlying_mint.decimals,
            )?;
        }

        if claim_out > 0 {
            transfer_checked(
                CpiContext::new_with_signer(
                    self.token_program.to_account_info(),
                    TransferChecked {
                        from: self.claim_reserve.to_account_info(),
                        mint: self.claim_mint.to_account_info(),
                        to: self.trader_claim.to_account_info(),
                        authority: self.pool.to_account_info(),
                    },
                    pool_signer,
                ),
                claim_out,
                self.claim_mint.decimals,
            )?;
        }

        self.pool.total_shares = self
            .pool
            .total_shares
            .checked_sub(shares_in)
            .ok_or(MathError::Overflow)?;
        self.pool.underlying_balance = self
            .pool
            .underlying_balance
            .checked_sub(paid)
            .ok_or(MathError::Overflow)?;
        self.pool.utilized = self.pool.utilized.saturating_sub(released);
        self.pool.refresh_volatility();

        emit!(Withdrawn {
            pool_id: self.pool.id,
            from: self.trader.key(),
            shares_in,
            amount_out: paid,
            claim_out,
        });

        self.pool.unlock();
        Ok(())
    }
}
