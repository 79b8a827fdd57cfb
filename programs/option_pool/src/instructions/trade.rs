//! Option Trading
//!
//! Buys lock pool underlying behind freshly minted option tokens and charge
//! the oracle-derived premium. Sells take option tokens back at a fixed
//! discount and accrue redeem-claim tokens to the pool. Both legs recompute
//! the volatility proxy from the utilization snapshot before pricing.

use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{
        burn, mint_to, transfer_checked, Burn, Mint, MintTo, TokenAccount, TokenInterface,
        TransferChecked,
    },
};

use crate::amm::{
    apply_sell_discount, calculate_premium, scale_premium, strike_for_underlying,
    underlying_for_strike, MathError,
};
use crate::errors::PoolError;
use crate::state::{Pool, PremiumOracle};

/// Event emitted when options are bought from the pool
#[event]
pub struct Bought {
    pub pool_id: u64,
    pub from: Pubkey,
    pub amount_s: u64,
    pub amount_out: u64,
    pub premium: u64,
}

/// Event emitted when options are sold back to the pool
#[event]
pub struct Sold {
    pub pool_id: u64,
    pub from: Pubkey,
    pub amount_p: u64,
    pub payout: u64,
    pub claim_minted: u64,
}

/// Accounts for trading operations
#[derive(Accounts)]
pub struct Trade<'info> {
    /// Trader
    #[account(mut)]
    pub trader: Signer<'info>,

    /// Pool being traded against
    #[account(mut)]
    pub pool: Account<'info, Pool>,

    /// Underlying asset mint
    #[account(
        constraint = underlying_mint.key() == pool.underlying_mint,
    )]
    pub underlying_mint: InterfaceAccount<'info, Mint>,

    /// Option token mint
    #[account(
        mut,
        constraint = option_mint.key() == pool.option_mint,
    )]
    pub option_mint: InterfaceAccount<'info, Mint>,

    /// Redeem-claim token mint
    #[account(
        mut,
        constraint = claim_mint.key() == pool.claim_mint,
    )]
    pub claim_mint: InterfaceAccount<'info, Mint>,

    /// Premium oracle feed this pool prices against
    #[account(
        constraint = oracle.key() == pool.oracle,
    )]
    pub oracle: Account<'info, PremiumOracle>,

    /// Trader's underlying token account
    #[account(
        mut,
        associated_token::mint = underlying_mint,
        associated_token::authority = trader,
    )]
    pub trader_underlying: InterfaceAccount<'info, TokenAccount>,

    /// Trader's option token account
    #[account(
        init_if_needed,
        payer = trader,
        associated_token::mint = option_mint,
        associated_token::authority = trader,
    )]
    pub trader_options: InterfaceAccount<'info, TokenAccount>,

    /// Pool's underlying vault
    #[account(
        mut,
        constraint = vault.key() == pool.vault,
    )]
    pub vault: InterfaceAccount<'info, TokenAccount>,

    /// Pool's escrow for locked underlying
    #[account(
        mut,
        constraint = escrow.key() == pool.escrow,
    )]
    pub escrow: InterfaceAccount<'info, TokenAccount>,

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

impl<'info> Trade<'info> {
    /// Buy option tokens sized by `amount_s` of strike notional, paying the
    /// oracle-derived premium in underlying
    pub fn buy(&mut self, amount_s: u64) -> Result<()> {
        self.pool.lock()?;
        self.pool.require_active()?;

        require!(amount_s > 0, PoolError::ZeroAmount);

        let amount_out =
            underlying_for_strike(amount_s, self.pool.base, self.pool.price)?;
        require!(
            amount_out <= self.pool.underlying_balance,
            PoolError::InsufficientBalance
        );

        let clock = Clock::get()?;
        let volatility = self.pool.refresh_volatility();
        let per_unit = calculate_premium(
            self.oracle.spot_price,
            self.pool.unit,
            volatility,
            self.pool.base,
            self.pool.price,
            self.pool.expiry,
            clock.unix_timestamp as u64,
        )?;
        let premium = scale_premium(per_unit, amount_s, self.pool.unit)?;
        require!(
            self.trader_underlying.amount >= premium,
            PoolError::InsufficientBalance
        );

        // Premium in
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
            premium,
            self.underlying_mint.decimals,
        )?;

        let pool_seeds = &[
            Pool::SEED,
            &self.pool.id.to_le_bytes(),
            &[self.pool.bump],
        ];
        let pool_signer = &[&pool_seeds[..]];

        // Lock the written-against underlying behind the new options
        transfer_checked(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                TransferChecked {
                    from: self.vault.to_account_info(),
                    mint: self.underlying_mint.to_account_info(),
                    to: self.escrow.to_account_info(),
                    authority: self.pool.to_account_info(),
                },
                pool_signer,
            ),
            amount_out,
            self.underlying_mint.decimals,
        )?;

        mint_to(
            CpiContext::new_with_signer(
                self.token_program.to_account_info(),
                MintTo {
                    mint: self.option_mint.to_account_info(),
                    to: self.trader_options.to_account_info(),
                    authority: self.pool.to_account_info(),
                },
                pool_signer,
            ),
            amount_out,
        )?;

        self.pool.utilized = self
            .pool
            .utilized
            .checked_add(amount_out)
            .ok_or(MathError::Overflow)?;
        self.pool.underlying_balance = self
            .pool
            .underlying_balance
            .checked_sub(amount_out)
            .ok_or(MathError::Overflow)?
            .checked_add(premium)
            .ok_or(MathError::Overflow)?;

        emit!(Bought {
            pool_id: self.pool.id,
            from: self.trader.key(),
            amount_s,
            amount_out,
            premium,
        });

        self.pool.unlock();
        Ok(())
    }

    /// Sell option tokens back to the pool for the discounted premium
    pub fn sell(&mut self, amount_p: u64) -> Result<()> {
        self.pool.lock()?;
        self.pool.require_active()?;

        // A zero amount folds into the balance check, matching the original
        // sell path
        require!(
            amount_p > 0 && self.trader_options.amount >= amount_p,
            PoolError::InsufficientBalance
        );

        let clock = Clock::get()?;
        let volatility = self.pool.refresh_volatility();
        let per_unit = calculate_premium(
            self.oracle.spot_price,
            self.pool.unit,
            volatility,
            self.pool.base,
            self.pool.price,
            self.pool.expiry,
            clock.unix_timestamp as u64,
        )?;
        let premium = scale_premium(per_unit, amount_p, self.pool.unit)?;
        let payout = apply_sell_discount(premium);
        require!(
            payout <= self.pool.underlying_balance,
            PoolError::InsufficientBalance
        );

        burn(
            CpiContext::new(
                self.token_program.to_account_info(),
                Burn {
                    mint: self.option_mint.to_account_info(),
                    from: self.trader_options.to_account_info(),
                    authority: self.trader.to_account_info(),
                },
            ),
            amount_p,
        )?;

        let pool_seeds = &[
            Pool::SEED,
            &self.pool.id.to_le_bytes(),
            &[self.pool.bump],
        ];
        let pool_signer = &[&pool_seeds[..]];

        if payout > 0 {
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
                payout,
                self.underlying_mint.decimals,
            )?;
        }

        // The pool's claim on eventual exercise proceeds grows by the
        // strike-asset equivalent of the options taken back
        let claim_minted =
            strike_for_underlying(amount_p, self.pool.base, self.pool.price)?;
        if claim_minted > 0 {
            mint_to(
                CpiContext::new_with_signer(
                    self.token_program.to_account_info(),
                    MintTo {
                        mint: self.claim_mint.to_account_info(),
                        to: self.claim_reserve.to_account_info(),
                        authority: self.pool.to_account_info(),
                    },
                    pool_signer,
                ),
                claim_minted,
            )?;
        }

        self.pool.utilized = self.pool.utilized.saturating_sub(amount_p);
        self.pool.underlying_balance = self
            .pool
            .underlying_balance
            .checked_sub(payout)
            .ok_or(MathError::Overflow)?;

        emit!(Sold {
            pool_id: self.pool.id,
            from: self.trader.key(),
            amount_p,
            payout,
            claim_minted,
        });

        self.pool.unlock();
        Ok(())
    }
}
