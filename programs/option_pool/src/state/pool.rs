//! Option Pool State
//!
//! Each pool holds a single underlying asset as liquidity and writes one
//! option series against it. Liquidity providers receive pool-share tokens;
//! traders buy and sell the series' option tokens against the pool's
//! underlying balance.

use anchor_lang::prelude::*;

use crate::amm::volatility_proxy;
use crate::errors::PoolError;

/// One pool per (underlying, option series, oracle) tuple
///
/// Seeds: ["pool", pool_id.to_le_bytes()]
#[account]
#[derive(InitSpace)]
pub struct Pool {
    /// Unique pool identifier
    pub id: u64,

    /// Pool controller, the only signer allowed to toggle the kill switch
    pub controller: Pubkey,

    /// Premium oracle feed this pool prices against
    pub oracle: Pubkey,

    /// Underlying asset mint (pooled liquidity)
    pub underlying_mint: Pubkey,

    /// Strike asset mint (sizes buy/sell amounts, paid at exercise)
    pub strike_mint: Pubkey,

    /// Pool-share token mint
    pub share_mint: Pubkey,

    /// Option token mint for this series
    pub option_mint: Pubkey,

    /// Redeem-claim token mint (pool's entitlement to exercise proceeds)
    pub claim_mint: Pubkey,

    /// Vault holding unutilized underlying (token account, pool authority)
    pub vault: Pubkey,

    /// Escrow holding underlying locked behind minted options
    pub escrow: Pubkey,

    /// Pool's redeem-claim token account
    pub claim_reserve: Pubkey,

    /// Strike ratio numerator: underlying units per contract
    pub base: u64,

    /// Strike ratio denominator: strike units per contract
    pub price: u64,

    /// Unix timestamp at which the series expires
    pub expiry: u64,

    /// One whole token of the underlying (10^decimals)
    pub unit: u64,

    /// Unutilized underlying held by the vault
    pub underlying_balance: u64,

    /// Underlying locked against outstanding sold options
    pub utilized: u64,

    /// Outstanding pool-share supply (mirrors share_mint.supply)
    pub total_shares: u64,

    /// Last computed volatility proxy, basis points
    pub volatility: u64,

    /// Manual circuit breaker, toggled by kill()
    pub paused: bool,

    /// Exclusive-access guard held for the duration of each operation
    pub locked: bool,

    /// PDA bump seed
    pub bump: u8,
}

impl Pool {
    pub const SEED: &'static [u8] = b"pool";

    /// Volatility stored at creation, before any activity
    pub const INITIAL_VOLATILITY_BPS: u64 = 100;

    /// Acquire the pool's exclusive-access guard
    pub fn lock(&mut self) -> Result<()> {
        require!(!self.locked, PoolError::ReentrancyRejected);
        self.locked = true;
        Ok(())
    }

    /// Release the guard at the end of an operation
    pub fn unlock(&mut self) {
        self.locked = false;
    }

    /// Fail with Paused while the kill switch is engaged
    pub fn require_active(&self) -> Result<()> {
        require!(!self.paused, PoolError::Paused);
        Ok(())
    }

    /// Unutilized plus utilized underlying
    pub fn total_pool_balance(&self) -> u128 {
        self.underlying_balance as u128 + self.utilized as u128
    }

    /// Recompute the volatility proxy from the current utilization
    /// snapshot and persist it
    pub fn refresh_volatility(&mut self) -> u64 {
        self.volatility = volatility_proxy(self.utilized, self.underlying_balance);
        self.volatility
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_pool() -> Pool {
        Pool {
            id: 0,
            controller: Pubkey::default(),
            oracle: Pubkey::default(),
            underlying_mint: Pubkey::default(),
            strike_mint: Pubkey::default(),
            share_mint: Pubkey::default(),
            option_mint: Pubkey::default(),
            claim_mint: Pubkey::default(),
            vault: Pubkey::default(),
            escrow: Pubkey::default(),
            claim_reserve: Pubkey::default(),
            base: 1,
            price: 1,
            expiry: 0,
            unit: 1_000_000_000,
            underlying_balance: 0,
            utilized: 0,
            total_shares: 0,
            volatility: Pool::INITIAL_VOLATILITY_BPS,
            paused: false,
            locked: false,
            bump: 255,
        }
    }

    #[test]
    fn guard_rejects_nested_entry() {
        let mut pool = blank_pool();
        pool.lock().unwrap();
        assert!(pool.lock().is_err());
        pool.unlock();
        assert!(pool.lock().is_ok());
    }

    #[test]
    fn kill_switch_gates_operations() {
        let mut pool = blank_pool();
        assert!(pool.require_active().is_ok());
        pool.paused = true;
        assert!(pool.require_active().is_err());
        pool.paused = false;
        assert!(pool.require_active().is_ok());
    }

    #[test]
    fn volatility_rests_at_initial_value_until_refreshed() {
        let mut pool = blank_pool();
        assert_eq!(pool.volatility, 100);
        pool.underlying_balance = 1_000;
        assert_eq!(pool.refresh_volatility(), 1_000);
    }
}
