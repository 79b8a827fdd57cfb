//! Share accounting, volatility proxy, and premium curve.
//!
//! ## Share math
//!
//! ```text
//! first deposit:  shares_out = amount_in
//! later deposits: shares_out = amount_in * total_shares / total_pool_balance
//! withdraw:       amount_out = shares_in * total_pool_balance / total_shares
//! ```
//!
//! `total_pool_balance` counts both the unutilized vault balance and the
//! underlying locked behind sold options, so providers keep their claim on
//! utilized capital.
//!
//! ## Volatility proxy
//!
//! ```text
//! vol_bps = max(1000, utilized * 10_000 / (utilized + unutilized))
//! ```
//!
//! A pure, monotonically non-decreasing function of the utilization ratio,
//! floored at 1000 bps. The stored pool value starts at 100 and holds that
//! resting value until the first operation refreshes it.
//!
//! ## Premium curve
//!
//! The premium per one whole token of strike notional, denominated in the
//! underlying, is intrinsic value (put payoff of the strike ratio against
//! the oracle spot) plus a time-decay extrinsic term scaled by the
//! volatility proxy. The curve is internal policy: callers only rely on it
//! being deterministic, monotone in volatility, and free of extrinsic value
//! at expiry.

use anchor_lang::prelude::*;

/// Basis points scale (10,000 bps = 100%)
pub const BPS_SCALE: u64 = 10_000;

/// Floor of the volatility proxy, basis points
pub const MIN_VOLATILITY_BPS: u64 = 1_000;

/// Seconds in the annualization window of the extrinsic term
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// Divisor of the sell-side haircut: payout = premium - premium / 5
pub const SELL_DISCOUNT_DIVISOR: u64 = 5;

/// Arithmetic failures inside the quoting functions
#[error_code]
pub enum MathError {
    #[msg("Arithmetic overflow")]
    Overflow,
    #[msg("Division by zero")]
    DivisionByZero,
    #[msg("Oracle spot price is unset")]
    StalePrice,
}

/// Integer square root via Newton's method, floor(sqrt(x))
pub fn sqrt(x: u128) -> u128 {
    if x == 0 {
        return 0;
    }
    let mut z = (x + 1) / 2;
    let mut y = x;
    while z < y {
        y = z;
        z = (x / z + z) / 2;
    }
    y
}

/// Shares minted for a deposit of `amount_in` underlying.
///
/// The first deposit seeds the pool one-to-one. Later deposits mint
/// proportionally against the total pool balance, truncated.
pub fn shares_for_deposit(
    amount_in: u64,
    total_shares: u64,
    total_pool_balance: u128,
) -> Result<u64> {
    if total_shares == 0 || total_pool_balance == 0 {
        return Ok(amount_in);
    }
    let shares = (amount_in as u128)
        .checked_mul(total_shares as u128)
        .ok_or(MathError::Overflow)?
        / total_pool_balance;
    u64::try_from(shares).map_err(|_| MathError::Overflow.into())
}

/// Underlying owed for burning `shares_in` pool shares, truncated.
pub fn underlying_for_shares(
    shares_in: u64,
    total_shares: u64,
    total_pool_balance: u128,
) -> Result<u64> {
    require!(total_shares > 0, MathError::DivisionByZero);
    let amount = (shares_in as u128)
        .checked_mul(total_pool_balance)
        .ok_or(MathError::Overflow)?
        / total_shares as u128;
    u64::try_from(amount).map_err(|_| MathError::Overflow.into())
}

/// Underlying locked per `amount_s` of strike notional: amount_s * base / price
pub fn underlying_for_strike(amount_s: u64, base: u64, price: u64) -> Result<u64> {
    require!(price > 0, MathError::DivisionByZero);
    let amount = (amount_s as u128)
        .checked_mul(base as u128)
        .ok_or(MathError::Overflow)?
        / price as u128;
    u64::try_from(amount).map_err(|_| MathError::Overflow.into())
}

/// Strike-asset equivalent of `amount_u` underlying: amount_u * price / base
pub fn strike_for_underlying(amount_u: u64, base: u64, price: u64) -> Result<u64> {
    require!(base > 0, MathError::DivisionByZero);
    let amount = (amount_u as u128)
        .checked_mul(price as u128)
        .ok_or(MathError::Overflow)?
        / base as u128;
    u64::try_from(amount).map_err(|_| MathError::Overflow.into())
}

/// Volatility proxy from the current utilization snapshot, basis points.
///
/// Monotonically non-decreasing in `utilized / (utilized + unutilized)`,
/// floored at [`MIN_VOLATILITY_BPS`]. An empty pool sits on the floor.
pub fn volatility_proxy(utilized: u64, unutilized: u64) -> u64 {
    let total = utilized as u128 + unutilized as u128;
    if total == 0 {
        return MIN_VOLATILITY_BPS;
    }
    let ratio_bps = (utilized as u128 * BPS_SCALE as u128 / total) as u64;
    ratio_bps.max(MIN_VOLATILITY_BPS)
}

/// Premium for one whole token (`unit`) of strike notional, denominated in
/// the underlying.
///
/// Intrinsic puts the strike ratio against the oracle spot; extrinsic decays
/// with the square root of remaining lifetime and scales linearly with the
/// volatility proxy. Capped at one whole underlying token per unit of
/// notional, which for series priced above base admits premiums beyond the
/// locked capital.
pub fn calculate_premium(
    spot_price: u64,
    unit: u64,
    volatility_bps: u64,
    base: u64,
    price: u64,
    expiry: u64,
    now: u64,
) -> Result<u64> {
    require!(spot_price > 0, MathError::StalePrice);
    require!(base > 0 && unit > 0, MathError::DivisionByZero);

    // Strike units received for one whole token of underlying at exercise
    let strike_value = (price as u128)
        .checked_mul(unit as u128)
        .ok_or(MathError::Overflow)?
        / base as u128;

    // Put payoff: strike value above spot, converted back to underlying
    let intrinsic_strike = strike_value.saturating_sub(spot_price as u128);
    let intrinsic = intrinsic_strike
        .checked_mul(unit as u128)
        .ok_or(MathError::Overflow)?
        / spot_price as u128;

    let remaining = expiry.saturating_sub(now);
    let extrinsic = (unit as u128)
        .checked_mul(volatility_bps as u128)
        .ok_or(MathError::Overflow)?
        .checked_mul(sqrt(remaining as u128))
        .ok_or(MathError::Overflow)?
        / (BPS_SCALE as u128 * sqrt(SECONDS_PER_YEAR as u128));

    let premium = intrinsic
        .checked_add(extrinsic)
        .ok_or(MathError::Overflow)?
        .min(unit as u128);
    Ok(premium as u64)
}

/// Scale a per-unit premium to a trade of `amount`, truncated.
pub fn scale_premium(premium_per_unit: u64, amount: u64, unit: u64) -> Result<u64> {
    require!(unit > 0, MathError::DivisionByZero);
    let total = (premium_per_unit as u128)
        .checked_mul(amount as u128)
        .ok_or(MathError::Overflow)?
        / unit as u128;
    u64::try_from(total).map_err(|_| MathError::Overflow.into())
}

/// Sell-side payout after the fixed haircut: premium - premium / 5
pub fn apply_sell_discount(premium: u64) -> u64 {
    premium - premium / SELL_DISCOUNT_DIVISOR
}

/// Split a withdrawal quote between the vault and the pool's redeem-claim
/// holdings.
///
/// The vault pays what it can; the shortfall is handed over as claim
/// tokens, capped at the pool's reserve. Returns `(paid, claim_out,
/// released)` where `released` is the underlying equivalent of the claims
/// actually transferred. That entitlement leaves the pool with the claims,
/// so the caller must release the same slice from its utilized counter or
/// later quotes overstate pool value.
pub fn withdraw_split(
    amount_out: u64,
    underlying_balance: u64,
    base: u64,
    price: u64,
    claim_reserve: u64,
) -> Result<(u64, u64, u64)> {
    let paid = amount_out.min(underlying_balance);
    let shortfall = amount_out - paid;
    if shortfall == 0 {
        return Ok((paid, 0, 0));
    }
    let claim_out = strike_for_underlying(shortfall, base, price)?.min(claim_reserve);
    let released = underlying_for_strike(claim_out, base, price)?;
    Ok((paid, claim_out, released))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const UNIT: u64 = 1_000_000_000;

    #[test]
    fn test_sqrt() {
        assert_eq!(sqrt(0), 0);
        assert_eq!(sqrt(1), 1);
        assert_eq!(sqrt(4), 2);
        assert_eq!(sqrt(10), 3); // floor
        assert_eq!(sqrt(1_000_000), 1_000);
    }

    #[test]
    fn first_deposit_mints_one_to_one() {
        // Empty pool, deposit(100): shares_out == 100
        let shares = shares_for_deposit(100, 0, 0).unwrap();
        assert_eq!(shares, 100);
    }

    #[test]
    fn later_deposits_mint_proportionally() {
        // total_shares=100, balance=100, deposit(50): 50 * 100 / 100 == 50
        let shares = shares_for_deposit(50, 100, 100).unwrap();
        assert_eq!(shares, 50);
    }

    #[test]
    fn dust_deposit_against_large_pool_mints_nothing() {
        let shares = shares_for_deposit(1, 100, 1_000_000).unwrap();
        assert_eq!(shares, 0);
    }

    #[test]
    fn deposit_then_withdraw_returns_within_one_unit() {
        // Proportionality idempotence at zero utilization
        let total_shares = 1_234_567u64;
        let balance = 777_777u128;
        for amount in [1_000u64, 333_333, 999_999] {
            let shares = shares_for_deposit(amount, total_shares, balance).unwrap();
            let back = underlying_for_shares(
                shares,
                total_shares + shares,
                balance + amount as u128,
            )
            .unwrap();
            assert!(back <= amount);
            assert!(amount - back <= 1);
        }
    }

    #[test]
    fn buy_sizing_truncates_toward_zero() {
        // base=1e9, price=300e9: amount_out = amount_s * 1e9 / 300e9
        let base = UNIT;
        let price = 300 * UNIT;
        assert_eq!(underlying_for_strike(300 * UNIT, base, price).unwrap(), UNIT);
        assert_eq!(underlying_for_strike(299, base, price).unwrap(), 0);
    }

    #[test]
    fn strike_conversion_round_trips_up_to_truncation() {
        let base = UNIT;
        let price = 300 * UNIT;
        let amount_u = 7 * UNIT + 13;
        let s = strike_for_underlying(amount_u, base, price).unwrap();
        let back = underlying_for_strike(s, base, price).unwrap();
        assert!(back <= amount_u);
    }

    #[test]
    fn volatility_floor_holds_at_rest() {
        assert_eq!(volatility_proxy(0, 0), MIN_VOLATILITY_BPS);
        assert_eq!(volatility_proxy(0, 1_000_000), MIN_VOLATILITY_BPS);
    }

    #[test]
    fn volatility_tracks_utilization() {
        // Half utilized: 5000 bps
        assert_eq!(volatility_proxy(500, 500), 5_000);
        // Fully utilized: 10000 bps
        assert_eq!(volatility_proxy(1_000, 0), BPS_SCALE);
    }

    #[test]
    fn premium_is_monotone_in_volatility() {
        let expiry = 1_700_000_000u64;
        let now = expiry - 86_400 * 30;
        let mut last = 0;
        for vol in [1_000u64, 2_000, 5_000, 10_000] {
            let p =
                calculate_premium(300 * UNIT, UNIT, vol, UNIT, 320 * UNIT, expiry, now).unwrap();
            assert!(p >= last);
            last = p;
        }
    }

    #[test]
    fn premium_has_no_extrinsic_value_at_expiry() {
        let expiry = 1_700_000_000u64;
        // Out of the money at expiry: worthless
        let otm =
            calculate_premium(300 * UNIT, UNIT, 5_000, UNIT, 250 * UNIT, expiry, expiry).unwrap();
        assert_eq!(otm, 0);
        // In the money at expiry: pure intrinsic, independent of volatility
        let itm_low =
            calculate_premium(300 * UNIT, UNIT, 1_000, UNIT, 330 * UNIT, expiry, expiry).unwrap();
        let itm_high =
            calculate_premium(300 * UNIT, UNIT, 9_000, UNIT, 330 * UNIT, expiry, expiry).unwrap();
        assert_eq!(itm_low, itm_high);
        assert_eq!(itm_low, UNIT / 10); // (330 - 300) / 300 of a unit
    }

    #[test]
    fn premium_rejects_unset_spot() {
        let err = calculate_premium(0, UNIT, 1_000, UNIT, 300 * UNIT, 1, 0);
        assert!(err.is_err());
    }

    #[test]
    fn sell_discount_is_one_fifth() {
        assert_eq!(apply_sell_discount(100), 80);
        assert_eq!(apply_sell_discount(5), 4);
        assert_eq!(apply_sell_discount(4), 4); // 4 / 5 truncates to 0
        assert_eq!(apply_sell_discount(0), 0);
    }

    #[test]
    fn premium_scales_linearly_with_trade_size() {
        let per_unit = 123_456_789u64;
        assert_eq!(scale_premium(per_unit, UNIT, UNIT).unwrap(), per_unit);
        assert_eq!(scale_premium(per_unit, 2 * UNIT, UNIT).unwrap(), 2 * per_unit);
        assert_eq!(scale_premium(per_unit, 0, UNIT).unwrap(), 0);
    }

    #[test]
    fn withdraw_split_pays_from_the_vault_when_it_can() {
        assert_eq!(withdraw_split(40, 50, UNIT, UNIT, 100).unwrap(), (40, 0, 0));
        assert_eq!(withdraw_split(50, 50, UNIT, UNIT, 100).unwrap(), (50, 0, 0));
    }

    #[test]
    fn withdraw_shortfall_hands_claims_and_releases_utilized() {
        // 150 shares over 50 unutilized + 100 utilized; burn 75 shares
        let amount_out = underlying_for_shares(75, 150, 150).unwrap();
        assert_eq!(amount_out, 75);
        let (paid, claim_out, released) =
            withdraw_split(amount_out, 50, UNIT, UNIT, 100).unwrap();
        assert_eq!((paid, claim_out, released), (50, 25, 25));

        // With the handed-over entitlement released, the remaining 75
        // shares quote exactly the remaining 75-worth of pool value
        let utilized = 100 - released;
        let remaining = underlying_for_shares(75, 150 - 75, utilized as u128).unwrap();
        assert_eq!(remaining, 75);
        // and a fresh 100-unit deposit mints shares at full value
        assert_eq!(shares_for_deposit(100, 75, utilized as u128).unwrap(), 100);
    }

    #[test]
    fn withdraw_shortfall_converts_through_the_series_price() {
        // base=1e9, price=300e9: 25 underlying short hands 7500 strike claims
        let (paid, claim_out, released) =
            withdraw_split(75, 50, UNIT, 300 * UNIT, u64::MAX).unwrap();
        assert_eq!((paid, claim_out, released), (50, 25 * 300, 25));
    }

    #[test]
    fn withdraw_shortfall_is_capped_by_the_claim_reserve() {
        let (paid, claim_out, released) =
            withdraw_split(75, 50, UNIT, UNIT, 10).unwrap();
        assert_eq!((paid, claim_out, released), (50, 10, 10));
    }

    proptest! {
        #[test]
        fn shares_never_exceed_pro_rata_value(
            amount in 1u64..1_000_000_000_000,
            total_shares in 1u64..1_000_000,
            balance in 1u128..1_000_000_000_000,
        ) {
            let shares = shares_for_deposit(amount, total_shares, balance).unwrap();
            // Truncation favors the pool: the minted shares are never worth
            // more than the deposit against the post-deposit pool.
            let value = underlying_for_shares(
                shares,
                total_shares + shares,
                balance + amount as u128,
            ).unwrap();
            prop_assert!(value <= amount);
        }

        #[test]
        fn volatility_is_monotone_in_utilization(
            utilized in 0u64..1_000_000_000_000,
            unutilized in 0u64..1_000_000_000_000,
            bump in 1u64..1_000_000,
        ) {
            // More utilization with the same total never lowers the proxy
            let total = utilized as u128 + unutilized as u128 + bump as u128;
            prop_assume!(total <= u64::MAX as u128);
            let lo = volatility_proxy(utilized, unutilized + bump);
            let hi = volatility_proxy(utilized + bump, unutilized);
            prop_assert!(hi >= lo);
            prop_assert!(lo >= MIN_VOLATILITY_BPS);
        }

        #[test]
        fn conversions_and_premium_never_panic(
            amount in 0u64..u64::MAX / 2,
            vol in 0u64..100_000,
            spot in 1u64..1_000_000_000_000,
            horizon in 0u64..10 * SECONDS_PER_YEAR,
        ) {
            let _ = underlying_for_strike(amount, UNIT, 300 * UNIT).unwrap();
            let p = calculate_premium(
                spot, UNIT, vol, UNIT, 300 * UNIT, horizon, 0,
            ).unwrap();
            // Policy cap: at most one underlying token per unit of notional
            prop_assert!(p <= UNIT);
        }

        #[test]
        fn withdraw_split_never_overpays(
            amount_out in 0u64..1_000_000_000_000,
            balance in 0u64..1_000_000_000_000,
            reserve in 0u64..1_000_000_000_000,
        ) {
            let (paid, claim_out, released) =
                withdraw_split(amount_out, balance, UNIT, 300 * UNIT, reserve).unwrap();
            prop_assert!(paid <= balance);
            prop_assert!(claim_out <= reserve);
            // The vault payout plus the released entitlement never exceed
            // the quoted withdrawal
            prop_assert!(paid as u128 + released as u128 <= amount_out as u128);
        }
    }
}
