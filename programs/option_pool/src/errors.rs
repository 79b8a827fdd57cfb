//! Operation error taxonomy
//!
//! Every error aborts the whole instruction; the runtime reverts all account
//! mutations, so there is never a partial-success path.

use anchor_lang::prelude::*;

#[error_code]
pub enum PoolError {
    #[msg("Caller lacks funds, shares, or tokens for the requested amount")]
    InsufficientBalance,
    #[msg("Deposit below the minimum liquidity floor")]
    BelowMinimumLiquidity,
    #[msg("Deposit too small against the existing pool to mint any shares")]
    ZeroLiquidity,
    #[msg("Pool is paused")]
    Paused,
    #[msg("A positive amount is required")]
    ZeroAmount,
    #[msg("Native deposits require the wrapped native mint as underlying")]
    UnsupportedAsset,
    #[msg("Caller is not authorized for this operation")]
    Unauthorized,
    #[msg("Nested operation attempted while the pool guard is held")]
    ReentrancyRejected,
    #[msg("Option series expiry is in the past")]
    SeriesExpired,
    #[msg("Option series base and price must be nonzero")]
    InvalidSeries,
}
