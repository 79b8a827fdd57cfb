//! # Pricing Module
//!
//! Pure quoting functions for the option pool: share accounting, strike
//! ratio conversions, the utilization-based volatility proxy, and the
//! premium curve. Every function here is deterministic integer math over
//! the instantaneous pool snapshot, with no account or clock access, so the
//! whole financial state machine is quotable and testable off-chain.
//!
//! ## Numeric policy
//!
//! All division truncates toward zero. Share minting rounds down in the
//! pool's favor; trade sizing and premium scaling round down in the
//! caller's favor. Truncation is load-bearing for the conservation
//! invariants and must not be replaced with rounding division.

pub mod pricing;

pub use pricing::*;
