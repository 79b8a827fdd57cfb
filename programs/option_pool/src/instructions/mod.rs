//! Instruction handlers for the option pool protocol
//!
//! Each instruction is a single atomic transition on one pool:
//! - `initialize` - set up the protocol (admin only, once)
//! - `create_pool_*` - three-step pool creation (permissionless)
//! - `deposit` / `deposit_native` / `withdraw` - liquidity ledger
//! - `buy` / `sell` - option trading against the pool
//! - `kill` - controller-only pause toggle
//! - `create_oracle` / `set_spot_price` - premium feed maintenance

pub mod create_pool;
pub mod deposit;
pub mod initialize;
pub mod kill;
pub mod oracle;
pub mod trade;
pub mod withdraw;

pub use create_pool::*;
pub use deposit::*;
pub use initialize::*;
pub use kill::*;
pub use oracle::*;
pub use trade::*;
pub use withdraw::*;
