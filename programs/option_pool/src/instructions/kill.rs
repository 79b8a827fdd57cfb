//! Kill Switch
//!
//! A manual circuit breaker on the pool, callable only by its controller.
//! Each call toggles between Active and Paused; while paused every
//! state-mutating operation fails and read-only queries stay available.

use anchor_lang::prelude::*;

use crate::errors::PoolError;
use crate::state::Pool;

/// Event emitted when the pause state flips
#[event]
pub struct PauseToggled {
    pub pool_id: u64,
    pub paused: bool,
}

/// Accounts for toggling the kill switch
#[derive(Accounts)]
pub struct Kill<'info> {
    /// Pool controller
    pub controller: Signer<'info>,

    /// The pool being paused or resumed
    #[account(
        mut,
        constraint = pool.controller == controller.key() @ PoolError::Unauthorized,
    )]
    pub pool: Account<'info, Pool>,
}

impl<'info> Kill<'info> {
    pub fn kill(&mut self) -> Result<()> {
        self.pool.lock()?;

        self.pool.paused = !self.pool.paused;

        msg!("Pool {} paused: {}", self.pool.id, self.pool.paused);
        emit!(PauseToggled {
            pool_id: self.pool.id,
            paused: self.pool.paused,
        });

        self.pool.unlock();
        Ok(())
    }
}
