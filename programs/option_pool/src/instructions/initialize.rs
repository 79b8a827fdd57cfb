//! Protocol Initialization
//!
//! Sets up the global configuration. Called once during deployment.

use anchor_lang::prelude::*;

use crate::state::Config;

/// Accounts required for protocol initialization
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Protocol administrator (becomes the admin)
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Global configuration account (created)
    #[account(
        init,
        payer = admin,
        space = 8 + Config::INIT_SPACE,
        seeds = [Config::SEED],
        bump,
    )]
    pub config: Account<'info, Config>,

    /// System program
    pub system_program: Program<'info, System>,
}

impl<'info> Initialize<'info> {
    /// Initialize the protocol configuration
    pub fn initialize(&mut self, min_liquidity: u64, bumps: InitializeBumps) -> Result<()> {
        self.config.set_inner(Config {
            admin: self.admin.key(),
            pool_count: 0,
            min_liquidity,
            bump: bumps.config,
        });

        msg!("Protocol initialized");
        msg!("Admin: {}", self.admin.key());
        msg!("Minimum liquidity: {}", min_liquidity);

        Ok(())
    }
}
