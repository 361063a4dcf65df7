pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod pda;
pub mod state;

use anchor_lang::prelude::*;

pub use constants::*;
pub use instructions::*;
pub use state::*;

#[cfg(not(feature = "no-entrypoint"))]
use solana_security_txt::security_txt;

#[cfg(not(feature = "no-entrypoint"))]
security_txt! {
    name: "migration-vault",
    project_url: "https://github.com/migration-vault/migration-vault",
    contacts: "email:security@migration-vault.dev",
    source_code: "https://github.com/migration-vault/migration-vault",
    source_release: "v0.1.0",
    policy: "Please report vulnerabilities privately before public disclosure."
}

declare_id!("3S7X6mCHEAZVvqwNihKXvxz6a4Gb5ckbhCQKHBKCYQKe");

#[program]
pub mod migration_vault {
    use super::*;

    /// Creates the migration vault for a `(admin, mint_from, mint_to)` pair.
    /// Only the compiled-in admin can call this, and the destination escrow
    /// must already hold the tokens it will pay out.
    pub fn initialize(ctx: Context<Initialize>, strategy: Strategy) -> Result<()> {
        initialize::handler(ctx, strategy)
    }

    /// Swaps `amount` of the source token for destination tokens at the rate
    /// fixed by the vault's strategy. Permissionless.
    pub fn migrate(ctx: Context<Migrate>, amount: u64) -> Result<()> {
        migrate::handler(ctx, amount)
    }
}
