use anchor_lang::prelude::*;

use crate::state::Strategy;

#[account]
pub struct Vault {
    /// The operator that created this vault
    pub admin: Pubkey,
    /// The mint being migrated away from
    pub mint_from: Pubkey,
    /// The mint paid out by the vault
    pub mint_to: Pubkey,
    /// Exchange-rate policy for this pair
    pub strategy: Strategy,
    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl Vault {
    pub const LEN: usize = 8 + // discriminator
        32 + // admin
        32 + // mint_from
        32 + // mint_to
        2 + // strategy (tag + exponent)
        1; // bump
}
