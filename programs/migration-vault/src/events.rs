use anchor_lang::prelude::*;

/// Emitted once per successful migration so indexers can reconstruct the
/// full deposit/withdraw history of a vault from transaction data alone.
#[event]
pub struct MigrateEvent {
    pub user: Pubkey,
    pub mint_from: Pubkey,
    pub mint_to: Pubkey,
    pub deposit_amount: u64,
    pub withdraw_amount: u64,
}
