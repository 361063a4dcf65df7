use anchor_lang::prelude::*;
use anchor_spl::associated_token;

pub const VAULT_SEED: &[u8] = b"vault";
pub const EVENT_AUTHORITY_SEED: &[u8] = b"__event_authority";

/// Address of the vault record for a migration pair. One vault can exist per
/// `(admin, mint_from, mint_to)` triple; callers compute this locally, no
/// on-chain lookup involved.
pub fn find_vault_address(admin: &Pubkey, mint_from: &Pubkey, mint_to: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            VAULT_SEED,
            admin.as_ref(),
            mint_from.as_ref(),
            mint_to.as_ref(),
        ],
        &crate::ID,
    )
}

/// Address of a vault escrow: the vault's associated token account for `mint`.
pub fn find_escrow_address(vault: &Pubkey, mint: &Pubkey, token_program: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[vault.as_ref(), token_program.as_ref(), mint.as_ref()],
        &associated_token::ID,
    )
}

/// Address of the authority that co-signs the program's own event CPIs.
pub fn find_event_authority_address() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[EVENT_AUTHORITY_SEED], &crate::ID)
}
