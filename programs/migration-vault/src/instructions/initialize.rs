use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{Mint, TokenAccount, TokenInterface},
};

use crate::constants::ADMIN;
use crate::error::MigrationError;
use crate::pda::VAULT_SEED;
use crate::state::{Strategy, Vault};

#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Vault creation is reserved for the compiled-in operator identity
    #[account(mut, address = ADMIN @ MigrationError::UnauthorizedAdmin)]
    pub admin: Signer<'info>,

    /// The mint users will migrate away from
    #[account(mint::token_program = token_program)]
    pub mint_from: InterfaceAccount<'info, Mint>,

    /// The mint the vault pays out
    #[account(mint::token_program = token_program)]
    pub mint_to: InterfaceAccount<'info, Mint>,

    /// One vault per (admin, mint_from, mint_to); a second initialize for the
    /// same triple fails here when the address is already in use
    #[account(
        init,
        payer = admin,
        space = Vault::LEN,
        seeds = [VAULT_SEED, admin.key().as_ref(), mint_from.key().as_ref(), mint_to.key().as_ref()],
        bump
    )]
    pub vault: Account<'info, Vault>,

    /// Escrow that accumulates deposited source tokens
    #[account(
        init_if_needed,
        payer = admin,
        associated_token::mint = mint_from,
        associated_token::authority = vault,
        associated_token::token_program = token_program
    )]
    pub vault_from_account: InterfaceAccount<'info, TokenAccount>,

    /// Escrow the vault pays out of; must be funded before the vault exists,
    /// otherwise it could accept deposits it can never honor
    #[account(
        init_if_needed,
        payer = admin,
        associated_token::mint = mint_to,
        associated_token::authority = vault,
        associated_token::token_program = token_program,
        constraint = vault_to_account.amount > 0 @ MigrationError::EscrowNotFunded
    )]
    pub vault_to_account: InterfaceAccount<'info, TokenAccount>,

    pub associated_token_program: Program<'info, AssociatedToken>,
    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Initialize>, strategy: Strategy) -> Result<()> {
    strategy.validate()?;

    let vault = &mut ctx.accounts.vault;
    vault.admin = ctx.accounts.admin.key();
    vault.mint_from = ctx.accounts.mint_from.key();
    vault.mint_to = ctx.accounts.mint_to.key();
    vault.strategy = strategy;
    vault.bump = ctx.bumps.vault;

    msg!("Vault initialized: {}", vault.key());
    msg!("Mint from: {}", vault.mint_from);
    msg!("Mint to: {}", vault.mint_to);
    msg!(
        "Destination escrow funded with: {}",
        ctx.accounts.vault_to_account.amount
    );

    Ok(())
}
