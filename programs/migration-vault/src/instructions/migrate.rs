use anchor_lang::prelude::*;
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{transfer_checked, Mint, TokenAccount, TokenInterface, TransferChecked},
};

use crate::error::MigrationError;
use crate::events::MigrateEvent;
use crate::pda::VAULT_SEED;
use crate::state::Vault;

#[event_cpi]
#[derive(Accounts)]
pub struct Migrate<'info> {
    /// The depositor; also pays for their destination account if it is missing
    #[account(mut)]
    pub user: Signer<'info>,

    #[account(mint::token_program = token_program)]
    pub mint_from: InterfaceAccount<'info, Mint>,

    #[account(mint::token_program = token_program)]
    pub mint_to: InterfaceAccount<'info, Mint>,

    /// The record must sit at the address derivable from its own fields,
    /// so a caller cannot substitute an unrelated vault
    #[account(
        seeds = [VAULT_SEED, vault.admin.as_ref(), mint_from.key().as_ref(), mint_to.key().as_ref()],
        bump = vault.bump,
        has_one = mint_from,
        has_one = mint_to,
    )]
    pub vault: Account<'info, Vault>,

    #[account(
        mut,
        token::mint = mint_from,
        token::authority = user,
    )]
    pub user_from_account: InterfaceAccount<'info, TokenAccount>,

    /// Created on the fly the first time a user migrates into this mint
    #[account(
        init_if_needed,
        payer = user,
        associated_token::mint = mint_to,
        associated_token::authority = user,
        associated_token::token_program = token_program
    )]
    pub user_to_account: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        associated_token::mint = mint_from,
        associated_token::authority = vault,
        associated_token::token_program = token_program
    )]
    pub vault_from_account: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        associated_token::mint = mint_to,
        associated_token::authority = vault,
        associated_token::token_program = token_program
    )]
    pub vault_to_account: InterfaceAccount<'info, TokenAccount>,

    pub associated_token_program: Program<'info, AssociatedToken>,
    pub token_program: Interface<'info, TokenInterface>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Migrate>, amount: u64) -> Result<()> {
    require!(amount > 0, MigrationError::InvalidAmount);

    // Escrowed source tokens count as burned for rate purposes; the escrow
    // balance cannot exceed the mint supply
    let supply_from = ctx
        .accounts
        .mint_from
        .supply
        .saturating_sub(ctx.accounts.vault_from_account.amount);
    let supply_to = ctx.accounts.vault_to_account.amount;

    let withdraw_amount = ctx
        .accounts
        .vault
        .strategy
        .withdraw_amount(amount, supply_from, supply_to)?;

    // Deposit the source tokens into the vault escrow
    let transfer_accounts = TransferChecked {
        from: ctx.accounts.user_from_account.to_account_info(),
        mint: ctx.accounts.mint_from.to_account_info(),
        to: ctx.accounts.vault_from_account.to_account_info(),
        authority: ctx.accounts.user.to_account_info(),
    };

    let cpi_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        transfer_accounts,
    );

    transfer_checked(cpi_ctx, amount, ctx.accounts.mint_from.decimals)?;

    // Pay out of the destination escrow with the vault PDA signing; an
    // underfunded escrow fails here and reverts the deposit above with it
    let admin = ctx.accounts.vault.admin;
    let mint_from_key = ctx.accounts.mint_from.key();
    let mint_to_key = ctx.accounts.mint_to.key();
    let vault_bump = ctx.accounts.vault.bump;
    let vault_seeds = &[
        VAULT_SEED,
        admin.as_ref(),
        mint_from_key.as_ref(),
        mint_to_key.as_ref(),
        &[vault_bump],
    ];
    let signer_seeds = &[&vault_seeds[..]];

    let transfer_accounts = TransferChecked {
        from: ctx.accounts.vault_to_account.to_account_info(),
        mint: ctx.accounts.mint_to.to_account_info(),
        to: ctx.accounts.user_to_account.to_account_info(),
        authority: ctx.accounts.vault.to_account_info(),
    };

    let cpi_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        transfer_accounts,
        signer_seeds,
    );

    transfer_checked(cpi_ctx, withdraw_amount, ctx.accounts.mint_to.decimals)?;

    emit_cpi!(MigrateEvent {
        user: ctx.accounts.user.key(),
        mint_from: mint_from_key,
        mint_to: mint_to_key,
        deposit_amount: amount,
        withdraw_amount,
    });

    msg!("Migrated {} -> {}", amount, withdraw_amount);

    Ok(())
}
