use anchor_lang::AccountDeserialize;
use anchor_lang::InstructionData;
use anchor_lang::ToAccountMetas;
use migration_vault::pda;
use migration_vault::state::{Strategy, Vault};
use solana_program_test::*;
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::Transaction,
};
use spl_associated_token_account::get_associated_token_address;
use spl_associated_token_account::instruction as ata_instruction;
use spl_token::instruction as token_instruction;

// Re-export for convenience
pub use solana_program_test::ProgramTestContext;

// Custom error type for fuzzing
pub type FuzzResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Secret half of the non-mainnet `ADMIN` constant, checked in so the
/// harness can sign `initialize` transactions.
pub const ADMIN_KEYPAIR_BYTES: [u8; 64] = [
    68, 118, 27, 196, 181, 199, 58, 254, 237, 72, 16, 250, 218, 67, 16, 189, 24, 149, 196, 74, 0,
    119, 249, 115, 23, 201, 31, 200, 71, 222, 48, 210, 45, 176, 137, 211, 231, 67, 187, 37, 14,
    38, 158, 192, 226, 80, 101, 159, 71, 251, 213, 2, 238, 131, 46, 221, 179, 201, 27, 187, 141,
    117, 79, 166,
];

pub fn admin_keypair() -> Keypair {
    Keypair::from_bytes(&ADMIN_KEYPAIR_BYTES).expect("embedded admin keypair is valid")
}

/// Test environment with program loaded
pub struct FuzzTestEnv {
    pub program_id: Pubkey,
    pub context: ProgramTestContext,
}

/// A freshly created SPL mint and its mint authority
pub struct MintAccounts {
    pub mint: Pubkey,
    pub mint_authority: Keypair,
    pub decimals: u8,
}

/// Vault-side accounts for one migration pair
#[derive(Debug, Clone)]
pub struct VaultAccounts {
    pub vault: Pubkey,
    pub vault_from_account: Pubkey,
    pub vault_to_account: Pubkey,
    pub mint_from: Pubkey,
    pub mint_to: Pubkey,
}

/// User-side accounts for interacting with a vault
pub struct UserAccounts {
    pub owner: Keypair,
    pub from_account: Pubkey,
    pub to_account: Pubkey,
}

// ============================================================================
// Core Setup Functions
// ============================================================================

/// Creates the basic program test environment with the migration program
pub async fn setup_program_test() -> FuzzTestEnv {
    let program_id = migration_vault::id();
    let program_test = ProgramTest::new("migration_vault", program_id, None);

    let context = program_test.start_with_context().await;

    FuzzTestEnv {
        program_id,
        context,
    }
}

/// Advances to a fresh blockhash so an identical instruction can be sent
/// again without colliding with the previous signature
pub async fn refresh_blockhash(context: &mut ProgramTestContext) -> FuzzResult<()> {
    context.last_blockhash = context.get_new_latest_blockhash().await?;
    Ok(())
}

/// Transfers lamports from the context payer so `recipient` can pay fees/rent
pub async fn fund_account(
    context: &mut ProgramTestContext,
    recipient: &Pubkey,
    lamports: u64,
) -> FuzzResult<()> {
    let ix = solana_sdk::system_instruction::transfer(&context.payer.pubkey(), recipient, lamports);

    let tx = Transaction::new_signed_with_payer(
        &[ix],
        Some(&context.payer.pubkey()),
        &[&context.payer],
        context.last_blockhash,
    );

    context.banks_client.process_transaction(tx).await?;

    Ok(())
}

/// Creates a new SPL token mint
pub async fn setup_mint(context: &mut ProgramTestContext, decimals: u8) -> FuzzResult<MintAccounts> {
    let mint_authority = Keypair::new();
    let mint_keypair = Keypair::new();
    let mint = mint_keypair.pubkey();

    let rent = context.banks_client.get_rent().await?;
    let mint_len = 82; // Size of Mint account in SPL Token program
    let mint_rent = rent.minimum_balance(mint_len);

    let create_account_ix = solana_sdk::system_instruction::create_account(
        &context.payer.pubkey(),
        &mint,
        mint_rent,
        mint_len as u64,
        &spl_token::id(),
    );

    let init_mint_ix = token_instruction::initialize_mint(
        &spl_token::id(),
        &mint,
        &mint_authority.pubkey(),
        None,
        decimals,
    )?;

    let tx = Transaction::new_signed_with_payer(
        &[create_account_ix, init_mint_ix],
        Some(&context.payer.pubkey()),
        &[&context.payer, &mint_keypair],
        context.last_blockhash,
    );

    context.banks_client.process_transaction(tx).await?;

    Ok(MintAccounts {
        mint,
        mint_authority,
        decimals,
    })
}

/// Creates the associated token account for `wallet`/`mint`
pub async fn create_ata(
    context: &mut ProgramTestContext,
    wallet: &Pubkey,
    mint: &Pubkey,
) -> FuzzResult<Pubkey> {
    let ix = ata_instruction::create_associated_token_account(
        &context.payer.pubkey(),
        wallet,
        mint,
        &spl_token::id(),
    );

    let tx = Transaction::new_signed_with_payer(
        &[ix],
        Some(&context.payer.pubkey()),
        &[&context.payer],
        context.last_blockhash,
    );

    context.banks_client.process_transaction(tx).await?;

    Ok(get_associated_token_address(wallet, mint))
}

/// Mints tokens to an existing token account
pub async fn mint_tokens(
    context: &mut ProgramTestContext,
    mint: &Pubkey,
    mint_authority: &Keypair,
    destination: &Pubkey,
    amount: u64,
) -> FuzzResult<()> {
    let mint_to_ix = token_instruction::mint_to(
        &spl_token::id(),
        mint,
        destination,
        &mint_authority.pubkey(),
        &[],
        amount,
    )?;

    let tx = Transaction::new_signed_with_payer(
        &[mint_to_ix],
        Some(&context.payer.pubkey()),
        &[&context.payer, mint_authority],
        context.last_blockhash,
    );

    context.banks_client.process_transaction(tx).await?;

    Ok(())
}

/// Pre-funds the destination escrow and initializes the vault for a pair.
///
/// Mirrors operator setup: the escrow ATA is created and funded first, then
/// the admin signs `initialize`.
pub async fn setup_vault(
    context: &mut ProgramTestContext,
    mint_from: &MintAccounts,
    mint_to: &MintAccounts,
    strategy: Strategy,
    escrow_funding: u64,
) -> FuzzResult<VaultAccounts> {
    let admin = admin_keypair();
    fund_account(context, &admin.pubkey(), 1_000_000_000).await?;

    let (vault, _) = pda::find_vault_address(&admin.pubkey(), &mint_from.mint, &mint_to.mint);
    let vault_from_account = get_associated_token_address(&vault, &mint_from.mint);
    let vault_to_account = get_associated_token_address(&vault, &mint_to.mint);

    if escrow_funding > 0 {
        create_ata(context, &vault, &mint_to.mint).await?;
        mint_tokens(
            context,
            &mint_to.mint,
            &mint_to.mint_authority,
            &vault_to_account,
            escrow_funding,
        )
        .await?;
    }

    initialize_vault(context, &admin, &mint_from.mint, &mint_to.mint, strategy).await?;

    Ok(VaultAccounts {
        vault,
        vault_from_account,
        vault_to_account,
        mint_from: mint_from.mint,
        mint_to: mint_to.mint,
    })
}

/// Sends a bare `initialize` transaction signed by `admin`
pub async fn initialize_vault(
    context: &mut ProgramTestContext,
    admin: &Keypair,
    mint_from: &Pubkey,
    mint_to: &Pubkey,
    strategy: Strategy,
) -> FuzzResult<()> {
    let (vault, _) = pda::find_vault_address(&admin.pubkey(), mint_from, mint_to);

    let accounts = migration_vault::accounts::Initialize {
        admin: admin.pubkey(),
        mint_from: *mint_from,
        mint_to: *mint_to,
        vault,
        vault_from_account: get_associated_token_address(&vault, mint_from),
        vault_to_account: get_associated_token_address(&vault, mint_to),
        associated_token_program: anchor_spl::associated_token::ID,
        token_program: spl_token::id(),
        system_program: solana_sdk::system_program::ID,
    };

    let data = migration_vault::instruction::Initialize { strategy }.data();

    let ix = Instruction {
        program_id: migration_vault::id(),
        accounts: accounts.to_account_metas(None),
        data,
    };

    let tx = Transaction::new_signed_with_payer(
        &[ix],
        Some(&admin.pubkey()),
        &[admin],
        context.last_blockhash,
    );

    context.banks_client.process_transaction(tx).await?;

    Ok(())
}

/// Creates a user holding `initial_balance` of the source token
pub async fn setup_user(
    context: &mut ProgramTestContext,
    mint_from: &MintAccounts,
    mint_to: &MintAccounts,
    initial_balance: u64,
) -> FuzzResult<UserAccounts> {
    let owner = Keypair::new();
    fund_account(context, &owner.pubkey(), 1_000_000_000).await?;

    let from_account = create_ata(context, &owner.pubkey(), &mint_from.mint).await?;
    if initial_balance > 0 {
        mint_tokens(
            context,
            &mint_from.mint,
            &mint_from.mint_authority,
            &from_account,
            initial_balance,
        )
        .await?;
    }

    // Not created here: migrate is expected to create it on first use
    let to_account = get_associated_token_address(&owner.pubkey(), &mint_to.mint);

    Ok(UserAccounts {
        owner,
        from_account,
        to_account,
    })
}

/// Sends a `migrate` transaction signed by the user
pub async fn migrate(
    context: &mut ProgramTestContext,
    vault: &VaultAccounts,
    user: &UserAccounts,
    amount: u64,
) -> FuzzResult<()> {
    let (event_authority, _) = pda::find_event_authority_address();

    let accounts = migration_vault::accounts::Migrate {
        user: user.owner.pubkey(),
        mint_from: vault.mint_from,
        mint_to: vault.mint_to,
        vault: vault.vault,
        user_from_account: user.from_account,
        user_to_account: user.to_account,
        vault_from_account: vault.vault_from_account,
        vault_to_account: vault.vault_to_account,
        associated_token_program: anchor_spl::associated_token::ID,
        token_program: spl_token::id(),
        system_program: solana_sdk::system_program::ID,
        event_authority,
        program: migration_vault::id(),
    };

    let data = migration_vault::instruction::Migrate { amount }.data();

    let ix = Instruction {
        program_id: migration_vault::id(),
        accounts: accounts.to_account_metas(None),
        data,
    };

    let tx = Transaction::new_signed_with_payer(
        &[ix],
        Some(&user.owner.pubkey()),
        &[&user.owner],
        context.last_blockhash,
    );

    context.banks_client.process_transaction(tx).await?;

    Ok(())
}

// ============================================================================
// Account State Verification Helpers
// ============================================================================

/// Fetch and return vault state
pub async fn get_vault_state(
    context: &mut ProgramTestContext,
    vault: &Pubkey,
) -> FuzzResult<Vault> {
    let account = context
        .banks_client
        .get_account(*vault)
        .await?
        .ok_or("Vault account not found")?;

    let vault_data = Vault::try_deserialize(&mut account.data.as_ref())?;
    Ok(vault_data)
}

/// Get token account balance (0 if the account does not exist yet)
pub async fn get_token_balance(
    context: &mut ProgramTestContext,
    account: &Pubkey,
) -> FuzzResult<u64> {
    let account_data = match context.banks_client.get_account(*account).await? {
        Some(account_data) => account_data,
        None => return Ok(0),
    };

    // Token account structure: amount is at offset 64 (u64)
    if account_data.data.len() < 72 {
        return Err("Invalid token account data".into());
    }

    let amount = u64::from_le_bytes(
        account_data.data[64..72]
            .try_into()
            .map_err(|_| "Failed to parse amount")?,
    );

    Ok(amount)
}

/// Get mint supply
pub async fn get_mint_supply(context: &mut ProgramTestContext, mint: &Pubkey) -> FuzzResult<u64> {
    let account = context
        .banks_client
        .get_account(*mint)
        .await?
        .ok_or("Mint account not found")?;

    // Mint account structure: supply is at offset 36 (u64)
    if account.data.len() < 44 {
        return Err("Invalid mint account data".into());
    }

    let supply = u64::from_le_bytes(
        account.data[36..44]
            .try_into()
            .map_err(|_| "Failed to parse supply")?,
    );

    Ok(supply)
}
