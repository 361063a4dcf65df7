#![no_main]

use arbitrary::Arbitrary;
use fuzz_helpers::*;
use libfuzzer_sys::fuzz_target;
use migration_vault::state::Strategy;

/// Fuzzable input for the migrate instruction
#[derive(Debug, Clone, Arbitrary)]
struct MigrateFuzzInput {
    /// Amount to migrate (fuzzed)
    amount: u64,
    /// Source tokens minted to the user before migrating
    user_balance: u64,
    /// Destination tokens pre-funded into the escrow
    escrow_funding: u64,
    /// Token decimals (for setup)
    decimals: u8,
    /// Raw exponent for the Fixed strategy
    fixed_exponent: i8,
    /// Pick ProRata instead of Fixed
    use_pro_rata: bool,
    /// Run a second migration against the same vault
    repeat: bool,
}

/// Execute a single fuzz iteration for the migrate instruction
async fn fuzz_migrate_once(input: MigrateFuzzInput) -> Result<(), Box<dyn std::error::Error>> {
    // Constrain inputs to ranges where setup itself cannot fail
    let amount = input.amount.max(1);
    let user_balance = input.user_balance.saturating_add(amount);
    let escrow_funding = input.escrow_funding.max(1);
    let decimals = input.decimals % 10;

    let strategy = if input.use_pro_rata {
        Strategy::ProRata
    } else {
        // Small exponents keep both directions reachable
        Strategy::Fixed {
            e: input.fixed_exponent % 4,
        }
    };

    let mut env = setup_program_test().await;

    let mint_from = setup_mint(&mut env.context, decimals).await?;
    let mint_to = setup_mint(&mut env.context, decimals).await?;
    let vault = setup_vault(
        &mut env.context,
        &mint_from,
        &mint_to,
        strategy,
        escrow_funding,
    )
    .await?;
    let user = setup_user(&mut env.context, &mint_from, &mint_to, user_balance).await?;

    let rounds = if input.repeat { 2 } else { 1 };
    for round in 0..rounds {
        if round > 0 {
            refresh_blockhash(&mut env.context).await?;
        }

        let user_from_before = get_token_balance(&mut env.context, &user.from_account).await?;
        let user_to_before = get_token_balance(&mut env.context, &user.to_account).await?;
        let vault_from_before =
            get_token_balance(&mut env.context, &vault.vault_from_account).await?;
        let vault_to_before = get_token_balance(&mut env.context, &vault.vault_to_account).await?;
        let mint_supply = get_mint_supply(&mut env.context, &vault.mint_from).await?;

        let result = migrate(&mut env.context, &vault, &user, amount).await;

        let user_from_after = get_token_balance(&mut env.context, &user.from_account).await?;
        let user_to_after = get_token_balance(&mut env.context, &user.to_account).await?;
        let vault_from_after =
            get_token_balance(&mut env.context, &vault.vault_from_account).await?;
        let vault_to_after = get_token_balance(&mut env.context, &vault.vault_to_account).await?;

        match result {
            Ok(_) => {
                // Re-derive the quote the program must have used
                let supply_from = mint_supply.saturating_sub(vault_from_before);
                let expected = strategy
                    .withdraw_amount(amount, supply_from, vault_to_before)
                    .expect("successful migration implies a computable quote");

                assert_eq!(
                    user_from_after,
                    user_from_before - amount,
                    "round {round}: deposit not taken in full"
                );
                assert_eq!(
                    vault_from_after,
                    vault_from_before + amount,
                    "round {round}: escrow missed the deposit"
                );
                assert_eq!(
                    user_to_after,
                    user_to_before + expected,
                    "round {round}: payout does not match the strategy quote"
                );
                assert_eq!(
                    vault_to_after,
                    vault_to_before - expected,
                    "round {round}: escrow paid a different amount than the user received"
                );
            }
            Err(_) => {
                // A rejected migration must leave every balance untouched
                assert_eq!(user_from_after, user_from_before, "failed round {round} moved user funds");
                assert_eq!(user_to_after, user_to_before, "failed round {round} paid the user");
                assert_eq!(
                    vault_from_after, vault_from_before,
                    "failed round {round} kept a partial deposit"
                );
                assert_eq!(
                    vault_to_after, vault_to_before,
                    "failed round {round} drained the escrow"
                );
            }
        }
    }

    Ok(())
}

fuzz_target!(|input: MigrateFuzzInput| {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");

    rt.block_on(async {
        if let Err(e) = fuzz_migrate_once(input).await {
            eprintln!("Setup failed: {e}");
        }
    });
});
