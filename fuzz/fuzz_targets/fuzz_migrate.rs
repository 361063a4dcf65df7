use arbitrary::Arbitrary;
use fuzz_helpers::*;
use honggfuzz::fuzz;
use migration_vault::state::Strategy;

/// Fuzzable input for the migrate instruction
#[derive(Debug, Clone, Arbitrary)]
struct MigrateFuzzInput {
    amount: u64,
    user_balance: u64,
    escrow_funding: u64,
    decimals: u8,
    fixed_exponent: i8,
    use_pro_rata: bool,
}

async fn fuzz_migrate_once(input: MigrateFuzzInput) -> Result<(), Box<dyn std::error::Error>> {
    let amount = input.amount.max(1);
    let user_balance = input.user_balance.saturating_add(amount);
    let escrow_funding = input.escrow_funding.max(1);
    let decimals = input.decimals % 10;

    let strategy = if input.use_pro_rata {
        Strategy::ProRata
    } else {
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

    let user_from_before = get_token_balance(&mut env.context, &user.from_account).await?;
    let vault_to_before = get_token_balance(&mut env.context, &vault.vault_to_account).await?;

    let result = migrate(&mut env.context, &vault, &user, amount).await;

    let user_from_after = get_token_balance(&mut env.context, &user.from_account).await?;
    let vault_to_after = get_token_balance(&mut env.context, &vault.vault_to_account).await?;

    match result {
        Ok(_) => {
            assert_eq!(user_from_after, user_from_before - amount);
            assert!(vault_to_after <= vault_to_before);
        }
        Err(_) => {
            // All-or-nothing: a rejected migration moves no funds
            assert_eq!(user_from_after, user_from_before);
            assert_eq!(vault_to_after, vault_to_before);
        }
    }

    Ok(())
}

fn main() {
    loop {
        fuzz!(|input: MigrateFuzzInput| {
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
    }
}
