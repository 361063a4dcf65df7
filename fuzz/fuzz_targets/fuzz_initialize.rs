use arbitrary::Arbitrary;
use fuzz_helpers::*;
use honggfuzz::fuzz;
use migration_vault::state::Strategy;

/// Fuzzable input for the initialize instruction
#[derive(Debug, Clone, Arbitrary)]
struct InitializeFuzzInput {
    /// Destination tokens pre-funded into the escrow (0 must be rejected)
    escrow_funding: u64,
    decimals: u8,
    /// Unconstrained exponent; out-of-range values must be rejected cleanly
    fixed_exponent: i8,
    use_pro_rata: bool,
    /// Attempt a second initialize for the same pair
    duplicate: bool,
}

async fn fuzz_initialize_once(input: InitializeFuzzInput) -> Result<(), Box<dyn std::error::Error>> {
    let decimals = input.decimals % 10;
    let strategy = if input.use_pro_rata {
        Strategy::ProRata
    } else {
        Strategy::Fixed {
            e: input.fixed_exponent,
        }
    };

    let mut env = setup_program_test().await;

    let mint_from = setup_mint(&mut env.context, decimals).await?;
    let mint_to = setup_mint(&mut env.context, decimals).await?;

    let result = setup_vault(
        &mut env.context,
        &mint_from,
        &mint_to,
        strategy,
        input.escrow_funding,
    )
    .await;

    let exponent_usable = strategy.validate().is_ok();

    match result {
        Ok(vault) => {
            assert!(input.escrow_funding > 0, "unfunded escrow was accepted");
            assert!(exponent_usable, "unusable exponent was accepted");

            let state = get_vault_state(&mut env.context, &vault.vault).await?;
            assert_eq!(state.mint_from, mint_from.mint);
            assert_eq!(state.mint_to, mint_to.mint);
            assert_eq!(state.strategy, strategy);

            if input.duplicate {
                // Same triple, same or different strategy: the address collides
                refresh_blockhash(&mut env.context).await?;
                let admin = admin_keypair();
                let second = initialize_vault(
                    &mut env.context,
                    &admin,
                    &mint_from.mint,
                    &mint_to.mint,
                    Strategy::ProRata,
                )
                .await;
                assert!(second.is_err(), "duplicate vault was created");
            }
        }
        Err(_) => {
            assert!(
                input.escrow_funding == 0 || !exponent_usable,
                "a fundable vault failed to initialize"
            );
        }
    }

    Ok(())
}

fn main() {
    loop {
        fuzz!(|input: InitializeFuzzInput| {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("tokio runtime");

            rt.block_on(async {
                if let Err(e) = fuzz_initialize_once(input).await {
                    eprintln!("Setup failed: {e}");
                }
            });
        });
    }
}
