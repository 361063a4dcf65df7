use anchor_lang::{prelude::Pubkey, pubkey};

/// The only identity allowed to create vaults. On non-mainnet clusters this
/// is a throwaway key whose secret is checked into the test harness.
#[cfg(not(feature = "mainnet"))]
pub const ADMIN: Pubkey = pubkey!("45MUiUVGa4qFaYVhaP8DorXQpgQdQPYi1JdTpHWM1ENq");

#[cfg(feature = "mainnet")]
pub const ADMIN: Pubkey = pubkey!("GUymMDAh1iHqiRwPXq6smUZMnJvGkZ4nm5WPetWVy4j5");
