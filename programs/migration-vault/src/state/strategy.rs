use anchor_lang::prelude::*;

use crate::error::MigrationError;

/// Exchange-rate policy for a migration pair.
///
/// `ProRata` prices a deposit against the live circulating supplies of both
/// tokens. `Fixed { e }` scales a deposit by `10^e`, which covers plain
/// decimal redenominations (9-decimal token to 6-decimal token is `e = -3`).
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Strategy {
    ProRata,
    Fixed { e: i8 },
}

impl Strategy {
    /// Rejects strategies that could never produce a withdrawal, so an
    /// unusable vault cannot be created in the first place.
    pub fn validate(&self) -> Result<()> {
        match self {
            Strategy::ProRata => Ok(()),
            Strategy::Fixed { e } => pow10(*e).map(|_| ()),
        }
    }

    /// Amount of the destination token owed for `amount` of the source token.
    ///
    /// `supply_from` and `supply_to` are read live by the caller at migration
    /// time; only `ProRata` consults them. Division truncates toward zero and
    /// the remainder is forfeited by the depositor.
    pub fn withdraw_amount(self, amount: u64, supply_from: u64, supply_to: u64) -> Result<u64> {
        match self {
            Strategy::ProRata => {
                require!(supply_from > 0, MigrationError::ZeroCirculatingSupply);

                // Widen before multiplying so the product cannot wrap
                let withdraw = u128::from(amount)
                    .checked_mul(u128::from(supply_to))
                    .ok_or(MigrationError::MathOverflow)?
                    .checked_div(u128::from(supply_from))
                    .ok_or(MigrationError::MathOverflow)?;

                let withdraw = u64::try_from(withdraw).map_err(|_| MigrationError::MathOverflow)?;
                Ok(withdraw)
            }
            Strategy::Fixed { e } => {
                let scale = pow10(e)?;
                let withdraw = if e >= 0 {
                    amount.checked_mul(scale).ok_or(MigrationError::MathOverflow)?
                } else {
                    amount.checked_div(scale).ok_or(MigrationError::MathOverflow)?
                };
                Ok(withdraw)
            }
        }
    }
}

fn pow10(e: i8) -> Result<u64> {
    Ok(10u64
        .checked_pow(u32::from(e.unsigned_abs()))
        .ok_or(MigrationError::ExponentOutOfRange)?)
}
