use anchor_lang::prelude::*;

#[error_code]
pub enum MigrationError {
    #[msg("Signer is not the configured vault administrator")]
    UnauthorizedAdmin,
    #[msg("Destination escrow must be funded before the vault is created")]
    EscrowNotFunded,
    #[msg("Fixed exponent does not fit the token amount width")]
    ExponentOutOfRange,
    #[msg("Source token has no circulating supply")]
    ZeroCirculatingSupply,
    #[msg("Math operation overflow")]
    MathOverflow,
    #[msg("Migration amount must be greater than zero")]
    InvalidAmount,
}
