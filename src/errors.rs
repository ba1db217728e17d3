//! Error types for the sizing library.
//!
//! Everything is raised synchronously to the caller; the library never
//! swallows an error and never returns a partial result in place of one.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::data::models::Currency;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SizingError {
    /// A probability argument fell outside `[0, 1]`. Indicates a programming
    /// error in the caller; not retryable.
    #[error("probability must be in [0, 1], got {0}")]
    InvalidProbability(Decimal),

    /// A confidence argument fell outside `[0, 1]`.
    #[error("confidence must be in [0, 1], got {0}")]
    InvalidConfidence(Decimal),

    /// The per-decision stake cap must be strictly positive.
    #[error("max bet amount must be positive, got {0}")]
    InvalidMaxBetAmount(Decimal),

    /// A bet range where the minimum exceeds the maximum.
    #[error("minimum bet {min} cannot exceed maximum bet {max}")]
    InvalidBetRange { min: Decimal, max: Decimal },

    /// A position or trade denominated in a different currency than the market.
    #[error("currency mismatch: market is {market:?}, got {got:?}")]
    CurrencyMismatch { market: Currency, got: Currency },

    /// The market is not tradable right now (e.g. drained liquidity).
    /// Callers should skip the market rather than retry.
    #[error("invalid market state: {0}")]
    InvalidMarketState(String),

    /// The fee structure cannot be expressed in the sizing math.
    #[error("unsupported fee structure: {0}")]
    UnsupportedFees(String),

    /// A trade can never carry a negative collateral amount.
    #[error("trade amount must be non-negative, got {0}")]
    InvalidTradeAmount(Decimal),

    /// The price impact limit must be strictly positive to bind anything.
    #[error("max price impact must be positive, got {0}")]
    InvalidMaxPriceImpact(Decimal),

    /// Iterative refinement failed to bracket a stable answer. Fatal for this
    /// decision; the engine never returns an unconverged size.
    #[error("sizing did not converge after {iterations} iterations")]
    NonConvergence { iterations: u32 },
}
