//! Trade-sizing strategies.
//!
//! Every strategy implements [`BettingStrategy`] and consumes only the
//! platform-neutral snapshot types from [`crate::data`]. Picking a strategy
//! and executing its trades is the caller's job.

pub mod fixed;
pub mod helpers;
pub mod kelly;
pub mod market_moving;

use crate::data::market::MarketState;
use crate::data::models::{Position, ProbabilisticAnswer, Trade};
use crate::errors::SizingError;

/// Maps a belief about a market to the trades that should be placed.
///
/// Implementations are pure: no I/O, no mutation of inputs, and identical
/// outputs for identical inputs. An empty `Vec` means "do nothing".
pub trait BettingStrategy {
    fn calculate_trades(
        &self,
        existing_position: Option<&Position>,
        answer: &ProbabilisticAnswer,
        market: &MarketState,
    ) -> Result<Vec<Trade>, SizingError>;
}

/// Shared input checks used by the strategies.
pub(crate) fn check_position_currency(
    existing_position: Option<&Position>,
    market: &MarketState,
) -> Result<(), SizingError> {
    if let Some(position) = existing_position {
        if position.currency != market.currency {
            return Err(SizingError::CurrencyMismatch {
                market: market.currency,
                got: position.currency,
            });
        }
    }
    Ok(())
}
