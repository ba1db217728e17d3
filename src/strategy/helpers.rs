//! Small sizing helpers shared by calling agents.

use rust_decimal::Decimal;

use crate::data::market::MarketState;
use crate::data::models::Side;
use crate::errors::SizingError;

/// Linearly maps a probability onto a bet amount in `[min_bet, max_bet]`.
pub fn stretch_bet_between(
    probability: Decimal,
    min_bet: Decimal,
    max_bet: Decimal,
) -> Result<Decimal, SizingError> {
    if probability < Decimal::ZERO || probability > Decimal::ONE {
        return Err(SizingError::InvalidProbability(probability));
    }
    if min_bet > max_bet {
        return Err(SizingError::InvalidBetRange {
            min: min_bet,
            max: max_bet,
        });
    }
    Ok(min_bet + (max_bet - min_bet) * probability)
}

/// Estimated minimum bet on `side` that pays out `amount_to_win` on top of
/// the stake, at the current share price. A share bought at price `P` nets
/// `1 - P` when it resolves true, so the stake is `amount / (1/P - 1)`.
///
/// Ignores the bet's own price impact, so it underestimates for bets large
/// relative to the pools.
pub fn minimum_bet_to_win(
    side: Side,
    amount_to_win: Decimal,
    market: &MarketState,
) -> Result<Decimal, SizingError> {
    let share_price = market.price_of(side)?;
    if share_price >= Decimal::ONE {
        return Err(SizingError::InvalidMarketState(format!(
            "{side:?} already priced at {share_price}, nothing to win"
        )));
    }
    Ok(amount_to_win / (Decimal::ONE / share_price - Decimal::ONE))
}
