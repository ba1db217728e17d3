//! Fixed-stake strategy that bets on whichever side the belief favors.

use rust_decimal::Decimal;
use tracing::debug;

use crate::amm;
use crate::data::market::MarketState;
use crate::data::models::{Position, ProbabilisticAnswer, Side, Trade};
use crate::errors::SizingError;
use crate::strategy::{check_position_currency, BettingStrategy};

/// Always stakes `bet_amount` on the side with believed probability of at
/// least one half, regardless of how mispriced the market is. Useful as a
/// baseline against the Kelly strategies.
#[derive(Debug, Clone, PartialEq)]
pub struct MaxAccuracyBettingStrategy {
    pub bet_amount: Decimal,
}

impl MaxAccuracyBettingStrategy {
    pub fn new(bet_amount: Decimal) -> Result<Self, SizingError> {
        if bet_amount <= Decimal::ZERO {
            return Err(SizingError::InvalidMaxBetAmount(bet_amount));
        }
        Ok(Self { bet_amount })
    }
}

impl BettingStrategy for MaxAccuracyBettingStrategy {
    fn calculate_trades(
        &self,
        existing_position: Option<&Position>,
        answer: &ProbabilisticAnswer,
        market: &MarketState,
    ) -> Result<Vec<Trade>, SizingError> {
        market.ensure_tradable()?;
        check_position_currency(existing_position, market)?;

        let direction = if answer.p_yes() >= Decimal::new(5, 1) {
            Side::Yes
        } else {
            Side::No
        };
        debug!(direction = ?direction, amount = %self.bet_amount, "fixed-stake bet");

        let mut trades = vec![Trade::buy(direction, self.bet_amount, market.currency)?];

        // Wrong-side holdings are unwound after the buy, so the buy fills at
        // the snapshot's prices while the sale fills slightly better.
        if let Some(position) = existing_position.filter(|p| !p.is_empty()) {
            if let Some(held) = position.outcome {
                if held == direction.opposite() {
                    let fee = market.fees.bet_proportion;
                    let (reserve_sold, reserve_other) = market.reserves_for(held);
                    let proceeds =
                        amm::sale_proceeds(position.amount, reserve_sold, reserve_other, fee)?;
                    trades.push(Trade::sell(held, proceeds, market.currency)?);
                }
            }
        }

        Ok(trades)
    }
}
