//! Market snapshot consumed by the sizing strategies.
//!
//! Platform clients (Omen subgraph, Manifold API, ...) reduce whatever they
//! fetch to this narrow view; the strategies never see platform types.

use rust_decimal::Decimal;

use crate::amm;
use crate::data::models::{Currency, MarketFees, Side};
use crate::errors::SizingError;

/// Point-in-time state of a two-outcome constant-product market.
///
/// The implied probability is always derived from the reserves, so a
/// snapshot cannot disagree with itself about pricing.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketState {
    pub currency: Currency,
    pub fees: MarketFees,
    /// Outcome-token reserve backing YES.
    pub yes_pool: Decimal,
    /// Outcome-token reserve backing NO.
    pub no_pool: Decimal,
}

impl MarketState {
    pub fn new(currency: Currency, fees: MarketFees, yes_pool: Decimal, no_pool: Decimal) -> Self {
        Self {
            currency,
            fees,
            yes_pool,
            no_pool,
        }
    }

    pub fn pool(&self, side: Side) -> Decimal {
        match side {
            Side::Yes => self.yes_pool,
            Side::No => self.no_pool,
        }
    }

    /// Reserves as `(bought, other)` for a purchase of `side`.
    pub fn reserves_for(&self, side: Side) -> (Decimal, Decimal) {
        (self.pool(side), self.pool(side.opposite()))
    }

    /// Both reserves must be strictly positive and the fee schedule well
    /// formed while the market is open; anything else means the market
    /// cannot be traded right now.
    pub fn ensure_tradable(&self) -> Result<(), SizingError> {
        if self.yes_pool <= Decimal::ZERO || self.no_pool <= Decimal::ZERO {
            return Err(SizingError::InvalidMarketState(format!(
                "non-positive outcome pool (yes={}, no={})",
                self.yes_pool, self.no_pool
            )));
        }
        self.fees.validate()?;
        Ok(())
    }

    /// Market-implied probability of YES: `no_pool / (yes_pool + no_pool)`.
    pub fn current_p_yes(&self) -> Result<Decimal, SizingError> {
        amm::implied_p_yes(self.yes_pool, self.no_pool)
    }

    pub fn current_p_no(&self) -> Result<Decimal, SizingError> {
        Ok(Decimal::ONE - self.current_p_yes()?)
    }

    /// Spot price of one outcome token of `side`, equal to its implied
    /// probability.
    pub fn price_of(&self, side: Side) -> Result<Decimal, SizingError> {
        match side {
            Side::Yes => self.current_p_yes(),
            Side::No => self.current_p_no(),
        }
    }
}
