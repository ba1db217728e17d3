//! Value types shared across the sizing library.
//!
//! These are immutable carriers with validation at construction time; none
//! of them performs I/O or mutates market state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::SizingError;

// =============================================================================
// Enums
// =============================================================================

/// One side of a binary market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Yes,
    No,
}

impl Side {
    pub fn opposite(&self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }
}

/// Collateral denominations of the supported platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "xDai")]
    XDai,
    Mana,
    #[serde(rename = "USDC")]
    Usdc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeType {
    Buy,
    Sell,
}

// =============================================================================
// Market fees
// =============================================================================

/// Fee schedule attached to a market snapshot at query time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketFees {
    /// Proportion of the bet taken as fee, in `[0, 1)`.
    pub bet_proportion: Decimal,
    /// Flat fee charged per trade, in the market's collateral currency.
    pub absolute: Decimal,
}

impl MarketFees {
    pub fn zero() -> Self {
        Self {
            bet_proportion: Decimal::ZERO,
            absolute: Decimal::ZERO,
        }
    }

    pub fn proportional(bet_proportion: Decimal) -> Self {
        Self {
            bet_proportion,
            absolute: Decimal::ZERO,
        }
    }

    /// A usable fee schedule keeps `bet_proportion` in `[0, 1)` and
    /// `absolute` non-negative; anything else cannot describe a real market.
    pub fn validate(&self) -> Result<(), SizingError> {
        if self.bet_proportion < Decimal::ZERO || self.bet_proportion >= Decimal::ONE {
            return Err(SizingError::InvalidMarketState(format!(
                "fee proportion must be in [0, 1), got {}",
                self.bet_proportion
            )));
        }
        if self.absolute < Decimal::ZERO {
            return Err(SizingError::InvalidMarketState(format!(
                "absolute fee must be non-negative, got {}",
                self.absolute
            )));
        }
        Ok(())
    }

    /// Investment that actually reaches the pool after both fee components.
    pub fn get_after_fees(&self, bet_amount: Decimal) -> Decimal {
        bet_amount * (Decimal::ONE - self.bet_proportion) - self.absolute
    }

    /// Total fee in absolute terms, both proportional and fixed components.
    pub fn total_fee_absolute_value(&self, bet_amount: Decimal) -> Decimal {
        self.bet_proportion * bet_amount + self.absolute
    }

    /// Total fee relative to the bet amount.
    pub fn total_fee_relative_value(&self, bet_amount: Decimal) -> Decimal {
        if bet_amount.is_zero() {
            return Decimal::ZERO;
        }
        self.total_fee_absolute_value(bet_amount) / bet_amount
    }
}

// =============================================================================
// Probabilistic answer
// =============================================================================

/// A model's belief about a binary market: probability of YES plus how much
/// the estimate should be trusted. Constructed fresh per decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilisticAnswer {
    p_yes: Decimal,
    confidence: Decimal,
}

impl ProbabilisticAnswer {
    pub fn new(p_yes: Decimal, confidence: Decimal) -> Result<Self, SizingError> {
        if p_yes < Decimal::ZERO || p_yes > Decimal::ONE {
            return Err(SizingError::InvalidProbability(p_yes));
        }
        if confidence < Decimal::ZERO || confidence > Decimal::ONE {
            return Err(SizingError::InvalidConfidence(confidence));
        }
        Ok(Self { p_yes, confidence })
    }

    pub fn p_yes(&self) -> Decimal {
        self.p_yes
    }

    pub fn p_no(&self) -> Decimal {
        Decimal::ONE - self.p_yes
    }

    pub fn confidence(&self) -> Decimal {
        self.confidence
    }
}

// =============================================================================
// Position
// =============================================================================

/// An existing (possibly empty) holding in one outcome of a market,
/// denominated in outcome tokens. Read-only input to sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub outcome: Option<Side>,
    /// Outcome-token quantity held.
    pub amount: Decimal,
    pub currency: Currency,
}

impl Position {
    pub fn new(outcome: Side, amount: Decimal, currency: Currency) -> Self {
        Self {
            outcome: Some(outcome),
            amount,
            currency,
        }
    }

    pub fn empty(currency: Currency) -> Self {
        Self {
            outcome: None,
            amount: Decimal::ZERO,
            currency,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.outcome.is_none() || self.amount <= Decimal::ZERO
    }
}

// =============================================================================
// Trades and bets
// =============================================================================

/// A proposed trade, denominated in the market's collateral currency.
/// The caller executes it against the real platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_type: TradeType,
    pub outcome: Side,
    /// Collateral amount; always non-negative, direction lives in `trade_type`.
    pub amount: Decimal,
    pub currency: Currency,
}

impl Trade {
    pub fn new(
        trade_type: TradeType,
        outcome: Side,
        amount: Decimal,
        currency: Currency,
    ) -> Result<Self, SizingError> {
        if amount < Decimal::ZERO {
            return Err(SizingError::InvalidTradeAmount(amount));
        }
        Ok(Self {
            trade_type,
            outcome,
            amount,
            currency,
        })
    }

    pub fn buy(outcome: Side, amount: Decimal, currency: Currency) -> Result<Self, SizingError> {
        Self::new(TradeType::Buy, outcome, amount, currency)
    }

    pub fn sell(outcome: Side, amount: Decimal, currency: Currency) -> Result<Self, SizingError> {
        Self::new(TradeType::Sell, outcome, amount, currency)
    }
}

/// Direction-and-size output of the closed-form and market-moving helpers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimpleBet {
    pub direction: Side,
    pub size: Decimal,
}
