//! Constant-product (FPMM) pricing for two-outcome markets.
//!
//! Collateral paid into the market mints one token of each outcome into the
//! pools; the bought pool is then rebalanced down to restore the product
//! invariant, and the removed tokens are what the trader receives. All math
//! runs on `Decimal` so balances cannot go negative through float rounding
//! near reserve exhaustion.

use rust_decimal::{Decimal, MathematicalOps};

use crate::errors::SizingError;

fn ensure_reserves(reserve_bought: Decimal, reserve_other: Decimal) -> Result<(), SizingError> {
    if reserve_bought <= Decimal::ZERO || reserve_other <= Decimal::ZERO {
        return Err(SizingError::InvalidMarketState(format!(
            "non-positive reserve (bought={reserve_bought}, other={reserve_other})"
        )));
    }
    Ok(())
}

/// Market-implied probability of YES for the given pools.
///
/// The cheaper outcome holds the larger reserve, so the probability of YES
/// is the NO reserve's share of the total.
pub fn implied_p_yes(yes_pool: Decimal, no_pool: Decimal) -> Result<Decimal, SizingError> {
    ensure_reserves(yes_pool, no_pool)?;
    Ok(no_pool / (yes_pool + no_pool))
}

/// Outcome tokens received for investing `investment` of collateral into one
/// outcome, after the proportional `fee` is deducted.
///
/// With `a = investment * (1 - fee)`:
///
/// ```text
/// shares = reserve_bought + a - reserve_bought * reserve_other / (reserve_other + a)
/// ```
///
/// Non-decreasing in `investment`; a non-positive investment buys nothing.
pub fn shares_received(
    investment: Decimal,
    reserve_bought: Decimal,
    reserve_other: Decimal,
    fee: Decimal,
) -> Result<Decimal, SizingError> {
    ensure_reserves(reserve_bought, reserve_other)?;
    if investment <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    let net = investment * (Decimal::ONE - fee);
    let new_other = reserve_other + net;
    Ok(reserve_bought + net - reserve_bought * reserve_other / new_other)
}

/// Collateral received for selling `shares` outcome tokens back to the pool.
///
/// The gross return `x` is the smaller root of
/// `(reserve_sold + shares - x)(reserve_other - x) = reserve_sold * reserve_other`,
/// i.e. the amount that can be burned from both pools once the sold tokens
/// are merged back in. The proportional `fee` is charged on the proceeds.
pub fn sale_proceeds(
    shares: Decimal,
    reserve_sold: Decimal,
    reserve_other: Decimal,
    fee: Decimal,
) -> Result<Decimal, SizingError> {
    ensure_reserves(reserve_sold, reserve_other)?;
    if shares <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    let sum = reserve_sold + shares + reserve_other;
    let discriminant = sum * sum - Decimal::new(4, 0) * shares * reserve_other;
    let root = discriminant.sqrt().ok_or_else(|| {
        SizingError::InvalidMarketState("negative discriminant in sale pricing".to_string())
    })?;
    let gross = (sum - root) / Decimal::TWO;
    Ok(gross * (Decimal::ONE - fee))
}

/// Relative price impact of buying with `investment`: how far the effective
/// fill price sits above the spot price, as a fraction of spot.
pub fn price_impact(
    investment: Decimal,
    reserve_bought: Decimal,
    reserve_other: Decimal,
    fee: Decimal,
) -> Result<Decimal, SizingError> {
    ensure_reserves(reserve_bought, reserve_other)?;
    if investment <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    let shares = shares_received(investment, reserve_bought, reserve_other, fee)?;
    let spot = reserve_other / (reserve_bought + reserve_other);
    let actual = investment / shares;
    Ok((actual - spot) / spot)
}
