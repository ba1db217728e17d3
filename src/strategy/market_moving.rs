//! Sizing a bet by the price it leaves behind rather than by edge.
//!
//! A trader who fully trusts their probability estimate can simply push the
//! market price onto it; the bet that does so is found by binary search over
//! the post-trade implied probability.

use rust_decimal::Decimal;
use tracing::debug;

use crate::data::market::MarketState;
use crate::data::models::{Side, SimpleBet};
use crate::errors::SizingError;

/// Bet that moves the market's implied `p_yes` to `target_p_yes`.
///
/// Fee-aware: only the after-fee part of the bet reaches the pools, so a
/// higher fee needs a larger bet for the same move. The search runs on the
/// simulated post-trade pools and stops once the resulting probability is
/// within `1e-6` of the target.
pub fn market_moving_bet(
    market: &MarketState,
    target_p_yes: Decimal,
    max_iters: u32,
) -> Result<SimpleBet, SizingError> {
    if target_p_yes < Decimal::ZERO || target_p_yes > Decimal::ONE {
        return Err(SizingError::InvalidProbability(target_p_yes));
    }
    market.ensure_tradable()?;

    let current_p_yes = market.current_p_yes()?;
    let direction = if target_p_yes > current_p_yes {
        Side::Yes
    } else {
        Side::No
    };

    let fixed_product = market.yes_pool * market.no_pool;
    let probability_tolerance = Decimal::new(1, 6);

    let mut min_bet = Decimal::ZERO;
    let mut max_bet = (market.yes_pool + market.no_pool) * Decimal::ONE_HUNDRED;
    let mut bet_amount = Decimal::ZERO;
    for _ in 0..max_iters {
        bet_amount = (min_bet + max_bet) / Decimal::TWO;
        let net = market.fees.get_after_fees(bet_amount).max(Decimal::ZERO);

        // Mint `net` tokens into both pools, then drain the bought pool to
        // restore the product invariant.
        let mut new_yes = market.yes_pool + net;
        let mut new_no = market.no_pool + net;
        let new_product = new_yes * new_no;
        match direction {
            Side::Yes => new_yes -= (new_product - fixed_product) / new_no,
            Side::No => new_no -= (new_product - fixed_product) / new_yes,
        }

        let new_p_yes = new_no / (new_yes + new_no);
        if (target_p_yes - new_p_yes).abs() < probability_tolerance {
            debug!(%bet_amount, %new_p_yes, "market-moving bet converged");
            return Ok(SimpleBet {
                direction,
                size: bet_amount,
            });
        }
        let overshoot = new_p_yes > target_p_yes;
        let buying_yes = direction == Side::Yes;
        if overshoot == buying_yes {
            max_bet = bet_amount;
        } else {
            min_bet = bet_amount;
        }
    }

    // The final midpoint is within half the last bracket of the true answer;
    // the original accepts it without complaint and so do we.
    debug!(%bet_amount, iterations = max_iters, "market-moving search hit iteration cap");
    Ok(SimpleBet {
        direction,
        size: bet_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::models::{Currency, MarketFees};
    use rust_decimal_macros::dec;

    fn market(yes: Decimal, no: Decimal, fees: MarketFees) -> MarketState {
        MarketState::new(Currency::XDai, fees, yes, no)
    }

    #[test]
    fn moves_balanced_market_to_target() {
        let m = market(dec!(1000), dec!(1000), MarketFees::zero());
        let bet = market_moving_bet(&m, dec!(0.7), 100).unwrap();
        assert_eq!(bet.direction, Side::Yes);

        // Replay the bet and confirm the pools now imply ~0.7.
        let new_yes = dec!(1000) + bet.size
            - ((dec!(1000) + bet.size) * (dec!(1000) + bet.size) - dec!(1000000))
                / (dec!(1000) + bet.size);
        let new_no = dec!(1000) + bet.size;
        let new_p_yes = new_no / (new_yes + new_no);
        assert!((new_p_yes - dec!(0.7)).abs() < dec!(0.0001));
    }

    #[test]
    fn downward_move_buys_no() {
        let m = market(dec!(500), dec!(1500), MarketFees::zero());
        assert_eq!(m.current_p_yes().unwrap(), dec!(0.75));
        let bet = market_moving_bet(&m, dec!(0.5), 100).unwrap();
        assert_eq!(bet.direction, Side::No);
        assert!(bet.size > Decimal::ZERO);
    }

    #[test]
    fn fees_make_the_same_move_cost_more() {
        let free = market_moving_bet(
            &market(dec!(1000), dec!(1000), MarketFees::zero()),
            dec!(0.6),
            100,
        )
        .unwrap();
        let taxed = market_moving_bet(
            &market(dec!(1000), dec!(1000), MarketFees::proportional(dec!(0.05))),
            dec!(0.6),
            100,
        )
        .unwrap();
        assert!(taxed.size > free.size);
    }

    #[test]
    fn already_at_target_needs_almost_nothing() {
        let m = market(dec!(1000), dec!(1000), MarketFees::zero());
        let bet = market_moving_bet(&m, dec!(0.5), 100).unwrap();
        assert!(bet.size < dec!(0.01));
    }
}
