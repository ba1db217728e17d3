//! Kelly-criterion sizing that accounts for the trade's own price movement.
//!
//! The classic closed form `f* = (p*b - q) / b` assumes fixed odds, which a
//! constant-product market does not offer: every unit of collateral pushed in
//! worsens the fill price. [`KellyBettingStrategy`] therefore maximizes the
//! expected log bankroll growth
//!
//! ```text
//! E[log W](t) = p * ln(B - t + shares(t)) + (1 - p) * ln(B - t)
//! ```
//!
//! directly over the stake `t`, with `shares(t)` priced through the pool.
//! The objective is concave on `[0, B]`, so a bounded ternary search finds
//! the maximum. The fixed-odds form survives as [`kelly_bet_simplified`] for
//! bets small relative to pool depth.

use rust_decimal::{Decimal, MathematicalOps};
use tracing::debug;

use crate::amm;
use crate::data::market::MarketState;
use crate::data::models::{Position, ProbabilisticAnswer, Side, SimpleBet, Trade};
use crate::errors::SizingError;
use crate::strategy::{check_position_currency, BettingStrategy};

const SEARCH_ITERATIONS: u32 = 100;

fn search_tolerance() -> Decimal {
    // 1e-9, far below any collateral unit worth acting on.
    Decimal::new(1, 9)
}

/// AMM-aware Kelly sizing.
///
/// `max_bet_amount` doubles as the bankroll `B` in the objective: it is the
/// most collateral the caller is willing to lose on this one decision.
/// `max_price_impact`, when set, additionally shrinks the stake until the
/// fill price stays within that fraction of spot.
#[derive(Debug, Clone, PartialEq)]
pub struct KellyBettingStrategy {
    pub max_bet_amount: Decimal,
    pub max_price_impact: Option<Decimal>,
}

impl KellyBettingStrategy {
    pub fn new(max_bet_amount: Decimal) -> Result<Self, SizingError> {
        if max_bet_amount <= Decimal::ZERO {
            return Err(SizingError::InvalidMaxBetAmount(max_bet_amount));
        }
        Ok(Self {
            max_bet_amount,
            max_price_impact: None,
        })
    }

    pub fn with_max_price_impact(
        max_bet_amount: Decimal,
        max_price_impact: Decimal,
    ) -> Result<Self, SizingError> {
        if max_price_impact <= Decimal::ZERO {
            return Err(SizingError::InvalidMaxPriceImpact(max_price_impact));
        }
        let mut strategy = Self::new(max_bet_amount)?;
        strategy.max_price_impact = Some(max_price_impact);
        Ok(strategy)
    }

    /// Ternary search for the stake maximizing expected log growth of
    /// buying one side, where `p_win` is the believed probability of that
    /// side resolving true.
    fn optimal_stake(
        &self,
        p_win: Decimal,
        reserve_bought: Decimal,
        reserve_other: Decimal,
        fee: Decimal,
    ) -> Result<Decimal, SizingError> {
        let bankroll = self.max_bet_amount;
        let tolerance = (bankroll * search_tolerance()).max(search_tolerance());

        let mut lo = Decimal::ZERO;
        let mut hi = bankroll;
        let mut converged = false;
        let three = Decimal::from(3);
        for _ in 0..SEARCH_ITERATIONS {
            if hi - lo <= tolerance {
                converged = true;
                break;
            }
            let third = (hi - lo) / three;
            let m1 = lo + third;
            let m2 = hi - third;
            let g1 =
                expected_log_growth(m1, bankroll, p_win, reserve_bought, reserve_other, fee)?;
            let g2 =
                expected_log_growth(m2, bankroll, p_win, reserve_bought, reserve_other, fee)?;
            if growth_gt(g1, g2) {
                hi = m2;
            } else {
                lo = m1;
            }
        }
        if !converged {
            return Err(SizingError::NonConvergence {
                iterations: SEARCH_ITERATIONS,
            });
        }

        // Compare the interior optimum against both endpoints exactly, so
        // that no-edge stakes collapse to zero and a certain win stakes the
        // full bankroll rather than bankroll-minus-epsilon.
        let interior = (lo + hi) / Decimal::TWO;
        let mut best_stake = Decimal::ZERO;
        let mut best_growth = expected_log_growth(
            Decimal::ZERO,
            bankroll,
            p_win,
            reserve_bought,
            reserve_other,
            fee,
        )?;
        for candidate in [interior, bankroll] {
            let growth =
                expected_log_growth(candidate, bankroll, p_win, reserve_bought, reserve_other, fee)?;
            if growth_gt(growth, best_growth) {
                best_stake = candidate;
                best_growth = growth;
            }
        }
        Ok(best_stake)
    }

    /// Largest stake in `[0, upper]` whose price impact stays at or below
    /// `target_impact`. Binary search; impact is continuous and increasing
    /// in the stake.
    fn bet_amount_for_price_impact(
        &self,
        target_impact: Decimal,
        upper: Decimal,
        reserve_bought: Decimal,
        reserve_other: Decimal,
        fee: Decimal,
    ) -> Result<Decimal, SizingError> {
        let mut lo = Decimal::ZERO;
        let mut hi = upper;
        for _ in 0..SEARCH_ITERATIONS {
            let mid = (lo + hi) / Decimal::TWO;
            let impact = amm::price_impact(mid, reserve_bought, reserve_other, fee)?;
            if (impact - target_impact).abs() <= search_tolerance() {
                return Ok(mid);
            }
            if impact > target_impact {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        Err(SizingError::NonConvergence {
            iterations: SEARCH_ITERATIONS,
        })
    }
}

impl BettingStrategy for KellyBettingStrategy {
    fn calculate_trades(
        &self,
        existing_position: Option<&Position>,
        answer: &ProbabilisticAnswer,
        market: &MarketState,
    ) -> Result<Vec<Trade>, SizingError> {
        if self.max_bet_amount <= Decimal::ZERO {
            return Err(SizingError::InvalidMaxBetAmount(self.max_bet_amount));
        }
        market.ensure_tradable()?;
        check_position_currency(existing_position, market)?;
        if market.fees.absolute > Decimal::ZERO {
            return Err(SizingError::UnsupportedFees(format!(
                "absolute fee {} cannot be sized proportionally",
                market.fees.absolute
            )));
        }
        let fee = market.fees.bet_proportion;

        // Blend the belief with the market price by confidence. At zero
        // confidence the effective probability is the market's own, i.e. no
        // edge at all.
        let current_p_yes = market.current_p_yes()?;
        let effective_p_yes =
            current_p_yes + answer.confidence() * (answer.p_yes() - current_p_yes);

        let direction = if effective_p_yes > current_p_yes {
            Side::Yes
        } else if effective_p_yes < current_p_yes {
            Side::No
        } else {
            debug!(%current_p_yes, "no edge against market price, skipping");
            return Ok(vec![]);
        };

        // A holding on the wrong side is liquidated first; sizing the fresh
        // buy waits for the next invocation, against post-sale pools.
        if let Some(position) = existing_position.filter(|p| !p.is_empty()) {
            if let Some(held) = position.outcome {
                if held == direction.opposite() {
                    let (reserve_sold, reserve_other) = market.reserves_for(held);
                    let proceeds =
                        amm::sale_proceeds(position.amount, reserve_sold, reserve_other, fee)?;
                    debug!(
                        held = ?held,
                        tokens = %position.amount,
                        %proceeds,
                        "liquidating opposite-side position before buying"
                    );
                    return Ok(vec![Trade::sell(held, proceeds, market.currency)?]);
                }
            }
        }

        let p_win = match direction {
            Side::Yes => effective_p_yes,
            Side::No => Decimal::ONE - effective_p_yes,
        };
        let (reserve_bought, reserve_other) = market.reserves_for(direction);
        let mut stake = self.optimal_stake(p_win, reserve_bought, reserve_other, fee)?;

        if let Some(max_impact) = self.max_price_impact {
            let impact = amm::price_impact(stake, reserve_bought, reserve_other, fee)?;
            if impact > max_impact {
                stake = self.bet_amount_for_price_impact(
                    max_impact,
                    stake,
                    reserve_bought,
                    reserve_other,
                    fee,
                )?;
                debug!(%stake, %max_impact, "stake reduced to honor price impact limit");
            }
        }

        // Capital already riding on this side counts toward the stake.
        if let Some(position) = existing_position.filter(|p| !p.is_empty()) {
            if position.outcome == Some(direction) {
                let (reserve_sold, reserve_other) = market.reserves_for(direction);
                let held_value =
                    amm::sale_proceeds(position.amount, reserve_sold, reserve_other, fee)?;
                stake -= held_value;
                debug!(%held_value, remaining = %stake, "existing same-side exposure deducted");
            }
        }

        let stake = stake.max(Decimal::ZERO).min(self.max_bet_amount);
        if stake <= Decimal::ZERO {
            return Ok(vec![]);
        }
        debug!(direction = ?direction, %stake, "kelly buy sized");
        Ok(vec![Trade::buy(direction, stake, market.currency)?])
    }
}

/// Expected log bankroll growth for staking `stake` of `bankroll` on one
/// side. `None` stands for negative infinity (a branch with non-positive
/// wealth); zero-probability branches are skipped so a certain outcome can
/// stake everything.
fn expected_log_growth(
    stake: Decimal,
    bankroll: Decimal,
    p_win: Decimal,
    reserve_bought: Decimal,
    reserve_other: Decimal,
    fee: Decimal,
) -> Result<Option<Decimal>, SizingError> {
    let p_lose = Decimal::ONE - p_win;
    let mut growth = Decimal::ZERO;
    if p_win > Decimal::ZERO {
        let shares = amm::shares_received(stake, reserve_bought, reserve_other, fee)?;
        let wealth = bankroll - stake + shares;
        if wealth <= Decimal::ZERO {
            return Ok(None);
        }
        growth += p_win * wealth.ln();
    }
    if p_lose > Decimal::ZERO {
        let wealth = bankroll - stake;
        if wealth <= Decimal::ZERO {
            return Ok(None);
        }
        growth += p_lose * wealth.ln();
    }
    Ok(Some(growth))
}

/// Strict "greater" over log growths where `None` is negative infinity.
fn growth_gt(a: Option<Decimal>, b: Option<Decimal>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a > b,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Fixed-odds Kelly bet, ignoring the price movement the bet itself causes.
///
/// Accurate only when the bet is small next to pool depth. Direction is
/// whichever side the belief prices above the market; size is
/// `edge / odds * max_bet`, clamped to `[0, max_bet]`, with
/// `edge = (my_p - market_p) * confidence` and `odds = 1/market_p - 1`
/// evaluated for the chosen side.
pub fn kelly_bet_simplified(
    max_bet: Decimal,
    market_p_yes: Decimal,
    estimated_p_yes: Decimal,
    confidence: Decimal,
) -> Result<SimpleBet, SizingError> {
    if max_bet <= Decimal::ZERO {
        return Err(SizingError::InvalidMaxBetAmount(max_bet));
    }
    for p in [market_p_yes, estimated_p_yes] {
        if p < Decimal::ZERO || p > Decimal::ONE {
            return Err(SizingError::InvalidProbability(p));
        }
    }
    if confidence < Decimal::ZERO || confidence > Decimal::ONE {
        return Err(SizingError::InvalidConfidence(confidence));
    }

    let (direction, my_prob, market_prob) = if estimated_p_yes > market_p_yes {
        (Side::Yes, estimated_p_yes, market_p_yes)
    } else {
        (
            Side::No,
            Decimal::ONE - estimated_p_yes,
            Decimal::ONE - market_p_yes,
        )
    };

    let edge = (my_prob - market_prob) * confidence;
    // A market certain of the chosen side offers no odds; the edge is zero
    // or negative there anyway.
    if market_prob >= Decimal::ONE {
        return Ok(SimpleBet {
            direction,
            size: Decimal::ZERO,
        });
    }
    let market_prob = market_prob.max(Decimal::new(1, 10));
    let odds = Decimal::ONE / market_prob - Decimal::ONE;
    let size = (edge / odds * max_bet).max(Decimal::ZERO).min(max_bet);
    Ok(SimpleBet { direction, size })
}
