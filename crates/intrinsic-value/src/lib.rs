//! Intrinsic Value & Classification Engine
//!
//! Runs only for instruments that cleared the quality bar: projects the
//! latest EPS forward at a haircut growth rate, applies a growth-banded
//! multiple, discounts by a margin of safety, and classifies the current
//! price against the result.

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use screener_core::stats;
use screener_core::{AnnualFinancialRecord, InstrumentScoreResult, ValuationOutcome};

/// Periods the EPS growth rate is compounded over
const GROWTH_PERIODS: u32 = 10;

/// Growth-driven intrinsic value appraiser
#[derive(Debug, Clone)]
pub struct IntrinsicValueEngine {
    /// Fraction of the observed EPS CAGR carried into the projection
    /// (0.7 = only 70% of historical growth is assumed to repeat)
    pub growth_haircut: f64,

    /// Years the latest EPS is compounded forward
    pub projection_years: i32,

    /// Multiplier applied to the theoretical value (0.80 = 20% discount)
    pub margin_of_safety: Decimal,
}

impl Default for IntrinsicValueEngine {
    fn default() -> Self {
        Self {
            growth_haircut: 0.7,
            projection_years: 5,
            margin_of_safety: dec!(0.80),
        }
    }
}

impl IntrinsicValueEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the intrinsic value estimate from ten years of EPS.
    ///
    /// Records may arrive in any order; growth is measured from the
    /// earliest to the latest fiscal year. Each monetary step is rounded
    /// half-up to two decimals before the next one.
    pub fn appraise(&self, records: &[AnnualFinancialRecord]) -> ValuationOutcome {
        let mut window: Vec<&AnnualFinancialRecord> = records.iter().collect();
        window.sort_by(|a, b| a.fiscal_year.cmp(&b.fiscal_year));

        let oldest_eps = window.first().map_or(Decimal::ZERO, |r| r.eps);
        let latest_eps = window.last().map_or(Decimal::ZERO, |r| r.eps);

        let growth_rate_pct = stats::compound_growth_rate(
            oldest_eps.to_f64().unwrap_or(0.0),
            latest_eps.to_f64().unwrap_or(0.0),
            GROWTH_PERIODS,
        );

        let conservative_rate = growth_rate_pct * self.growth_haircut;
        let growth_factor = (1.0 + conservative_rate / 100.0).powi(self.projection_years);
        let future_eps = (latest_eps * Decimal::from_f64(growth_factor).unwrap_or(Decimal::ONE))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        // the multiple is banded on the unscaled growth rate
        let fair_multiple = self.fair_multiple(growth_rate_pct);

        let theoretical_value = (future_eps * fair_multiple)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let intrinsic_value = (theoretical_value * self.margin_of_safety)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        ValuationOutcome {
            growth_rate_pct,
            future_eps,
            fair_multiple,
            theoretical_value,
            intrinsic_value,
        }
    }

    /// Multiple earned by the growth rate: high growth carries a premium
    /// multiple, low growth a discounted one. The sub-zero band is
    /// unreachable while growth is floored at 0% but stays defined for
    /// any future signed-growth variant.
    fn fair_multiple(&self, growth_rate_pct: f64) -> Decimal {
        if growth_rate_pct >= 15.0 {
            dec!(18.0)
        } else if growth_rate_pct >= 8.0 {
            dec!(12.0)
        } else if growth_rate_pct >= 0.0 {
            dec!(10.0)
        } else {
            dec!(8.0)
        }
    }

    /// Compare the market price to the intrinsic value estimate.
    ///
    /// At or below intrinsic value the name is a strong buy; above it the
    /// name is overvalued and the intrinsic value becomes the target
    /// price to wait for.
    pub fn classify(
        &self,
        quality_score: Decimal,
        current_price: Decimal,
        intrinsic_value: Decimal,
    ) -> InstrumentScoreResult {
        if current_price <= intrinsic_value {
            InstrumentScoreResult::strong_buy(quality_score)
        } else {
            InstrumentScoreResult::overvalued(quality_score, intrinsic_value)
        }
    }
}
