use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};

/// One fiscal year of annual-report data for a single instrument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnualFinancialRecord {
    pub fiscal_year: i32,
    pub roe_pct: Decimal,
    pub roic_pct: Decimal,
    pub net_margin_pct: Decimal,
    pub net_income: Decimal,
    pub revenue: Decimal,
    pub operating_income: Decimal,
    pub total_equity: Decimal,
    pub total_liabilities: Decimal,
    pub eps: Decimal,
    /// Operating earnings before interest and tax
    pub ebit: Decimal,
    pub interest_expense: Decimal,
    pub free_cash_flow: Decimal,
}

/// Latest market price and valuation ratios for one instrument.
/// Superseded in place on each refresh; no history is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub current_price: Decimal,
    #[serde(default)]
    pub pe_ratio: Option<Decimal>,
    #[serde(default)]
    pub pb_ratio: Option<Decimal>,
    #[serde(default)]
    pub earnings_yield: Option<Decimal>,
    pub last_updated: DateTime<Utc>,
}

/// Final price classification against the intrinsic value estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceStatus {
    None,
    StrongBuy,
    Overvalued,
}

impl PriceStatus {
    /// Human-readable label for the status
    pub fn to_label(&self) -> &'static str {
        match self {
            PriceStatus::None => "None",
            PriceStatus::StrongBuy => "Strong Buy",
            PriceStatus::Overvalued => "Overvalued",
        }
    }
}

/// The six quality sub-scores, one field per factor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityBreakdown {
    /// ROE consistency over ten years (0-25)
    pub roe_consistency: Decimal,
    /// ROIC consistency over ten years (0-20)
    pub roic_consistency: Decimal,
    /// Net-margin level and dispersion (0-15)
    pub margin_stability: Decimal,
    /// Recent-vs-past ROE trend (0-15)
    pub profitability_trend: Decimal,
    /// Debt ratio and interest coverage, latest year (0-15)
    pub financial_health: Decimal,
    /// Ten-year average FCF margin (0-10)
    pub cash_generation: Decimal,
}

impl QualityBreakdown {
    /// Aggregate quality score: sum of the six factors, rounded
    /// half-up to two decimals. Always within [0, 100].
    pub fn total(&self) -> Decimal {
        (self.roe_consistency
            + self.roic_consistency
            + self.margin_stability
            + self.profitability_trend
            + self.financial_health
            + self.cash_generation)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// Intermediate values of an intrinsic-value appraisal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationOutcome {
    /// Ten-year EPS CAGR in percent, floored at zero
    pub growth_rate_pct: f64,
    /// EPS projected five years out at the haircut growth rate
    pub future_eps: Decimal,
    /// Multiple applied to the projected EPS
    pub fair_multiple: Decimal,
    pub theoretical_value: Decimal,
    /// Theoretical value after the margin-of-safety discount
    pub intrinsic_value: Decimal,
}

/// Immutable output of one evaluation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentScoreResult {
    pub quality_score: Decimal,
    pub qualified: bool,
    pub price_status: PriceStatus,
    pub target_price: Option<Decimal>,
}

impl InstrumentScoreResult {
    /// Result for an instrument below the qualification threshold.
    /// Clears any prior valuation: status `None`, no target price.
    pub fn disqualified(quality_score: Decimal) -> Self {
        Self {
            quality_score,
            qualified: false,
            price_status: PriceStatus::None,
            target_price: None,
        }
    }

    /// Qualified instrument trading at or below intrinsic value
    pub fn strong_buy(quality_score: Decimal) -> Self {
        Self {
            quality_score,
            qualified: true,
            price_status: PriceStatus::StrongBuy,
            target_price: None,
        }
    }

    /// Qualified instrument trading above intrinsic value; the target
    /// price is the intrinsic value to wait for
    pub fn overvalued(quality_score: Decimal, target_price: Decimal) -> Self {
        Self {
            quality_score,
            qualified: true,
            price_status: PriceStatus::Overvalued,
            target_price: Some(target_price),
        }
    }
}
