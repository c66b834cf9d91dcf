//! Quality Scoring Engine
//!
//! Rates ten years of annual financials against six independent factors:
//! ROE consistency, ROIC consistency, net-margin stability, profitability
//! trend, financial health and cash generation. The factors sum to a
//! 0-100 score; 85.00 is the qualification bar applied by the caller.

use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use screener_core::stats;
use screener_core::{AnnualFinancialRecord, QualityBreakdown};

/// Years of history the rubric is defined over
pub const REQUIRED_YEARS: usize = 10;

pub struct QualityScoringEngine;

impl QualityScoringEngine {
    pub fn new() -> Self {
        Self
    }

    /// Score one instrument's annual history.
    ///
    /// Records may arrive in any order; the engine works on the ten most
    /// recent fiscal years. Fewer than ten years is a defined zero-score
    /// outcome (automatic disqualification), not an error. Total on its
    /// domain: no input with valid fields can make this panic.
    pub fn score(&self, records: &[AnnualFinancialRecord]) -> QualityBreakdown {
        if records.len() < REQUIRED_YEARS {
            return QualityBreakdown::default();
        }

        let mut window: Vec<&AnnualFinancialRecord> = records.iter().collect();
        window.sort_by(|a, b| b.fiscal_year.cmp(&a.fiscal_year));
        window.truncate(REQUIRED_YEARS);

        QualityBreakdown {
            roe_consistency: self.roe_consistency(&window),
            roic_consistency: self.roic_consistency(&window),
            margin_stability: self.margin_stability(&window),
            profitability_trend: self.profitability_trend(&window),
            financial_health: self.financial_health(&window),
            cash_generation: self.cash_generation(&window),
        }
    }

    /// ROE consistency, 0-25 points.
    ///
    /// A single loss year zeroes the factor outright; otherwise the score
    /// rewards how many of the ten years cleared 15% and 12%.
    fn roe_consistency(&self, window: &[&AnnualFinancialRecord]) -> Decimal {
        let mut count_15_plus = 0;
        let mut count_12_plus = 0;

        for record in window {
            if record.roe_pct < Decimal::ZERO {
                return Decimal::ZERO;
            }
            if record.roe_pct >= dec!(15) {
                count_15_plus += 1;
            }
            if record.roe_pct >= dec!(12) {
                count_12_plus += 1;
            }
        }

        if count_15_plus == REQUIRED_YEARS {
            dec!(25)
        } else if count_15_plus >= 8 {
            dec!(20)
        } else if count_12_plus == REQUIRED_YEARS {
            dec!(15)
        } else if count_12_plus >= 8 {
            dec!(10)
        } else {
            Decimal::ZERO
        }
    }

    /// ROIC consistency, 0-20 points. Same counting ladder as ROE with
    /// 12%/9% thresholds and no loss-year cutoff.
    fn roic_consistency(&self, window: &[&AnnualFinancialRecord]) -> Decimal {
        let mut count_12_plus = 0;
        let mut count_9_plus = 0;

        for record in window {
            if record.roic_pct >= dec!(12) {
                count_12_plus += 1;
            }
            if record.roic_pct >= dec!(9) {
                count_9_plus += 1;
            }
        }

        if count_12_plus == REQUIRED_YEARS {
            dec!(20)
        } else if count_12_plus >= 8 {
            dec!(15)
        } else if count_9_plus == REQUIRED_YEARS {
            dec!(10)
        } else if count_9_plus >= 8 {
            dec!(5)
        } else {
            Decimal::ZERO
        }
    }

    /// Net-margin stability, 0-15 points: up to 10 for the ten-year mean
    /// level, up to 5 for low dispersion.
    fn margin_stability(&self, window: &[&AnnualFinancialRecord]) -> Decimal {
        let margins: Vec<f64> = window
            .iter()
            .map(|r| r.net_margin_pct.to_f64().unwrap_or(0.0))
            .collect();

        let avg_margin = stats::mean(&margins);
        let std_dev = stats::population_std_dev(&margins);

        let avg_score = if avg_margin >= 20.0 {
            dec!(10)
        } else if avg_margin >= 15.0 {
            dec!(7)
        } else if avg_margin >= 10.0 {
            dec!(5)
        } else {
            Decimal::ZERO
        };

        let stability_score = if std_dev <= 3.0 {
            dec!(5)
        } else if std_dev <= 5.0 {
            dec!(3)
        } else if std_dev <= 8.0 {
            dec!(1)
        } else {
            Decimal::ZERO
        };

        avg_score + stability_score
    }

    /// Profitability trend, 0-15 points: mean ROE of the three most
    /// recent years against the mean of the seven before them.
    fn profitability_trend(&self, window: &[&AnnualFinancialRecord]) -> Decimal {
        let roe: Vec<f64> = window
            .iter()
            .map(|r| r.roe_pct.to_f64().unwrap_or(0.0))
            .collect();

        let recent_3 = stats::mean(&roe[0..3]);
        let past_7 = stats::mean(&roe[3..REQUIRED_YEARS]);

        // a flat zero base means no measurable trend, not a division
        let improvement = if past_7 == 0.0 {
            0.0
        } else {
            (recent_3 - past_7) / past_7 * 100.0
        };

        if improvement >= 20.0 {
            dec!(15)
        } else if improvement >= 10.0 {
            dec!(12)
        } else if improvement >= 5.0 {
            dec!(9)
        } else if improvement >= 0.0 {
            dec!(6)
        } else if improvement >= -5.0 {
            dec!(3)
        } else {
            Decimal::ZERO
        }
    }

    /// Financial health, 0-15 points, from the most recent year only:
    /// debt ratio (0-10) plus interest coverage (0-5). No interest
    /// expense counts as debt-free and takes the full coverage points.
    fn financial_health(&self, window: &[&AnnualFinancialRecord]) -> Decimal {
        let latest = window[0];

        let debt_score = match latest.total_liabilities.checked_div(latest.total_equity) {
            Some(ratio) => {
                let debt_ratio = (ratio * dec!(100))
                    .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
                if debt_ratio <= dec!(50) {
                    dec!(10)
                } else if debt_ratio <= dec!(80) {
                    dec!(7)
                } else if debt_ratio <= dec!(120) {
                    dec!(4)
                } else if debt_ratio <= dec!(150) {
                    dec!(2)
                } else {
                    Decimal::ZERO
                }
            }
            // zero equity: leverage is unbounded, worst band
            None => Decimal::ZERO,
        };

        let coverage_score = if latest.interest_expense > Decimal::ZERO {
            let coverage = (latest.ebit / latest.interest_expense)
                .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
            if coverage >= dec!(10) {
                dec!(5)
            } else if coverage >= dec!(5) {
                dec!(3)
            } else if coverage >= dec!(3) {
                dec!(1)
            } else {
                Decimal::ZERO
            }
        } else {
            dec!(5)
        };

        debt_score + coverage_score
    }

    /// Cash generation, 0-10 points: ten-year average free-cash-flow
    /// margin.
    fn cash_generation(&self, window: &[&AnnualFinancialRecord]) -> Decimal {
        let fcf_margins: Vec<f64> = window
            .iter()
            .map(|r| match r.free_cash_flow.checked_div(r.revenue) {
                Some(ratio) => (ratio * dec!(100))
                    .round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
                    .to_f64()
                    .unwrap_or(0.0),
                None => 0.0,
            })
            .collect();

        let avg_fcf_margin = stats::mean(&fcf_margins);

        if avg_fcf_margin >= 15.0 {
            dec!(10)
        } else if avg_fcf_margin >= 10.0 {
            dec!(7)
        } else if avg_fcf_margin >= 5.0 {
            dec!(4)
        } else if avg_fcf_margin >= 0.0 {
            dec!(2)
        } else {
            Decimal::ZERO
        }
    }
}

impl Default for QualityScoringEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fiscal_year: i32) -> AnnualFinancialRecord {
        AnnualFinancialRecord {
            fiscal_year,
            roe_pct: dec!(18),
            roic_pct: dec!(13),
            net_margin_pct: dec!(20),
            net_income: dec!(900),
            revenue: dec!(4500),
            operating_income: dec!(1100),
            total_equity: dec!(5000),
            total_liabilities: dec!(2000),
            eps: dec!(2.50),
            ebit: dec!(1200),
            interest_expense: Decimal::ZERO,
            free_cash_flow: dec!(900),
        }
    }

    // ten steady years, 2016..=2025
    fn history() -> Vec<AnnualFinancialRecord> {
        (2016..=2025).map(record).collect()
    }

    fn with_roe(roe_by_year_desc: [f64; 10]) -> Vec<AnnualFinancialRecord> {
        let mut records = history();
        records.sort_by(|a, b| b.fiscal_year.cmp(&a.fiscal_year));
        for (record, roe) in records.iter_mut().zip(roe_by_year_desc) {
            record.roe_pct = Decimal::from_f64(roe).unwrap();
        }
        records
    }

    #[test]
    fn fewer_than_ten_years_scores_zero() {
        let engine = QualityScoringEngine::new();
        let breakdown = engine.score(&history()[..7]);
        assert_eq!(breakdown.total(), dec!(0));
    }

    #[test]
    fn ten_years_above_fifteen_pct_roe_take_full_points() {
        let engine = QualityScoringEngine::new();
        let records = with_roe([18.0, 17.0, 16.0, 19.0, 20.0, 17.0, 18.0, 16.0, 19.0, 20.0]);
        assert_eq!(engine.score(&records).roe_consistency, dec!(25));
    }

    #[test]
    fn single_loss_year_zeroes_roe_factor() {
        let engine = QualityScoringEngine::new();
        let records = with_roe([18.0, 17.0, 16.0, 19.0, -2.0, 17.0, 18.0, 16.0, 19.0, 20.0]);
        let breakdown = engine.score(&records);
        assert_eq!(breakdown.roe_consistency, dec!(0));
        // other factors are unaffected by the loss year
        assert_eq!(breakdown.roic_consistency, dec!(20));
    }

    #[test]
    fn roe_ladder_intermediate_bands() {
        let engine = QualityScoringEngine::new();
        // eight of ten years at 15%+
        let records = with_roe([18.0, 17.0, 16.0, 19.0, 20.0, 17.0, 18.0, 16.0, 13.0, 13.0]);
        assert_eq!(engine.score(&records).roe_consistency, dec!(20));
        // all ten at 12%+ but not eight at 15%+
        let records = with_roe([13.0, 13.0, 13.0, 13.0, 13.0, 13.0, 13.0, 13.0, 13.0, 13.0]);
        assert_eq!(engine.score(&records).roe_consistency, dec!(15));
    }

    #[test]
    fn uniform_thirteen_pct_roic_takes_full_points() {
        let engine = QualityScoringEngine::new();
        assert_eq!(engine.score(&history()).roic_consistency, dec!(20));
    }

    #[test]
    fn roic_ladder_lower_bands() {
        let engine = QualityScoringEngine::new();
        let mut records = history();
        for record in &mut records {
            record.roic_pct = dec!(10);
        }
        assert_eq!(engine.score(&records).roic_consistency, dec!(10));
        records[0].roic_pct = dec!(7);
        records[1].roic_pct = dec!(7);
        assert_eq!(engine.score(&records).roic_consistency, dec!(5));
    }

    #[test]
    fn steady_twenty_pct_margins_take_full_points() {
        let engine = QualityScoringEngine::new();
        assert_eq!(engine.score(&history()).margin_stability, dec!(15));
    }

    #[test]
    fn volatile_margins_lose_stability_points() {
        let engine = QualityScoringEngine::new();
        let mut records = history();
        // mean 20 but large swings: sigma is 10
        for (i, record) in records.iter_mut().enumerate() {
            record.net_margin_pct = if i % 2 == 0 { dec!(30) } else { dec!(10) };
        }
        assert_eq!(engine.score(&records).margin_stability, dec!(10));
    }

    #[test]
    fn improving_roe_scores_trend_points() {
        let engine = QualityScoringEngine::new();
        // recent three at 22, past seven at 18: +22.2% improvement
        let records = with_roe([22.0, 22.0, 22.0, 18.0, 18.0, 18.0, 18.0, 18.0, 18.0, 18.0]);
        assert_eq!(engine.score(&records).profitability_trend, dec!(15));
    }

    #[test]
    fn flat_roe_scores_maintenance_points() {
        let engine = QualityScoringEngine::new();
        assert_eq!(engine.score(&history()).profitability_trend, dec!(6));
    }

    #[test]
    fn declining_roe_scores_by_severity() {
        let engine = QualityScoringEngine::new();
        // recent 19.2 vs past 20: -4% is a mild decline
        let records = with_roe([19.2, 19.2, 19.2, 20.0, 20.0, 20.0, 20.0, 20.0, 20.0, 20.0]);
        assert_eq!(engine.score(&records).profitability_trend, dec!(3));
        // recent 16 vs past 20: -20% scores nothing
        let records = with_roe([16.0, 16.0, 16.0, 20.0, 20.0, 20.0, 20.0, 20.0, 20.0, 20.0]);
        assert_eq!(engine.score(&records).profitability_trend, dec!(0));
    }

    #[test]
    fn zero_past_roe_is_treated_as_no_trend() {
        let engine = QualityScoringEngine::new();
        let records = with_roe([15.0, 15.0, 15.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(engine.score(&records).profitability_trend, dec!(6));
    }

    #[test]
    fn low_debt_and_no_interest_take_full_health_points() {
        let engine = QualityScoringEngine::new();
        let mut records = history();
        let latest = records.last_mut().unwrap();
        latest.total_liabilities = dec!(50);
        latest.total_equity = dec!(100);
        latest.interest_expense = Decimal::ZERO;
        assert_eq!(engine.score(&records).financial_health, dec!(15));
    }

    #[test]
    fn interest_coverage_bands() {
        let engine = QualityScoringEngine::new();
        let mut records = history();
        {
            let latest = records.last_mut().unwrap();
            latest.ebit = dec!(600);
            latest.interest_expense = dec!(100); // 6x coverage
        }
        // debt ratio 40% keeps the full 10 debt points
        assert_eq!(engine.score(&records).financial_health, dec!(13));

        records.last_mut().unwrap().interest_expense = dec!(400); // 1.5x
        assert_eq!(engine.score(&records).financial_health, dec!(10));
    }

    #[test]
    fn heavy_leverage_scores_no_debt_points() {
        let engine = QualityScoringEngine::new();
        let mut records = history();
        {
            let latest = records.last_mut().unwrap();
            latest.total_liabilities = dec!(8000); // 160%
        }
        assert_eq!(engine.score(&records).financial_health, dec!(5));

        // zero equity is the same worst band
        records.last_mut().unwrap().total_equity = Decimal::ZERO;
        assert_eq!(engine.score(&records).financial_health, dec!(5));
    }

    #[test]
    fn strong_fcf_margin_takes_full_cash_points() {
        let engine = QualityScoringEngine::new();
        // 900 / 4500 = 20% every year
        assert_eq!(engine.score(&history()).cash_generation, dec!(10));
    }

    #[test]
    fn zero_revenue_years_count_as_zero_margin() {
        let engine = QualityScoringEngine::new();
        let mut records = history();
        for record in &mut records {
            record.revenue = Decimal::ZERO;
        }
        // every margin substitutes to 0, mean 0 still lands the floor band
        assert_eq!(engine.score(&records).cash_generation, dec!(2));
    }

    #[test]
    fn record_order_does_not_change_the_score() {
        let engine = QualityScoringEngine::new();
        let records = with_roe([22.0, 22.0, 22.0, 18.0, 18.0, 18.0, 18.0, 18.0, 18.0, 18.0]);
        let mut shuffled = records.clone();
        shuffled.reverse();
        shuffled.swap(2, 7);
        assert_eq!(engine.score(&records).total(), engine.score(&shuffled).total());
    }

    #[test]
    fn steady_compounder_totals_ninety_one() {
        let engine = QualityScoringEngine::new();
        // 25 roe + 20 roic + 15 margins + 6 trend + 15 health + 10 cash
        assert_eq!(engine.score(&history()).total(), dec!(91.00));
    }

    #[test]
    fn improving_compounder_reaches_the_maximum() {
        let engine = QualityScoringEngine::new();
        let records = with_roe([22.0, 22.0, 22.0, 18.0, 18.0, 18.0, 18.0, 18.0, 18.0, 18.0]);
        assert_eq!(engine.score(&records).total(), dec!(100.00));
    }
}
