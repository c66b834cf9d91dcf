//! Evaluation pipeline: fetch one instrument's inputs, run the quality
//! rubric, short-circuit below the qualification bar, otherwise appraise
//! and classify, then hand the result to the persistence collaborator.

use intrinsic_value::IntrinsicValueEngine;
use quality_scoring::QualityScoringEngine;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use screener_core::{InstrumentScoreResult, MarketDataStore, ScoreStore, ScreenerError};

pub mod batch;
pub use batch::{BatchEvaluator, BatchReport};

pub struct ScoringOrchestrator<M, S> {
    market_data: M,
    score_store: S,
    quality_engine: QualityScoringEngine,
    valuation_engine: IntrinsicValueEngine,
    /// Minimum quality score an instrument must reach to be appraised
    pub qualification_threshold: Decimal,
}

impl<M: MarketDataStore, S: ScoreStore> ScoringOrchestrator<M, S> {
    pub fn new(market_data: M, score_store: S) -> Self {
        Self {
            market_data,
            score_store,
            quality_engine: QualityScoringEngine::new(),
            valuation_engine: IntrinsicValueEngine::new(),
            qualification_threshold: dec!(85.00),
        }
    }

    /// Evaluate one instrument end to end and persist the outcome.
    ///
    /// Both inputs are resolved before any scoring; a missing history or
    /// snapshot is a not-found failure and nothing is written. Every
    /// write hands the store all four result fields at once, so a
    /// disqualification also clears any stale valuation.
    pub async fn evaluate(
        &self,
        instrument_id: i64,
    ) -> Result<InstrumentScoreResult, ScreenerError> {
        tracing::info!("Starting evaluation for instrument {}", instrument_id);

        let history = self.market_data.financial_history(instrument_id).await?;
        let snapshot = self.market_data.price_snapshot(instrument_id).await?;

        let breakdown = self.quality_engine.score(&history);
        let quality_score = breakdown.total();
        tracing::debug!(
            "Instrument {} sub-scores: roe={} roic={} margin={} trend={} health={} cash={}",
            instrument_id,
            breakdown.roe_consistency,
            breakdown.roic_consistency,
            breakdown.margin_stability,
            breakdown.profitability_trend,
            breakdown.financial_health,
            breakdown.cash_generation,
        );

        if quality_score < self.qualification_threshold {
            tracing::info!(
                "Instrument {} below the quality bar at {} points, skipping valuation",
                instrument_id,
                quality_score
            );
            let result = InstrumentScoreResult::disqualified(quality_score);
            self.score_store.persist_result(instrument_id, &result).await?;
            return Ok(result);
        }

        tracing::info!("Instrument {} qualified at {} points", instrument_id, quality_score);

        let valuation = self.valuation_engine.appraise(&history);
        tracing::debug!(
            "Instrument {} appraisal: growth {:.2}%, future EPS {}, multiple {}, theoretical {}, intrinsic {}",
            instrument_id,
            valuation.growth_rate_pct,
            valuation.future_eps,
            valuation.fair_multiple,
            valuation.theoretical_value,
            valuation.intrinsic_value,
        );

        let result = self.valuation_engine.classify(
            quality_score,
            snapshot.current_price,
            valuation.intrinsic_value,
        );
        tracing::info!(
            "Instrument {} classified {} (current {} vs intrinsic {})",
            instrument_id,
            result.price_status.to_label(),
            snapshot.current_price,
            valuation.intrinsic_value,
        );

        self.score_store.persist_result(instrument_id, &result).await?;
        Ok(result)
    }
}
