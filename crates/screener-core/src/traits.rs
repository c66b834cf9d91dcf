use crate::{AnnualFinancialRecord, InstrumentScoreResult, PriceSnapshot, ScreenerError};
use async_trait::async_trait;

/// Lookup capability serving an instrument's scoring inputs
#[async_trait]
pub trait MarketDataStore: Send + Sync {
    /// Annual records for one instrument, any order. Missing history is
    /// a not-found condition, not an empty collection.
    async fn financial_history(
        &self,
        instrument_id: i64,
    ) -> Result<Vec<AnnualFinancialRecord>, ScreenerError>;

    async fn price_snapshot(&self, instrument_id: i64) -> Result<PriceSnapshot, ScreenerError>;
}

/// Persistence capability accepting an evaluation result
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Overwrite the instrument's stored score, qualification flag, price
    /// status and target price as one atomic unit.
    async fn persist_result(
        &self,
        instrument_id: i64,
        result: &InstrumentScoreResult,
    ) -> Result<(), ScreenerError>;
}
