use crate::ScoringOrchestrator;
use screener_core::{InstrumentScoreResult, MarketDataStore, ScoreStore, ScreenerError};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Outcome of one batch run, ordered by instrument id
#[derive(Debug)]
pub struct BatchReport {
    pub results: Vec<(i64, Result<InstrumentScoreResult, ScreenerError>)>,
    pub total_requested: usize,
    pub total_qualified: usize,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Fans evaluation out over a set of instruments
pub struct BatchEvaluator<M, S> {
    orchestrator: Arc<ScoringOrchestrator<M, S>>,
}

impl<M, S> BatchEvaluator<M, S>
where
    M: MarketDataStore + 'static,
    S: ScoreStore + 'static,
{
    pub fn new(orchestrator: Arc<ScoringOrchestrator<M, S>>) -> Self {
        Self { orchestrator }
    }

    /// Evaluate each instrument in its own task. Evaluations are
    /// independent, so one failed slot never aborts the others.
    pub async fn run(&self, instrument_ids: Vec<i64>) -> BatchReport {
        let total_requested = instrument_ids.len();
        tracing::info!("Starting batch evaluation of {} instruments", total_requested);

        let mut tasks = JoinSet::new();
        for instrument_id in instrument_ids {
            let orchestrator = Arc::clone(&self.orchestrator);
            tasks.spawn(async move { (instrument_id, orchestrator.evaluate(instrument_id).await) });
        }

        let mut results = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((instrument_id, Err(e))) => {
                    tracing::warn!("Evaluation of instrument {} failed: {}", instrument_id, e);
                    results.push((instrument_id, Err(e)));
                }
                Ok(entry) => results.push(entry),
                Err(e) => tracing::error!("Evaluation task error: {}", e),
            }
        }
        results.sort_by_key(|(instrument_id, _)| *instrument_id);

        let total_qualified = results
            .iter()
            .filter(|(_, r)| r.as_ref().map_or(false, |result| result.qualified))
            .count();
        tracing::info!(
            "Batch complete: {}/{} instruments qualified",
            total_qualified,
            total_requested
        );

        BatchReport {
            results,
            total_requested,
            total_qualified,
            timestamp: chrono::Utc::now(),
        }
    }
}
