use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::Result;
use crate::gateways::PatternStore;
use crate::models::{Candle, IdentifiedPattern};
use crate::patterns;

/// Runs the detector table over caller-supplied candles and records the
/// formations it finds.
#[derive(Clone)]
pub struct PatternService {
    store: Arc<dyn PatternStore>,
}

impl PatternService {
    pub fn new(store: Arc<dyn PatternStore>) -> Self {
        Self { store }
    }

    /// Detect and persist every formation in the candle window. A save
    /// failure on one match is logged and skipped; the rest still land.
    pub async fn analyze_patterns(
        &self,
        token_address: &str,
        timeframe: &str,
        candles: &[Candle],
    ) -> Result<Vec<IdentifiedPattern>> {
        let matches = patterns::detect_all(candles);

        let mut saved = Vec::with_capacity(matches.len());
        for m in matches {
            let pattern = IdentifiedPattern {
                id: Uuid::new_v4(),
                token_address: token_address.to_string(),
                pattern_type: m.pattern_type,
                timeframe: timeframe.to_string(),
                confidence_score: m.confidence_score,
                price_at_identification: m.price_at_identification,
                pattern_data: m.pattern_data,
                identified_at: Utc::now(),
                completed_at: None,
                is_completed: false,
            };

            match self.store.save(pattern).await {
                Ok(persisted) => {
                    tracing::info!(
                        token_address,
                        timeframe,
                        pattern = %persisted.pattern_type,
                        confidence = persisted.confidence_score,
                        "Pattern identified"
                    );
                    saved.push(persisted);
                }
                Err(e) => {
                    tracing::warn!(token_address, error = %e, "Failed to persist pattern match");
                }
            }
        }

        Ok(saved)
    }

    pub async fn find_patterns(
        &self,
        token_address: &str,
        timeframe: &str,
    ) -> Result<Vec<IdentifiedPattern>> {
        self.store.find_by_token(token_address, timeframe).await
    }

    /// Flip a pattern to completed. The shape data never changes.
    pub async fn mark_completed(&self, id: Uuid) -> Result<()> {
        self.store.mark_completed(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::PatternType;
    use crate::error::AppError;
    use crate::patterns::testutil::candles_from_closes;
    use crate::store::MemoryPatternStore;

    fn head_and_shoulders_candles() -> Vec<Candle> {
        let mut closes = vec![90.0; 20];
        closes[5] = 100.0;
        closes[10] = 120.0;
        closes[15] = 101.0;
        candles_from_closes(&closes)
    }

    #[tokio::test]
    async fn matches_are_persisted_and_returned() {
        let store = Arc::new(MemoryPatternStore::new());
        let service = PatternService::new(store);

        let candles = head_and_shoulders_candles();
        let saved = service
            .analyze_patterns("mint", "4h", &candles)
            .await
            .unwrap();

        assert!(!saved.is_empty());
        assert_eq!(saved[0].pattern_type, PatternType::HeadAndShoulders);
        assert_eq!(saved[0].token_address, "mint");
        assert_eq!(saved[0].timeframe, "4h");
        assert!(!saved[0].is_completed);

        let found = service.find_patterns("mint", "4h").await.unwrap();
        assert_eq!(found.len(), saved.len());
    }

    #[tokio::test]
    async fn short_series_persists_nothing() {
        let store = Arc::new(MemoryPatternStore::new());
        let service = PatternService::new(store);

        let candles = candles_from_closes(&[100.0; 10]);
        let saved = service
            .analyze_patterns("mint", "1h", &candles)
            .await
            .unwrap();
        assert!(saved.is_empty());
    }

    #[tokio::test]
    async fn mark_completed_flips_flags_only() {
        let store = Arc::new(MemoryPatternStore::new());
        let service = PatternService::new(store.clone());

        let candles = head_and_shoulders_candles();
        let saved = service
            .analyze_patterns("mint", "4h", &candles)
            .await
            .unwrap();
        let target = &saved[0];

        service.mark_completed(target.id).await.unwrap();

        let found = service.find_patterns("mint", "4h").await.unwrap();
        let completed = found.iter().find(|p| p.id == target.id).unwrap();
        assert!(completed.is_completed);
        assert!(completed.completed_at.is_some());
        assert_eq!(completed.pattern_data, target.pattern_data);
    }

    #[tokio::test]
    async fn completing_missing_pattern_is_not_found() {
        let service = PatternService::new(Arc::new(MemoryPatternStore::new()));
        let err = service.mark_completed(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::PatternNotFound));
    }
}
