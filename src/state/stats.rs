//! Cross-session completion stats.
//!
//! [`StatsRecord::merge`] folds one won session into the running record:
//! completions and coins are summed, best time and best moves keep the
//! minimum. The record lives in a caller-supplied [`StatsStore`]; this module
//! never owns a storage medium.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::session::SessionSummary;

/// Aggregate over every won session seen by a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsRecord {
    pub completions: u32,
    pub coins: u64,
    /// Fastest completion, in seconds
    pub best_time: Option<f64>,
    pub best_moves: Option<u32>,
    pub last_completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl StatsRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a won session into this record, returning the updated copy.
    pub fn merge(&self, summary: &SessionSummary) -> Self {
        let best_time = match self.best_time {
            Some(best) => best.min(summary.elapsed_seconds),
            None => summary.elapsed_seconds,
        };
        let best_moves = match self.best_moves {
            Some(best) => best.min(summary.move_count),
            None => summary.move_count,
        };

        Self {
            completions: self.completions.saturating_add(1),
            coins: self.coins.saturating_add(u64::from(summary.collected_count)),
            best_time: Some(best_time),
            best_moves: Some(best_moves),
            last_completed_at: Some(summary.finished_at),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "completions": self.completions,
            "coins": self.coins,
            "best_time": self.best_time,
            "best_moves": self.best_moves
        })
    }
}

/// Store errors.
#[derive(Debug, Error)]
pub enum StatsStoreError {
    #[error("Stats payload could not be encoded or decoded: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("Stats store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence boundary for [`StatsRecord`]s.
pub trait StatsStore {
    fn read(&self) -> Result<StatsRecord, StatsStoreError>;
    fn write(&mut self, record: &StatsRecord) -> Result<(), StatsStoreError>;
}

/// Keeps the record in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStatsStore {
    record: StatsRecord,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: StatsRecord) -> Self {
        Self { record }
    }
}

impl StatsStore for MemoryStatsStore {
    fn read(&self) -> Result<StatsRecord, StatsStoreError> {
        Ok(self.record.clone())
    }

    fn write(&mut self, record: &StatsRecord) -> Result<(), StatsStoreError> {
        self.record = record.clone();
        Ok(())
    }
}

/// Keeps the record as a JSON document, the shape a key-value browser
/// store would hold. An empty store reads as a fresh record.
#[derive(Debug, Clone, Default)]
pub struct JsonStatsStore {
    payload: Option<String>,
}

impl JsonStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Some(payload.into()),
        }
    }

    pub fn payload(&self) -> Option<&str> {
        self.payload.as_deref()
    }
}

impl StatsStore for JsonStatsStore {
    fn read(&self) -> Result<StatsRecord, StatsStoreError> {
        match &self.payload {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(StatsRecord::default()),
        }
    }

    fn write(&mut self, record: &StatsRecord) -> Result<(), StatsStoreError> {
        self.payload = Some(serde_json::to_string(record)?);
        Ok(())
    }
}

/// Folds won sessions into the record held by a store.
#[derive(Debug, Default)]
pub struct StatsAggregator<S> {
    store: S,
}

impl<S: StatsStore> StatsAggregator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read the current record, merge the session, write it back.
    pub fn on_won(&mut self, summary: &SessionSummary) -> Result<StatsRecord, StatsStoreError> {
        let previous = self.store.read()?;
        let record = previous.merge(summary);
        self.store.write(&record)?;

        tracing::info!(
            completions = record.completions,
            coins = record.coins,
            best_moves = ?record.best_moves,
            "stats updated"
        );
        Ok(record)
    }

    pub fn record(&self) -> Result<StatsRecord, StatsStoreError> {
        self.store.read()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::difficulty::Difficulty;
    use pretty_assertions::assert_eq;

    fn make_summary(elapsed_seconds: f64, move_count: u32, collected_count: u32) -> SessionSummary {
        SessionSummary {
            difficulty: Some(Difficulty::Easy),
            move_count,
            elapsed_seconds,
            collected_count,
            total_collectibles: 5,
            finished_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_first_merge() {
        let record = StatsRecord::new().merge(&make_summary(12.5, 40, 3));
        assert_eq!(record.completions, 1);
        assert_eq!(record.coins, 3);
        assert_eq!(record.best_time, Some(12.5));
        assert_eq!(record.best_moves, Some(40));
        assert!(record.last_completed_at.is_some());
    }

    #[test]
    fn test_merge_keeps_minimums() {
        let sessions = [(30.0, 50, 2), (18.0, 61, 0), (25.5, 44, 5)];
        let mut aggregator = StatsAggregator::new(MemoryStatsStore::new());
        for (time, moves, coins) in sessions {
            aggregator.on_won(&make_summary(time, moves, coins)).unwrap();
        }

        let record = aggregator.record().unwrap();
        assert_eq!(record.completions, 3);
        assert_eq!(record.coins, 7);
        assert_eq!(record.best_time, Some(18.0));
        assert_eq!(record.best_moves, Some(44));
    }

    #[test]
    fn test_merge_is_pure() {
        let previous = StatsRecord::new().merge(&make_summary(10.0, 20, 1));
        let before = previous.clone();
        let _ = previous.merge(&make_summary(5.0, 10, 1));
        assert_eq!(previous, before);
    }

    #[test]
    fn test_json_store_roundtrip() {
        let mut aggregator = StatsAggregator::new(JsonStatsStore::new());
        assert_eq!(aggregator.record().unwrap(), StatsRecord::default());

        aggregator.on_won(&make_summary(9.0, 28, 4)).unwrap();
        let store = aggregator.into_store();
        let payload = store.payload().unwrap().to_string();

        let reloaded = JsonStatsStore::from_payload(payload).read().unwrap();
        assert_eq!(reloaded.completions, 1);
        assert_eq!(reloaded.coins, 4);
        assert_eq!(reloaded.best_moves, Some(28));
    }

    #[test]
    fn test_json_store_corrupt_payload() {
        let mut aggregator = StatsAggregator::new(JsonStatsStore::from_payload("not json"));
        let result = aggregator.on_won(&make_summary(1.0, 2, 0));
        assert!(matches!(result, Err(StatsStoreError::Codec(_))));
        assert_eq!(aggregator.store().payload(), Some("not json"));
    }

    #[test]
    fn test_legacy_payload_defaults() {
        let store = JsonStatsStore::from_payload(r#"{"completions": 2, "coins": 9}"#);
        let record = store.read().unwrap();
        assert_eq!(record.completions, 2);
        assert_eq!(record.best_time, None);
    }
}
