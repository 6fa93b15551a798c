use crate::domain::quota::CounterKey;
use crate::error::AppResult;
use async_trait::async_trait;

/// Durable usage counters keyed by (subject, resource, period).
///
/// Implementations must make `increment_and_read` a single atomic operation at
/// the storage layer. Concurrent increments for one key must never lose an update,
/// so a read followed by a write is not an acceptable implementation.
#[async_trait]
pub trait UsageCounterRepository: Send + Sync {
    /// Current count, 0 when the counter has not been created yet
    async fn read_count(&self, key: &CounterKey) -> AppResult<i64>;

    /// Add `amount` and return the count after the increment
    async fn increment_and_read(&self, key: &CounterKey, amount: i64) -> AppResult<i64>;
}
