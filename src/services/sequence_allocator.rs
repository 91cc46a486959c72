use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

use crate::{
    domain::{
        errors::{RecordError, RecordResult, StoreResult},
        models::EntityDetails,
        value_objects::{Identifier, IdentifierBlock},
    },
    ports::storage::DocumentStore,
};

/// Default number of allocation attempts before reporting a conflict
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay between allocation attempts
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(5);

/// Retry policy for identifier allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorConfig {
    pub max_attempts: u32,
    /// Base delay after a lost race, grown linearly per attempt and jittered
    pub retry_backoff: Duration,
}

impl AllocatorConfig {
    /// At least one attempt is always made
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    pub fn with_retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    /// Delay before the attempt after `round`: `round * base` plus up to one base of jitter
    pub fn backoff(&self, round: u32) -> Duration {
        let base = self.retry_backoff.as_micros() as u64;
        if base == 0 {
            return Duration::ZERO;
        }
        let jitter = rand::rng().random_range(0..=base);
        Duration::from_micros(base * u64::from(round) + jitter)
    }
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

/// Derives the next identifiers of a collection from its current maximum.
///
/// Nothing is cached between calls. Two writers can read the same maximum,
/// so callers go through [`SequenceAllocator::with_fresh_identifier`] or
/// [`SequenceAllocator::with_fresh_block`], which re-read and retry when the
/// store reports the identifier as taken.
#[derive(Clone)]
pub struct SequenceAllocator<D: EntityDetails> {
    store: Arc<dyn DocumentStore<D>>,
    config: AllocatorConfig,
}

impl<D: EntityDetails> SequenceAllocator<D> {
    pub fn new(store: Arc<dyn DocumentStore<D>>, config: AllocatorConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> AllocatorConfig {
        self.config
    }

    /// Current maximum plus one, or the first identifier for an empty collection
    pub async fn next_identifier(&self) -> StoreResult<Identifier> {
        let max = self.store.find_max_identifier().await?;
        Ok(Identifier::after(max))
    }

    /// Reserve `count` consecutive identifiers after the current maximum
    pub async fn reserve_block(&self, count: usize) -> StoreResult<IdentifierBlock> {
        Ok(IdentifierBlock::new(self.next_identifier().await?, count))
    }

    /// Run `attempt` with a freshly read identifier until it stops colliding
    pub async fn with_fresh_identifier<T, F, Fut>(&self, mut attempt: F) -> RecordResult<T>
    where
        F: FnMut(Identifier) -> Fut + Send,
        Fut: Future<Output = StoreResult<T>> + Send,
        T: Send,
    {
        for round in 1..=self.config.max_attempts {
            let identifier = self.next_identifier().await?;
            match attempt(identifier).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_duplicate_identifier() => {
                    warn!(
                        collection = D::KIND.collection(),
                        identifier = %identifier,
                        attempt = round,
                        "Identifier already taken, allocating again"
                    );
                    self.pause(round).await;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(self.exhausted())
    }

    /// Run `attempt` with a freshly reserved block until it stops colliding
    pub async fn with_fresh_block<T, F, Fut>(&self, count: usize, mut attempt: F) -> RecordResult<T>
    where
        F: FnMut(IdentifierBlock) -> Fut + Send,
        Fut: Future<Output = StoreResult<T>> + Send,
        T: Send,
    {
        for round in 1..=self.config.max_attempts {
            let block = self.reserve_block(count).await?;
            match attempt(block).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_duplicate_identifier() => {
                    warn!(
                        collection = D::KIND.collection(),
                        start = %block.start(),
                        len = block.len(),
                        attempt = round,
                        "Identifier block overlaps existing records, reserving again"
                    );
                    self.pause(round).await;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(self.exhausted())
    }

    /// Back off before the next attempt; nothing to wait for after the last one
    async fn pause(&self, round: u32) {
        if round < self.config.max_attempts {
            tokio::time::sleep(self.config.backoff(round)).await;
        }
    }

    fn exhausted(&self) -> RecordError {
        warn!(
            collection = D::KIND.collection(),
            attempts = self.config.max_attempts,
            "Giving up on identifier allocation"
        );
        RecordError::Conflict {
            kind: D::KIND,
            attempts: self.config.max_attempts,
        }
    }
}
