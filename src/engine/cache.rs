//! Per-commodity model cache
//!
//! Reads share an async `RwLock`; each key also has a training lock so at most
//! one training per commodity runs at a time. Invalidation bumps a generation
//! counter, and a finished training publishes only if the generation it started
//! under is still current. A model trained against history that has since been
//! invalidated therefore serves its own in-flight call and is then dropped.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;
use crate::ml::PricePredictor;

/// A trained predictor bound to one commodity
#[derive(Debug)]
pub struct TrainedModel {
    pub id: Uuid,
    pub commodity_id: String,
    pub predictor: Arc<dyn PricePredictor>,
    pub trained_at: DateTime<Utc>,
}

/// Where a model handed out by the cache came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    /// Trained by this call and published
    Trained,
    /// Trained by this call but not published because of an invalidation
    TrainedStale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket {
    epoch: u64,
    generation: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    models: HashMap<String, Arc<TrainedModel>>,
    /// Per-key invalidation counters
    generations: HashMap<String, u64>,
    /// Bumped by clear-all
    epoch: u64,
}

impl CacheState {
    fn ticket(&self, key: &str) -> Ticket {
        Ticket {
            epoch: self.epoch,
            generation: self.generations.get(key).copied().unwrap_or(0),
        }
    }
}

/// Concurrency-safe map from commodity id to trained model
#[derive(Debug, Default)]
pub struct ModelCache {
    state: RwLock<CacheState>,
    training_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<Arc<TrainedModel>> {
        self.state.read().await.models.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.models.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.models.is_empty()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.state.read().await.models.contains_key(key)
    }

    fn training_lock(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        self.training_locks
            .lock()
            .entry(key.to_string())
            .or_default()
            .clone()
    }

    /// Return the cached model for `key`, or run `train` and publish the result.
    ///
    /// A failed training publishes nothing and propagates the error. Dropping
    /// the returned future mid-training publishes nothing either.
    pub async fn get_or_train<F, Fut>(
        &self,
        key: &str,
        train: F,
    ) -> Result<(Arc<TrainedModel>, CacheOutcome)>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Arc<dyn PricePredictor>>>,
    {
        if let Some(model) = self.get(key).await {
            return Ok((model, CacheOutcome::Hit));
        }

        let lock = self.training_lock(key);
        let _guard = lock.lock().await;

        // another caller may have published while we waited
        let ticket = {
            let state = self.state.read().await;
            if let Some(model) = state.models.get(key) {
                return Ok((model.clone(), CacheOutcome::Hit));
            }
            state.ticket(key)
        };

        let predictor = train().await?;
        let model = Arc::new(TrainedModel {
            id: Uuid::new_v4(),
            commodity_id: key.to_string(),
            predictor,
            trained_at: Utc::now(),
        });

        let mut state = self.state.write().await;
        if state.ticket(key) != ticket {
            tracing::warn!(
                commodity = key,
                model_id = %model.id,
                "Cache invalidated during training, model not published"
            );
            return Ok((model, CacheOutcome::TrainedStale));
        }

        state.models.insert(key.to_string(), model.clone());
        Ok((model, CacheOutcome::Trained))
    }

    /// Evict one model, or every model when `key` is `None`. Returns how many
    /// models were dropped.
    ///
    /// Per-key bookkeeping lives until the next clear-all, which prunes it.
    pub async fn invalidate(&self, key: Option<&str>) -> usize {
        let mut state = self.state.write().await;
        match key {
            Some(key) => {
                *state.generations.entry(key.to_string()).or_insert(0) += 1;
                usize::from(state.models.remove(key).is_some())
            }
            None => {
                // the epoch bump already voids every outstanding ticket
                state.epoch += 1;
                state.generations.clear();
                // locks held by an in-flight training have more than one owner
                self.training_locks
                    .lock()
                    .retain(|_, lock| Arc::strong_count(lock) > 1);
                let dropped = state.models.len();
                state.models.clear();
                dropped
            }
        }
    }
}
