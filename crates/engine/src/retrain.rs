//! Background retraining: single-flight cycles and the scheduler loop.

use crate::engine::RecommendationEngine;
use crate::error::EngineError;
use crate::model::ModelState;
use crate::sources::MetricEvent;
use serde::{Deserialize, Serialize};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

/// Whether a retrain cycle is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingStatus {
    /// No cycle in progress; the published state is serving.
    Idle,
    /// A cycle is rebuilding a fresh state.
    Training,
}

/// Result of one retrain attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrainOutcome {
    /// A fresh model state was published.
    Completed {
        /// Generation of the published state.
        generation: u64,
    },
    /// Another cycle holds the guard; this attempt was a no-op.
    AlreadyRunning,
    /// The cycle failed; the previous state remains authoritative.
    Failed,
}

impl RecommendationEngine {
    /// Current scheduler state.
    pub fn training_status(&self) -> TrainingStatus {
        if self.training.load(Ordering::SeqCst) {
            TrainingStatus::Training
        } else {
            TrainingStatus::Idle
        }
    }

    /// Run one retrain cycle.
    ///
    /// An atomic swap on the guard makes the cycle single-flight: an attempt
    /// while another is in progress returns immediately. The cycle rebuilds
    /// every profile and cache from the full history into a fresh state and
    /// publishes it with one reference swap; on any failure the guard is
    /// cleared and the previous state keeps serving.
    pub async fn retrain(&self) -> RetrainOutcome {
        if self.training.swap(true, Ordering::SeqCst) {
            tracing::debug!(
                target: "humidor::retrain",
                "retrain already in progress; skipping"
            );
            return RetrainOutcome::AlreadyRunning;
        }

        let started = Instant::now();
        let result = self.rebuild().await;
        self.training.store(false, Ordering::SeqCst);

        match result {
            Ok((generation, users)) => {
                tracing::info!(
                    target: "humidor::retrain",
                    generation,
                    users,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "retrain cycle finished"
                );
                self.metrics
                    .emit(MetricEvent::RetrainCompleted { generation, users });
                RetrainOutcome::Completed { generation }
            }
            Err(error) => {
                tracing::warn!(
                    target: "humidor::retrain",
                    error = %error,
                    "retrain cycle failed; previous model retained"
                );
                RetrainOutcome::Failed
            }
        }
    }

    async fn rebuild(&self) -> Result<(u64, usize), EngineError> {
        let catalog = self
            .catalog_source
            .load_catalog()
            .await
            .map_err(EngineError::DataLoad)?;
        let interactions = self
            .interaction_log
            .all()
            .await
            .map_err(EngineError::DataLoad)?;
        let interactions = self.apply_retention(interactions);

        let generation = self.next_generation();
        let state = ModelState::build(catalog, &interactions, generation);
        let users = state.profiles.len();

        // The one swap readers can observe; in-flight requests keep their
        // previously cloned snapshot.
        *self.state.write() = Arc::new(state);
        Ok((generation, users))
    }

    /// Spawn the background scheduler: one cycle after the startup delay,
    /// then one per interval, forever.
    pub fn spawn_retrain_scheduler(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(engine.config.retrain_startup_delay()).await;
            engine.retrain().await;
            loop {
                tokio::time::sleep(engine.config.retrain_interval()).await;
                engine.retrain().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn training_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TrainingStatus::Training).unwrap(),
            "\"training\""
        );
    }
}
