//! Retrain scheduling, single-flight guarding, and snapshot consistency.

use async_trait::async_trait;
use humidor_engine::{
    CatalogSource, EngineConfig, MemoryInteractionLog, RecommendationEngine, RetrainOutcome,
    TrainingStatus,
};
use humidor_test_utils::{interaction, interaction_at, sample_catalog};
use humidor_types::{Algorithm, CatalogItem, InteractionKind, RecommendationRequest};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Catalog source whose loads block until the test releases a gate.
struct GatedCatalog {
    items: Vec<CatalogItem>,
    gate: Arc<tokio::sync::Mutex<()>>,
    entered: Arc<Notify>,
}

#[async_trait]
impl CatalogSource for GatedCatalog {
    async fn load_catalog(&self) -> anyhow::Result<Vec<CatalogItem>> {
        self.entered.notify_one();
        let _open = self.gate.lock().await;
        Ok(self.items.clone())
    }
}

/// Serves `first` on the initial load, then blocks on the gate and serves
/// `rest` for every later load.
struct SwitchingCatalog {
    calls: AtomicUsize,
    first: Vec<CatalogItem>,
    rest: Vec<CatalogItem>,
    gate: Arc<tokio::sync::Mutex<()>>,
    entered: Arc<Notify>,
}

#[async_trait]
impl CatalogSource for SwitchingCatalog {
    async fn load_catalog(&self) -> anyhow::Result<Vec<CatalogItem>> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            return Ok(self.first.clone());
        }
        self.entered.notify_one();
        let _open = self.gate.lock().await;
        Ok(self.rest.clone())
    }
}

/// Catalog source that fails every load after the first.
struct FailingCatalog {
    calls: AtomicUsize,
    items: Vec<CatalogItem>,
}

#[async_trait]
impl CatalogSource for FailingCatalog {
    async fn load_catalog(&self) -> anyhow::Result<Vec<CatalogItem>> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(self.items.clone())
        } else {
            anyhow::bail!("catalog endpoint unreachable")
        }
    }
}

fn prefixed_catalog(prefix: &str) -> Vec<CatalogItem> {
    sample_catalog()
        .into_iter()
        .map(|mut item| {
            item.name = format!("{prefix}-{}", item.name);
            item
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn overlapping_retrains_are_single_flight() {
    let gate = Arc::new(tokio::sync::Mutex::new(()));
    let entered = Arc::new(Notify::new());
    let engine = Arc::new(
        RecommendationEngine::builder()
            .with_catalog_source(Arc::new(GatedCatalog {
                items: sample_catalog(),
                gate: gate.clone(),
                entered: entered.clone(),
            }))
            .build(),
    );

    // Hold the gate so the first cycle parks inside its catalog load.
    let held = gate.lock().await;
    let first = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.retrain().await })
    };
    entered.notified().await;

    assert_eq!(engine.training_status(), TrainingStatus::Training);
    assert_eq!(engine.retrain().await, RetrainOutcome::AlreadyRunning);

    drop(held);
    let outcome = first.await.unwrap();
    assert!(matches!(outcome, RetrainOutcome::Completed { .. }));
    assert_eq!(engine.training_status(), TrainingStatus::Idle);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn reads_during_retrain_observe_one_generation() {
    let gate = Arc::new(tokio::sync::Mutex::new(()));
    let entered = Arc::new(Notify::new());
    let engine = Arc::new(
        RecommendationEngine::builder()
            .with_catalog_source(Arc::new(SwitchingCatalog {
                calls: AtomicUsize::new(0),
                first: prefixed_catalog("old"),
                rest: prefixed_catalog("new"),
                gate: gate.clone(),
                entered: entered.clone(),
            }))
            .with_interaction_log(Arc::new(MemoryInteractionLog::with_history(vec![
                interaction("u1", "old-Midnight Reserve", InteractionKind::Favorite),
                interaction("u2", "old-Morning Shade", InteractionKind::Click),
            ])))
            .build(),
    );

    engine.initialize().await;
    let before = engine.export_recommendation_data();
    assert_eq!(before.stats.total_items, 5);

    let held = gate.lock().await;
    let retrain = {
        let engine = engine.clone();
        tokio::spawn(async move { engine.retrain().await })
    };
    entered.notified().await;

    // Mid-retrain reads serve entirely from the pre-retrain snapshot: every
    // item is an "old" one and the generation is unchanged.
    let during = engine
        .get_recommendations(
            None,
            RecommendationRequest::with_algorithm(Algorithm::Popularity, 10),
        )
        .await;
    assert!(!during.is_empty());
    assert!(during.iter().all(|r| r.item.name.starts_with("old-")));
    let during_generation = engine.export_recommendation_data().stats.generation;
    assert_eq!(during_generation, before.stats.generation);

    drop(held);
    assert!(matches!(
        retrain.await.unwrap(),
        RetrainOutcome::Completed { .. }
    ));

    // Post-retrain reads serve entirely from the new snapshot; the old item
    // names no longer resolve against the catalog.
    let after = engine.export_recommendation_data();
    assert!(after.stats.generation > before.stats.generation);
    let after_recs = engine
        .get_recommendations(
            None,
            RecommendationRequest::with_algorithm(Algorithm::Popularity, 10),
        )
        .await;
    assert!(after_recs.iter().all(|r| r.item.name.starts_with("new-")));
}

#[tokio::test]
async fn failed_retrain_keeps_previous_state() {
    let engine = RecommendationEngine::builder()
        .with_catalog_source(Arc::new(FailingCatalog {
            calls: AtomicUsize::new(0),
            items: sample_catalog(),
        }))
        .build();
    engine.initialize().await;
    let before = engine.export_recommendation_data();
    assert_eq!(before.stats.total_items, 5);

    assert_eq!(engine.retrain().await, RetrainOutcome::Failed);

    let after = engine.export_recommendation_data();
    assert_eq!(after.stats.total_items, 5);
    assert_eq!(after.stats.generation, before.stats.generation);
    assert_eq!(engine.training_status(), TrainingStatus::Idle);
}

#[tokio::test]
async fn retrain_rebuilds_profiles_from_full_history() {
    let catalog = sample_catalog();
    let engine = RecommendationEngine::builder()
        .with_catalog_source(Arc::new(humidor_engine::StaticCatalog::new(catalog)))
        .with_interaction_log(Arc::new(MemoryInteractionLog::with_history(vec![
            interaction("u1", "Midnight Reserve", InteractionKind::Favorite),
            interaction("u2", "Morning Shade", InteractionKind::Click),
        ])))
        .build();
    engine.initialize().await;

    let outcome = engine.retrain().await;
    assert!(matches!(outcome, RetrainOutcome::Completed { .. }));
    let snapshot = engine.export_recommendation_data();
    assert_eq!(snapshot.stats.total_users, 2);
    assert_eq!(snapshot.stats.total_interactions, 2);
}

#[tokio::test]
async fn retention_keeps_only_newest_events() {
    let engine = RecommendationEngine::builder()
        .with_catalog_source(Arc::new(humidor_engine::StaticCatalog::new(sample_catalog())))
        .with_interaction_log(Arc::new(MemoryInteractionLog::with_history(vec![
            interaction_at("u1", "Midnight Reserve", InteractionKind::View, 0),
            interaction_at("u1", "Morning Shade", InteractionKind::View, 10),
            interaction_at("u1", "Cedar Crown", InteractionKind::View, 20),
        ])))
        .with_config(EngineConfig {
            max_interactions: Some(2),
            ..Default::default()
        })
        .build();
    engine.initialize().await;

    let snapshot = engine.export_recommendation_data();
    assert_eq!(snapshot.stats.total_interactions, 2);

    // The oldest event fell out of the window: its item is recommendable
    // again for u1 under the content model.
    let recommendations = engine
        .get_recommendations(
            Some("u1"),
            RecommendationRequest::with_algorithm(Algorithm::Content, 10),
        )
        .await;
    assert!(recommendations
        .iter()
        .any(|r| r.item.name == "Midnight Reserve"));
}

#[tokio::test(start_paused = true)]
async fn scheduler_runs_startup_and_interval_cycles() {
    let calls = Arc::new(AtomicUsize::new(0));

    struct CountingCatalog {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CatalogSource for CountingCatalog {
        async fn load_catalog(&self) -> anyhow::Result<Vec<CatalogItem>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(sample_catalog())
        }
    }

    let engine = Arc::new(
        RecommendationEngine::builder()
            .with_catalog_source(Arc::new(CountingCatalog {
                calls: calls.clone(),
            }))
            .with_config(EngineConfig {
                retrain_startup_delay_secs: 60,
                retrain_interval_secs: 600,
                ..Default::default()
            })
            .build(),
    );

    let handle = engine.spawn_retrain_scheduler();

    // Nothing before the startup delay elapses.
    tokio::time::sleep(std::time::Duration::from_secs(30)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    // Startup cycle.
    tokio::time::sleep(std::time::Duration::from_secs(31)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Two interval cycles.
    tokio::time::sleep(std::time::Duration::from_secs(1201)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    handle.abort();
}
