//! Collaborator traits and reference implementations.
//!
//! The engine is wired to its surroundings through these seams: where the
//! catalog comes from, where interactions are journaled, where profiles are
//! persisted, where context tags originate, and where metrics go. Every
//! trait has an in-memory implementation suitable for tests and embedding;
//! the JSON-file implementations cover simple single-process deployments.

use crate::profile::UserProfile;
use anyhow::{Context, Result};
use async_trait::async_trait;
use humidor_types::{Algorithm, CatalogItem, ContextualFactors, Interaction};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Supplies the current ordered catalog snapshot.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Load the catalog. Failures are recovered by the engine (it serves
    /// from an empty or stale snapshot), so implementations should simply
    /// propagate them.
    async fn load_catalog(&self) -> Result<Vec<CatalogItem>>;
}

/// A fixed in-memory catalog.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    items: Vec<CatalogItem>,
}

impl StaticCatalog {
    /// Wrap a list of items.
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn load_catalog(&self) -> Result<Vec<CatalogItem>> {
        Ok(self.items.clone())
    }
}

/// Catalog loaded from a JSON array file on every call.
#[derive(Debug)]
pub struct JsonCatalogFile {
    path: PathBuf,
}

impl JsonCatalogFile {
    /// Read the catalog from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for JsonCatalogFile {
    async fn load_catalog(&self) -> Result<Vec<CatalogItem>> {
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("reading catalog file {}", self.path.display()))?;
        let items = serde_json::from_str(&data)
            .with_context(|| format!("parsing catalog file {}", self.path.display()))?;
        Ok(items)
    }
}

/// Append-only interaction event store.
#[async_trait]
pub trait InteractionLog: Send + Sync {
    /// Append one event.
    async fn append(&self, interaction: Interaction) -> Result<()>;
    /// Full history, oldest first.
    async fn all(&self) -> Result<Vec<Interaction>>;
    /// One user's history, oldest first.
    async fn for_user(&self, user_id: &str) -> Result<Vec<Interaction>>;
}

/// In-memory interaction log.
#[derive(Debug, Default)]
pub struct MemoryInteractionLog {
    inner: Mutex<Vec<Interaction>>,
}

impl MemoryInteractionLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Log seeded with a history.
    pub fn with_history(interactions: Vec<Interaction>) -> Self {
        Self {
            inner: Mutex::new(interactions),
        }
    }
}

#[async_trait]
impl InteractionLog for MemoryInteractionLog {
    async fn append(&self, interaction: Interaction) -> Result<()> {
        self.inner.lock().push(interaction);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<Interaction>> {
        Ok(self.inner.lock().clone())
    }

    async fn for_user(&self, user_id: &str) -> Result<Vec<Interaction>> {
        Ok(self
            .inner
            .lock()
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect())
    }
}

/// Key-value persistence for user profiles.
///
/// Store failures are non-fatal to the engine: they are logged as warnings
/// and recommendations continue from in-memory state.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Persist one profile.
    async fn save_profile(&self, profile: &UserProfile) -> Result<()>;
    /// Load every persisted profile.
    async fn load_profiles(&self) -> Result<Vec<UserProfile>>;
}

/// In-memory preference store.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    inner: Mutex<HashMap<String, UserProfile>>,
}

impl MemoryPreferenceStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        self.inner
            .lock()
            .insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }

    async fn load_profiles(&self) -> Result<Vec<UserProfile>> {
        Ok(self.inner.lock().values().cloned().collect())
    }
}

/// Preference store backed by a single pretty-printed JSON file.
#[derive(Debug)]
pub struct JsonPreferenceStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonPreferenceStore {
    /// Store profiles at `path`; parent directories are created on write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn read_map(&self) -> Result<HashMap<String, UserProfile>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("reading preference store {}", self.path.display()))?;
        let map = serde_json::from_str(&data)
            .with_context(|| format!("parsing preference store {}", self.path.display()))?;
        Ok(map)
    }
}

#[async_trait]
impl PreferenceStore for JsonPreferenceStore {
    async fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut map = self.read_map()?;
        map.insert(profile.user_id.clone(), profile.clone());
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&map)?)
            .with_context(|| format!("writing preference store {}", self.path.display()))?;
        Ok(())
    }

    async fn load_profiles(&self) -> Result<Vec<UserProfile>> {
        Ok(self.read_map()?.into_values().collect())
    }
}

/// Supplies the current categorical context tags.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// Current context; absent dimensions are no-ops downstream.
    async fn current_context(&self) -> ContextualFactors;
}

/// Always returns the same factors.
#[derive(Debug, Default)]
pub struct StaticContextProvider(pub ContextualFactors);

#[async_trait]
impl ContextProvider for StaticContextProvider {
    async fn current_context(&self) -> ContextualFactors {
        self.0
    }
}

/// Events emitted to the metrics sink.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricEvent {
    /// A recommendation call completed.
    RecommendationsGenerated {
        /// Requesting user, if known.
        user_id: Option<String>,
        /// Algorithm that served the request.
        algorithm: Algorithm,
        /// Number of results returned.
        count: usize,
        /// Whether hard filters were active.
        filtered: bool,
    },
    /// An interaction was recorded.
    InteractionRecorded {
        /// Acting user.
        user_id: String,
        /// Item interacted with.
        item: String,
        /// Interaction kind label.
        kind: String,
    },
    /// A retrain cycle finished successfully.
    RetrainCompleted {
        /// Generation that was published.
        generation: u64,
        /// Profiles rebuilt.
        users: usize,
    },
}

/// Fire-and-forget metrics emission.
///
/// Implementations must never block or fail the caller; anything slow or
/// fallible belongs behind a channel or task inside the implementation.
pub trait MetricsSink: Send + Sync {
    /// Emit one event.
    fn emit(&self, event: MetricEvent);
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NullMetricsSink;

impl MetricsSink for NullMetricsSink {
    fn emit(&self, _event: MetricEvent) {}
}

/// Emits events as structured `tracing` records.
#[derive(Debug, Default)]
pub struct TracingMetricsSink;

impl MetricsSink for TracingMetricsSink {
    fn emit(&self, event: MetricEvent) {
        match event {
            MetricEvent::RecommendationsGenerated {
                user_id,
                algorithm,
                count,
                filtered,
            } => tracing::info!(
                target: "humidor::metrics",
                user = user_id.as_deref().unwrap_or("anonymous"),
                algorithm = algorithm.label(),
                count,
                filtered,
                "recommendations generated"
            ),
            MetricEvent::InteractionRecorded {
                user_id,
                item,
                kind,
            } => tracing::info!(
                target: "humidor::metrics",
                user = %user_id,
                item = %item,
                kind = %kind,
                "interaction recorded"
            ),
            MetricEvent::RetrainCompleted { generation, users } => tracing::info!(
                target: "humidor::metrics",
                generation,
                users,
                "retrain completed"
            ),
        }
    }
}
