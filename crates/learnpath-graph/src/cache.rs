//! Topic-keyed cache of generated concept graphs.
//!
//! Keys are trimmed, lower-cased topics. Entries never expire; they leave
//! only through [`GraphCache::invalidate`] or [`GraphCache::clear`].
//!
//! Misses for the same key are serialized by a per-key async lock, so
//! concurrent requests for one topic share a single generator call while
//! different topics generate in parallel.

use crate::normalize::normalize_raw;
use crate::types::ConceptGraph;
use async_trait::async_trait;
use learnpath_core::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::RwLock;

/// Default bound on a single generator call.
pub const DEFAULT_GENERATOR_TIMEOUT: Duration = Duration::from_secs(60);

// ============================================================================
// Generator trait
// ============================================================================

/// Produces a raw concept graph structure for a topic.
///
/// Implementations return JSON in any shape the normalizer accepts.
/// Transport or provider problems should surface as
/// [`Error::GeneratorFailure`] or [`Error::Llm`].
#[async_trait]
pub trait GraphGenerator: Send + Sync {
    /// Generate a raw graph for an already-normalized topic.
    async fn generate(&self, topic: &str) -> Result<Value>;

    /// Generator name for logging.
    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Normalize a topic into its cache key.
pub fn normalize_topic(topic: &str) -> String {
    topic.trim().to_lowercase()
}

// ============================================================================
// GraphCache
// ============================================================================

type KeyLock = Arc<tokio::sync::Mutex<()>>;

/// Memoizes generated graphs by topic.
pub struct GraphCache {
    graphs: RwLock<HashMap<String, Arc<ConceptGraph>>>,
    inflight: Mutex<HashMap<String, KeyLock>>,
    fallback: Option<Arc<ConceptGraph>>,
    timeout: Duration,
}

impl Default for GraphCache {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphCache {
    /// Create an empty cache with no fallback graph.
    pub fn new() -> Self {
        Self {
            graphs: RwLock::new(HashMap::new()),
            inflight: Mutex::new(HashMap::new()),
            fallback: None,
            timeout: DEFAULT_GENERATOR_TIMEOUT,
        }
    }

    /// Serve this graph when generation fails. It is never stored.
    pub fn with_fallback(mut self, graph: impl Into<Arc<ConceptGraph>>) -> Self {
        self.fallback = Some(graph.into());
        self
    }

    /// Bound each generator call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The fallback graph, if configured.
    pub fn fallback(&self) -> Option<&Arc<ConceptGraph>> {
        self.fallback.as_ref()
    }

    /// The generator timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Look up a cached graph without generating.
    pub async fn get(&self, topic: &str) -> Option<Arc<ConceptGraph>> {
        self.lookup(&normalize_topic(topic)).await
    }

    /// Store a graph under a topic, replacing any previous entry.
    pub async fn insert(&self, topic: &str, graph: impl Into<Arc<ConceptGraph>>) -> Result<()> {
        let key = checked_key(topic)?;
        self.graphs.write().await.insert(key, graph.into());
        Ok(())
    }

    /// Return the cached graph for `topic`, generating it on a miss.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRequest`] if the topic is blank.
    /// - [`Error::GeneratorFailure`] / [`Error::MalformedRawStructure`] if
    ///   generation fails and no fallback is configured.
    pub async fn get_or_build(
        &self,
        topic: &str,
        generator: &dyn GraphGenerator,
    ) -> Result<Arc<ConceptGraph>> {
        let key = checked_key(topic)?;

        if let Some(graph) = self.lookup(&key).await {
            log::debug!("graph cache hit for {key:?}");
            return Ok(graph);
        }

        let slot = self.claim_slot(&key);
        let outcome = {
            let _guard = slot.lock.lock().await;

            // another caller may have filled the entry while we waited
            if let Some(graph) = self.lookup(&key).await {
                log::debug!("graph cache filled while waiting for {key:?}");
                Ok(graph)
            } else {
                match self.generate(&key, generator).await {
                    Ok(graph) => {
                        let graph = Arc::new(graph);
                        self.graphs
                            .write()
                            .await
                            .insert(key.clone(), Arc::clone(&graph));
                        log::info!("cached graph for {key:?} ({} concepts)", graph.len());
                        Ok(graph)
                    }
                    Err(err) => Err(err),
                }
            }
        };
        drop(slot);

        match outcome {
            Ok(graph) => Ok(graph),
            Err(err) if err.is_generator_failure() => match &self.fallback {
                Some(fallback) => {
                    log::warn!("graph generation for {key:?} failed, using fallback: {err}");
                    Ok(Arc::clone(fallback))
                }
                None => Err(err),
            },
            Err(err) => Err(err),
        }
    }

    /// Drop the cached graph for a topic. Returns whether one was present.
    pub async fn invalidate(&self, topic: &str) -> bool {
        self.graphs
            .write()
            .await
            .remove(&normalize_topic(topic))
            .is_some()
    }

    /// Drop every cached graph.
    pub async fn clear(&self) {
        self.graphs.write().await.clear();
    }

    /// Number of cached graphs.
    pub async fn len(&self) -> usize {
        self.graphs.read().await.len()
    }

    /// Whether the cache holds no graphs.
    pub async fn is_empty(&self) -> bool {
        self.graphs.read().await.is_empty()
    }

    /// Cached topic keys, sorted.
    pub async fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self.graphs.read().await.keys().cloned().collect();
        topics.sort();
        topics
    }

    async fn lookup(&self, key: &str) -> Option<Arc<ConceptGraph>> {
        self.graphs.read().await.get(key).cloned()
    }

    async fn generate(&self, key: &str, generator: &dyn GraphGenerator) -> Result<ConceptGraph> {
        log::info!("generating graph for {key:?} with {}", generator.name());

        let raw = match tokio::time::timeout(self.timeout, generator.generate(key)).await {
            Err(_) => {
                return Err(Error::generator(format!(
                    "{} timed out after {:?}",
                    generator.name(),
                    self.timeout
                )));
            }
            Ok(Err(err)) if err.is_generator_failure() => return Err(err),
            Ok(Err(err)) => return Err(Error::generator(err.to_string())),
            Ok(Ok(raw)) => raw,
        };

        let graph = normalize_raw(raw)?;
        if graph.is_empty() {
            return Err(Error::malformed("generator returned no concepts"));
        }
        Ok(graph)
    }

    fn claim_slot(&self, key: &str) -> InflightSlot<'_> {
        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        let lock = Arc::clone(inflight.entry(key.to_string()).or_default());
        InflightSlot {
            inflight: &self.inflight,
            key: key.to_string(),
            lock,
        }
    }
}

/// A caller's claim on a per-key lock.
///
/// Dropping the slot releases the claim, including when the owning future
/// is cancelled mid-generation; the last claim removes the map entry.
struct InflightSlot<'a> {
    inflight: &'a Mutex<HashMap<String, KeyLock>>,
    key: String,
    lock: KeyLock,
}

impl Drop for InflightSlot<'_> {
    fn drop(&mut self) {
        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        // release our reference while the map is locked so counts stay exact
        drop(std::mem::take(&mut self.lock));
        if inflight
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            inflight.remove(&self.key);
        }
    }
}

fn checked_key(topic: &str) -> Result<String> {
    let key = normalize_topic(topic);
    if key.is_empty() {
        return Err(Error::invalid_request("topic must not be empty"));
    }
    Ok(key)
}

// ============================================================================
// Test generator
// ============================================================================

/// Scripted [`GraphGenerator`] for tests.
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// What the mock does when called.
    #[derive(Clone, Debug)]
    pub enum MockBehavior {
        /// Return this raw structure.
        Respond(Value),
        /// Fail with a generator failure carrying this message.
        Fail(String),
    }

    /// Generator returning a fixed response, optionally after a delay.
    #[derive(Debug)]
    pub struct MockGraphGenerator {
        behavior: MockBehavior,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl MockGraphGenerator {
        /// Respond with `raw` on every call.
        pub fn responding(raw: Value) -> Self {
            Self {
                behavior: MockBehavior::Respond(raw),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            }
        }

        /// Fail on every call.
        pub fn failing(message: impl Into<String>) -> Self {
            Self {
                behavior: MockBehavior::Fail(message.into()),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            }
        }

        /// Sleep before answering.
        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        /// Number of `generate` calls so far.
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GraphGenerator for MockGraphGenerator {
        async fn generate(&self, _topic: &str) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match &self.behavior {
                MockBehavior::Respond(raw) => Ok(raw.clone()),
                MockBehavior::Fail(message) => Err(Error::generator(message.clone())),
            }
        }

        fn name(&self) -> &str {
            "mock"
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
