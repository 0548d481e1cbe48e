//! Integration Tests for the Reconcile Flow
//!
//! Drives the cache the way a controller does: check before writing, write
//! on a miss, record the pair afterwards. The remote store is faked in
//! memory so generation bumps can be counted.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use submission_cache::logger::Fields;
use submission_cache::{
    CacheConfig, Document, KeyStrategy, Logger, MissReason, RepoCache, SharedRepoCache, Verdict,
};

// == Helpers ==

/// In-memory stand-in for the remote store.
#[derive(Default)]
struct FakeStore {
    objects: BTreeMap<String, Document>,
    writes: usize,
    next_suffix: usize,
}

impl FakeStore {
    /// Creates or updates, assigning a name from `generateName` when needed
    /// and stamping bookkeeping fields the way a real store would.
    fn apply(&mut self, submitted: &Document) -> Document {
        self.writes += 1;
        let mut persisted = submitted.clone();

        let mut metadata = submitted
            .get("metadata")
            .cloned()
            .unwrap_or_else(|| json!({}));
        if submitted.name().is_empty() {
            self.next_suffix += 1;
            metadata["name"] = json!(format!("{}{:05}", submitted.generate_name(), self.next_suffix));
        }
        metadata["resourceVersion"] = json!(self.writes.to_string());
        persisted.insert("metadata", metadata);
        persisted.insert("status", json!({"observedGeneration": self.writes}));

        self.objects.insert(persisted.name().to_string(), persisted.clone());
        persisted
    }

    /// Lists live objects of a kind, in name order.
    fn list(&self, kind: &str) -> Vec<Document> {
        self.objects
            .values()
            .filter(|doc| doc.kind() == kind)
            .cloned()
            .collect()
    }

    fn get_mut(&mut self, name: &str) -> &mut Document {
        self.objects.get_mut(name).unwrap()
    }
}

#[derive(Default)]
struct RecordingLogger {
    messages: Mutex<Vec<String>>,
}

impl RecordingLogger {
    fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock().unwrap())
    }
}

impl Logger for RecordingLogger {
    fn info(&self, msg: &str, fields: Fields<'_>) {
        let rendered: Vec<String> = fields.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        self.messages
            .lock()
            .unwrap()
            .push(format!("{} {}", msg, rendered.join(" ")));
    }
}

/// One reconciliation pass: returns the object now considered current.
fn reconcile(cache: &mut RepoCache, store: &mut FakeStore, desired: &Document) -> Document {
    let live = store.list(desired.kind());
    if let Some(current) = cache.unchanged_since_cached(desired, &live) {
        return current.clone();
    }
    let persisted = store.apply(desired);
    cache.set(desired, &persisted);
    persisted
}

fn desired_workload(image: &str) -> Document {
    Document::try_from(json!({
        "apiVersion": "test.run/v1alpha1",
        "kind": "Test",
        "metadata": {"name": "test-deliverable-source", "namespace": "default"},
        "spec": {"value": {"image": image}}
    }))
    .unwrap()
}

// == Scenario ==

#[test]
fn test_status_drift_scenario() {
    let mut cache = RepoCache::new(Arc::new(RecordingLogger::default()));
    let doc = |value: Value| Document::try_from(value).unwrap();

    cache.set(
        &doc(json!({"kind": "Foo", "metadata": {"name": "a", "namespace": "ns"}, "spec": {"x": 1}})),
        &doc(json!({"kind": "Foo", "metadata": {"name": "a", "namespace": "ns"}, "spec": {"x": 1}, "status": {"ready": false}})),
    );

    let candidates =
        vec![doc(json!({"kind": "Foo", "metadata": {"name": "a", "namespace": "ns"}, "spec": {"x": 1}, "status": {"ready": true}}))];
    let found = cache.unchanged_since_cached(
        &doc(json!({"kind": "Foo", "metadata": {"name": "a", "namespace": "ns"}, "spec": {"x": 1}})),
        &candidates,
    );

    assert!(std::ptr::eq(found.unwrap(), &candidates[0]));
}

// == Reconcile Loop ==

#[test]
fn test_steady_state_writes_once() {
    let logger = Arc::new(RecordingLogger::default());
    let mut cache = RepoCache::new(logger.clone());
    let mut store = FakeStore::default();

    for _ in 0..5 {
        reconcile(&mut cache, &mut store, &desired_workload("v1"));
    }

    assert_eq!(store.writes, 1);
    assert_eq!(cache.stats().hits, 4);
    let messages = logger.take();
    assert!(messages
        .iter()
        .any(|m| m.starts_with("hit:") && m.contains("key=default:Test:test-deliverable-source")));
}

#[test]
fn test_changed_intent_writes_again() {
    let mut cache = RepoCache::new(Arc::new(RecordingLogger::default()));
    let mut store = FakeStore::default();

    reconcile(&mut cache, &mut store, &desired_workload("v1"));
    let current = reconcile(&mut cache, &mut store, &desired_workload("v2"));
    reconcile(&mut cache, &mut store, &desired_workload("v2"));

    assert_eq!(store.writes, 2);
    assert_eq!(current.spec(), Some(&json!({"value": {"image": "v2"}})));
}

#[test]
fn test_status_updates_by_others_do_not_trigger_writes() {
    let mut cache = RepoCache::new(Arc::new(RecordingLogger::default()));
    let mut store = FakeStore::default();

    reconcile(&mut cache, &mut store, &desired_workload("v1"));
    store
        .get_mut("test-deliverable-source")
        .insert("status", json!({"conditions": [{"type": "Ready", "status": "True"}]}));
    let current = reconcile(&mut cache, &mut store, &desired_workload("v1"));

    assert_eq!(store.writes, 1);
    assert_eq!(
        current.status(),
        Some(&json!({"conditions": [{"type": "Ready", "status": "True"}]}))
    );
}

#[test]
fn test_spec_edited_by_others_is_reverted() {
    let logger = Arc::new(RecordingLogger::default());
    let mut cache = RepoCache::new(logger.clone());
    let mut store = FakeStore::default();

    reconcile(&mut cache, &mut store, &desired_workload("v1"));
    store
        .get_mut("test-deliverable-source")
        .insert("spec", json!({"value": {"image": "hacked"}}));
    logger.take();

    let current = reconcile(&mut cache, &mut store, &desired_workload("v1"));

    assert_eq!(store.writes, 2);
    assert_eq!(current.spec(), Some(&json!({"value": {"image": "v1"}})));
    assert!(logger
        .take()
        .iter()
        .any(|m| m.starts_with("miss: no live candidate matches the recorded spec")));
}

#[test]
fn test_restart_starts_cold() {
    let mut store = FakeStore::default();
    {
        let mut cache = RepoCache::new(Arc::new(RecordingLogger::default()));
        reconcile(&mut cache, &mut store, &desired_workload("v1"));
    }

    let mut restarted = RepoCache::new(Arc::new(RecordingLogger::default()));
    let live = store.list("Test");
    assert_eq!(
        restarted.verdict(&desired_workload("v1"), &live),
        Verdict::Miss(MissReason::NotCached)
    );
}

#[test]
fn test_generated_names_with_content_hash_keys() {
    let config = CacheConfig::from_lookup(|var| match var {
        "REPO_CACHE_KEY_STRATEGY" => Some("content-hash".to_string()),
        _ => None,
    })
    .unwrap();
    assert_eq!(config.key_strategy, KeyStrategy::ContentHash);

    let mut cache = RepoCache::from_config(&config, Arc::new(RecordingLogger::default()));
    let mut store = FakeStore::default();
    let run = |n: i64| {
        Document::try_from(json!({
            "kind": "Run",
            "metadata": {"generateName": "run-", "namespace": "ci"},
            "spec": {"step": n}
        }))
        .unwrap()
    };

    let first = reconcile(&mut cache, &mut store, &run(1));
    let second = reconcile(&mut cache, &mut store, &run(2));
    let again = reconcile(&mut cache, &mut store, &run(1));

    assert_eq!(store.writes, 2);
    assert_ne!(first.name(), second.name());
    assert_eq!(again.name(), first.name());
    assert_eq!(cache.len(), 2);
}

// == Shared Handle ==

#[tokio::test]
async fn test_shared_cache_across_workers() {
    let cache = SharedRepoCache::from_config(
        &CacheConfig::default(),
        Arc::new(RecordingLogger::default()),
    );
    let store = Arc::new(tokio::sync::Mutex::new(FakeStore::default()));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let cache = cache.clone();
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..10 {
                let desired = desired_workload("v1");
                let mut store = store.lock().await;
                let live = store.list("Test");
                if cache.unchanged_since_cached(&desired, &live).await.is_none() {
                    let persisted = store.apply(&desired);
                    cache.set(&desired, &persisted).await;
                }
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.lock().await.writes, 1);
    let stats = cache.stats().await;
    assert_eq!(stats.hits, 39);
    assert_eq!(stats.misses_not_cached, 1);
}
