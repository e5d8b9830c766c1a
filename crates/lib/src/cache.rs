//! Memoization of resolved dependency graphs.
//!
//! One [`ResolutionCache`] lives for a whole generation run and is shared by
//! every thread configuring a (project, target) pair. The outer mutex only
//! guards the key -> slot map; each slot has its own mutex, held while the
//! graph for that key is loaded. Callers racing on the same key therefore wait
//! for the first load instead of launching a second install, while distinct
//! keys load in parallel.
//!
//! Entries are never evicted. A failed load leaves its slot empty, so the next
//! caller for that key tries again.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::{debug, info};

use crate::build_info::DependencyGraph;
use crate::error::ResolveError;
use crate::manifest::ResolutionKey;
use crate::target::TargetSettings;

/// Identifies one resolution: the serialized manifest plus the settings it is installed for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
  pub manifest: ResolutionKey,
  pub settings: TargetSettings,
}

type Slot = Arc<Mutex<Option<Arc<DependencyGraph>>>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
  /// Calls served from an already loaded graph.
  pub hits: usize,
  /// Calls that ran the loader, successful or not.
  pub loads: usize,
  /// Loader runs that failed.
  pub failures: usize,
}

#[derive(Debug, Default)]
pub struct ResolutionCache {
  slots: Mutex<HashMap<CacheKey, Slot>>,
  hits: AtomicUsize,
  loads: AtomicUsize,
  failures: AtomicUsize,
}

/// Slots only ever hold fully built graphs, so a poisoned lock still guards consistent data.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
  mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ResolutionCache {
  pub fn new() -> Self {
    Self::default()
  }

  /// Return the graph for `key`, running `load` only if no graph is cached yet.
  ///
  /// Concurrent calls with the same key block until the first one finishes; if
  /// it failed, the next waiting caller runs its own `load`.
  pub fn get_or_load<F>(&self, key: &CacheKey, load: F) -> Result<Arc<DependencyGraph>, ResolveError>
  where
    F: FnOnce() -> Result<DependencyGraph, ResolveError>,
  {
    let slot = Arc::clone(lock(&self.slots).entry(key.clone()).or_default());

    let mut entry = lock(&*slot);
    if let Some(graph) = entry.as_ref() {
      self.hits.fetch_add(1, Ordering::Relaxed);
      debug!(key = %key.manifest, settings = %key.settings, "resolution cache hit");
      return Ok(Arc::clone(graph));
    }

    self.loads.fetch_add(1, Ordering::Relaxed);
    info!(key = %key.manifest, settings = %key.settings, "resolution cache miss");

    match load() {
      Ok(graph) => {
        let graph = Arc::new(graph);
        *entry = Some(Arc::clone(&graph));
        Ok(graph)
      }
      Err(err) => {
        self.failures.fetch_add(1, Ordering::Relaxed);
        Err(err)
      }
    }
  }

  /// Cached graph for `key`, without loading. Waits if a load for `key` is in flight.
  pub fn get(&self, key: &CacheKey) -> Option<Arc<DependencyGraph>> {
    let slot = lock(&self.slots).get(key).cloned()?;
    let entry = lock(&*slot);
    entry.clone()
  }

  /// Number of keys with a loaded graph.
  pub fn len(&self) -> usize {
    let slots: Vec<Slot> = lock(&self.slots).values().cloned().collect();
    slots.iter().filter(|slot| lock(&***slot).is_some()).count()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn stats(&self) -> CacheStats {
    CacheStats {
      hits: self.hits.load(Ordering::Relaxed),
      loads: self.loads.load(Ordering::Relaxed),
      failures: self.failures.load(Ordering::Relaxed),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Barrier;
  use std::thread;
  use std::time::Duration;

  use crate::build_info::DependencyRecord;
  use crate::manifest::Manifest;
  use crate::process::ExternalToolError;
  use crate::target::Setting;

  fn key(requires: &str) -> CacheKey {
    CacheKey {
      manifest: Manifest::new().with_requires([requires]).serialize(),
      settings: TargetSettings::default(),
    }
  }

  fn graph(name: &str) -> DependencyGraph {
    DependencyGraph::new(vec![DependencyRecord::new(name)])
  }

  fn tool_failure() -> ResolveError {
    ExternalToolError::MissingArtifact {
      path: "conanbuildinfo.json".into(),
    }
    .into()
  }

  #[test]
  fn second_lookup_is_served_from_cache() {
    let cache = ResolutionCache::new();
    let loads = AtomicUsize::new(0);
    let load = || {
      loads.fetch_add(1, Ordering::SeqCst);
      Ok(graph("glew"))
    };

    let first = cache.get_or_load(&key("glew/2.2.0"), load).unwrap();
    let second = cache.get_or_load(&key("glew/2.2.0"), load).unwrap();

    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.stats(), CacheStats { hits: 1, loads: 1, failures: 0 });
  }

  #[test]
  fn different_settings_are_different_entries() {
    let cache = ResolutionCache::new();
    let debug = key("glew/2.2.0");
    let release = CacheKey {
      settings: TargetSettings(vec![Setting {
        key: "build_type",
        value: "Release".to_string(),
      }]),
      ..debug.clone()
    };

    cache.get_or_load(&debug, || Ok(graph("glew"))).unwrap();
    cache.get_or_load(&release, || Ok(graph("glew"))).unwrap();
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.stats().loads, 2);
  }

  #[test]
  fn failures_are_not_cached() {
    let cache = ResolutionCache::new();

    let err = cache.get_or_load(&key("glew/2.2.0"), || Err(tool_failure())).unwrap_err();
    assert!(matches!(err, ResolveError::ExternalTool(_)));
    assert!(cache.get(&key("glew/2.2.0")).is_none());
    assert!(cache.is_empty());

    let graph = cache.get_or_load(&key("glew/2.2.0"), || Ok(graph("glew"))).unwrap();
    assert_eq!(graph.records[0].primary_name, "glew");
    assert_eq!(cache.stats(), CacheStats { hits: 0, loads: 2, failures: 1 });
  }

  #[test]
  fn concurrent_callers_share_one_load() {
    const THREADS: usize = 8;
    let cache = ResolutionCache::new();
    let loads = AtomicUsize::new(0);
    let barrier = Barrier::new(THREADS);

    let graphs: Vec<Arc<DependencyGraph>> = thread::scope(|scope| {
      let mut handles = Vec::new();
      for _ in 0..THREADS {
        handles.push(scope.spawn(|| {
          barrier.wait();
          cache
            .get_or_load(&key("glew/2.2.0"), || {
              loads.fetch_add(1, Ordering::SeqCst);
              thread::sleep(Duration::from_millis(50));
              Ok(graph("glew"))
            })
            .unwrap()
        }));
      }
      handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert!(graphs.iter().all(|g| Arc::ptr_eq(g, &graphs[0])));
  }

  #[test]
  fn distinct_keys_load_in_parallel() {
    let cache = ResolutionCache::new();
    let barrier = Barrier::new(2);

    // Each load waits for the other one to start; this deadlocks if loads were serialized.
    thread::scope(|scope| {
      for name in ["glew/2.2.0", "fmt/9.1.0"] {
        let cache = &cache;
        let barrier = &barrier;
        scope.spawn(move || {
          cache
            .get_or_load(&key(name), || {
              barrier.wait();
              Ok(graph(name))
            })
            .unwrap();
        });
      }
    });

    assert_eq!(cache.len(), 2);
  }
}
