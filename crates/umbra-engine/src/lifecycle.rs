//! Static-state lifecycle manager
//!
//! Class-level shadow state (counters, caches, anything that must not
//! leak between independent test runs) lives in owned, keyed storage here
//! rather than in ambient globals, with an explicit reset contract.
//! `reset_all` walks the bindings that opted in, in registration order, so
//! reset order is deterministic within a process run and failures stay
//! reproducible. The store's lock gives the synchronizes-with edge the
//! reset contract requires: a completed reset happens-before any
//! subsequent dispatch that reads static state.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use umbra_sdk::{ResetFn, Value};

use crate::registry::ShadowRegistry;

/// Keyed storage for class-level shadow state.
///
/// Slots are addressed by (target class, key); shadows reach them through
/// the call context's `static_get`/`static_set`, scoped to their own
/// class.
#[derive(Default)]
pub struct StaticStore {
    slots: Mutex<FxHashMap<(String, String), Value>>,
}

impl StaticStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a slot
    pub fn get(&self, class: &str, key: &str) -> Option<Value> {
        self.slots
            .lock()
            .get(&(class.to_string(), key.to_string()))
            .cloned()
    }

    /// Write a slot
    pub fn set(&self, class: &str, key: &str, value: Value) {
        self.slots
            .lock()
            .insert((class.to_string(), key.to_string()), value);
    }

    /// Drop every slot belonging to one class
    pub fn remove_class(&self, class: &str) {
        self.slots.lock().retain(|(owner, _), _| owner != class);
    }

    /// Number of live slots
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    /// True if the store holds no slots
    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }
}

struct ResetEntry {
    class: String,
    resetter: Option<ResetFn>,
}

/// Runs static-state reset across bindings at test-run boundaries.
pub struct LifecycleManager {
    statics: StaticStore,
    resets: Vec<ResetEntry>,
}

impl LifecycleManager {
    /// Capture the reset set (bindings with `reset_static_state = true`)
    /// in registration order
    pub(crate) fn new(registry: &ShadowRegistry) -> Self {
        let resets = registry
            .iter_in_order()
            .filter(|binding| binding.reset_static_state())
            .map(|binding| ResetEntry {
                class: binding.target().name().to_string(),
                resetter: binding.shadow().resetter().cloned(),
            })
            .collect();
        LifecycleManager {
            statics: StaticStore::new(),
            resets,
        }
    }

    /// The owned static storage
    pub fn statics(&self) -> &StaticStore {
        &self.statics
    }

    /// Reset every eligible binding: drop its static slots, then run its
    /// declared resetter. Idempotent, and safe for classes no test ever
    /// touched.
    pub fn reset_all(&self) {
        for entry in &self.resets {
            self.statics.remove_class(&entry.class);
            if let Some(reset) = &entry.resetter {
                reset();
            }
        }
    }

    /// Number of bindings in the reset set
    pub fn reset_set_len(&self) -> usize {
        self.resets.len()
    }
}
