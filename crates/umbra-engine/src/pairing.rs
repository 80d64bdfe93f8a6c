//! Instance pairing store — the real↔shadow association
//!
//! Maintains the 1:1 pairing between a real object and its shadow, keyed
//! by instance identity (never equality). The store is the only mutable
//! shared structure on the dispatch hot path: lookups are concurrent, and
//! first creation uses the map's atomic insert-if-absent so that two
//! threads racing to pair the same real object can never produce two
//! shadows. The map is sharded, so unrelated objects' creations never
//! serialize against each other.
//!
//! Entries hold only a `Weak` to the real object. Removal is explicit
//! (`release`, tied to the real object's destruction by the embedding)
//! plus an opportunistic sweep of dead entries every few insertions, so
//! suites that forget to release still converge.

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};
use umbra_sdk::{RealHandle, Shadow};

use crate::error::{EngineError, EngineResult};
use crate::object::{InstanceId, ObjRef, RealObject};
use crate::registry::ClassBinding;

/// Shared, lockable handle to one paired shadow instance.
#[derive(Clone)]
pub struct ShadowCell {
    class: Arc<str>,
    inner: Arc<Mutex<Box<dyn Shadow>>>,
}

impl ShadowCell {
    fn new(class: &str, shadow: Box<dyn Shadow>) -> Self {
        ShadowCell {
            class: Arc::from(class),
            inner: Arc::new(Mutex::new(shadow)),
        }
    }

    /// Target class name this shadow is bound to (diagnostics)
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Lock the shadow for the duration of a handler invocation
    pub fn lock(&self) -> MutexGuard<'_, Box<dyn Shadow>> {
        self.inner.lock()
    }

    /// Run a closure against the shadow downcast to its concrete type.
    ///
    /// Fails with a named error if the paired shadow is of a different
    /// type than the caller expects.
    pub fn with<S: Shadow, R>(&self, f: impl FnOnce(&mut S) -> R) -> EngineResult<R> {
        let mut guard = self.inner.lock();
        let typed = guard
            .as_any_mut()
            .downcast_mut::<S>()
            .ok_or(EngineError::ShadowTypeMismatch {
                class: self.class.to_string(),
                requested: std::any::type_name::<S>(),
            })?;
        Ok(f(typed))
    }

    /// Identity comparison: do two cells refer to the same shadow?
    pub fn ptr_eq(&self, other: &ShadowCell) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for ShadowCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShadowCell").field("class", &self.class).finish()
    }
}

struct PairEntry {
    real: Weak<RealObject>,
    shadow: ShadowCell,
}

/// Concurrent store of real↔shadow pairings.
pub struct PairingStore {
    entries: DashMap<InstanceId, PairEntry>,
    inserts: AtomicUsize,
    sweep_interval: usize,
}

impl PairingStore {
    /// Create an empty store sweeping dead entries every
    /// `sweep_interval` insertions (0 disables the sweep)
    pub fn new(sweep_interval: usize) -> Self {
        PairingStore {
            entries: DashMap::new(),
            inserts: AtomicUsize::new(0),
            sweep_interval,
        }
    }

    /// Get or atomically create the shadow paired with `obj`.
    ///
    /// Exactly one shadow is ever created per real object, even under a
    /// creation race; the losing thread observes the winner's shadow.
    pub fn shadow_for(&self, obj: &ObjRef, binding: &ClassBinding) -> ShadowCell {
        if let Some(entry) = self.entries.get(&obj.id()) {
            return entry.shadow.clone();
        }
        let (cell, created) = match self.entries.entry(obj.id()) {
            Entry::Occupied(entry) => (entry.get().shadow.clone(), false),
            Entry::Vacant(slot) => {
                let mut shadow = binding.shadow().instantiate();
                let erased: Arc<dyn Any + Send + Sync> = obj.clone();
                shadow.attach(RealHandle::new(Arc::downgrade(&erased)));
                let cell = ShadowCell::new(binding.target().name(), shadow);
                slot.insert(PairEntry {
                    real: Arc::downgrade(obj),
                    shadow: cell.clone(),
                });
                (cell, true)
            }
        };
        if created {
            self.note_insert();
        }
        cell
    }

    /// Cached shadow for an instance, without creating one
    pub fn get(&self, id: InstanceId) -> Option<ShadowCell> {
        self.entries.get(&id).map(|entry| entry.shadow.clone())
    }

    /// Explicitly remove the pairing for a destroyed real object.
    ///
    /// Returns true if an entry was removed.
    pub fn release(&self, id: InstanceId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Drop every entry whose real object has been reclaimed
    pub fn sweep(&self) {
        self.entries.retain(|_, entry| entry.real.strong_count() > 0);
    }

    /// Number of live pairings (including not-yet-swept dead entries)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no pairings exist
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn note_insert(&self) {
        if self.sweep_interval == 0 {
            return;
        }
        let n = self.inserts.fetch_add(1, Ordering::Relaxed) + 1;
        if n % self.sweep_interval == 0 {
            self.sweep();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ClassDescriptor, DescriptorSet};
    use crate::registry::ShadowRegistry;
    use rustc_hash::FxHashMap;

    #[derive(Default)]
    struct ShadowWidget {
        real: RealHandle,
        pokes: usize,
    }

    impl Shadow for ShadowWidget {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
        fn attach(&mut self, real: RealHandle) {
            self.real = real;
        }
    }

    fn fixture() -> (DescriptorSet, ShadowRegistry) {
        let desc = ClassDescriptor::builder("Widget").build().unwrap();
        let set = DescriptorSet::new(vec![desc]).unwrap();
        let shadow = crate::shadow_class::ShadowClass::builder::<ShadowWidget>(
            "ShadowWidget",
            "Widget",
        )
        .build()
        .unwrap();
        let registry = ShadowRegistry::new(vec![shadow], &set).unwrap();
        (set, registry)
    }

    fn widget() -> ObjRef {
        RealObject::with_fields("Widget", FxHashMap::default())
    }

    #[test]
    fn test_pairing_idempotent() {
        let (set, registry) = fixture();
        let store = PairingStore::new(0);
        let obj = widget();
        let binding = registry.resolve("Widget", &set).unwrap();

        let first = store.shadow_for(&obj, binding);
        let second = store.shadow_for(&obj, binding);
        assert!(first.ptr_eq(&second));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_distinct_objects_distinct_shadows() {
        let (set, registry) = fixture();
        let store = PairingStore::new(0);
        let binding = registry.resolve("Widget", &set).unwrap();

        let a = store.shadow_for(&widget(), binding);
        let b = store.shadow_for(&widget(), binding);
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn test_attach_injects_weak_real() {
        let (set, registry) = fixture();
        let store = PairingStore::new(0);
        let obj = widget();
        let binding = registry.resolve("Widget", &set).unwrap();

        let cell = store.shadow_for(&obj, binding);
        cell.with::<ShadowWidget, _>(|s| {
            let real = s.real.get::<RealObject>().unwrap();
            assert_eq!(real.id(), obj.id());
        })
        .unwrap();

        // The shadow's handle must not keep the real object alive.
        let id = obj.id();
        drop(obj);
        let cell = store.get(id).unwrap();
        cell.with::<ShadowWidget, _>(|s| assert!(s.real.get::<RealObject>().is_none()))
            .unwrap();
    }

    #[test]
    fn test_release_and_sweep() {
        let (set, registry) = fixture();
        let store = PairingStore::new(0);
        let binding = registry.resolve("Widget", &set).unwrap();

        let kept = widget();
        store.shadow_for(&kept, binding);

        let dropped = widget();
        let dropped_id = dropped.id();
        store.shadow_for(&dropped, binding);
        drop(dropped);

        let released = widget();
        store.shadow_for(&released, binding);
        assert!(store.release(released.id()));
        assert!(!store.release(released.id()));

        assert_eq!(store.len(), 2);
        store.sweep();
        assert_eq!(store.len(), 1);
        assert!(store.get(dropped_id).is_none());
        assert!(store.get(kept.id()).is_some());
    }

    #[test]
    fn test_with_wrong_type_is_named_error() {
        #[derive(Default)]
        struct OtherShadow;
        impl Shadow for OtherShadow {
            fn as_any(&self) -> &dyn Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }
        }

        let (set, registry) = fixture();
        let store = PairingStore::new(0);
        let obj = widget();
        let binding = registry.resolve("Widget", &set).unwrap();
        let cell = store.shadow_for(&obj, binding);

        cell.with::<ShadowWidget, _>(|s| s.pokes += 1).unwrap();
        let err = cell.with::<OtherShadow, _>(|_| ()).unwrap_err();
        assert!(matches!(err, EngineError::ShadowTypeMismatch { .. }));
    }
}
