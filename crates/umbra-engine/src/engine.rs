//! Engine assembly and facade
//!
//! `EngineBuilder` collects class descriptors and shadow class
//! declarations, validates the whole configuration (duplicates, unknown
//! parents, ambiguous constructors), runs static-initializer hooks, and
//! freezes everything into an `Engine`. After `build` the registry and
//! descriptor set are immutable and lock-free; the pairing store is the
//! only mutable shared structure on the dispatch path.
//!
//! `Engine` is a cheap cloneable handle; embeddings and tests share one
//! per test process (or per isolated suite).

use std::sync::Arc;

use parking_lot::Mutex;
use umbra_sdk::{MethodSig, Value};

use crate::accessor::MemberAccessor;
use crate::config::EngineConfig;
use crate::descriptor::{ClassDescriptor, DescriptorSet};
use crate::direct::DirectCaller;
use crate::error::{EngineError, EngineResult};
use crate::lifecycle::{LifecycleManager, StaticStore};
use crate::object::ObjRef;
use crate::pairing::{PairingStore, ShadowCell};
use crate::registry::{ClassBinding, ShadowRegistry};
use crate::shadow_class::ShadowClass;

pub(crate) struct EngineInner {
    pub(crate) config: EngineConfig,
    pub(crate) descriptors: Arc<DescriptorSet>,
    pub(crate) registry: ShadowRegistry,
    pub(crate) pairing: PairingStore,
    pub(crate) direct: DirectCaller,
    pub(crate) accessor: MemberAccessor,
    pub(crate) lifecycle: LifecycleManager,
    pub(crate) missing_log: Mutex<Vec<String>>,
}

/// Collects declarations and builds a frozen [`Engine`].
#[derive(Default)]
pub struct EngineBuilder {
    config: Option<EngineConfig>,
    descriptors: Vec<ClassDescriptor>,
    shadows: Vec<ShadowClass>,
}

impl EngineBuilder {
    /// Start with an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the environment-derived config
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Register a framework class descriptor
    pub fn register_class(mut self, descriptor: ClassDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Register a shadow class declaration
    pub fn register_shadow(mut self, shadow: ShadowClass) -> Self {
        self.shadows.push(shadow);
        self
    }

    /// Validate the configuration and freeze the engine.
    ///
    /// All configuration errors surface here; none are deferred to call
    /// time. Static-initializer hooks run once, in registration order.
    pub fn build(self) -> EngineResult<Engine> {
        let config = self
            .config
            .unwrap_or_else(|| EngineConfig::env_default().clone());
        let descriptors = Arc::new(DescriptorSet::new(self.descriptors)?);
        let registry = ShadowRegistry::new(self.shadows, &descriptors)?;

        for binding in registry.iter_in_order() {
            if let Some(init) = binding.shadow().static_init() {
                init();
            }
        }

        let lifecycle = LifecycleManager::new(&registry);
        let pairing = PairingStore::new(config.sweep_interval);
        Ok(Engine {
            inner: Arc::new(EngineInner {
                direct: DirectCaller::new(descriptors.clone()),
                accessor: MemberAccessor::new(descriptors.clone()),
                pairing,
                lifecycle,
                registry,
                descriptors,
                missing_log: Mutex::new(Vec::new()),
                config,
            }),
        })
    }
}

/// The shadow binding and call-dispatch engine.
///
/// Application code never calls this directly — it calls real-object
/// methods, which the embedding routes through [`Engine::dispatch`]. Test
/// and shadow code use the lookup, call-through, accessor and lifecycle
/// surfaces.
#[derive(Clone)]
pub struct Engine {
    pub(crate) inner: Arc<EngineInner>,
}

impl Engine {
    /// Start declaring an engine
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// The shadow paired with a real object, creating it if this is the
    /// first access. Fails with a "not shadowed" condition for instances
    /// of unbound classes.
    pub fn shadow_of(&self, obj: &ObjRef) -> EngineResult<ShadowCell> {
        let inner = &*self.inner;
        let binding = inner
            .registry
            .resolve(obj.class_name(), &inner.descriptors)
            .ok_or_else(|| EngineError::NotShadowed(obj.class_name().to_string()))?;
        Ok(inner.pairing.shadow_for(obj, binding))
    }

    /// Call-through: invoke the original, unshadowed method body.
    ///
    /// Intended for shadow code composing "do the real thing, then
    /// adjust"; never passes through the dispatch router.
    pub fn call_original(&self, obj: &ObjRef, method: &str, args: &[Value]) -> EngineResult<Value> {
        let sig = MethodSig::new(method, args.len());
        self.inner.direct.call_original(obj, &sig, args)
    }

    /// Member accessor: read a field regardless of visibility
    pub fn get_field(&self, obj: &ObjRef, name: &str) -> EngineResult<Value> {
        self.inner.accessor.get_field(obj, name)
    }

    /// Member accessor: write a field regardless of visibility
    pub fn set_field(&self, obj: &ObjRef, name: &str, value: Value) -> EngineResult<()> {
        self.inner.accessor.set_field(obj, name, value)
    }

    /// Member accessor: invoke an original method regardless of visibility
    pub fn invoke(&self, obj: &ObjRef, method: &str, args: &[Value]) -> EngineResult<Value> {
        self.inner.accessor.invoke(obj, method, args)
    }

    /// Binding lookup by target class name, serving name-only bindings
    pub fn lookup_by_name(&self, class: &str) -> Option<&ClassBinding> {
        self.inner.registry.lookup_by_name(class)
    }

    /// Explicitly drop the pairing for a destroyed real object.
    ///
    /// The embedding is responsible for invoking this when a real
    /// object's lifetime ends; returns true if a pairing existed.
    pub fn release(&self, obj: &ObjRef) -> bool {
        self.inner.pairing.release(obj.id())
    }

    /// Process-wide reset switch: clear static state of every binding
    /// that opted in, in registration order. Called at test-run
    /// boundaries; completes before any dispatch that follows it.
    pub fn reset_all(&self) {
        self.inner.lifecycle.reset_all();
    }

    /// The owned class-level static storage
    pub fn statics(&self) -> &StaticStore {
        self.inner.lifecycle.statics()
    }

    /// Number of live pairings, for leak checks in tests
    pub fn paired_count(&self) -> usize {
        self.inner.pairing.len()
    }

    /// Missing-shadow-method reports collected so far (only populated
    /// when `log_missing_shadow_methods` is enabled)
    pub fn missing_method_reports(&self) -> Vec<String> {
        self.inner.missing_log.lock().clone()
    }

    pub(crate) fn registry(&self) -> &ShadowRegistry {
        &self.inner.registry
    }

    pub(crate) fn report_missing(&self, class: &str, sig: &MethodSig) {
        let line = format!("No shadow method found for {}.{}; calling through", class, sig);
        eprintln!("{}", line);
        self.inner.missing_log.lock().push(line);
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("classes", &self.inner.descriptors.len())
            .field("bindings", &self.inner.registry.len())
            .field("pairings", &self.inner.pairing.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use umbra_sdk::Shadow;

    #[derive(Default)]
    struct ShadowStub;
    impl Shadow for ShadowStub {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_duplicate_binding_fails_build() {
        let result = Engine::builder()
            .register_class(ClassDescriptor::builder("Clock").build().unwrap())
            .register_shadow(
                ShadowClass::builder::<ShadowStub>("ShadowClock", "Clock").build().unwrap(),
            )
            .register_shadow(
                ShadowClass::builder::<ShadowStub>("OtherShadowClock", "Clock").build().unwrap(),
            )
            .build();
        assert!(matches!(result, Err(EngineError::DuplicateBinding { .. })));
    }

    #[test]
    fn test_static_init_runs_once_at_build() {
        static INITS: AtomicUsize = AtomicUsize::new(0);

        let engine = Engine::builder()
            .register_class(ClassDescriptor::builder("Clock").build().unwrap())
            .register_shadow(
                ShadowClass::builder::<ShadowStub>("ShadowClock", "Clock")
                    .static_init(|| {
                        INITS.fetch_add(1, Ordering::SeqCst);
                    })
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        assert_eq!(INITS.load(Ordering::SeqCst), 1);
        drop(engine);
        assert_eq!(INITS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_shadow_of_unbound_is_error() {
        let engine = Engine::builder()
            .register_class(ClassDescriptor::builder("Plain").build().unwrap())
            .build()
            .unwrap();
        let obj = engine.instantiate("Plain", &[]).unwrap();
        let err = engine.shadow_of(&obj).unwrap_err();
        assert!(matches!(err, EngineError::NotShadowed(_)));
    }

    #[test]
    fn test_release_drops_pairing() {
        let engine = Engine::builder()
            .register_class(ClassDescriptor::builder("Clock").build().unwrap())
            .register_shadow(
                ShadowClass::builder::<ShadowStub>("ShadowClock", "Clock").build().unwrap(),
            )
            .build()
            .unwrap();

        let obj = engine.instantiate("Clock", &[]).unwrap();
        assert_eq!(engine.paired_count(), 1);
        assert!(engine.release(&obj));
        assert_eq!(engine.paired_count(), 0);
        assert!(!engine.release(&obj));
    }
}
