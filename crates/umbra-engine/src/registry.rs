//! Shadow registry — the process-wide class-to-shadow binding table
//!
//! Write-once-read-many: populated from shadow class declarations when the
//! engine is built, immutable afterward. Lookup resolves along the target
//! class's ancestor chain when no exact binding exists and the nearest
//! bound ancestor opts into `inherits_parent_methods`; otherwise an
//! unbound class behaves as if it had no shadow and all calls pass
//! straight through.
//!
//! Resolution results are memoized per concrete class in a concurrent
//! cache, so the ancestor walk runs once per class per engine.

use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxHashMap;

use crate::descriptor::DescriptorSet;
use crate::error::{EngineError, EngineResult};
use crate::shadow_class::ShadowClass;

/// Identity of a binding's target class.
///
/// A binding whose target has a registered class descriptor is resolved; a
/// binding kept by name only supports framework classes that are internal
/// or unavailable in the current environment. Resolution logic handles
/// both without special-casing callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetClass {
    /// Target has a class descriptor in this engine
    Resolved(String),
    /// Target retained by name only; no descriptor is linked
    NamedOnly(String),
}

impl TargetClass {
    /// The target class name, independent of resolution state
    pub fn name(&self) -> &str {
        match self {
            TargetClass::Resolved(name) | TargetClass::NamedOnly(name) => name,
        }
    }

    /// True if a class descriptor backs this target
    pub fn is_resolved(&self) -> bool {
        matches!(self, TargetClass::Resolved(_))
    }
}

/// Declared association between a framework class and its shadow class.
#[derive(Clone)]
pub struct ClassBinding {
    target: TargetClass,
    shadow: Arc<ShadowClass>,
}

impl ClassBinding {
    /// Target class identity
    pub fn target(&self) -> &TargetClass {
        &self.target
    }

    /// The bound shadow class
    pub fn shadow(&self) -> &Arc<ShadowClass> {
        &self.shadow
    }

    /// Whether unmatched methods call through to the original body
    pub fn call_through_by_default(&self) -> bool {
        self.shadow.call_through_by_default()
    }

    /// Whether this binding participates in static-state reset
    pub fn reset_static_state(&self) -> bool {
        self.shadow.reset_static_state()
    }

    /// Whether unbound subclasses resolve to this binding
    pub fn inherits_parent_methods(&self) -> bool {
        self.shadow.inherits_parent_methods()
    }
}

impl std::fmt::Debug for ClassBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassBinding")
            .field("target", &self.target)
            .field("shadow", &self.shadow.name())
            .finish()
    }
}

/// Frozen binding table with memoized ancestor resolution.
pub struct ShadowRegistry {
    bindings: FxHashMap<String, ClassBinding>,
    /// Target class names in registration order; reset iteration follows
    /// this so failures stay reproducible within a process run
    order: Vec<String>,
    /// Concrete class name -> resolved binding target (None = unbound).
    /// The ancestor walk is pure, so memoization is a plain cache.
    resolution: DashMap<String, Option<String>>,
}

impl ShadowRegistry {
    /// Build the registry from shadow class declarations.
    ///
    /// Two bindings for the same target class name is a configuration
    /// error surfaced here, not at call time.
    pub fn new(shadows: Vec<ShadowClass>, descriptors: &DescriptorSet) -> EngineResult<Self> {
        let mut bindings: FxHashMap<String, ClassBinding> = FxHashMap::default();
        let mut order = Vec::with_capacity(shadows.len());
        for shadow in shadows {
            let target_name = shadow.target().to_string();
            let target = if descriptors.get(&target_name).is_some() {
                TargetClass::Resolved(target_name.clone())
            } else {
                TargetClass::NamedOnly(target_name.clone())
            };
            let binding = ClassBinding {
                target,
                shadow: Arc::new(shadow),
            };
            if let Some(existing) = bindings.get(&target_name) {
                return Err(EngineError::DuplicateBinding {
                    class: target_name,
                    first: existing.shadow.name().to_string(),
                    second: binding.shadow.name().to_string(),
                });
            }
            order.push(target_name.clone());
            bindings.insert(target_name, binding);
        }
        Ok(ShadowRegistry {
            bindings,
            order,
            resolution: DashMap::new(),
        })
    }

    /// Exact lookup by target class name (serves name-only bindings too)
    pub fn lookup_by_name(&self, class: &str) -> Option<&ClassBinding> {
        self.bindings.get(class)
    }

    /// Resolve the binding governing a concrete class, walking the
    /// ancestor chain per the inherits-parent-methods rule.
    pub fn resolve(&self, class: &str, descriptors: &DescriptorSet) -> Option<&ClassBinding> {
        if let Some(cached) = self.resolution.get(class) {
            return cached.clone().and_then(|target| self.bindings.get(&target));
        }
        let target = self.resolve_uncached(class, descriptors);
        self.resolution.insert(class.to_string(), target.clone());
        target.and_then(|t| self.bindings.get(&t))
    }

    fn resolve_uncached(&self, class: &str, descriptors: &DescriptorSet) -> Option<String> {
        if self.bindings.contains_key(class) {
            return Some(class.to_string());
        }
        // Nearest bound ancestor decides: it either opts its subclasses in
        // or the class stays unbound.
        for desc in descriptors.ancestors(class).skip(1) {
            if let Some(binding) = self.bindings.get(desc.name()) {
                if binding.inherits_parent_methods() {
                    return Some(desc.name().to_string());
                }
                return None;
            }
        }
        None
    }

    /// Bindings in registration order
    pub fn iter_in_order(&self) -> impl Iterator<Item = &ClassBinding> {
        self.order.iter().filter_map(|name| self.bindings.get(name))
    }

    /// Number of registered bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// True if no bindings are registered
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl std::fmt::Debug for ShadowRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShadowRegistry")
            .field("bindings", &self.order)
            .finish()
    }
}
