//! Shadow class declarations
//!
//! A [`ShadowClass`] is the declarative surface a shadow implementation
//! registers with: which framework class it implements, its
//! per-class configuration flags, its implementation-marked methods, its
//! constructor-interception handlers, and its optional static-state
//! resetter and static-initializer hooks. Plain Rust methods on the shadow
//! struct are helpers and never appear here.
//!
//! Validation happens in [`ShadowClassBuilder::build`]: duplicate method
//! signatures and ambiguous constructor shapes are startup configuration
//! errors, never call-time surprises.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use umbra_sdk::{
    CallContext, CtorFn, FactoryFn, MethodFn, MethodSig, ResetFn, Shadow, ShadowError,
    ShadowResult, StaticInitFn, Value,
};

use crate::error::{EngineError, EngineResult};

/// Declaration of one shadow class and its binding configuration.
pub struct ShadowClass {
    name: String,
    target: String,
    factory: FactoryFn,
    methods: FxHashMap<MethodSig, MethodFn>,
    ctors: FxHashMap<usize, CtorFn>,
    resetter: Option<ResetFn>,
    static_init: Option<StaticInitFn>,
    call_through_by_default: bool,
    reset_static_state: bool,
    inherits_parent_methods: bool,
}

impl ShadowClass {
    /// Start declaring a shadow class for a framework target class.
    ///
    /// `S` is the shadow struct; a fresh instance is produced per pairing
    /// via `S::default()` unless a custom factory is installed.
    pub fn builder<S>(name: impl Into<String>, target: impl Into<String>) -> ShadowClassBuilder
    where
        S: Shadow + Default,
    {
        ShadowClassBuilder {
            name: name.into(),
            target: target.into(),
            factory: Arc::new(|| Box::new(S::default()) as Box<dyn Shadow>),
            methods: Vec::new(),
            ctors: Vec::new(),
            resetter: None,
            static_init: None,
            call_through_by_default: true,
            reset_static_state: false,
            inherits_parent_methods: false,
        }
    }

    /// Shadow class name (diagnostics only)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target framework class name
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Instantiate an unattached shadow
    pub(crate) fn instantiate(&self) -> Box<dyn Shadow> {
        (self.factory)()
    }

    /// Implementation-marked method for a signature, if declared
    pub(crate) fn method(&self, sig: &MethodSig) -> Option<&MethodFn> {
        self.methods.get(sig)
    }

    /// Constructor-interception handler for an argument shape, if declared
    pub(crate) fn constructor(&self, arity: usize) -> Option<&CtorFn> {
        self.ctors.get(&arity)
    }

    /// Static-state resetter, if declared
    pub(crate) fn resetter(&self) -> Option<&ResetFn> {
        self.resetter.as_ref()
    }

    /// Static-initializer hook, if declared
    pub(crate) fn static_init(&self) -> Option<&StaticInitFn> {
        self.static_init.as_ref()
    }

    /// Whether unmatched methods call through to the original body
    pub fn call_through_by_default(&self) -> bool {
        self.call_through_by_default
    }

    /// Whether this class participates in static-state reset
    pub fn reset_static_state(&self) -> bool {
        self.reset_static_state
    }

    /// Whether unbound subclasses resolve to this binding
    pub fn inherits_parent_methods(&self) -> bool {
        self.inherits_parent_methods
    }

    /// Declared method signatures, for introspection
    pub fn method_sigs(&self) -> Vec<MethodSig> {
        let mut sigs: Vec<MethodSig> = self.methods.keys().cloned().collect();
        sigs.sort_by(|a, b| a.name.cmp(&b.name).then(a.arity.cmp(&b.arity)));
        sigs
    }

    /// Declared constructor shapes, for introspection
    pub fn ctor_arities(&self) -> Vec<usize> {
        let mut arities: Vec<usize> = self.ctors.keys().copied().collect();
        arities.sort_unstable();
        arities
    }
}

impl std::fmt::Debug for ShadowClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShadowClass")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("methods", &self.methods.len())
            .field("ctors", &self.ctors.len())
            .field("call_through_by_default", &self.call_through_by_default)
            .field("reset_static_state", &self.reset_static_state)
            .field("inherits_parent_methods", &self.inherits_parent_methods)
            .finish()
    }
}

/// Builder for [`ShadowClass`]
pub struct ShadowClassBuilder {
    name: String,
    target: String,
    factory: FactoryFn,
    methods: Vec<(MethodSig, MethodFn)>,
    ctors: Vec<(usize, CtorFn)>,
    resetter: Option<ResetFn>,
    static_init: Option<StaticInitFn>,
    call_through_by_default: bool,
    reset_static_state: bool,
    inherits_parent_methods: bool,
}

impl ShadowClassBuilder {
    /// Replace the default factory
    pub fn factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Shadow> + Send + Sync + 'static,
    {
        self.factory = Arc::new(factory);
        self
    }

    /// Whether unmatched methods call through to the original body
    /// (default: true)
    pub fn call_through_by_default(mut self, enabled: bool) -> Self {
        self.call_through_by_default = enabled;
        self
    }

    /// Opt into static-state reset at test-run boundaries (default: false)
    pub fn reset_static_state(mut self, enabled: bool) -> Self {
        self.reset_static_state = enabled;
        self
    }

    /// Let unbound subclasses of the target resolve to this binding
    /// (default: false)
    pub fn inherits_parent_methods(mut self, enabled: bool) -> Self {
        self.inherits_parent_methods = enabled;
        self
    }

    /// Register an implementation-marked method with a typed receiver.
    ///
    /// The handler runs with the paired shadow as receiver; a receiver of
    /// the wrong concrete type is reported as a type mismatch rather than
    /// a panic.
    pub fn method<S, F>(mut self, name: impl Into<String>, arity: usize, handler: F) -> Self
    where
        S: Shadow,
        F: Fn(&mut S, &dyn CallContext) -> ShadowResult<Value> + Send + Sync + 'static,
    {
        self.methods
            .push((MethodSig::new(name, arity), erase_handler::<S, F>(handler)));
        self
    }

    /// Register a constructor-interception handler for an argument shape.
    ///
    /// The construction convention is distinct from ordinary methods;
    /// handlers are matched by argument-list shape, like overload
    /// resolution.
    pub fn constructor<S, F>(mut self, arity: usize, handler: F) -> Self
    where
        S: Shadow,
        F: Fn(&mut S, &dyn CallContext) -> ShadowResult<Value> + Send + Sync + 'static,
    {
        self.ctors.push((arity, erase_handler::<S, F>(handler)));
        self
    }

    /// Register the class-level reset entry point
    pub fn resetter<F>(mut self, reset: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.resetter = Some(Arc::new(reset));
        self
    }

    /// Register a hook run once when the class is sealed into an engine
    pub fn static_init<F>(mut self, init: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.static_init = Some(Arc::new(init));
        self
    }

    /// Validate and finish the declaration
    pub fn build(self) -> EngineResult<ShadowClass> {
        let mut methods = FxHashMap::default();
        for (sig, handler) in self.methods {
            if methods.insert(sig.clone(), handler).is_some() {
                return Err(EngineError::DuplicateMethod {
                    class: self.name.clone(),
                    sig,
                });
            }
        }
        let mut ctors = FxHashMap::default();
        for (arity, handler) in self.ctors {
            if ctors.insert(arity, handler).is_some() {
                return Err(EngineError::AmbiguousConstructor {
                    class: self.name.clone(),
                    arity,
                });
            }
        }
        Ok(ShadowClass {
            name: self.name,
            target: self.target,
            factory: self.factory,
            methods,
            ctors,
            resetter: self.resetter,
            static_init: self.static_init,
            call_through_by_default: self.call_through_by_default,
            reset_static_state: self.reset_static_state,
            inherits_parent_methods: self.inherits_parent_methods,
        })
    }
}

/// Wrap a typed handler into the erased registered form, downcasting the
/// receiver on each call.
fn erase_handler<S, F>(handler: F) -> MethodFn
where
    S: Shadow,
    F: Fn(&mut S, &dyn CallContext) -> ShadowResult<Value> + Send + Sync + 'static,
{
    Arc::new(move |shadow: &mut dyn Shadow, ctx: &dyn CallContext| {
        let typed = shadow
            .as_any_mut()
            .downcast_mut::<S>()
            .ok_or_else(|| ShadowError::type_mismatch(std::any::type_name::<S>(), "shadow"))?;
        handler(typed, ctx)
    })
}
