//! Class descriptors — the embedding's declaration of framework classes
//!
//! A descriptor carries everything the engine needs to know about one
//! framework class: its name, its parent, its declared fields (with
//! visibility and defaults), its original method bodies, and its
//! constructor shapes. The original bodies are the preserved, unshadowed
//! implementations that call-through and pass-through dispatch execute.
//!
//! Ancestry is resolved by an explicit parent-name walk over the
//! [`DescriptorSet`], never by any type-system dispatch: behavior stays
//! data-driven and testable on its own.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use umbra_sdk::{MethodSig, Value};

use crate::error::{EngineError, EngineResult};
use crate::object::ObjRef;

/// Original (unshadowed) method or constructor body.
///
/// Receives the real object and the call arguments.
pub type BodyFn = Arc<dyn Fn(&ObjRef, &[Value]) -> EngineResult<Value> + Send + Sync>;

/// Declared field of a framework class
#[derive(Clone)]
pub struct FieldDecl {
    /// Field name
    pub name: String,
    /// Declared visibility; the member accessor bypasses this
    pub public: bool,
    /// Initial value for new instances
    pub default: Value,
}

/// Declaration of one framework class.
pub struct ClassDescriptor {
    name: String,
    parent: Option<String>,
    fields: Vec<FieldDecl>,
    methods: FxHashMap<MethodSig, BodyFn>,
    ctors: FxHashMap<usize, BodyFn>,
}

impl ClassDescriptor {
    /// Start declaring a framework class
    pub fn builder(name: impl Into<String>) -> ClassDescriptorBuilder {
        ClassDescriptorBuilder {
            name: name.into(),
            parent: None,
            fields: Vec::new(),
            methods: Vec::new(),
            ctors: Vec::new(),
        }
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent class name, if any
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Declared fields, in declaration order
    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    /// Original body for a signature declared on this class (no ancestor walk)
    pub fn method(&self, sig: &MethodSig) -> Option<&BodyFn> {
        self.methods.get(sig)
    }

    /// Original constructor body for an argument shape
    pub fn constructor(&self, arity: usize) -> Option<&BodyFn> {
        self.ctors.get(&arity)
    }

    /// True if the class declares any constructor
    pub fn has_constructors(&self) -> bool {
        !self.ctors.is_empty()
    }

    /// Look up a declared field on this class only
    fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl std::fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("name", &self.name)
            .field("parent", &self.parent)
            .field("fields", &self.fields.len())
            .field("methods", &self.methods.len())
            .field("ctors", &self.ctors.len())
            .finish()
    }
}

/// Builder for [`ClassDescriptor`]
pub struct ClassDescriptorBuilder {
    name: String,
    parent: Option<String>,
    fields: Vec<FieldDecl>,
    methods: Vec<(MethodSig, BodyFn)>,
    ctors: Vec<(usize, BodyFn)>,
}

impl ClassDescriptorBuilder {
    /// Declare the parent class
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Declare a public field with its default value
    pub fn field(mut self, name: impl Into<String>, default: Value) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            public: true,
            default,
        });
        self
    }

    /// Declare a non-public field with its default value
    pub fn private_field(mut self, name: impl Into<String>, default: Value) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            public: false,
            default,
        });
        self
    }

    /// Register an original method body
    pub fn method<F>(mut self, name: impl Into<String>, arity: usize, body: F) -> Self
    where
        F: Fn(&ObjRef, &[Value]) -> EngineResult<Value> + Send + Sync + 'static,
    {
        self.methods
            .push((MethodSig::new(name, arity), Arc::new(body)));
        self
    }

    /// Register an original constructor body for an argument shape
    pub fn constructor<F>(mut self, arity: usize, body: F) -> Self
    where
        F: Fn(&ObjRef, &[Value]) -> EngineResult<Value> + Send + Sync + 'static,
    {
        self.ctors.push((arity, Arc::new(body)));
        self
    }

    /// Finish the declaration.
    ///
    /// Duplicate method signatures or constructor shapes are configuration
    /// errors, surfaced here rather than at call time.
    pub fn build(self) -> EngineResult<ClassDescriptor> {
        let mut methods = FxHashMap::default();
        for (sig, body) in self.methods {
            if methods.insert(sig.clone(), body).is_some() {
                return Err(EngineError::DuplicateMethod {
                    class: self.name.clone(),
                    sig,
                });
            }
        }
        let mut ctors = FxHashMap::default();
        for (arity, body) in self.ctors {
            if ctors.insert(arity, body).is_some() {
                return Err(EngineError::AmbiguousConstructor {
                    class: self.name.clone(),
                    arity,
                });
            }
        }
        Ok(ClassDescriptor {
            name: self.name,
            parent: self.parent,
            fields: self.fields,
            methods,
            ctors,
        })
    }
}

/// All registered class descriptors, with ancestor-chain resolution.
///
/// Immutable once the engine is built; every lookup is lock-free.
pub struct DescriptorSet {
    by_name: FxHashMap<String, ClassDescriptor>,
}

impl DescriptorSet {
    /// Validate and index a set of descriptors.
    ///
    /// Fails on duplicate class names, parents without descriptors, and
    /// ancestry cycles.
    pub fn new(descriptors: Vec<ClassDescriptor>) -> EngineResult<Self> {
        let mut by_name: FxHashMap<String, ClassDescriptor> = FxHashMap::default();
        for desc in descriptors {
            let name = desc.name.clone();
            if by_name.insert(name.clone(), desc).is_some() {
                return Err(EngineError::DuplicateClass(name));
            }
        }
        for desc in by_name.values() {
            if let Some(parent) = desc.parent() {
                if !by_name.contains_key(parent) {
                    return Err(EngineError::UnknownParent {
                        class: desc.name.clone(),
                        parent: parent.to_string(),
                    });
                }
            }
        }
        let set = DescriptorSet { by_name };
        for name in set.by_name.keys() {
            set.check_cycle(name)?;
        }
        Ok(set)
    }

    fn check_cycle(&self, start: &str) -> EngineResult<()> {
        let mut seen = 0usize;
        let mut current = Some(start);
        while let Some(name) = current {
            seen += 1;
            if seen > self.by_name.len() {
                return Err(EngineError::AncestryCycle(start.to_string()));
            }
            current = self.by_name.get(name).and_then(|d| d.parent());
        }
        Ok(())
    }

    /// Descriptor for an exact class name
    pub fn get(&self, name: &str) -> Option<&ClassDescriptor> {
        self.by_name.get(name)
    }

    /// Walk a class and its ancestors, nearest first
    pub fn ancestors<'a>(&'a self, class: &str) -> impl Iterator<Item = &'a ClassDescriptor> {
        let mut current = self.by_name.get(class);
        std::iter::from_fn(move || {
            let desc = current?;
            current = desc.parent().and_then(|p| self.by_name.get(p));
            Some(desc)
        })
    }

    /// Resolve an original method body along the ancestor chain
    pub fn find_method(&self, class: &str, sig: &MethodSig) -> Option<(&ClassDescriptor, &BodyFn)> {
        self.ancestors(class)
            .find_map(|desc| desc.method(sig).map(|body| (desc, body)))
    }

    /// Resolve a declared field along the ancestor chain
    pub fn find_field(&self, class: &str, name: &str) -> Option<&FieldDecl> {
        self.ancestors(class).find_map(|desc| desc.field(name))
    }

    /// Initial field map for a new instance: root-first so a subclass
    /// default wins over a same-named ancestor field
    pub fn default_fields(&self, class: &str) -> FxHashMap<String, Value> {
        let chain: Vec<&ClassDescriptor> = self.ancestors(class).collect();
        let mut fields = FxHashMap::default();
        for desc in chain.into_iter().rev() {
            for field in &desc.fields {
                fields.insert(field.name.clone(), field.default.clone());
            }
        }
        fields
    }

    /// Number of registered classes
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// True if no classes are registered
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl std::fmt::Debug for DescriptorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DescriptorSet")
            .field("classes", &self.by_name.len())
            .finish()
    }
}
