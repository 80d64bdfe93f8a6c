//! Construction interceptor
//!
//! When a bound class is instantiated, its shadow is created eagerly and
//! given the chance to run initialization driven by the constructor
//! arguments before the real object is usable. The shadow constructor may
//! run only its own logic (skipping the original constructor body), call
//! through to the original with the same or transformed arguments, or do
//! work around the call-through. Constructors resolve by argument-list
//! shape; ambiguity was already rejected when the declarations were built.

use umbra_sdk::Value;

use crate::call::{CallTarget, ShadowCall};
use crate::descriptor::ClassDescriptor;
use crate::engine::{Engine, EngineInner};
use crate::error::{EngineError, EngineResult};
use crate::object::{ObjRef, RealObject};

impl Engine {
    /// Create an instance of a framework class, running construction
    /// interception if the class is bound.
    pub fn instantiate(&self, class: &str, args: &[Value]) -> EngineResult<ObjRef> {
        let inner = &*self.inner;
        let desc = inner
            .descriptors
            .get(class)
            .ok_or_else(|| EngineError::UnknownClass(class.to_string()))?;

        let obj = RealObject::with_fields(class, inner.descriptors.default_fields(class));

        match inner.registry.resolve(class, &inner.descriptors) {
            None => run_original_ctor(inner, desc, &obj, args)?,
            Some(binding) => {
                // Eager pairing: the shadow exists before any constructor
                // logic runs.
                let cell = inner.pairing.shadow_for(&obj, binding);
                match binding.shadow().constructor(args.len()) {
                    Some(handler) => {
                        let ctx = ShadowCall {
                            direct: &inner.direct,
                            accessor: &inner.accessor,
                            statics: inner.lifecycle.statics(),
                            class: binding.target().name(),
                            obj: &obj,
                            args,
                            target: CallTarget::Constructor,
                        };
                        let mut guard = cell.lock();
                        handler(&mut **guard, &ctx).map_err(EngineError::from)?;
                    }
                    None if binding.call_through_by_default() => {
                        run_original_ctor(inner, desc, &obj, args)?;
                    }
                    // Strict binding with no declared shadow constructor:
                    // the original constructor body is skipped entirely.
                    None => {}
                }
            }
        }
        Ok(obj)
    }
}

fn run_original_ctor(
    inner: &EngineInner,
    desc: &ClassDescriptor,
    obj: &ObjRef,
    args: &[Value],
) -> EngineResult<()> {
    match desc.constructor(args.len()) {
        Some(_) => {
            inner.direct.call_original_constructor(obj, args)?;
            Ok(())
        }
        // A class with no declared constructors still default-constructs.
        None if args.is_empty() && !desc.has_constructors() => Ok(()),
        None => Err(EngineError::ConstructorMismatch {
            class: desc.name().to_string(),
            arity: args.len(),
        }),
    }
}
