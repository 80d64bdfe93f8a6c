//! Call-through side channel
//!
//! Invokes the original (unshadowed) body of a method or constructor on a
//! real object, bypassing shadow dispatch entirely. This is a distinct
//! entry point from the router, not a toggle on it: a shadow method that
//! calls through can never re-enter itself, because this path never
//! consults the registry or the pairing store.

use std::sync::Arc;

use umbra_sdk::{MethodSig, Value};

use crate::descriptor::DescriptorSet;
use crate::error::{EngineError, EngineResult};
use crate::object::ObjRef;

/// Direct invoker of original framework bodies.
pub struct DirectCaller {
    descriptors: Arc<DescriptorSet>,
}

impl DirectCaller {
    pub(crate) fn new(descriptors: Arc<DescriptorSet>) -> Self {
        DirectCaller { descriptors }
    }

    /// Invoke the original body of `sig` on `obj`, resolving along the
    /// ancestor chain.
    pub fn call_original(&self, obj: &ObjRef, sig: &MethodSig, args: &[Value]) -> EngineResult<Value> {
        let class = obj.class_name();
        if self.descriptors.get(class).is_none() {
            return Err(EngineError::UnknownClass(class.to_string()));
        }
        match self.descriptors.find_method(class, sig) {
            Some((_, body)) => body(obj, args),
            None => Err(EngineError::MissingOriginal {
                class: class.to_string(),
                method: sig.clone(),
            }),
        }
    }

    /// Invoke the original constructor matching the argument shape.
    ///
    /// Constructors are not inherited: only the concrete class's declared
    /// shapes participate in resolution.
    pub fn call_original_constructor(&self, obj: &ObjRef, args: &[Value]) -> EngineResult<Value> {
        let class = obj.class_name();
        let desc = self
            .descriptors
            .get(class)
            .ok_or_else(|| EngineError::UnknownClass(class.to_string()))?;
        match desc.constructor(args.len()) {
            Some(body) => body(obj, args),
            None => Err(EngineError::ConstructorMismatch {
                class: class.to_string(),
                arity: args.len(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ClassDescriptor;
    use crate::object::RealObject;
    use rustc_hash::FxHashMap;

    fn caller() -> DirectCaller {
        let desc = ClassDescriptor::builder("Counter")
            .private_field("count", Value::int(0))
            .method("increment", 0, |obj, _| {
                let next = obj.read_field("count").and_then(|v| v.as_int()).unwrap_or(0) + 1;
                obj.write_field("count", Value::int(next));
                Ok(Value::int(next))
            })
            .constructor(1, |obj, args| {
                obj.write_field("count", args[0].clone());
                Ok(Value::null())
            })
            .build()
            .unwrap();
        DirectCaller::new(Arc::new(DescriptorSet::new(vec![desc]).unwrap()))
    }

    #[test]
    fn test_call_original_runs_body() {
        let caller = caller();
        let obj = RealObject::with_fields("Counter", FxHashMap::default());
        let sig = MethodSig::new("increment", 0);
        assert_eq!(caller.call_original(&obj, &sig, &[]).unwrap(), Value::int(1));
        assert_eq!(caller.call_original(&obj, &sig, &[]).unwrap(), Value::int(2));
    }

    #[test]
    fn test_missing_original_is_named() {
        let caller = caller();
        let obj = RealObject::with_fields("Counter", FxHashMap::default());
        let err = caller
            .call_original(&obj, &MethodSig::new("decrement", 0), &[])
            .unwrap_err();
        assert!(matches!(err, EngineError::MissingOriginal { .. }));
    }

    #[test]
    fn test_unknown_class_rejected() {
        let caller = caller();
        let obj = RealObject::with_fields("Ghost", FxHashMap::default());
        let err = caller
            .call_original(&obj, &MethodSig::new("increment", 0), &[])
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownClass(_)));
    }

    #[test]
    fn test_ctor_shape_resolution() {
        let caller = caller();
        let obj = RealObject::with_fields("Counter", FxHashMap::default());
        caller.call_original_constructor(&obj, &[Value::int(10)]).unwrap();
        assert_eq!(obj.read_field("count"), Some(Value::int(10)));

        let err = caller.call_original_constructor(&obj, &[]).unwrap_err();
        assert!(matches!(err, EngineError::ConstructorMismatch { arity: 0, .. }));
    }
}
