//! Member accessor — visibility-bypassing access to framework internals
//!
//! Shadows use this to reach framework fields and methods that have no
//! public accessor. Field and method resolution walks the ancestor
//! descriptor chain; an unknown member is a hard failure naming the class
//! and member. The accessor is a narrow utility with no shared state.

use std::sync::Arc;

use umbra_sdk::{MethodSig, Value};

use crate::descriptor::DescriptorSet;
use crate::error::{EngineError, EngineResult};
use crate::object::ObjRef;

/// Reflective field/method access on real objects.
pub struct MemberAccessor {
    descriptors: Arc<DescriptorSet>,
}

impl MemberAccessor {
    pub(crate) fn new(descriptors: Arc<DescriptorSet>) -> Self {
        MemberAccessor { descriptors }
    }

    /// Read a declared field, public or not
    pub fn get_field(&self, obj: &ObjRef, name: &str) -> EngineResult<Value> {
        let decl = self
            .descriptors
            .find_field(obj.class_name(), name)
            .ok_or_else(|| EngineError::MemberNotFound {
                class: obj.class_name().to_string(),
                member: name.to_string(),
            })?;
        Ok(obj.read_field(name).unwrap_or_else(|| decl.default.clone()))
    }

    /// Write a declared field, public or not
    pub fn set_field(&self, obj: &ObjRef, name: &str, value: Value) -> EngineResult<()> {
        if self.descriptors.find_field(obj.class_name(), name).is_none() {
            return Err(EngineError::MemberNotFound {
                class: obj.class_name().to_string(),
                member: name.to_string(),
            });
        }
        obj.write_field(name, value);
        Ok(())
    }

    /// Invoke an original method body by name, public or not.
    ///
    /// This is raw invocation of the declared body — it does not pass
    /// through shadow dispatch.
    pub fn invoke(&self, obj: &ObjRef, name: &str, args: &[Value]) -> EngineResult<Value> {
        let sig = MethodSig::new(name, args.len());
        match self.descriptors.find_method(obj.class_name(), &sig) {
            Some((_, body)) => body(obj, args),
            None => Err(EngineError::MemberNotFound {
                class: obj.class_name().to_string(),
                member: sig.to_string(),
            }),
        }
    }
}
