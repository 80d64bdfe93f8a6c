//! Per-call context handed to shadow handlers
//!
//! Implements the SDK's `CallContext` against engine internals. The
//! call-through path delegates to the direct side channel, so a handler
//! calling through can never recurse back into itself via the router.

use umbra_sdk::{CallContext, MethodSig, ShadowError, ShadowResult, Value};

use crate::accessor::MemberAccessor;
use crate::direct::DirectCaller;
use crate::lifecycle::StaticStore;
use crate::object::ObjRef;

/// What "the original" means for this call.
pub(crate) enum CallTarget<'a> {
    /// An intercepted method; call-through re-resolves by the handler's
    /// argument shape so transformed arguments pick the matching overload
    Method(&'a MethodSig),
    /// An intercepted construction; call-through runs the original
    /// constructor
    Constructor,
}

pub(crate) struct ShadowCall<'a> {
    pub direct: &'a DirectCaller,
    pub accessor: &'a MemberAccessor,
    pub statics: &'a StaticStore,
    /// Binding target class, scoping static storage
    pub class: &'a str,
    pub obj: &'a ObjRef,
    pub args: &'a [Value],
    pub target: CallTarget<'a>,
}

fn to_shadow_err(err: crate::error::EngineError) -> ShadowError {
    ShadowError::Dispatch(err.to_string())
}

impl CallContext for ShadowCall<'_> {
    fn args(&self) -> &[Value] {
        self.args
    }

    fn real(&self) -> Value {
        self.obj.to_value()
    }

    fn call_original(&self, args: &[Value]) -> ShadowResult<Value> {
        match &self.target {
            CallTarget::Method(sig) => {
                let sig = MethodSig::new(sig.name.clone(), args.len());
                self.direct
                    .call_original(self.obj, &sig, args)
                    .map_err(to_shadow_err)
            }
            CallTarget::Constructor => self
                .direct
                .call_original_constructor(self.obj, args)
                .map_err(to_shadow_err),
        }
    }

    fn get_field(&self, name: &str) -> ShadowResult<Value> {
        self.accessor
            .get_field(self.obj, name)
            .map_err(to_shadow_err)
    }

    fn set_field(&self, name: &str, value: Value) -> ShadowResult<()> {
        self.accessor
            .set_field(self.obj, name, value)
            .map_err(to_shadow_err)
    }

    fn static_get(&self, key: &str) -> Option<Value> {
        self.statics.get(self.class, key)
    }

    fn static_set(&self, key: &str, value: Value) {
        self.statics.set(self.class, key, value);
    }
}
