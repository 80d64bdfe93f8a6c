//! Dispatch router
//!
//! The single decision point for every intercepted method call:
//!
//! ```text
//! Entered -> BindingResolved -> { Unbound:  CallOriginal,
//!                                 Bound:    ShadowLookup }
//!         -> { Found:            InvokeShadow,
//!              NotFound+Default: CallOriginal,
//!              NotFound:         Fail(Unimplemented) }
//!         -> Returned | Fail
//! ```
//!
//! Unbound classes pass straight through to the original body. Bound
//! classes dispatch to the paired shadow's matching implementation method;
//! with no match, the binding's call-through default decides between the
//! original body and a hard unimplemented-method failure that names the
//! class and signature — missing shadow coverage fails loudly instead of
//! no-op-ing.
//!
//! Shadow handlers receive call-through via the direct side channel, so a
//! handler calling through never re-enters this router.

use umbra_sdk::{MethodSig, Value};

use crate::call::{CallTarget, ShadowCall};
use crate::engine::Engine;
use crate::error::{EngineError, EngineResult};
use crate::object::ObjRef;

impl Engine {
    /// Route one method invocation on a real object.
    ///
    /// The embedding calls this from every instrumented call site.
    pub fn dispatch(&self, obj: &ObjRef, method: &str, args: &[Value]) -> EngineResult<Value> {
        let inner = &*self.inner;
        let sig = MethodSig::new(method, args.len());

        let binding = match inner.registry.resolve(obj.class_name(), &inner.descriptors) {
            // Unbound: defined behavior, not an error.
            None => return inner.direct.call_original(obj, &sig, args),
            Some(binding) => binding,
        };

        let cell = inner.pairing.shadow_for(obj, binding);
        match binding.shadow().method(&sig) {
            Some(handler) => {
                let ctx = ShadowCall {
                    direct: &inner.direct,
                    accessor: &inner.accessor,
                    statics: inner.lifecycle.statics(),
                    class: binding.target().name(),
                    obj,
                    args,
                    target: CallTarget::Method(&sig),
                };
                let mut guard = cell.lock();
                handler(&mut **guard, &ctx).map_err(EngineError::from)
            }
            None if binding.call_through_by_default() => {
                if inner.config.log_missing_shadow_methods {
                    self.report_missing(obj.class_name(), &sig);
                }
                inner.direct.call_original(obj, &sig, args)
            }
            None => Err(EngineError::UnimplementedMethod {
                class: obj.class_name().to_string(),
                method: sig,
            }),
        }
    }
}
