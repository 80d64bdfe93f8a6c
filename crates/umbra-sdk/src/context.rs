//! CallContext trait — abstract engine operations for shadow handlers
//!
//! Defines the interface the Umbra engine implements for each dispatched
//! call. Shadow classes program against this trait without depending on
//! engine internals. The call-through path exposed here is a side channel:
//! it invokes the original, unshadowed body directly and never re-enters
//! the dispatch router, so calling through from inside a shadow method
//! cannot recurse into that same method.

use crate::error::{ShadowError, ShadowResult};
use crate::value::Value;

/// Per-call context handed to shadow method and constructor handlers.
///
/// The receiver shadow is passed to the handler separately (as
/// `&mut dyn Shadow`); this trait carries everything else: the call's
/// arguments, call-through to the original body, member access on the real
/// object, and the shadow class's static storage.
pub trait CallContext {
    /// Arguments of the intercepted call
    fn args(&self) -> &[Value];

    /// The real object receiving the call, as an opaque value handle
    fn real(&self) -> Value;

    /// Invoke the original (unshadowed) body of the intercepted method —
    /// or, in a constructor handler, the original constructor — with the
    /// given arguments. Bypasses the router entirely.
    fn call_original(&self, args: &[Value]) -> ShadowResult<Value>;

    /// Read a field of the real object, bypassing declared visibility
    fn get_field(&self, name: &str) -> ShadowResult<Value>;

    /// Write a field of the real object, bypassing declared visibility
    fn set_field(&self, name: &str, value: Value) -> ShadowResult<()>;

    /// Read class-level (static) shadow state for this shadow's class
    fn static_get(&self, key: &str) -> Option<Value>;

    /// Write class-level (static) shadow state for this shadow's class
    fn static_set(&self, key: &str, value: Value);

    /// Argument by position, with a named error on overflow
    fn arg(&self, index: usize) -> ShadowResult<Value> {
        self.args().get(index).cloned().ok_or_else(|| {
            ShadowError::ArgumentError(format!(
                "missing argument {} (got {})",
                index,
                self.args().len()
            ))
        })
    }

    /// Integer argument by position
    fn arg_int(&self, index: usize) -> ShadowResult<i64> {
        let v = self.arg(index)?;
        v.as_int()
            .ok_or_else(|| ShadowError::type_mismatch("int", v.kind()))
    }

    /// String argument by position
    fn arg_str(&self, index: usize) -> ShadowResult<String> {
        let v = self.arg(index)?;
        v.as_str()
            .map(str::to_string)
            .ok_or_else(|| ShadowError::type_mismatch("str", v.kind()))
    }

    /// Boolean argument by position
    fn arg_bool(&self, index: usize) -> ShadowResult<bool> {
        let v = self.arg(index)?;
        v.as_bool()
            .ok_or_else(|| ShadowError::type_mismatch("bool", v.kind()))
    }
}
