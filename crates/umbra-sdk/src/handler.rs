//! Handler fn types — the registered form of shadow implementation methods
//!
//! Kept in umbra-sdk so that shadow classes can be declared against SDK
//! types alone; the engine consumes these aliases when sealing a shadow
//! class into its dispatch tables.

use std::sync::Arc;

use crate::context::CallContext;
use crate::error::ShadowResult;
use crate::shadow::Shadow;
use crate::value::Value;

/// Implementation-marked shadow method handler.
///
/// Receives the paired shadow as receiver and the per-call context. The
/// registered (type-erased) form; builders wrap typed closures into this.
pub type MethodFn = Arc<dyn Fn(&mut dyn Shadow, &dyn CallContext) -> ShadowResult<Value> + Send + Sync>;

/// Constructor-interception handler — same shape as a method handler, but
/// registered under the construction convention and matched by argument
/// shape rather than name.
pub type CtorFn = MethodFn;

/// Factory producing a fresh, unattached shadow instance
pub type FactoryFn = Arc<dyn Fn() -> Box<dyn Shadow> + Send + Sync>;

/// Class-level reset entry point, run at test-run boundaries for shadow
/// classes that opt into static-state reset
pub type ResetFn = Arc<dyn Fn() + Send + Sync>;

/// Static-initializer hook, run once when the shadow class is sealed into
/// an engine
pub type StaticInitFn = Arc<dyn Fn() + Send + Sync>;
