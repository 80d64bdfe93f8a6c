//! Umbra SDK - Lightweight SDK for writing shadow classes
//!
//! This crate provides the minimal types and traits needed to write Umbra
//! shadow classes without depending on the full umbra-engine:
//!
//! - [`Value`]: the dynamic argument/return representation
//! - [`Shadow`] / [`RealHandle`]: the substitute object trait and its
//!   real-object injection point
//! - [`CallContext`]: the per-call interface handlers program against
//!   (arguments, call-through, member access, static state)
//! - [`MethodSig`]: the name + arity dispatch key
//! - [`ShadowError`]: handler-level error taxonomy
//!
//! # Example
//!
//! ```ignore
//! use umbra_sdk::{CallContext, RealHandle, Shadow, ShadowResult, Value};
//!
//! #[derive(Default)]
//! struct ShadowCounter {
//!     real: RealHandle,
//!     tally: i64,
//! }
//!
//! impl Shadow for ShadowCounter {
//!     fn as_any(&self) -> &dyn std::any::Any { self }
//!     fn as_any_mut(&mut self) -> &mut dyn std::any::Any { self }
//!     fn attach(&mut self, real: RealHandle) { self.real = real; }
//! }
//!
//! fn increment(shadow: &mut ShadowCounter, _ctx: &dyn CallContext) -> ShadowResult<Value> {
//!     shadow.tally += 1;
//!     Ok(Value::int(shadow.tally))
//! }
//! ```

#![warn(missing_docs)]

mod context;
mod error;
mod handler;
mod shadow;
mod signature;
mod value;

pub use context::CallContext;
pub use error::{ShadowError, ShadowResult};
pub use handler::{CtorFn, FactoryFn, MethodFn, ResetFn, StaticInitFn};
pub use shadow::{RealHandle, Shadow};
pub use signature::MethodSig;
pub use value::Value;
