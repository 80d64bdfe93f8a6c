//! Umbra Shadow Engine
//!
//! Umbra lets test code exercise logic that depends on a large, stateful
//! platform framework without running the real platform: for selected
//! framework classes it substitutes a shadow implementation that mimics
//! observable behavior cheaply and deterministically, while all other
//! classes pass straight through.
//!
//! The engine is the binding and call-dispatch core:
//! - **Registry** ([`ShadowRegistry`]): write-once table of class-to-shadow
//!   bindings, with ancestor-chain fallback and name-only bindings
//! - **Pairing store** ([`PairingStore`]): the 1:1 real↔shadow
//!   association, identity-keyed, race-free on first creation
//! - **Dispatch router** ([`Engine::dispatch`]): shadow vs original vs
//!   fail-loud routing per call
//! - **Construction interceptor** ([`Engine::instantiate`]): eager pairing
//!   and shape-matched shadow constructors
//! - **Lifecycle manager** ([`LifecycleManager`]): deterministic
//!   static-state reset between test runs
//! - **Member accessor** ([`MemberAccessor`]): visibility-bypassing access
//!   to framework internals
//!
//! # Example
//!
//! ```rust,ignore
//! use umbra_engine::{ClassDescriptor, Engine, ShadowClass};
//! use umbra_sdk::{CallContext, Shadow, ShadowResult, Value};
//!
//! let engine = Engine::builder()
//!     .register_class(counter_descriptor())
//!     .register_shadow(
//!         ShadowClass::builder::<ShadowCounter>("ShadowCounter", "Counter")
//!             .call_through_by_default(false)
//!             .method("increment", 0, ShadowCounter::increment)
//!             .build()?,
//!     )
//!     .build()?;
//!
//! let counter = engine.instantiate("Counter", &[])?;
//! assert_eq!(engine.dispatch(&counter, "increment", &[])?, Value::int(1));
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// ============================================================================
// Core Modules
// ============================================================================

/// Member accessor: visibility-bypassing field/method access
pub mod accessor;
/// Engine configuration
pub mod config;
/// Class descriptors and ancestor resolution
pub mod descriptor;
/// Call-through side channel
pub mod direct;
/// Engine errors
pub mod error;
/// Static-state lifecycle management
pub mod lifecycle;
/// Real framework objects
pub mod object;
/// Instance pairing store
pub mod pairing;
/// Shadow registry
pub mod registry;
/// Shadow class declarations
pub mod shadow_class;

/// Registry introspection report
pub mod introspection;

mod call;
mod construct;
mod dispatch;
mod engine;

// ============================================================================
// Public API
// ============================================================================

pub use accessor::MemberAccessor;
pub use config::EngineConfig;
pub use descriptor::{BodyFn, ClassDescriptor, ClassDescriptorBuilder, DescriptorSet, FieldDecl};
pub use direct::DirectCaller;
pub use engine::{Engine, EngineBuilder};
pub use error::{EngineError, EngineResult};
pub use introspection::registry_report;
pub use lifecycle::{LifecycleManager, StaticStore};
pub use object::{InstanceId, ObjRef, RealObject};
pub use pairing::{PairingStore, ShadowCell};
pub use registry::{ClassBinding, ShadowRegistry, TargetClass};
pub use shadow_class::{ShadowClass, ShadowClassBuilder};

// Re-export the SDK types shadow authors and tests use constantly.
pub use umbra_sdk::{CallContext, MethodSig, RealHandle, Shadow, ShadowError, ShadowResult, Value};
