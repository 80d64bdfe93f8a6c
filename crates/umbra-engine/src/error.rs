//! Engine error taxonomy
//!
//! Configuration errors (duplicate bindings, ambiguous constructors,
//! unknown parents) surface from `EngineBuilder::build` and are never
//! deferred to call time. Call-time conditions propagate to the immediate
//! caller unmodified; the engine performs no retries and no silent
//! recovery.

use umbra_sdk::{MethodSig, ShadowError};

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors detected by the shadow engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Two shadow classes were registered for the same target class
    #[error("duplicate shadow binding for `{class}`: `{first}` and `{second}`")]
    DuplicateBinding {
        /// Target framework class name
        class: String,
        /// First registered shadow class
        first: String,
        /// Conflicting shadow class
        second: String,
    },

    /// Two class descriptors were registered under the same name
    #[error("duplicate class descriptor for `{0}`")]
    DuplicateClass(String),

    /// A class descriptor names a parent with no registered descriptor
    #[error("class `{class}` declares unknown parent `{parent}`")]
    UnknownParent {
        /// Declaring class
        class: String,
        /// Missing parent name
        parent: String,
    },

    /// Class descriptor parent chain loops back on itself
    #[error("class `{0}` participates in an ancestry cycle")]
    AncestryCycle(String),

    /// A class or shadow class declares two methods with the same signature
    #[error("`{class}` declares duplicate method `{sig}`")]
    DuplicateMethod {
        /// Declaring class or shadow class name
        class: String,
        /// Conflicting signature
        sig: MethodSig,
    },

    /// A class or shadow class declares two constructors with the same
    /// shape, making overload resolution ambiguous
    #[error("`{class}` declares duplicate constructor shape /{arity}")]
    AmbiguousConstructor {
        /// Declaring class or shadow class name
        class: String,
        /// Conflicting argument count
        arity: usize,
    },

    /// The named framework class has no registered descriptor
    #[error("unknown framework class `{0}`")]
    UnknownClass(String),

    /// Pairing was requested for an instance of an unbound class
    #[error("class `{0}` has no shadow binding")]
    NotShadowed(String),

    /// Bound class, no matching shadow method, and call-through disabled.
    /// Deliberately loud: missing shadow coverage is a development-time
    /// signal, not a silent no-op.
    #[error("no shadow method for `{class}.{method}` and call-through is disabled")]
    UnimplementedMethod {
        /// Bound framework class
        class: String,
        /// Unmatched signature
        method: MethodSig,
    },

    /// Call-through requested but the original body does not exist (e.g.
    /// a name-only binding whose class is not linked in this environment)
    #[error("no original body for `{class}.{method}`")]
    MissingOriginal {
        /// Framework class
        class: String,
        /// Requested signature
        method: MethodSig,
    },

    /// No constructor of the requested argument shape
    #[error("class `{class}` declares no constructor of shape /{arity}")]
    ConstructorMismatch {
        /// Framework class
        class: String,
        /// Requested argument count
        arity: usize,
    },

    /// Member accessor lookup failed on the class and all its ancestors
    #[error("member `{member}` not found on `{class}` or its ancestors")]
    MemberNotFound {
        /// Framework class of the receiver
        class: String,
        /// Field or method name
        member: String,
    },

    /// The paired shadow is not of the requested concrete type
    #[error("shadow of `{class}` is not a `{requested}`")]
    ShadowTypeMismatch {
        /// Framework class of the receiver
        class: String,
        /// Requested Rust type name
        requested: &'static str,
    },

    /// Error raised inside a shadow handler
    #[error(transparent)]
    Shadow(#[from] ShadowError),
}
