//! Shadow trait and real-object injection point
//!
//! A shadow is the substitute behavior object paired 1:1 with a real
//! framework instance. The pairing store injects a weak handle to the real
//! object into the shadow at creation time via [`Shadow::attach`]; the
//! handle never extends the real object's lifetime.

use std::any::Any;
use std::sync::{Arc, Weak};

/// Substitute behavior object for one real framework instance.
///
/// Implementations are plain structs holding whatever state the shadow
/// needs (tallies, recorded calls, canned responses). Shadow *methods* are
/// not declared on this trait — they are registered on the shadow class as
/// implementation-marked handlers; ordinary Rust methods on the struct are
/// helpers and are never auto-dispatched.
pub trait Shadow: Any + Send {
    /// Upcast for typed access from test code
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for handler dispatch
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Real-object injection point, called exactly once by the pairing
    /// store before the shadow is visible to any caller. The default
    /// ignores the handle; shadows that delegate store it in a
    /// [`RealHandle`] field.
    fn attach(&mut self, real: RealHandle) {
        let _ = real;
    }
}

/// Weak handle to the real object a shadow is paired with.
///
/// Holds a `Weak` reference only: the real object is the exclusive owner of
/// the pairing, and a shadow outliving it observes `get() == None` rather
/// than keeping it alive.
#[derive(Clone, Default)]
pub struct RealHandle {
    inner: Option<Weak<dyn Any + Send + Sync>>,
}

impl RealHandle {
    /// Handle that is not attached to anything
    pub fn empty() -> Self {
        RealHandle { inner: None }
    }

    /// Wrap a weak reference to the real object
    pub fn new(real: Weak<dyn Any + Send + Sync>) -> Self {
        RealHandle { inner: Some(real) }
    }

    /// True once the pairing store has injected a real object
    pub fn is_attached(&self) -> bool {
        self.inner.is_some()
    }

    /// Upgrade to the typed real object, if it is still alive
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let weak = self.inner.as_ref()?;
        weak.upgrade()?.downcast::<T>().ok()
    }
}

impl std::fmt::Debug for RealHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}
