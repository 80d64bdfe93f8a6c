//! Real framework objects
//!
//! Framework instances are dynamic: a class name, a process-unique
//! identity, and a field map seeded from the class descriptor chain. The
//! embedding creates them through `Engine::instantiate` (so construction
//! interception runs) and routes their method calls through
//! `Engine::dispatch`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use umbra_sdk::Value;

/// Process-unique identity of a real object.
///
/// Pairing is keyed by identity, never by equality: two equal-looking
/// objects are distinct pairing keys.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct InstanceId(u64);

static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

impl InstanceId {
    /// Generate a new unique InstanceId
    pub fn new() -> Self {
        InstanceId(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the numeric ID value
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared handle to a real object
pub type ObjRef = Arc<RealObject>;

/// An instance of a framework class that may participate in a binding.
pub struct RealObject {
    id: InstanceId,
    class: Arc<str>,
    fields: Mutex<FxHashMap<String, Value>>,
}

impl RealObject {
    /// Create an instance with the given initial field values.
    ///
    /// Internal to the engine; embeddings go through `Engine::instantiate`
    /// so that construction interception applies.
    pub(crate) fn with_fields(class: &str, fields: FxHashMap<String, Value>) -> ObjRef {
        Arc::new(RealObject {
            id: InstanceId::new(),
            class: Arc::from(class),
            fields: Mutex::new(fields),
        })
    }

    /// Identity of this instance
    pub fn id(&self) -> InstanceId {
        self.id
    }

    /// Concrete framework class name
    pub fn class_name(&self) -> &str {
        &self.class
    }

    /// Raw field read, used by original bodies the embedding registers.
    ///
    /// Declared visibility is not enforced here; shadow and test code
    /// reach fields through the member accessor instead.
    pub fn read_field(&self, name: &str) -> Option<Value> {
        self.fields.lock().get(name).cloned()
    }

    /// Raw field write, used by original bodies the embedding registers
    pub fn write_field(&self, name: &str, value: Value) {
        self.fields.lock().insert(name.to_string(), value);
    }

    /// Wrap this object as a dispatch `Value`
    pub fn to_value(self: &Arc<Self>) -> Value {
        Value::obj(self.clone())
    }
}

impl std::fmt::Debug for RealObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealObject")
            .field("class", &self.class)
            .field("id", &self.id.as_u64())
            .finish()
    }
}
