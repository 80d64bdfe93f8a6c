//! Method signatures — the dispatch key for shadow method resolution
//!
//! A signature is a method name plus its argument-list shape (arity). The
//! dynamic `Value` model carries runtime kinds only, so arity is the shape
//! used for both method matching and constructor overload resolution.

/// Key identifying one method of a framework class: name plus arity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSig {
    /// Method name as declared on the framework class
    pub name: String,
    /// Number of arguments
    pub arity: usize,
}

impl MethodSig {
    /// Create a signature from a name and arity
    pub fn new(name: impl Into<String>, arity: usize) -> Self {
        MethodSig {
            name: name.into(),
            arity,
        }
    }
}

impl std::fmt::Display for MethodSig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.name, self.arity)
    }
}
