//! Newtype identifiers for event metadata.
//!
//! Event type and event source are both plain strings on the wire, but they
//! mean different things and have different validity rules. Wrapping each in
//! its own type keeps a [`SourceUri`] from being passed where an [`EventType`]
//! is expected.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// The validity predicate runs after the non-empty check.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident, valid = $valid:expr
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty
            /// or otherwise malformed.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                let valid: fn(&str) -> bool = $valid;
                if v.is_empty() || !valid(&v) { None } else { Some(Self(v)) }
            }

            /// Wraps a compile-time constant the caller knows to be valid.
            pub fn from_static(value: &'static str) -> Self {
                debug_assert!(Self::new(value).is_some(), "invalid identifier {value:?}");
                Self(value.to_string())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// Reverse-DNS style tag describing what kind of occurrence an event
    /// represents (e.g. `dev.knative.eventing.containersource-demo.message`).
    EventType, valid = |v| !v.chars().any(char::is_whitespace)
}

string_id! {
    /// Absolute URI identifying the producer of an event.
    ///
    /// Only the presence of a scheme is checked (`https:`, `urn:` and so on);
    /// the rest of the reference is carried verbatim.
    SourceUri, valid = has_scheme
}

/// Returns `true` if `value` starts with an RFC 3986 scheme followed by `:`.
fn has_scheme(value: &str) -> bool {
    let Some((scheme, _)) = value.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
