//! Identifier newtypes.
//!
//! The term service hands out ids as JSON numbers or strings depending on
//! the endpoint, and callers key their own rows however they like. Both id
//! kinds are therefore kept as text and accept either JSON form.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

macro_rules! text_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            /// Creates an id from its textual form.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the id as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id.to_string())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(IdVisitor).map(Self)
            }
        }
    };
}

text_id!(
    /// An id assigned by the term service.
    TermId
);

text_id!(
    /// An id assigned to a term by the caller's own application.
    AppId
);

struct IdVisitor;

impl<'de> Visitor<'de> for IdVisitor {
    type Value = String;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an id as a string or an integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
        Ok(v.to_string())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
        Ok(v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn numeric_and_text_ids_agree() {
        let from_number: TermId = serde_json::from_str("42").unwrap();
        let from_text: TermId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(from_number, from_text);
        assert_eq!(from_number, TermId::from(42u64));
    }

    #[test]
    fn serializes_as_text() {
        let id = AppId::from(100u64);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"100\"");
        assert_eq!(id.to_string(), "100");
    }

    #[test]
    fn rejects_non_scalar_ids() {
        assert!(serde_json::from_str::<TermId>("[1]").is_err());
        assert!(serde_json::from_str::<TermId>("{}").is_err());
    }

    proptest! {
        #[test]
        fn any_integer_id_decodes_to_its_decimal_text(n in any::<u64>()) {
            let id: TermId = serde_json::from_str(&n.to_string()).unwrap();
            prop_assert_eq!(id.as_str(), n.to_string());
        }
    }
}
