//! NewType wrappers for strong typing throughout the blog server.
//!
//! These types prevent accidental mixing of semantically different values
//! (e.g., passing a post ID where the author's user ID is expected).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate a string NewType wrapper with standard trait implementations.
macro_rules! newtype_string {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner String.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

/// Macro to generate an integer row identifier wrapper.
macro_rules! newtype_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new instance.
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Get the raw integer value.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(v: i64) -> Self {
                Self(v)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i64>().map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

newtype_id!(
    /// Database identifier for a user row.
    ///
    /// Assigned by the store on registration and embedded in session tokens.
    UserId
);

newtype_id!(
    /// Database identifier for a post row.
    PostId
);

newtype_string!(
    /// Unique, immutable login name of a user.
    ///
    /// Also stored on each post as the denormalized author name.
    Username
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_creation() {
        let name = Username::new("alice");
        assert_eq!(name.as_str(), "alice");
        assert_eq!(name.to_string(), "alice");
        assert_eq!(name.into_inner(), "alice".to_string());
    }

    #[test]
    fn test_username_from_string() {
        let name: Username = "bob".into();
        assert_eq!(name.as_str(), "bob");

        let name: Username = String::from("carol").into();
        assert_eq!(name.as_str(), "carol");
    }

    #[test]
    fn test_id_parse() {
        let id: PostId = "42".parse().unwrap();
        assert_eq!(id.get(), 42);
        assert!("abc".parse::<PostId>().is_err());
        assert!("".parse::<PostId>().is_err());
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = UserId::new(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");

        let name = Username::new("alice");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"alice\"");

        let back: UserId = serde_json::from_str("7").unwrap();
        assert_eq!(back, id);
    }
}
