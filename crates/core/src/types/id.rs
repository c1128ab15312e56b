//! Newtype IDs for type-safe entity references.
//!
//! The backend is not consistent about identifier types: the same product may
//! arrive with a numeric `id` in one response and a string `productId` in
//! another. Every ID is therefore stored as a string, and numbers are coerced
//! to their plain decimal rendering (`42` becomes `"42"`).

use serde_json::Value;

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`, `from_json()`
/// - `From<&str>` and `From<String>` implementations
///
/// # Example
///
/// ```rust
/// # use nordic_core::define_id;
/// define_id!(WarehouseId);
/// define_id!(OrderId);
///
/// let warehouse = WarehouseId::new("w-1");
/// let order = OrderId::new("w-1");
///
/// // These are different types, so this won't compile:
/// // let _: WarehouseId = order;
/// assert_eq!(warehouse.as_str(), order.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Coerce a JSON scalar into an ID.
            ///
            /// Returns `None` for `null`, empty strings, and non-scalar values.
            #[must_use]
            pub fn from_json(value: &::serde_json::Value) -> Option<Self> {
                $crate::types::id::coerce_id(value).map(Self)
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(CategoryId);
define_id!(BrandId);
define_id!(OrderId);

/// Coerce a JSON scalar to its identifier string.
///
/// Strings are taken verbatim, numbers and booleans use their JSON rendering.
/// `null`, empty strings, arrays and objects yield `None`.
#[must_use]
pub fn coerce_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
