use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// Primitive
///
/// The closed set of symbolic type tags the generator understands.
/// Anything else resolves to `Unknown`, which emits as the universal
/// JSON value type rather than failing generation.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum Primitive {
    Boolean,
    DateTime,
    Int,
    String,
    Unknown,
}

impl Primitive {
    /// Resolve a symbolic tag; unknown tags are passed through, not rejected.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "Int" => Self::Int,
            "String" => Self::String,
            "Boolean" => Self::Boolean,
            "DateTime" => Self::DateTime,
            _ => Self::Unknown,
        }
    }
}
