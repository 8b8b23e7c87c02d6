pub mod error;
pub mod model;
pub mod types;
pub mod validate;

/// Maximum length for model schema identifiers.
pub const MAX_MODEL_NAME_LEN: usize = 64;

/// Maximum length for field schema identifiers.
pub const MAX_FIELD_NAME_LEN: usize = 64;

use thiserror::Error as ThisError;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        err,
        error::ErrorTree,
        model::{FieldDescriptor, ModelDescriptor, Schema},
        types::Primitive,
    };
    pub use serde::{Deserialize, Serialize};
}

///
/// SchemaError
///

#[derive(Debug, ThisError)]
pub enum SchemaError {
    #[error("validation failed: {0}")]
    Validation(error::ErrorTree),
}
