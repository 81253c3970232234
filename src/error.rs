use thiserror::Error;

use crate::Value;

/// Why a lookup or removal found nothing.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    /// The tree holds no values.
    #[error("the tree is empty")]
    EmptyTree,

    /// The tree holds values, but not this one.
    #[error("value {0} not found")]
    NotFound(Value),
}
