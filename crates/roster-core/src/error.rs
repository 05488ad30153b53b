//! Error types for roster-core.

use thiserror::Error;

/// Result type for roster mutations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by roster mutations.
///
/// Eligibility evaluation never produces these; lookups there degrade to
/// "no match" instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// No member with the given id.
    #[error("member not found: {0}")]
    MemberNotFound(String),

    /// No category with the given id.
    #[error("category not found: {0}")]
    CategoryNotFound(String),

    /// No item with the given id inside the given category.
    #[error("item {item_id} not found in category {category_id}")]
    ItemNotFound {
        category_id: String,
        item_id: String,
    },

    /// Event slot index outside the tracked range.
    #[error("slot {slot} out of range (0..{max})")]
    SlotOutOfRange { slot: usize, max: usize },

    /// Rejected input (blank names, wrong attendance length, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Whether this error means a referenced entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::MemberNotFound(_) | Error::CategoryNotFound(_) | Error::ItemNotFound { .. }
        )
    }
}
