//! Error types.

use thiserror::Error;

use crate::edit::CellRef;
use crate::record::FieldKey;
use crate::record::RecordId;

/// Returned by a save attempt while any cell of the row still fails validation.
///
/// The edit session stays open and nothing is forwarded to the commit sink.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("row {row} has {} invalid field(s)", .errors.len())]
pub struct CommitBlocked {
    pub row: RecordId,
    /// Every cell currently in error, with its message.
    pub errors: Vec<(CellRef, String)>,
}

impl CommitBlocked {
    pub fn message_for(&self, field: FieldKey) -> Option<&str> {
        self.errors
            .iter()
            .find(|(cell, _)| cell.field == field)
            .map(|(_, msg)| msg.as_str())
    }
}

/// Errors raised while turning raw text into record fields.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("{field} must be a whole number, got '{value}'")]
    InvalidInteger { field: FieldKey, value: String },

    #[error("unknown status '{0}'")]
    UnknownStatus(String),

    #[error("{0} cannot be edited")]
    ReadOnly(FieldKey),

    #[error("malformed record data: {0}")]
    Json(#[from] serde_json::Error),
}
