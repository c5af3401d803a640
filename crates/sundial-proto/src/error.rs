//! Protocol error types.

use thiserror::Error;

/// Errors produced while encoding or decoding wire payloads.
///
/// Nothing here is fatal to the owning process: a decode failure means the
/// receiver keeps its previously displayed snapshot unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The snapshot could not be serialized.
    #[error("failed to encode weather snapshot: {0}")]
    Encode(String),

    /// The payload bytes are not a well-formed snapshot: a required key is
    /// absent, or a value carries the wrong type tag.
    #[error("malformed weather snapshot payload: {0}")]
    Decode(String),
}
