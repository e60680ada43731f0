//! Domain error types.

use thiserror::Error;

/// Errors raised while constructing value objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("connection id must not be empty")]
    EmptyConnectionId,

    #[error("room id must not be empty")]
    EmptyRoomId,

    #[error("room name must not be empty")]
    EmptyRoomName,

    #[error("username must not be empty")]
    EmptyDisplayName,
}

/// Errors raised by relay state transitions.
///
/// The `Display` text of each variant is what the sender sees in the
/// `error` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// The referenced room does not exist.
    #[error("Room '{0}' does not exist")]
    NotFound(String),

    /// A room with the supplied id already exists.
    #[error("A room with id '{0}' already exists")]
    AlreadyExists(String),

    /// The request carried an empty or otherwise unusable value.
    #[error("{0}")]
    InvalidInput(#[from] ValueObjectError),

    /// The connection has no session (already disconnected).
    #[error("Unknown connection '{0}'")]
    InvalidState(String),
}
