//! Error types for the session coordination layer

use thiserror::Error;

/// Errors surfaced by the session coordinator and its collaborators
///
/// None of these ever escape an inbound message handler: handlers log and
/// drop. They are returned from the async I/O edges (`join`, reconnect,
/// session checks) so the host can decide what to do.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The channel transport failed to connect, join or send
    #[error("transport error: {0}")]
    Transport(String),

    /// The key service request failed
    #[error("key service error: {0}")]
    KeyService(String),

    /// The key service answered but did not include the requested channel
    #[error("no channel key for {doc} / {module} / {editor}")]
    MissingChannelKey {
        doc: String,
        module: String,
        editor: String,
    },

    /// The key service refused access to the document
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// A peer sent something that does not follow the message vocabulary
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The page configuration cannot start a realtime session
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_message() {
        let err = SessionError::MissingChannelKey {
            doc: "xwiki:Main.WebHome".to_string(),
            module: "default/events".to_string(),
            editor: "all".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no channel key for xwiki:Main.WebHome / default/events / all"
        );
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: SessionError = parse.unwrap_err().into();
        assert!(matches!(err, SessionError::Json(_)));
    }
}
