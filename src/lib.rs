//! rtsession Core - realtime session coordination for wiki editors
//!
//! This is the Rust core of the realtime loader, compiled to both native and
//! WASM. It implements:
//! - Session negotiation over a per-document events channel
//! - The notice box state machine (connecting, conflict, disconnected)
//! - Cursor reconciliation across remote text edits
//! - A prefix/suffix text delta used by the cursor tracker
//!
//! # Examples
//!
//! ```rust
//! use rtsession_core::{decode_message, diff, SessionMessage};
//!
//! let delta = diff("Hello world", "Hello, world").unwrap();
//! assert_eq!((delta.common_start, delta.common_end), (5, 6));
//!
//! let msg = decode_message(r#"{"cmd":"join","realtime":true}"#).unwrap();
//! assert_eq!(msg, SessionMessage::join(true));
//! ```

pub mod config;
pub mod cursor;
pub mod error;
pub mod protocol;
pub mod session;
pub mod text;
pub mod warning;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-exports for convenience
pub use config::RealtimeConfig;
pub use cursor::{CursorError, CursorTracker, DocumentTree, Position, Range, SelectionSurface};
pub use error::{Result, SessionError};
pub use protocol::{decode_message, encode_message, AnswerState, RejectReason, SessionMessage};
pub use session::{LocalStatus, RequestOutcome, SessionCoordinator, SessionParts};
pub use text::{diff, TextDelta};
pub use warning::{WarningDisplay, WarningKind, WarningState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_import() {
        let config = RealtimeConfig::default();
        assert_eq!(config.events_module(), "default/events");
    }
}
