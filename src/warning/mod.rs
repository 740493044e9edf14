//! Realtime notices - the box that tells an editor about the session
//!
//! Four mutually exclusive states share one box on the page:
//! - Connecting while the channel is being joined
//! - Warning when someone else edits concurrently, or the relay is unreachable
//! - Disconnected when a realtime session loses its connection
//! - Hidden otherwise
//!
//! A single enum holds the state, so two boxes can never be visible at once.
//! Notices are suppressed for a few seconds after navigation starts.

mod display;
mod state;
mod unload;

pub use display::{NoticeSurface, WarningDisplay};
pub use state::{Notice, NoticeContext, NoticeLink, Severity, WarningKind, WarningState};
pub use unload::{Clock, SystemClock, UnloadGuard};
