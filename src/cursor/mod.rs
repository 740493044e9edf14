//! Cursor reconciliation
//!
//! Keeps a user's selection alive across remote edits and browser reflows.
//! Instead of trusting a pointer into the live document, the tracker stores
//! the last known endpoints and repairs them:
//! - after a text node changes, by mapping offsets through a prefix/suffix
//!   [`TextDelta`](crate::text::TextDelta)
//! - before writing back, by checking both endpoints are still inside the
//!   editable root and ordering them
//! - after the browser collapses a caret onto an empty line break
//!
//! The DOM and the platform selection are reached through the
//! [`DocumentTree`] and [`SelectionSurface`] traits.

mod range;
mod tracker;
mod tree;

pub use range::{EndpointMask, Position, Range};
pub use tracker::CursorTracker;
pub use tree::{DocumentTree, SelectionSurface};

use std::fmt;
use thiserror::Error;

/// One end of a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => f.write_str("start"),
            Endpoint::End => f.write_str("end"),
        }
    }
}

/// Why a selection could not be restored
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    #[error("selection {0} is unknown")]
    MissingEndpoint(Endpoint),

    #[error("selection {0} is no longer inside the editable root")]
    OutsideRoot(Endpoint),
}
