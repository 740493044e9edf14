//! Wire formats
//!
//! - [`SessionMessage`]: the negotiation vocabulary spoken on a document's
//!   events channel, JSON objects discriminated by `cmd`
//! - [`KeyRequest`] / [`KeyResponse`]: the channel key service payloads

pub mod keys;
pub mod message;

pub use keys::{ChannelKey, KeyRequest, KeyResponse};
pub use message::{decode_message, encode_message, AnswerState, RejectReason, SessionMessage};
