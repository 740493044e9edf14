//! External collaborators reached over the network
//!
//! The browser runs everything on one thread, so the traits are `?Send`.

use crate::error::Result;
use crate::protocol::{KeyRequest, KeyResponse};
use async_trait::async_trait;

/// Channel member identifier assigned by the relay
pub type PeerId = String;

/// Pub/sub channel relay
///
/// Inbound traffic does not go through this trait: the host forwards
/// `message`, `leave`, `join`, `disconnect` and `reconnect` events to the
/// coordinator's `handle_*` methods.
#[async_trait(?Send)]
pub trait ChannelTransport {
    /// Join the channel identified by `key`
    ///
    /// Returns the current members, the local one included.
    async fn join(&mut self, key: &str) -> Result<Vec<PeerId>>;

    /// Send `payload` to every member of the joined channel
    fn broadcast(&mut self, payload: &str) -> Result<()>;

    /// Send `payload` to one peer only
    fn send_to(&mut self, peer: &str, payload: &str) -> Result<()>;
}

/// Backend service handing out channel keys
#[async_trait(?Send)]
pub trait KeyService {
    async fn get_keys(&self, requests: &[KeyRequest]) -> Result<KeyResponse>;
}
