//! Realtime session negotiation
//!
//! [`SessionCoordinator`] joins the document's events channel and talks to
//! the other pages through the collaborators in [`transport`] and [`ui`].

mod coordinator;
mod countdown;
mod editors;
mod registry;
pub mod transport;
pub mod ui;

pub use coordinator::{
    ReadyCallback, RequestCallback, RequestOutcome, SessionCoordinator, SessionParts,
};
pub use countdown::{AutoAcceptCountdown, Tick};
pub use editors::{editor_url, EditorInfo, LocalStatus, RealtimeEditors, StartRealtime};
pub use registry::ParticipantRegistry;
pub use transport::{ChannelTransport, KeyService, PeerId};
pub use ui::SessionUi;
