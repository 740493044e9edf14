//! Dialogs the negotiation needs from the page

use super::editors::EditorInfo;
use crate::protocol::RejectReason;

/// Rendering of every dialog the coordinator can trigger
///
/// Button handlers call back into the coordinator
/// (`resolve_request_prompt`), never the other way around.
pub trait SessionUi {
    /// Another user asks to collaborate; offers accept and decline, and
    /// shows the auto-accept countdown
    fn present_request(&mut self, info: &EditorInfo, seconds_left: u32);

    fn update_countdown(&mut self, seconds_left: u32);

    /// Close the request dialog
    fn dismiss_request(&mut self);

    /// Close the dialog shown while our own request is in flight
    fn dismiss_pending(&mut self);

    /// The peer cannot host the requested session type
    fn present_unavailable(&mut self);

    /// The peer declined; `Invalid` means its editor cannot switch
    fn present_rejection(&mut self, reason: Option<RejectReason>);

    /// Channel keys changed while offline, the page must reload
    fn present_reload(&mut self);

    /// The lock page offers to join or request a session; `active` lists the
    /// realtime editors currently in use, empty when there is none
    fn present_lock_prompt(&mut self, active: &[String]);
}
