//! The warning display state machine

use super::state::{Notice, NoticeContext, WarningKind, WarningState};
use super::unload::{Clock, UnloadGuard};
use std::time::Duration;
use tracing::debug;

/// Where notices are materialized
///
/// The host implements this on top of the page layout. The box goes right
/// after an anchor element which depends on whether the editor is maximized.
pub trait NoticeSurface {
    /// Whether the anchor element for the current layout exists
    fn has_anchor(&self, fullscreen: bool) -> bool;

    /// Create the box for `notice`
    fn render(&mut self, notice: &Notice);

    /// Remove the current box
    fn remove(&mut self);

    /// Move the box after the anchor of the current layout and scroll to it
    fn reposition(&mut self, fullscreen: bool);

    /// Let the host re-flow the editing area
    fn notify_resize(&mut self);
}

/// Owns the single notice box
pub struct WarningDisplay {
    state: WarningState,
    context: NoticeContext,
    fullscreen: bool,
    unload: UnloadGuard,
    surface: Box<dyn NoticeSurface>,
    clock: Box<dyn Clock>,
}

impl WarningDisplay {
    pub fn new(
        surface: Box<dyn NoticeSurface>,
        clock: Box<dyn Clock>,
        unload_guard: Duration,
    ) -> Self {
        Self {
            state: WarningState::Hidden,
            context: NoticeContext::default(),
            fullscreen: false,
            unload: UnloadGuard::new(unload_guard),
            surface,
            clock,
        }
    }

    pub fn state(&self) -> WarningState {
        self.state
    }

    pub fn is_warning_visible(&self) -> bool {
        matches!(self.state, WarningState::Warning(_))
    }

    pub fn is_conflict_visible(&self) -> bool {
        self.state == WarningState::Warning(WarningKind::Conflict)
    }

    /// Update the page facts used to word future notices
    pub fn set_context(&mut self, context: NoticeContext) {
        self.context = context;
    }

    /// The page is navigating away
    pub fn begin_unload(&mut self) {
        let now = self.clock.now();
        self.unload.begin(now);
    }

    pub fn is_unloading(&self) -> bool {
        self.unload.is_active(self.clock.now())
    }

    /// The editor entered or left maximized mode
    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
        if self.state.is_visible() {
            self.surface.reposition(fullscreen);
            self.surface.notify_resize();
        }
    }

    /// Hidden → Connecting
    pub fn show_connecting(&mut self) -> bool {
        if self.state != WarningState::Hidden {
            return false;
        }
        self.transition(WarningState::Connecting)
    }

    /// Any state → Warning(kind)
    pub fn show_warning(&mut self, kind: WarningKind) -> bool {
        if self.state == WarningState::Warning(kind) {
            return false;
        }
        self.transition(WarningState::Warning(kind))
    }

    /// Any state → Disconnected
    pub fn show_disconnected(&mut self) -> bool {
        if self.state == WarningState::Disconnected {
            return false;
        }
        self.transition(WarningState::Disconnected)
    }

    /// Any state → Hidden
    pub fn hide(&mut self) -> bool {
        if self.state == WarningState::Hidden {
            return false;
        }
        debug!(from = ?self.state, "hiding realtime notice");
        self.surface.remove();
        self.state = WarningState::Hidden;
        self.surface.notify_resize();
        true
    }

    /// Hide a conflict or transport warning, leaving other notices alone
    pub fn hide_warning(&mut self) -> bool {
        self.is_warning_visible() && self.hide()
    }

    /// Hide the conflict warning only
    pub fn hide_conflict(&mut self) -> bool {
        self.is_conflict_visible() && self.hide()
    }

    pub fn hide_connecting(&mut self) -> bool {
        self.state == WarningState::Connecting && self.hide()
    }

    pub fn hide_disconnected(&mut self) -> bool {
        self.state == WarningState::Disconnected && self.hide()
    }

    fn transition(&mut self, next: WarningState) -> bool {
        if self.is_unloading() {
            debug!(?next, "page is unloading, notice suppressed");
            return false;
        }
        if !self.surface.has_anchor(self.fullscreen) {
            debug!(?next, "no anchor for the realtime notice");
            return false;
        }
        let Some(notice) = Notice::for_state(next, &self.context) else {
            return self.hide();
        };

        debug!(from = ?self.state, to = ?next, "realtime notice transition");
        if self.state.is_visible() {
            self.surface.remove();
        }
        self.surface.render(&notice);
        self.state = next;
        self.surface.reposition(self.fullscreen);
        self.surface.notify_resize();
        true
    }
}
