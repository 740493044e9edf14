//! Session coordinator
//!
//! Every page viewing or editing a document joins the document's events
//! channel, whether it edits in realtime, edits offline, or only shows the
//! lock notice. The channel serves two purposes:
//!
//! 1. A user on the lock page can ask the offline editor to open a realtime
//!    session (`request` / `answer`).
//! 2. Editors learn about each other. A page that starts editing broadcasts
//!    `join{realtime}`; members that see a risk of conflict show the conflict
//!    warning and tell the newcomer to do the same (`displayWarning`). When a
//!    member leaves, `isSomeoneOffline` lets the others re-evaluate.
//!
//! There is no central tally: each page decides for itself, and every
//! message is safe to repeat or reorder.

use super::countdown::{AutoAcceptCountdown, Tick};
use super::editors::{editor_url, EditorInfo, LocalStatus, RealtimeEditors, StartRealtime};
use super::registry::ParticipantRegistry;
use super::transport::{ChannelTransport, KeyService, PeerId};
use super::ui::SessionUi;
use crate::config::{self, Preferences, RealtimeConfig};
use crate::error::Result;
use crate::protocol::{
    decode_message, encode_message, AnswerState, KeyRequest, RejectReason, SessionMessage,
};
use crate::warning::{NoticeContext, WarningDisplay, WarningKind, WarningState};
use tracing::{debug, error, info, warn};

/// How a `request_rt` call was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Nobody else is on the channel, nothing was sent
    NoOtherParticipant,
    /// First answer received from a peer
    Answered(AnswerState),
}

/// Resolver of a pending `request_rt`
pub type RequestCallback = Box<dyn FnOnce(RequestOutcome)>;

/// Called with `true` once the channel is joined, `false` if it cannot be
pub type ReadyCallback = Box<dyn FnOnce(bool)>;

/// What to do once readiness is known
enum ReadyAction {
    Callback(ReadyCallback),
    LockPrompt,
}

/// Work waiting for the channel
enum Deferred {
    Request {
        session_type: String,
        callback: RequestCallback,
    },
    Ready(ReadyAction),
}

/// Channel state owned by the coordinator
#[derive(Default)]
struct SessionContext {
    channel_ready: bool,
    network_error: bool,
    participants: ParticipantRegistry,
    pending_request: Option<PendingRequest>,
    deferred: Vec<Deferred>,
}

/// Our own request waiting for an answer of the same type
struct PendingRequest {
    session_type: String,
    resolve: RequestCallback,
}

/// An incoming request waiting for the local user
struct PendingPrompt {
    session_type: String,
    countdown: AutoAcceptCountdown,
}

/// Collaborators handed to the coordinator
pub struct SessionParts {
    pub transport: Box<dyn ChannelTransport>,
    pub keys: Box<dyn KeyService>,
    pub ui: Box<dyn SessionUi>,
    pub warnings: WarningDisplay,
}

/// Negotiates realtime sessions for one page load
pub struct SessionCoordinator {
    config: RealtimeConfig,
    status: LocalStatus,
    editors: RealtimeEditors,
    ctx: SessionContext,
    prompt: Option<PendingPrompt>,
    next_prompt_token: u64,
    transport: Box<dyn ChannelTransport>,
    keys: Box<dyn KeyService>,
    ui: Box<dyn SessionUi>,
    warnings: WarningDisplay,
}

impl SessionCoordinator {
    pub fn new(config: RealtimeConfig, status: LocalStatus, parts: SessionParts) -> Self {
        let mut coordinator = Self {
            config,
            status,
            editors: RealtimeEditors::new(),
            ctx: SessionContext::default(),
            prompt: None,
            next_prompt_token: 0,
            transport: parts.transport,
            keys: parts.keys,
            ui: parts.ui,
            warnings: parts.warnings,
        };
        coordinator.refresh_notice_context();
        coordinator
    }

    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    pub fn status(&self) -> &LocalStatus {
        &self.status
    }

    pub fn participants(&self) -> &ParticipantRegistry {
        &self.ctx.participants
    }

    pub fn warning_state(&self) -> WarningState {
        self.warnings.state()
    }

    pub fn warnings_mut(&mut self) -> &mut WarningDisplay {
        &mut self.warnings
    }

    pub fn is_channel_ready(&self) -> bool {
        self.ctx.channel_ready
    }

    pub fn has_pending_request(&self) -> bool {
        self.ctx.pending_request.is_some()
    }

    /// Token of the open request prompt, for the host's countdown timer
    pub fn prompt_token(&self) -> Option<u64> {
        self.prompt.as_ref().map(|p| p.countdown.token())
    }

    /// Whether the user opted out of realtime prompts
    pub fn realtime_opted_out(&self, prefs: &dyn Preferences) -> bool {
        config::realtime_opted_out(prefs, &self.config)
    }

    /// Declare a session type this page can host
    pub fn register_editor(
        &mut self,
        session_type: impl Into<String>,
        info: EditorInfo,
        start: StartRealtime,
    ) {
        self.editors.register(session_type, info, start);
        self.refresh_notice_context();
    }

    /// URL of a realtime editor the current editor can switch into
    pub fn realtime_editor_url(&self) -> Option<String> {
        let session_type = self.editors.compatible_type(self.status.editor.as_deref())?;
        let info = self.editors.info(session_type)?;
        match editor_url(&self.status.page_url, info) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(error = %e, "cannot build the realtime editor URL");
                None
            }
        }
    }

    fn refresh_notice_context(&mut self) {
        let context = NoticeContext {
            realtime: self.status.realtime,
            forced: self.status.forced,
            realtime_editor_url: self.realtime_editor_url(),
        };
        self.warnings.set_context(context);
    }

    fn events_key_request(&self) -> KeyRequest {
        KeyRequest::new(
            self.config.document_reference.clone(),
            self.config.events_module(),
            "all",
        )
    }

    // ------------------------------------------------------------------
    // Joining
    // ------------------------------------------------------------------

    /// Fetch the events channel key and join the channel
    ///
    /// On failure the transport warning is shown and the error returned; the
    /// transport's reconnect event retries through `handle_reconnect`.
    pub async fn join(&mut self) -> Result<()> {
        let request = self.events_key_request();
        match self.open_channel(&request).await {
            Ok(members) => {
                self.on_channel_open(members);
                Ok(())
            }
            Err(e) => {
                self.on_network_error(&e.to_string());
                Err(e)
            }
        }
    }

    async fn open_channel(&mut self, request: &KeyRequest) -> Result<Vec<PeerId>> {
        let reply = self.keys.get_keys(std::slice::from_ref(request)).await?;
        let key = reply.require_key(request)?;
        self.transport.join(&key).await
    }

    fn on_channel_open(&mut self, members: Vec<PeerId>) {
        info!(members = members.len(), "joined the realtime events channel");
        self.ctx.participants.replace(members);
        self.ctx.channel_ready = true;
        self.ctx.network_error = false;
        if !self.status.lock_page {
            self.broadcast(&SessionMessage::join(self.status.realtime));
        }
        self.release_deferred();
    }

    fn on_network_error(&mut self, reason: &str) {
        error!(%reason, "cannot join the realtime events channel");
        self.ctx.network_error = true;
        self.warnings
            .show_warning(WarningKind::Transport { severe: false });
        self.release_deferred();
    }

    fn release_deferred(&mut self) {
        let deferred = std::mem::take(&mut self.ctx.deferred);
        for item in deferred {
            match item {
                Deferred::Request {
                    session_type,
                    callback,
                } if self.ctx.channel_ready => self.request_rt(session_type, callback),
                Deferred::Ready(action) if self.ctx.channel_ready || self.ctx.network_error => {
                    self.run_when_ready(action)
                }
                other => self.ctx.deferred.push(other),
            }
        }
    }

    /// Run `callback` once it is known whether the channel can be used
    ///
    /// Shows the connecting notice meanwhile. When the channel cannot be
    /// joined the severe transport warning replaces it.
    pub fn when_ready(&mut self, callback: ReadyCallback) {
        self.run_when_ready(ReadyAction::Callback(callback));
    }

    fn run_when_ready(&mut self, action: ReadyAction) {
        self.warnings.show_connecting();
        if self.ctx.channel_ready {
            self.warnings.hide_connecting();
            match action {
                ReadyAction::Callback(callback) => callback(true),
                ReadyAction::LockPrompt => self.ui.present_lock_prompt(&[]),
            }
        } else if self.ctx.network_error {
            self.warnings.hide_connecting();
            self.warnings.hide_warning();
            self.warnings
                .show_warning(WarningKind::Transport { severe: true });
            if let ReadyAction::Callback(callback) = action {
                callback(false);
            }
        } else {
            self.ctx.deferred.push(Deferred::Ready(action));
        }
    }

    /// Lock page only: look for realtime sessions in progress
    ///
    /// Presents them when there are some; otherwise waits for the channel and
    /// offers to request a session. Returns the active editor types.
    pub async fn check_sessions(&mut self) -> Result<Vec<String>> {
        if !self.status.lock_page {
            return Ok(Vec::new());
        }
        let doc = self.config.document_reference.clone();
        let module = self.config.content_module();
        let request = KeyRequest::new(doc.clone(), module.clone(), "");
        let reply = self.keys.get_keys(std::slice::from_ref(&request)).await?;
        let active = reply.active_editors(&doc, &module);
        if active.is_empty() {
            debug!("no realtime session in progress");
            self.run_when_ready(ReadyAction::LockPrompt);
        } else {
            debug!(?active, "realtime session in progress");
            self.ui.present_lock_prompt(&active);
        }
        Ok(active)
    }

    // ------------------------------------------------------------------
    // Transport events
    // ------------------------------------------------------------------

    /// A member joined the channel
    pub fn handle_peer_join(&mut self, peer: &str) {
        self.ctx.participants.insert(peer);
    }

    /// A member left the channel
    pub fn handle_leave(&mut self, peer: &str) {
        self.ctx.participants.remove(peer);
        self.warnings.hide_conflict();
        self.broadcast(&SessionMessage::IsSomeoneOffline);
    }

    pub fn handle_disconnect(&mut self) {
        warn!(realtime = self.status.realtime, "realtime relay disconnected");
        self.ctx.channel_ready = false;
        if self.status.realtime {
            self.warnings.show_disconnected();
        } else {
            self.warnings
                .show_warning(WarningKind::Transport { severe: false });
        }
    }

    /// The relay is reachable again: fetch a fresh key and rejoin
    pub async fn handle_reconnect(&mut self) -> Result<()> {
        self.warnings.hide_warning();
        self.warnings.hide_disconnected();
        self.join().await
    }

    /// The channel keys changed while offline; the content may be stale
    pub fn keys_changed(&mut self) {
        self.ui.present_reload();
    }

    /// A message broadcast on the events channel
    pub fn handle_channel_message(&mut self, payload: &str, sender: &str) {
        let msg = match decode_message(payload) {
            Ok(msg) => msg,
            Err(e) => {
                warn!(%sender, error = %e, "dropping channel message");
                return;
            }
        };
        debug!(cmd = msg.cmd(), %sender, "channel message");
        match msg {
            SessionMessage::Request { session_type } => self.on_request(session_type),
            SessionMessage::Answer {
                session_type,
                state,
                reason,
            } => self.on_answer(&session_type, state, reason),
            SessionMessage::Join { realtime } => self.on_join(realtime, sender),
            SessionMessage::IsSomeoneOffline => self.on_is_someone_offline(sender),
            SessionMessage::DisplayWarning => {
                debug!(%sender, "ignoring broadcast displayWarning");
            }
        }
    }

    /// A message sent to this page only
    pub fn handle_direct_message(&mut self, payload: &str, sender: &str) {
        match decode_message(payload) {
            Ok(SessionMessage::DisplayWarning) => {
                self.warnings.show_warning(WarningKind::Conflict);
            }
            Ok(other) => debug!(cmd = other.cmd(), %sender, "ignoring direct message"),
            Err(e) => warn!(%sender, error = %e, "dropping direct message"),
        }
    }

    fn on_request(&mut self, session_type: String) {
        if self.status.lock_page || session_type.is_empty() {
            return;
        }

        let reply = if !self.editors.can_host(&session_type) {
            Some(SessionMessage::answer(
                session_type.as_str(),
                AnswerState::Unavailable,
            ))
        } else if self.status.realtime {
            Some(SessionMessage::answer(
                session_type.as_str(),
                AnswerState::AlreadyRealtime,
            ))
        } else if !self
            .editors
            .accepts_editor(&session_type, self.status.editor.as_deref())
        {
            Some(SessionMessage::invalid_answer(session_type.as_str()))
        } else {
            None
        };
        if let Some(reply) = reply {
            self.broadcast(&reply);
            return;
        }

        if self.prompt.is_some() {
            debug!(%session_type, "a request prompt is already open");
            return;
        }

        self.next_prompt_token += 1;
        let countdown =
            AutoAcceptCountdown::new(self.next_prompt_token, self.config.auto_accept_ticks);
        if let Some(info) = self.editors.info(&session_type) {
            self.ui.present_request(info, countdown.remaining());
        }
        self.prompt = Some(PendingPrompt {
            session_type,
            countdown,
        });
    }

    /// One second of the auto-accept countdown elapsed
    ///
    /// Returns false for a stale token.
    pub fn tick_request_prompt(&mut self, token: u64) -> bool {
        let Some(prompt) = self.prompt.as_mut() else {
            return false;
        };
        if prompt.countdown.token() != token {
            debug!(token, "stale countdown tick");
            return false;
        }
        match prompt.countdown.tick() {
            Tick::Remaining(seconds) => self.ui.update_countdown(seconds),
            Tick::Expired => {
                self.resolve_request_prompt(true);
            }
        }
        true
    }

    /// The local user answered the request dialog
    ///
    /// On accept the start hook of the requested type runs before the answer
    /// is sent. Returns false when no prompt is open.
    pub fn resolve_request_prompt(&mut self, accepted: bool) -> bool {
        let Some(prompt) = self.prompt.take() else {
            return false;
        };
        self.ui.dismiss_request();
        if accepted {
            self.editors.start(&prompt.session_type);
        }
        let state = if accepted {
            AnswerState::Accepted
        } else {
            AnswerState::Rejected
        };
        info!(session_type = %prompt.session_type, ?state, "answering realtime request");
        self.broadcast(&SessionMessage::answer(prompt.session_type, state));
        true
    }

    fn on_answer(
        &mut self,
        session_type: &str,
        state: AnswerState,
        reason: Option<RejectReason>,
    ) {
        let pending = match self.ctx.pending_request.take() {
            None => return,
            Some(pending) if pending.session_type != session_type => {
                debug!(
                    expected = %pending.session_type,
                    %session_type,
                    "ignoring answer to another request"
                );
                self.ctx.pending_request = Some(pending);
                return;
            }
            Some(pending) => pending,
        };
        (pending.resolve)(RequestOutcome::Answered(state));
        self.ui.dismiss_pending();
        match state {
            AnswerState::Unavailable => self.ui.present_unavailable(),
            AnswerState::Rejected => self.ui.present_rejection(reason),
            AnswerState::Accepted | AnswerState::AlreadyRealtime => {}
        }
    }

    fn on_join(&mut self, realtime: bool, sender: &str) {
        self.ctx.participants.insert(sender);
        if self.status.lock_page {
            return;
        }
        if !realtime || !self.status.realtime {
            self.warnings.show_warning(WarningKind::Conflict);
            self.send_to(sender, &SessionMessage::DisplayWarning);
        } else if self.warnings.is_warning_visible() {
            self.warnings.hide_warning();
            self.broadcast(&SessionMessage::IsSomeoneOffline);
        }
    }

    fn on_is_someone_offline(&mut self, sender: &str) {
        if !self.status.lock_page && !self.status.realtime {
            self.send_to(sender, &SessionMessage::DisplayWarning);
        }
    }

    // ------------------------------------------------------------------
    // Local actions
    // ------------------------------------------------------------------

    /// Ask the offline editor to open a realtime session
    ///
    /// Waits for the channel if it is not joined yet. Only an answer of the
    /// same session type resolves the request. Only one request can be
    /// pending: a second call replaces the first resolver, which is then
    /// never called.
    pub fn request_rt(&mut self, session_type: impl Into<String>, callback: RequestCallback) {
        let session_type = session_type.into();
        if !self.ctx.channel_ready {
            debug!(%session_type, "channel not ready, request deferred");
            self.ctx.deferred.push(Deferred::Request {
                session_type,
                callback,
            });
            return;
        }
        if !self.ctx.participants.has_others() {
            callback(RequestOutcome::NoOtherParticipant);
            return;
        }
        let request = SessionMessage::request(session_type.as_str());
        let pending = PendingRequest {
            session_type,
            resolve: callback,
        };
        if self.ctx.pending_request.replace(pending).is_some() {
            warn!("replacing the pending realtime request");
        }
        self.broadcast(&request);
    }

    /// Leave realtime mode and let the other members re-evaluate
    pub fn abort_realtime(&mut self) {
        self.status.realtime = false;
        self.refresh_notice_context();
        if self.ctx.channel_ready {
            self.broadcast(&SessionMessage::join(false));
        }
    }

    // ------------------------------------------------------------------
    // Sending
    // ------------------------------------------------------------------

    fn broadcast(&mut self, msg: &SessionMessage) {
        let payload = match encode_message(msg) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "cannot encode session message");
                return;
            }
        };
        debug!(cmd = msg.cmd(), "broadcast");
        if let Err(e) = self.transport.broadcast(&payload) {
            warn!(cmd = msg.cmd(), error = %e, "broadcast failed");
        }
    }

    fn send_to(&mut self, peer: &str, msg: &SessionMessage) {
        let payload = match encode_message(msg) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "cannot encode session message");
                return;
            }
        };
        debug!(cmd = msg.cmd(), %peer, "direct message");
        if let Err(e) = self.transport.send_to(peer, &payload) {
            warn!(cmd = msg.cmd(), %peer, error = %e, "direct message failed");
        }
    }
}
