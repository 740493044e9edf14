//! Notice states and the content each one materializes

use serde::{Deserialize, Serialize};

/// Which kind of warning is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum WarningKind {
    /// Someone else edits the document at the same time
    Conflict,
    /// The channel relay cannot be reached; `severe` uses error styling
    Transport { severe: bool },
}

/// The single notice box, at most one at a time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningState {
    #[default]
    Hidden,
    Connecting,
    Warning(WarningKind),
    Disconnected,
}

impl WarningState {
    pub fn is_visible(self) -> bool {
        self != WarningState::Hidden
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Link to the realtime editor shown under a conflict warning
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeLink {
    pub label: &'static str,
    pub href: String,
}

/// What the surface should render; strings are message keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub state: WarningState,
    pub severity: Severity,
    pub title: &'static str,
    pub lines: Vec<&'static str>,
    pub link: Option<NoticeLink>,
}

/// Page facts that change the wording of notices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeContext {
    /// The local page is in a realtime session
    pub realtime: bool,
    /// The page was opened by forcing the edit lock
    pub forced: bool,
    /// URL of a realtime editor compatible with the current one
    pub realtime_editor_url: Option<String>,
}

impl Notice {
    pub(crate) fn for_state(state: WarningState, ctx: &NoticeContext) -> Option<Notice> {
        let notice = match state {
            WarningState::Hidden => return None,
            WarningState::Connecting => Notice {
                state,
                severity: Severity::Info,
                title: "connectingBox",
                lines: Vec::new(),
                link: None,
            },
            WarningState::Disconnected => Notice {
                state,
                severity: Severity::Error,
                title: "connectionLost",
                lines: vec!["connectionLostInfo"],
                link: None,
            },
            WarningState::Warning(WarningKind::Conflict) => {
                let mut lines = vec!["wsErrorConflicts"];
                let mut link = None;
                if ctx.realtime {
                    lines.push("conflictsWarningInfoRt");
                } else if let Some(href) = &ctx.realtime_editor_url {
                    lines.push("conflictsWarningInfo");
                    link = Some(NoticeLink {
                        label: "conflictsWarningInfoLink",
                        href: href.clone(),
                    });
                }
                Notice {
                    state,
                    severity: Severity::Warning,
                    title: "conflictsWarning",
                    lines,
                    link,
                }
            }
            WarningState::Warning(WarningKind::Transport { severe }) => {
                let mut lines = vec!["wsErrorInfo"];
                if ctx.forced {
                    lines.push("wsErrorConflicts");
                }
                Notice {
                    state,
                    severity: if severe {
                        Severity::Error
                    } else {
                        Severity::Warning
                    },
                    title: "wsError",
                    lines,
                    link: None,
                }
            }
        };
        Some(notice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_has_no_notice() {
        assert!(Notice::for_state(WarningState::Hidden, &NoticeContext::default()).is_none());
    }

    #[test]
    fn test_conflict_notice_links_realtime_editor_when_offline() {
        let ctx = NoticeContext {
            realtime: false,
            forced: false,
            realtime_editor_url: Some("/edit?editor=wysiwyg&realtime=1".to_string()),
        };
        let notice =
            Notice::for_state(WarningState::Warning(WarningKind::Conflict), &ctx).unwrap();
        assert_eq!(notice.lines, vec!["wsErrorConflicts", "conflictsWarningInfo"]);
        assert_eq!(
            notice.link.unwrap().href,
            "/edit?editor=wysiwyg&realtime=1"
        );
    }

    #[test]
    fn test_conflict_notice_in_realtime() {
        let ctx = NoticeContext {
            realtime: true,
            ..Default::default()
        };
        let notice =
            Notice::for_state(WarningState::Warning(WarningKind::Conflict), &ctx).unwrap();
        assert_eq!(notice.lines, vec!["wsErrorConflicts", "conflictsWarningInfoRt"]);
        assert!(notice.link.is_none());
    }

    #[test]
    fn test_transport_notice_severity_and_forced_line() {
        let ctx = NoticeContext {
            forced: true,
            ..Default::default()
        };
        let notice = Notice::for_state(
            WarningState::Warning(WarningKind::Transport { severe: true }),
            &ctx,
        )
        .unwrap();
        assert_eq!(notice.severity, Severity::Error);
        assert_eq!(notice.lines, vec!["wsErrorInfo", "wsErrorConflicts"]);
    }
}
