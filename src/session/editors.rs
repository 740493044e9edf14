//! Realtime session types the local page can host

use crate::error::{Result, SessionError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Description of a realtime editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorInfo {
    /// Human readable name shown in dialogs
    pub name: String,
    /// Query appended to the page URL to open this editor in realtime mode,
    /// e.g. `editor=wysiwyg&force=1&realtime=1`
    pub href: String,
    /// Ids of the editors that can switch into this session type
    #[serde(default)]
    pub compatible: Vec<String>,
}

/// Hook that saves the document and switches into the realtime editor
pub type StartRealtime = Box<dyn FnMut()>;

struct Entry {
    info: EditorInfo,
    start: StartRealtime,
}

/// Registry of hostable session types, keyed by type id
#[derive(Default)]
pub struct RealtimeEditors {
    entries: BTreeMap<String, Entry>,
}

impl fmt::Debug for RealtimeEditors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, e)| (k, &e.info)))
            .finish()
    }
}

impl RealtimeEditors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, session_type: impl Into<String>, info: EditorInfo, start: StartRealtime) {
        self.entries
            .insert(session_type.into(), Entry { info, start });
    }

    pub fn can_host(&self, session_type: &str) -> bool {
        self.entries.contains_key(session_type)
    }

    pub fn info(&self, session_type: &str) -> Option<&EditorInfo> {
        self.entries.get(session_type).map(|e| &e.info)
    }

    /// Whether `editor` can switch into `session_type`
    pub fn accepts_editor(&self, session_type: &str, editor: Option<&str>) -> bool {
        match (self.entries.get(session_type), editor) {
            (Some(entry), Some(editor)) => entry.info.compatible.iter().any(|c| c == editor),
            _ => false,
        }
    }

    /// First session type `editor` can switch into
    pub fn compatible_type(&self, editor: Option<&str>) -> Option<&str> {
        let editor = editor?;
        self.entries
            .iter()
            .find(|(_, e)| e.info.compatible.iter().any(|c| c == editor))
            .map(|(t, _)| t.as_str())
    }

    /// Run the start hook of `session_type`; returns false if unknown
    pub fn start(&mut self, session_type: &str) -> bool {
        match self.entries.get_mut(session_type) {
            Some(entry) => {
                (entry.start)();
                true
            }
            None => false,
        }
    }
}

fn is_session_param(key: &str, value: &str) -> bool {
    match key {
        "editor" | "section" => true,
        "force" | "realtime" => value == "1",
        _ => false,
    }
}

/// URL opening the current page in the realtime editor described by `info`
///
/// Drops the editor, section, `force=1` and `realtime=1` parameters of the
/// current URL, keeps the others and appends the editor's query.
pub fn editor_url(page_url: &str, info: &EditorInfo) -> Result<String> {
    let mut url = Url::parse(page_url)
        .map_err(|e| SessionError::Config(format!("invalid page URL {}: {}", page_url, e)))?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, v)| !is_session_param(k, v))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let extra = info.href.trim_start_matches(|c: char| c == '?' || c == '&');

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .extend_pairs(url::form_urlencoded::parse(extra.as_bytes()));
    Ok(url.into())
}

/// What the local page is doing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalStatus {
    /// In a realtime session
    pub realtime: bool,
    /// The edit lock was forced
    pub forced: bool,
    /// Showing the "locked by another user" notice instead of an editor
    pub lock_page: bool,
    /// Id of the editor in use, if any
    pub editor: Option<String>,
    pub page_url: String,
}

impl LocalStatus {
    /// Derive the status from the page URL (`realtime=1`, `force=1`)
    pub fn from_page(page_url: &str, lock_page: bool, editor: Option<String>) -> Self {
        let (realtime, forced) = match Url::parse(page_url) {
            Ok(url) => url.query_pairs().fold((false, false), |(rt, f), (k, v)| {
                (
                    rt || (k == "realtime" && v == "1"),
                    f || (k == "force" && v == "1"),
                )
            }),
            Err(e) => {
                tracing::warn!(%page_url, error = %e, "cannot parse page URL");
                (false, false)
            }
        };
        Self {
            realtime,
            forced,
            lock_page,
            editor,
            page_url: page_url.to_string(),
        }
    }
}
