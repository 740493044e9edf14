// Channel key service payloads

use crate::error::{Result, SessionError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One channel the page wants a key for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRequest {
    /// Serialized document reference
    pub doc: String,
    /// Channel module, `<language>/events` or `<language>/content`
    #[serde(rename = "mod")]
    pub module: String,
    /// Editor id, `all` for the shared events channel
    pub editor: String,
}

impl KeyRequest {
    pub fn new(doc: impl Into<String>, module: impl Into<String>, editor: impl Into<String>) -> Self {
        Self {
            doc: doc.into(),
            module: module.into(),
            editor: editor.into(),
        }
    }
}

/// Key of a channel and the number of users currently on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelKey {
    pub key: String,
    #[serde(default)]
    pub users: u32,
}

/// `{ doc: { module: { editor: { key, users } } } }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyResponse(pub HashMap<String, HashMap<String, HashMap<String, ChannelKey>>>);

impl KeyResponse {
    /// Parse the key service reply; an `error` member means no permission
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if let Some(error) = value.get("error") {
            return Err(SessionError::PermissionDenied(error.to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn channel(&self, request: &KeyRequest) -> Option<&ChannelKey> {
        self.0
            .get(&request.doc)?
            .get(&request.module)?
            .get(&request.editor)
    }

    /// Key for `request`, or the error naming the missing channel
    pub fn require_key(&self, request: &KeyRequest) -> Result<String> {
        self.channel(request)
            .map(|c| c.key.clone())
            .ok_or_else(|| SessionError::MissingChannelKey {
                doc: request.doc.clone(),
                module: request.module.clone(),
                editor: request.editor.clone(),
            })
    }

    /// Editors of `doc`/`module` that currently have users, sorted
    pub fn active_editors(&self, doc: &str, module: &str) -> Vec<String> {
        let mut editors: Vec<String> = self
            .0
            .get(doc)
            .and_then(|mods| mods.get(module))
            .map(|channels| {
                channels
                    .iter()
                    .filter(|(editor, channel)| !editor.is_empty() && channel.users > 0)
                    .map(|(editor, _)| editor.clone())
                    .collect()
            })
            .unwrap_or_default();
        editors.sort();
        editors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"{
        "xwiki:Main.WebHome": {
            "default/events": { "all": { "key": "ev-key", "users": 2 } },
            "default/content": {
                "wysiwyg": { "key": "w-key", "users": 1 },
                "wiki": { "key": "k-key", "users": 0 }
            }
        }
    }"#;

    #[test]
    fn test_lookup_events_key() {
        let reply = KeyResponse::from_json(REPLY).unwrap();
        let req = KeyRequest::new("xwiki:Main.WebHome", "default/events", "all");
        assert_eq!(reply.require_key(&req).unwrap(), "ev-key");
    }

    #[test]
    fn test_missing_key() {
        let reply = KeyResponse::from_json(REPLY).unwrap();
        let req = KeyRequest::new("xwiki:Main.WebHome", "fr/events", "all");
        assert!(matches!(
            reply.require_key(&req),
            Err(SessionError::MissingChannelKey { .. })
        ));
    }

    #[test]
    fn test_active_editors() {
        let reply = KeyResponse::from_json(REPLY).unwrap();
        assert_eq!(
            reply.active_editors("xwiki:Main.WebHome", "default/content"),
            vec!["wysiwyg".to_string()]
        );
        assert!(reply.active_editors("other", "default/content").is_empty());
    }

    #[test]
    fn test_error_reply_is_permission_denied() {
        assert!(matches!(
            KeyResponse::from_json(r#"{"error":"EDIT right required"}"#),
            Err(SessionError::PermissionDenied(_))
        ));
    }

    #[test]
    fn test_request_wire_format() {
        let req = KeyRequest::new("d", "default/events", "all");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({"doc": "d", "mod": "default/events", "editor": "all"})
        );
    }
}
