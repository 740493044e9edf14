// Session negotiation messages exchanged on the document's events channel

use crate::error::{Result, SessionError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every message of the negotiation vocabulary
///
/// Serialized as a JSON object whose `cmd` field names the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "camelCase")]
pub enum SessionMessage {
    /// Broadcast when a page starts editing
    Join {
        #[serde(default)]
        realtime: bool,
    },

    /// Ask the offline editor to open a realtime session of `session_type`
    Request {
        #[serde(rename = "type", default)]
        session_type: String,
    },

    /// Reply to a `Request`, broadcast to every member
    Answer {
        #[serde(rename = "type", default)]
        session_type: String,
        state: AnswerState,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<RejectReason>,
    },

    /// Ask members editing offline to identify themselves
    IsSomeoneOffline,

    /// Direct message: the receiver should show the conflict warning
    DisplayWarning,
}

impl SessionMessage {
    pub fn join(realtime: bool) -> Self {
        SessionMessage::Join { realtime }
    }

    pub fn request(session_type: impl Into<String>) -> Self {
        SessionMessage::Request {
            session_type: session_type.into(),
        }
    }

    pub fn answer(session_type: impl Into<String>, state: AnswerState) -> Self {
        SessionMessage::Answer {
            session_type: session_type.into(),
            state,
            reason: None,
        }
    }

    pub fn invalid_answer(session_type: impl Into<String>) -> Self {
        SessionMessage::Answer {
            session_type: session_type.into(),
            state: AnswerState::Rejected,
            reason: Some(RejectReason::Invalid),
        }
    }

    /// Value of the `cmd` discriminator
    pub fn cmd(&self) -> &'static str {
        match self {
            SessionMessage::Join { .. } => "join",
            SessionMessage::Request { .. } => "request",
            SessionMessage::Answer { .. } => "answer",
            SessionMessage::IsSomeoneOffline => "isSomeoneOffline",
            SessionMessage::DisplayWarning => "displayWarning",
        }
    }
}

/// Outcome carried by an `answer`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum AnswerState {
    /// The answering page cannot host that session type
    Unavailable,
    /// The user declined, or the editor cannot switch
    Rejected,
    Accepted,
    /// The answering page is already in a realtime session
    AlreadyRealtime,
}

impl From<AnswerState> for i64 {
    fn from(state: AnswerState) -> i64 {
        match state {
            AnswerState::Unavailable => -1,
            AnswerState::Rejected => 0,
            AnswerState::Accepted => 1,
            AnswerState::AlreadyRealtime => 2,
        }
    }
}

impl TryFrom<i64> for AnswerState {
    type Error = String;

    fn try_from(value: i64) -> std::result::Result<Self, Self::Error> {
        match value {
            -1 => Ok(AnswerState::Unavailable),
            0 => Ok(AnswerState::Rejected),
            1 => Ok(AnswerState::Accepted),
            2 => Ok(AnswerState::AlreadyRealtime),
            other => Err(format!("unknown answer state {}", other)),
        }
    }
}

/// Why a request was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RejectReason {
    /// The answering editor cannot switch into the requested session type
    Invalid,
    #[serde(other)]
    Other,
}

impl fmt::Display for SessionMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cmd())
    }
}

/// Serialize a message to its JSON wire form
pub fn encode_message(msg: &SessionMessage) -> Result<String> {
    serde_json::to_string(msg)
        .map_err(|e| SessionError::Protocol(format!("Failed to encode message: {}", e)))
}

/// Parse a JSON payload received from the channel
pub fn decode_message(payload: &str) -> Result<SessionMessage> {
    serde_json::from_str(payload)
        .map_err(|e| SessionError::Protocol(format!("Failed to decode message: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn wire(msg: &SessionMessage) -> Value {
        serde_json::from_str(&encode_message(msg).unwrap()).unwrap()
    }

    #[test]
    fn test_wire_format() {
        assert_eq!(
            wire(&SessionMessage::join(true)),
            json!({"cmd": "join", "realtime": true})
        );
        assert_eq!(
            wire(&SessionMessage::request("wysiwyg")),
            json!({"cmd": "request", "type": "wysiwyg"})
        );
        assert_eq!(
            wire(&SessionMessage::answer("wysiwyg", AnswerState::AlreadyRealtime)),
            json!({"cmd": "answer", "type": "wysiwyg", "state": 2})
        );
        assert_eq!(
            wire(&SessionMessage::invalid_answer("wysiwyg")),
            json!({"cmd": "answer", "type": "wysiwyg", "state": 0, "reason": "invalid"})
        );
        assert_eq!(
            wire(&SessionMessage::IsSomeoneOffline),
            json!({"cmd": "isSomeoneOffline"})
        );
        assert_eq!(
            wire(&SessionMessage::DisplayWarning),
            json!({"cmd": "displayWarning"})
        );
    }

    #[test]
    fn test_decode_unavailable_answer() {
        let msg = decode_message(r#"{"cmd":"answer","type":"wysiwyg","state":-1}"#).unwrap();
        assert_eq!(
            msg,
            SessionMessage::answer("wysiwyg", AnswerState::Unavailable)
        );
    }

    #[test]
    fn test_decode_tolerates_missing_optional_fields() {
        assert_eq!(
            decode_message(r#"{"cmd":"join"}"#).unwrap(),
            SessionMessage::join(false)
        );
        assert_eq!(
            decode_message(r#"{"cmd":"request"}"#).unwrap(),
            SessionMessage::request("")
        );
        let msg =
            decode_message(r#"{"cmd":"answer","type":"x","state":0,"reason":"busy"}"#).unwrap();
        assert!(matches!(
            msg,
            SessionMessage::Answer {
                reason: Some(RejectReason::Other),
                ..
            }
        ));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_message("not json"),
            Err(SessionError::Protocol(_))
        ));
        assert!(decode_message(r#"{"cmd":"shout"}"#).is_err());
        assert!(decode_message(r#"{"realtime":true}"#).is_err());
        assert!(decode_message(r#"{"cmd":"answer","type":"x","state":7}"#).is_err());
    }
}
