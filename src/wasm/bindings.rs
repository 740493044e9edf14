//! JavaScript bindings for the realtime core types

use crate::config::RealtimeConfig;
use crate::protocol::{decode_message, encode_message, SessionMessage};
use crate::session::{editor_url, EditorInfo};
use crate::text::{diff, TextDelta};
use wasm_bindgen::prelude::*;

/// JavaScript-friendly wrapper for TextDelta
#[wasm_bindgen]
pub struct WasmTextDelta {
    inner: TextDelta,
}

#[wasm_bindgen]
impl WasmTextDelta {
    /// Compute the delta between two strings, `undefined` if they are equal
    #[wasm_bindgen(js_name = compute)]
    pub fn compute(old: &str, new: &str) -> Option<WasmTextDelta> {
        diff(old, new).map(|inner| Self { inner })
    }

    #[wasm_bindgen(getter, js_name = commonStart)]
    pub fn common_start(&self) -> usize {
        self.inner.common_start
    }

    #[wasm_bindgen(getter, js_name = commonEnd)]
    pub fn common_end(&self) -> usize {
        self.inner.common_end
    }

    #[wasm_bindgen(getter)]
    pub fn delta(&self) -> isize {
        self.inner.delta
    }

    #[wasm_bindgen(getter)]
    pub fn insert(&self) -> bool {
        self.inner.insert
    }

    #[wasm_bindgen(getter)]
    pub fn remove(&self) -> bool {
        self.inner.remove
    }

    /// Map a caret offset of the old text into the new text
    #[wasm_bindgen(js_name = transformOffset)]
    pub fn transform_offset(&self, offset: usize) -> usize {
        self.inner.transform_offset(offset)
    }

    /// Export as JSON string
    #[wasm_bindgen(js_name = toJSON)]
    pub fn to_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner)
            .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
    }
}

/// Normalize a channel payload; fails on unknown or malformed commands
#[wasm_bindgen(js_name = decodeSessionMessage)]
pub fn decode_session_message(payload: &str) -> Result<String, JsValue> {
    let msg = decode_message(payload)
        .map_err(|e| JsValue::from_str(&format!("Invalid message: {}", e)))?;
    encode_message(&msg)
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Build the `join` message of the local page
#[wasm_bindgen(js_name = joinMessage)]
pub fn join_message(realtime: bool) -> Result<String, JsValue> {
    encode_message(&SessionMessage::join(realtime))
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Build a `request` message for a session type
#[wasm_bindgen(js_name = requestMessage)]
pub fn request_message(session_type: String) -> Result<String, JsValue> {
    encode_message(&SessionMessage::request(session_type))
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Check the page configuration (pass JSON string)
#[wasm_bindgen(js_name = validateConfig)]
pub fn validate_config(config_json: &str) -> Result<(), JsValue> {
    let config = RealtimeConfig::from_json(config_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;
    config
        .validate()
        .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))
}

/// URL of the current page opened in a realtime editor (pass editor JSON)
#[wasm_bindgen(js_name = realtimeEditorUrl)]
pub fn realtime_editor_url(page_url: &str, editor_json: &str) -> Result<String, JsValue> {
    let info: EditorInfo = serde_json::from_str(editor_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid editor JSON: {}", e)))?;
    editor_url(page_url, &info)
        .map_err(|e| JsValue::from_str(&format!("Invalid URL: {}", e)))
}
