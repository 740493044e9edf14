//! WASM bindings for the realtime loader
//!
//! This module exposes the text delta and the wire helpers to JavaScript.
//! The session coordinator itself stays on the Rust side of the host.

pub mod bindings;
pub mod utils;

// Re-export main types
pub use bindings::WasmTextDelta;
