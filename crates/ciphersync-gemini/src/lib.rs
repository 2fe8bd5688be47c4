//! # ciphersync-gemini
//!
//! A `reqwest`-based [`GenerativeBackend`](ciphersync_core::traits::GenerativeBackend)
//! for Google's Gemini `generateContent` REST endpoint.
//!
//! Schema-constrained requests are sent with `responseMimeType:
//! application/json` and the schema as `responseJsonSchema`; the system
//! instruction travels in `systemInstruction`.

pub mod client;
mod wire;

pub use client::{GeminiClient, DEFAULT_BASE_URL};
