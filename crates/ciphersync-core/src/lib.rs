//! # ciphersync-core
//!
//! The prompt/response adapter for CipherSync.
//!
//! This crate provides:
//! - The three seam traits (`GenerativeBackend`, `ReplyVerifier`, `KeyValueStorage`)
//! - The `Adapter` that turns tool requests into model calls and validated results
//! - Prompt templates and reply text cleaning
//! - `ScriptedBackend`, a replaying backend for tests (`test-support` feature)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ciphersync_core::Adapter;
//!
//! let adapter = Adapter::new(Box::new(backend), Box::new(verifier), "gemini-3-flash-preview");
//! let report = adapter.code_audit(&source, None).await?;
//! ```

pub mod adapter;
pub mod prompts;
#[cfg(any(test, feature = "test-support"))]
pub mod scripted;
pub mod text;
pub mod traits;

pub use adapter::Adapter;
pub use text::clean_text;
