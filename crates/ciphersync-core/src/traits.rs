//! Core trait definitions for CipherSync.
//!
//! These three traits are the seams between the dashboard and the outside
//! world:
//!
//! - `GenerativeBackend`: untrusted analysis (a remote language model)
//! - `ReplyVerifier`    : trusted checker (validates replies before use)
//! - `KeyValueStorage`  : durable sink (holds the serialized history)
//!
//! The adapter and the history vault are written against these traits so
//! each can be exercised with in-memory fakes.

use async_trait::async_trait;
use serde_json::Value;

use ciphersync_contracts::{
    error::CipherResult,
    generation::{GenerationReply, GenerationRequest},
    verify::{ReplySchema, VerificationReport},
};

/// A text/JSON generation service.
///
/// Implementations are **untrusted**: whatever they return is validated by
/// the adapter before any field reaches the caller. Calls are single-shot;
/// implementations must not retry on their own.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Send one request and return the service's reply.
    ///
    /// Transport and service failures are returned as `Err`; a reply with no
    /// text is `Ok(GenerationReply { text: None })`.
    async fn generate(&self, request: GenerationRequest) -> CipherResult<GenerationReply>;
}

/// The reply verifier: the last gate before a model reply is exposed.
///
/// Implementations are **trusted** and must be deterministic.
pub trait ReplyVerifier: Send + Sync {
    /// Verify `reply` against `schema`.
    ///
    /// Return a report with `passed = true` if every check passes, or
    /// `passed = false` with populated `failures` otherwise.
    fn verify(&self, reply: &Value, schema: &ReplySchema) -> CipherResult<VerificationReport>;
}

/// Durable string storage addressed by key.
///
/// A `write` replaces the previous value for the key in full; readers never
/// observe a partially written value.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value under `key`, or `None` when nothing was ever written.
    fn read(&self, key: &str) -> CipherResult<Option<String>>;

    /// Replace the value under `key`.
    fn write(&self, key: &str, value: &str) -> CipherResult<()>;
}
