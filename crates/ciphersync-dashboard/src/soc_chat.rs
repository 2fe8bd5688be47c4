//! SOC assistant chat sessions.
//!
//! Chat turns are conversational and never land in the audit history.

use tracing::{debug, warn};

use ciphersync_contracts::{
    chat::{ChatMessage, ChatSession},
    error::{CipherError, CipherResult},
};
use ciphersync_core::Adapter;

/// A chat session with the SOC assistant.
#[derive(Debug, Clone, Default)]
pub struct SocChat {
    session: ChatSession,
}

impl SocChat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume an existing session.
    pub fn resume(session: ChatSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn into_session(self) -> ChatSession {
        self.session
    }

    /// Send `message` with the whole conversation so far as context and
    /// return the assistant's reply.
    ///
    /// The user message and the reply are committed together once the reply
    /// arrives. On failure the session is left untouched so the same message
    /// can be retried.
    pub async fn send(&mut self, adapter: &Adapter, message: &str) -> CipherResult<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(CipherError::InvalidInput {
                reason: "chat message is empty".to_string(),
            });
        }

        let reply = match adapter.chat_turn(&self.session.messages, message).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(session = %self.session.id, error = %e, "chat turn failed");
                return Err(e);
            }
        };

        self.session.push(ChatMessage::user(message));
        self.session.push(ChatMessage::assistant(reply.clone()));
        debug!(session = %self.session.id, messages = self.session.messages.len(), "chat turn committed");

        Ok(reply)
    }
}
