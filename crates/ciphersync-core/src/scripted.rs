//! A scripted `GenerativeBackend` for tests.
//!
//! Replies are served in the order they were queued. Every request is
//! recorded so callers can assert on what would have been sent. Clones
//! share the same queue and request log.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;

use ciphersync_contracts::{
    error::{CipherError, CipherResult},
    generation::{GenerationReply, GenerationRequest},
};

use crate::traits::GenerativeBackend;

/// One canned outcome.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// The service answers with this text.
    Text(String),
    /// The service answers but produces no text part.
    NoText,
    /// The service answers with a non-success HTTP status.
    Fail { status: u16, message: String },
}

#[derive(Default)]
struct ScriptState {
    replies: VecDeque<ScriptedReply>,
    requests: Vec<GenerationRequest>,
}

/// A backend that replays queued replies.
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a text reply.
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(ScriptedReply::Text(text.into()))
    }

    /// Queue a service failure.
    pub fn fail(self, status: u16, message: impl Into<String>) -> Self {
        self.push(ScriptedReply::Fail {
            status,
            message: message.into(),
        })
    }

    /// Queue any scripted outcome.
    pub fn push(self, reply: ScriptedReply) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.replies.push_back(reply);
        }
        self
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.state
            .lock()
            .map(|state| state.requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn generate(&self, request: GenerationRequest) -> CipherResult<GenerationReply> {
        let mut state = self.state.lock().map_err(|e| CipherError::Transport {
            reason: format!("scripted backend lock poisoned: {e}"),
        })?;
        state.requests.push(request);

        match state.replies.pop_front() {
            Some(ScriptedReply::Text(text)) => Ok(GenerationReply::text(text)),
            Some(ScriptedReply::NoText) => Ok(GenerationReply::default()),
            Some(ScriptedReply::Fail { status, message }) => {
                Err(CipherError::Upstream { status, message })
            }
            None => Err(CipherError::Transport {
                reason: "scripted backend has no reply queued".to_string(),
            }),
        }
    }
}
