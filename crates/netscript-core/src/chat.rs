//! Chat assistant session.
//!
//! A session is created once and is either active (backed by a generator)
//! or disabled. The transcript is in-memory only and lost with the session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::ChatError;
use crate::generator::{GenerationRequest, ModelTier, Role, TextGenerator, Turn};
use crate::now_millis;
use crate::prompt::{CHAT_GREETING, CHAT_SYSTEM_INSTRUCTION};

/// Reply appended when the provider call fails.
pub const CHAT_FAILURE_REPLY: &str =
    "Sorry, I encountered an error. Please check your API key or try again later.";

/// Reply appended when the provider returns no text.
pub const CHAT_EMPTY_REPLY: &str = "I couldn't generate a response.";

/// Default number of exchanges sent back to the model as context.
const DEFAULT_MAX_CONTEXT_TURNS: usize = 20;

/// A message in the chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub text: String,
    pub timestamp: i64,
}

impl ChatMessage {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            text: text.into(),
            timestamp: now_millis(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

#[derive(Debug, Default)]
struct Conversation {
    /// Everything shown to the user, including greeting and error replies.
    transcript: Vec<ChatMessage>,
    /// Successful exchanges only; this is what the model sees.
    context: Vec<Turn>,
}

/// Clears the in-flight flag when an exchange finishes or panics.
struct SendGuard(Arc<AtomicBool>);

impl Drop for SendGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// A chat session with the assistant.
pub struct ChatSession {
    generator: Option<Arc<dyn TextGenerator>>,
    conversation: Arc<RwLock<Conversation>>,
    sending: Arc<AtomicBool>,
    max_context_turns: usize,
}

impl ChatSession {
    /// Start a session. Without a generator the session is disabled.
    pub fn start(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        match generator {
            Some(generator) => Self::active(generator),
            None => Self::disabled(),
        }
    }

    /// Start an active session seeded with the greeting.
    pub fn active(generator: Arc<dyn TextGenerator>) -> Self {
        let conversation = Conversation {
            transcript: vec![ChatMessage::new(Role::Model, CHAT_GREETING)],
            context: Vec::new(),
        };

        Self {
            generator: Some(generator),
            conversation: Arc::new(RwLock::new(conversation)),
            sending: Arc::new(AtomicBool::new(false)),
            max_context_turns: DEFAULT_MAX_CONTEXT_TURNS,
        }
    }

    /// A session that could not be initialized. Every send is rejected.
    pub fn disabled() -> Self {
        Self {
            generator: None,
            conversation: Arc::new(RwLock::new(Conversation::default())),
            sending: Arc::new(AtomicBool::new(false)),
            max_context_turns: DEFAULT_MAX_CONTEXT_TURNS,
        }
    }

    /// Limit how many exchanges are replayed to the model.
    pub fn with_max_context_turns(mut self, turns: usize) -> Self {
        self.max_context_turns = turns;
        self
    }

    pub fn is_active(&self) -> bool {
        self.generator.is_some()
    }

    /// True while a message is waiting for its reply.
    pub fn is_sending(&self) -> bool {
        self.sending.load(Ordering::SeqCst)
    }

    /// Snapshot of the transcript in order.
    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.conversation.read().await.transcript.clone()
    }

    /// Send a user message and wait for the reply.
    ///
    /// Returns the model-authored message appended to the transcript. A
    /// provider failure still returns `Ok` with the failure reply. The
    /// exchange runs on its own task, so dropping the caller still lands the
    /// reply in the transcript.
    pub async fn send(&self, text: &str) -> Result<ChatMessage, ChatError> {
        let generator = self.generator.clone().ok_or(ChatError::Disabled)?;

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        if self
            .sending
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ChatError::Busy);
        }
        let guard = SendGuard(self.sending.clone());

        let conversation = self.conversation.clone();
        let max_turns = self.max_context_turns * 2;
        let task = tokio::spawn(async move {
            let _guard = guard;
            exchange(generator, conversation, text, max_turns).await
        });

        match task.await {
            Ok(reply) => Ok(reply),
            Err(err) => {
                warn!(error = %err, "Chat task failed");
                let reply = ChatMessage::new(Role::Model, CHAT_FAILURE_REPLY);
                self.conversation
                    .write()
                    .await
                    .transcript
                    .push(reply.clone());
                Ok(reply)
            }
        }
    }
}

/// One user message and its reply, applied to the conversation.
async fn exchange(
    generator: Arc<dyn TextGenerator>,
    conversation: Arc<RwLock<Conversation>>,
    text: String,
    max_turns: usize,
) -> ChatMessage {
    let turns = {
        let mut conversation = conversation.write().await;
        conversation
            .transcript
            .push(ChatMessage::new(Role::User, text.clone()));
        let mut turns = conversation.context.clone();
        turns.push(Turn::user(text.clone()));
        turns
    };

    debug!(turns = turns.len(), "Sending chat message");
    let request = GenerationRequest::conversation(ModelTier::Fast, CHAT_SYSTEM_INSTRUCTION, turns);

    let result = generator.generate(request).await;

    let mut conversation = conversation.write().await;
    let reply = match result {
        Ok(reply) => {
            let reply = if reply.trim().is_empty() {
                CHAT_EMPTY_REPLY.to_string()
            } else {
                reply
            };
            conversation.context.push(Turn::user(text));
            conversation.context.push(Turn::model(reply.clone()));
            if conversation.context.len() > max_turns {
                let excess = conversation.context.len() - max_turns;
                conversation.context.drain(0..excess);
            }
            ChatMessage::new(Role::Model, reply)
        }
        Err(err) => {
            warn!(error = %err, "Chat request failed");
            ChatMessage::new(Role::Model, CHAT_FAILURE_REPLY)
        }
    };
    conversation.transcript.push(reply.clone());
    reply
}
