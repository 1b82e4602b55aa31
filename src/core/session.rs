use std::error::Error as StdError;
use std::fmt;

use crate::api::{self, ChatMessage, ChatRequest, ChatResponse};
use crate::utils::url::construct_api_url;

/// Canned assistant turn that completes the persona seed. Every session
/// opens with the persona instructions followed by this acknowledgement.
pub const PERSONA_ACK: &str = "Understood. I shall speak as the Shadow Scribe.";

/// The provider conversation context.
///
/// The wire protocol is the stateless `chat/completions` endpoint, so the
/// context lives client-side: two fixed seed turns plus the turns of every
/// successful exchange. Sessions are replaced, never mutated in place, when
/// the credential changes, the persona is edited, or the conversation is
/// cleared.
#[derive(Debug, Clone)]
pub struct ChatSession {
    turns: Vec<ChatMessage>,
}

impl ChatSession {
    fn seeded(persona: &str) -> Self {
        Self {
            turns: vec![
                ChatMessage {
                    role: "user".to_string(),
                    content: persona.to_string(),
                },
                ChatMessage {
                    role: "assistant".to_string(),
                    content: PERSONA_ACK.to_string(),
                },
            ],
        }
    }

    /// The full message list for one outbound request: seed turns, recorded
    /// exchanges, then the new user turn.
    fn request_turns(&self, user_text: &str) -> Vec<ChatMessage> {
        let mut messages = self.turns.clone();
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: user_text.to_string(),
        });
        messages
    }

    fn record_exchange(&mut self, user_text: &str, reply: &str) {
        self.turns.push(ChatMessage {
            role: "user".to_string(),
            content: user_text.to_string(),
        });
        self.turns.push(ChatMessage {
            role: "assistant".to_string(),
            content: reply.to_string(),
        });
    }

    pub fn turns(&self) -> &[ChatMessage] {
        &self.turns
    }
}

/// Credential rejected or network unreachable while authenticating. The
/// session and stored credential are left untouched when this is returned.
#[derive(Debug)]
pub struct AuthError {
    pub message: String,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for AuthError {}

/// A failed message exchange, typed at the session boundary.
///
/// The pipeline downgrades this to an in-band transcript entry via
/// [`SendError::in_band_text`]; nothing above that layer distinguishes a
/// failed call from ordinary assistant output.
#[derive(Debug)]
pub enum SendError {
    /// No live session: no credential has been accepted yet.
    NotAuthenticated,
    /// Transport-level failure (connect, TLS, decode).
    Http(reqwest::Error),
    /// The provider answered with a non-success status.
    Api { message: String },
    /// A well-formed response with no usable reply content.
    EmptyReply,
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::NotAuthenticated => {
                write!(f, "no API key configured")
            }
            SendError::Http(e) => write!(f, "{e}"),
            SendError::Api { message } => write!(f, "{message}"),
            SendError::EmptyReply => write!(f, "provider returned an empty reply"),
        }
    }
}

impl StdError for SendError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            SendError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl SendError {
    /// The literal transcript string a failed exchange turns into. Rendered
    /// and appended like any other reply.
    pub fn in_band_text(&self) -> String {
        match self {
            SendError::NotAuthenticated => {
                "Error: not connected to a provider. Use /key <api-key> to connect.".to_string()
            }
            other => format!("Error getting response: {other}"),
        }
    }
}

/// Everything a worker task needs to perform one exchange. Snapshotted on
/// the UI task so the worker never touches shared state.
#[derive(Debug)]
pub struct SendRequest {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    messages: Vec<ChatMessage>,
}

impl SendRequest {
    /// One non-streaming provider call: the single blocking operation each
    /// worker task performs. No retry, no timeout, no cancellation.
    pub async fn dispatch(self) -> Result<String, SendError> {
        let request = ChatRequest {
            model: self.model,
            messages: self.messages,
        };

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(SendError::Http)?;

        if !response.status().is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(SendError::Api {
                message: api::error_message_from_body(&body),
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(SendError::Http)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(SendError::EmptyReply)
    }

    #[cfg(test)]
    pub(crate) fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

/// Owns the persona instructions, the API credential, and the one live
/// [`ChatSession`]. Written only from the UI task.
pub struct SessionManager {
    client: reqwest::Client,
    base_url: String,
    model: String,
    persona: String,
    api_key: Option<String>,
    session: Option<ChatSession>,
}

impl SessionManager {
    pub fn new(base_url: String, model: String, persona: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            model,
            persona,
            api_key: None,
            session: None,
        }
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// Update the persona used to seed subsequent sessions. Callers follow
    /// up with [`SessionManager::reset_session`] so the change applies going
    /// forward, never to an in-flight conversation.
    pub fn set_persona(&mut self, persona: String) {
        self.persona = persona;
    }

    /// Validate `credential` against the provider and, on success, swap in a
    /// fresh seeded session and store the credential. On failure nothing is
    /// mutated: the previous credential and session remain live.
    pub async fn authenticate(&mut self, credential: &str) -> Result<(), AuthError> {
        let models = api::models::fetch_models(&self.client, &self.base_url, credential)
            .await
            .map_err(|e| AuthError {
                message: e.to_string(),
            })?;
        tracing::debug!(
            models = models.data.len(),
            "credential accepted by provider"
        );

        self.api_key = Some(credential.to_string());
        self.session = Some(ChatSession::seeded(&self.persona));
        Ok(())
    }

    /// Discard the current session and seed a fresh one from the current
    /// persona. Without an accepted credential this is a no-op: the manager
    /// stays session-less and sends keep reporting the in-band notice.
    pub fn reset_session(&mut self) {
        if self.api_key.is_some() {
            self.session = Some(ChatSession::seeded(&self.persona));
        }
    }

    /// Snapshot one outbound exchange for a worker task.
    pub fn prepare_send(&self, user_text: &str) -> Result<SendRequest, SendError> {
        let session = self.session.as_ref().ok_or(SendError::NotAuthenticated)?;
        let api_key = self.api_key.clone().ok_or(SendError::NotAuthenticated)?;
        Ok(SendRequest {
            client: self.client.clone(),
            url: construct_api_url(&self.base_url, "chat/completions"),
            api_key,
            model: self.model.clone(),
            messages: session.request_turns(user_text),
        })
    }

    /// Append a successful exchange to the session context. Failed calls are
    /// never recorded, so the provider context only ever contains turns the
    /// provider actually produced.
    pub fn record_exchange(&mut self, user_text: &str, reply: &str) {
        if let Some(session) = self.session.as_mut() {
            session.record_exchange(user_text, reply);
        }
    }

    pub fn session(&self) -> Option<&ChatSession> {
        self.session.as_ref()
    }

    /// Install a credential and seeded session without the network probe.
    #[cfg(test)]
    pub(crate) fn authenticate_offline(&mut self, credential: &str) {
        self.api_key = Some(credential.to_string());
        self.session = Some(ChatSession::seeded(&self.persona));
    }
}
