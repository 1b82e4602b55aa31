/// Who authored a transcript entry.
///
/// `App` entries are client-authored notices (command feedback, help text).
/// They are rendered in the transcript but never become part of the provider
/// conversation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranscriptRole {
    User,
    Bot,
    App,
}

impl TranscriptRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TranscriptRole::User => "user",
            TranscriptRole::Bot => "bot",
            TranscriptRole::App => "app",
        }
    }

    pub fn is_user(self) -> bool {
        self == TranscriptRole::User
    }

    pub fn is_bot(self) -> bool {
        self == TranscriptRole::Bot
    }

    pub fn is_app(self) -> bool {
        self == TranscriptRole::App
    }
}

impl AsRef<str> for TranscriptRole {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: TranscriptRole,
    pub content: String,
}

impl Message {
    pub fn new(role: TranscriptRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TranscriptRole::User, content)
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(TranscriptRole::Bot, content)
    }

    pub fn app(content: impl Into<String>) -> Self {
        Self::new(TranscriptRole::App, content)
    }
}
