//! Conversation log for oracle exchanges
//!
//! The log gives the oracle memory of its own prior answers when asked
//! to correct them. It is append-only and owned exclusively by one
//! extraction session; no other component reads or mutates it.

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The extraction session (requests and correction instructions)
    User,
    /// The oracle (raw responses)
    Assistant,
}

impl Role {
    /// Wire name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Opaque, pre-encoded image payload.
///
/// The domain never decodes or verifies image contents; the caller
/// supplies base64-ready data and its media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    /// MIME type, e.g. "image/jpeg"
    pub media_type: String,
    /// Base64-encoded image bytes
    pub data: String,
}

impl ImageData {
    /// Create an image payload from already-encoded data.
    pub fn new(media_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            media_type: media_type.into(),
            data: data.into(),
        }
    }
}

/// Content of a conversation turn.
///
/// The initial extraction request carries the photograph; every other
/// turn is plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnContent {
    /// Text-only turn
    Text(String),
    /// Text accompanied by an image payload
    TextWithImage {
        /// Instruction text
        text: String,
        /// The photograph under extraction
        image: ImageData,
    },
}

impl TurnContent {
    /// The textual part of the content.
    pub fn text(&self) -> &str {
        match self {
            TurnContent::Text(text) => text,
            TurnContent::TextWithImage { text, .. } => text,
        }
    }
}

/// One exchange entry: who spoke and what was said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    /// Speaker
    pub role: Role,
    /// What was said
    pub content: TurnContent,
}

impl ConversationTurn {
    /// A text-only user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: TurnContent::Text(text.into()),
        }
    }

    /// A user turn carrying the image under extraction.
    pub fn user_with_image(text: impl Into<String>, image: ImageData) -> Self {
        Self {
            role: Role::User,
            content: TurnContent::TextWithImage {
                text: text.into(),
                image,
            },
        }
    }

    /// An oracle response turn.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: TurnContent::Text(text.into()),
        }
    }

    /// The textual part of this turn.
    pub fn text(&self) -> &str {
        self.content.text()
    }
}

/// Append-only ordered record of oracle exchanges.
///
/// Grows monotonically for the lifetime of one extraction session and
/// is discarded with it. There is deliberately no way to remove or
/// rewrite a turn.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog(Vec<ConversationTurn>);

impl ConversationLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn.
    pub fn push(&mut self, turn: ConversationTurn) {
        self.0.push(turn);
    }

    /// All turns, oldest first.
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.0
    }

    /// Number of turns recorded.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when nothing has been exchanged yet.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_preserves_order() {
        let mut log = ConversationLog::new();
        log.push(ConversationTurn::user("extract"));
        log.push(ConversationTurn::assistant("[]"));
        log.push(ConversationTurn::user("correct"));

        let roles: Vec<Role> = log.turns().iter().map(|t| t.role).collect();
        assert_eq!(roles, [Role::User, Role::Assistant, Role::User]);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_turn_text_accessor() {
        let image = ImageData::new("image/jpeg", "aGVsbG8=");
        let turn = ConversationTurn::user_with_image("look at this", image);
        assert_eq!(turn.text(), "look at this");
        assert_eq!(turn.role.as_str(), "user");

        let reply = ConversationTurn::assistant("[]");
        assert_eq!(reply.text(), "[]");
        assert_eq!(reply.role.as_str(), "assistant");
    }
}
