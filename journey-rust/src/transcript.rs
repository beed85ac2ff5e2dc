use crate::AnswerMap;
use capsule_sdk::Message;
use serde::{Deserialize, Serialize};

/// The opening line of the conversation with the past year.
pub const CHAT_GREETING: &str =
    "我已小心珍藏你的记忆。让我们开始对话吧。(I have stored your memories gently. Let us reflect.)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }

    pub(crate) fn to_message(&self) -> Message {
        match self.speaker {
            Speaker::User => Message::user_text(self.text.clone()),
            Speaker::Assistant => Message::assistant_text(self.text.clone()),
        }
    }
}

/// What the conversation remembers about the year: the sealed answers and
/// the tone of the chosen theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMemory {
    pub answers: AnswerMap,
    pub theme_context: String,
}

impl ChatMemory {
    /// The hidden first user turn: the answer map as JSON.
    pub(crate) fn seed_message(&self) -> Message {
        Message::user_text(self.answers.to_json())
    }
}

/// The visible conversation, in order. Append-only until the journey resets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTranscript {
    memory: Option<ChatMemory>,
    turns: Vec<ChatTurn>,
}

impl ChatTranscript {
    /// A fresh conversation opened by the greeting.
    #[must_use]
    pub fn seeded(memory: ChatMemory) -> Self {
        Self {
            memory: Some(memory),
            turns: vec![ChatTurn::assistant(CHAT_GREETING)],
        }
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(ChatTurn::user(text));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.turns.push(ChatTurn::assistant(text));
    }

    #[must_use]
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    #[must_use]
    pub fn memory(&self) -> Option<&ChatMemory> {
        self.memory.as_ref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn clear(&mut self) {
        self.memory = None;
        self.turns.clear();
    }

    /// Model messages for the conversation so far: the memory seed, then
    /// every visible turn.
    pub(crate) fn to_messages(&self) -> Vec<Message> {
        self.memory
            .iter()
            .map(ChatMemory::seed_message)
            .chain(self.turns.iter().map(ChatTurn::to_message))
            .collect()
    }
}
