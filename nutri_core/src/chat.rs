//! Scripted nutrition assistant.
//!
//! Replies come from a fixed keyword table checked in order; the first match
//! wins. There is no model behind it.
//!
//! Greetings ("hello", "hi") only match as whole words. A plain substring
//! test would greet anyone asking about "this", "which" or "shrimp", so do
//! not loosen it. Every other keyword matches anywhere in the text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prompts offered before the user has typed anything
pub const SUGGESTED_PROMPTS: [&str; 4] = [
    "Create a meal plan for weight loss",
    "How much protein do I need?",
    "Healthy snack ideas",
    "Explain macronutrients",
];

const GREETING_REPLY: &str =
    "Hello! I'm here to help you achieve your nutrition goals. What's on your mind?";
const PLAN_REPLY: &str =
    "I can create a personalized diet plan for you. Could you tell me about your dietary preferences?";
const PROTEIN_REPLY: &str =
    "Protein is essential for muscle repair! Good sources include chicken, fish, tofu, and legumes.";
const WEIGHT_REPLY: &str =
    "Weight management is largely about calorie balance. Are you looking to lose, gain, or maintain weight?";
const FALLBACK_REPLY: &str =
    "That's an interesting topic! Nutrition is complex, but I'm here to simplify it for you. Could you be more specific?";

/// How a keyword is matched against the lowercased input
#[derive(Clone, Copy, Debug)]
enum Match {
    /// Whole alphanumeric token
    Word(&'static str),
    /// Anywhere in the text
    Substring(&'static str),
}

impl Match {
    fn matches(&self, lower: &str) -> bool {
        match self {
            Match::Word(word) => lower
                .split(|c: char| !c.is_alphanumeric())
                .any(|token| token == *word),
            Match::Substring(needle) => lower.contains(needle),
        }
    }
}

const RULES: &[(&[Match], &str)] = &[
    (&[Match::Word("hello"), Match::Word("hi")], GREETING_REPLY),
    (&[Match::Substring("diet"), Match::Substring("plan")], PLAN_REPLY),
    (&[Match::Substring("protein")], PROTEIN_REPLY),
    (&[Match::Substring("weight")], WEIGHT_REPLY),
];

/// Keyword-table responder
#[derive(Clone, Copy, Debug, Default)]
pub struct Assistant;

impl Assistant {
    pub fn reply(&self, input: &str) -> &'static str {
        let lower = input.to_lowercase();
        RULES
            .iter()
            .find(|(patterns, _)| patterns.iter().any(|p| p.matches(&lower)))
            .map(|(_, reply)| *reply)
            .unwrap_or(FALLBACK_REPLY)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub time: DateTime<Utc>,
}

/// Conversation history, newest message first
#[derive(Clone, Debug, Default)]
pub struct ChatLog {
    assistant: Assistant,
    messages: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the user's message and the scripted reply; returns the reply.
    /// Blank input is ignored.
    pub fn send(&mut self, text: &str, now: DateTime<Utc>) -> Option<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.push(Sender::User, text.to_string(), now);
        let reply = self.assistant.reply(text);
        tracing::debug!("Assistant reply selected for {:?}", text);
        self.push(Sender::Assistant, reply.to_string(), now);
        self.messages.first()
    }

    fn push(&mut self, sender: Sender, text: String, time: DateTime<Utc>) {
        self.messages.insert(
            0,
            ChatMessage {
                id: Uuid::new_v4(),
                text,
                sender,
                time,
            },
        );
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_replies() {
        let assistant = Assistant;
        assert_eq!(assistant.reply("Hello there"), GREETING_REPLY);
        assert_eq!(assistant.reply("Hi!"), GREETING_REPLY);
        assert_eq!(assistant.reply("Create a meal plan for weight loss"), PLAN_REPLY);
        assert_eq!(assistant.reply("How much PROTEIN do I need?"), PROTEIN_REPLY);
        assert_eq!(assistant.reply("my weight is stuck"), WEIGHT_REPLY);
        assert_eq!(assistant.reply("Explain macronutrients"), FALLBACK_REPLY);
    }

    #[test]
    fn test_greeting_needs_whole_word() {
        // "this" and "which" contain "hi" but are not greetings
        assert_eq!(Assistant.reply("which snacks are healthy"), FALLBACK_REPLY);
        assert_eq!(Assistant.reply("is this protein bar ok"), PROTEIN_REPLY);
        assert_eq!(Assistant.reply("shrimp recipes?"), FALLBACK_REPLY);
    }

    #[test]
    fn test_rules_are_ordered() {
        // Greeting wins over the weight rule
        assert_eq!(Assistant.reply("hi, weight question"), GREETING_REPLY);
    }

    #[test]
    fn test_chat_log_newest_first() {
        let mut log = ChatLog::new();
        let now = Utc::now();

        let reply = log.send("protein?", now).unwrap();
        assert_eq!(reply.sender, Sender::Assistant);
        assert_eq!(reply.text, PROTEIN_REPLY);

        assert!(log.send("   ", now).is_none());
        assert_eq!(log.messages().len(), 2);
        assert_eq!(log.messages()[1].sender, Sender::User);
        assert_eq!(log.messages()[1].text, "protein?");
    }
}
