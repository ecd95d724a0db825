use serde::{Deserialize, Serialize};

use crate::base::catalog::Indication;

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// Role tag for a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single role-tagged turn in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self { role: ChatRole::System, text: text.into() }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self { role: ChatRole::User, text: text.into() }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, text: text.into() }
    }
}

/// One indication interpreted from the user's latest answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicationUpdate {
    pub indication: Indication,
    pub value: bool,
}

/// The structured envelope the model is instructed to return on every turn:
/// a conversational reply plus any indication updates it interpreted.
#[derive(Debug, Deserialize)]
pub struct AssistantEnvelope {
    #[serde(default)]
    pub reply: String,
    #[serde(default)]
    pub updates: Vec<IndicationUpdate>,
}

impl AssistantEnvelope {
    /// Parse raw model output, tolerating markdown code fences or prose
    /// around the JSON object.
    pub fn parse(raw: &str) -> Res<Self> {
        let start = raw.find('{').ok_or_else(|| anyhow::anyhow!("no JSON object in model output"))?;
        let end = raw.rfind('}').ok_or_else(|| anyhow::anyhow!("unterminated JSON object in model output"))?;

        if end < start {
            return Err(anyhow::anyhow!("malformed JSON object in model output"));
        }

        Ok(serde_json::from_str(&raw[start..=end])?)
    }
}
