//! The dialogue state machine driving indication collection.
//!
//! The session's indication map is the authoritative state: the LLM only
//! interprets each free-text answer into structured updates, and the
//! orchestrator decides deterministically whether to ask the next question
//! or finalize a recommendation.

use thiserror::Error;
use tracing::{error, info, instrument};

use crate::{
    base::{
        catalog,
        config::Config,
        prompts::{self, FALLBACK_REPLY, GREETING},
        types::{AssistantEnvelope, ChatMessage},
    },
    interaction::render,
    service::{llm::LlmClient, store::SessionStore},
};

/// Errors surfaced to the serving layer.
#[derive(Debug, Error)]
pub enum DialogueError {
    /// The session id is unknown, expired, or was never issued.
    #[error("Session ID ikke funnet")]
    SessionNotFound,
}

/// Allocate a new session and return its id with the fixed greeting.
#[instrument(skip_all)]
pub fn start_session(store: &SessionStore) -> (String, &'static str) {
    let (id, _) = store.create();

    (id, GREETING)
}

/// Run one turn of the intake dialogue.
///
/// Provider failures of any kind are swallowed into the fixed fallback reply
/// and leave the transcript at the appended user turn; only an unknown
/// session id surfaces as an error.
#[instrument(skip(store, llm, config, user_text))]
pub async fn submit_response(store: &SessionStore, llm: &LlmClient, config: &Config, session_id: &str, user_text: &str) -> Result<String, DialogueError> {
    let handle = store.get(session_id).ok_or(DialogueError::SessionNotFound)?;

    // Holding the session lock across the turn serializes concurrent
    // submissions for the same session.
    let mut session = handle.lock().await;

    session.transcript.push(ChatMessage::user(user_text));

    let messages = prompts::compose(&session.transcript);

    let raw = match llm.complete(&messages).await {
        Ok(raw) => raw,
        Err(err) => {
            error!("LLM call failed for session `{session_id}`: {err:#}");
            return Ok(FALLBACK_REPLY.to_string());
        }
    };

    let envelope = match AssistantEnvelope::parse(&raw) {
        Ok(envelope) => envelope,
        Err(err) => {
            error!("Unparseable LLM output for session `{session_id}`: {err:#}");
            return Ok(FALLBACK_REPLY.to_string());
        }
    };

    for update in &envelope.updates {
        session.collected.insert(update.indication, update.value);
    }

    let assistant_text = match session.next_unanswered() {
        Some(indication) => with_follow_up(envelope.reply.trim(), indication.question()),
        None => {
            let matched = catalog::matched_services(&session.collected);
            info!("Session `{session_id}` finalized with {} matched services.", matched.len());

            let cards = render::render_cards(&matched);
            let reply = envelope.reply.trim();

            if reply.is_empty() { cards } else { format!("{reply}\n\n{cards}") }
        }
    };

    session.transcript.push(ChatMessage::assistant(assistant_text.clone()));

    Ok(render::substitute_media(&assistant_text, config.media_strategy))
}

/// Guarantee the reply carries the next open question.
fn with_follow_up(reply: &str, question: &str) -> String {
    if reply.to_lowercase().contains(&question.to_lowercase()) {
        reply.to_string()
    } else if reply.is_empty() {
        question.to_string()
    } else {
        format!("{reply}\n\n{question}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_up_is_appended_when_missing() {
        let text = with_follow_up("Takk for informasjonen.", "Har pasienten økt risiko for fall?");

        assert!(text.starts_with("Takk for informasjonen."));
        assert!(text.ends_with("Har pasienten økt risiko for fall?"));
    }

    #[test]
    fn follow_up_is_not_duplicated() {
        let reply = "Takk! Har pasienten økt risiko for fall?";

        assert_eq!(with_follow_up(reply, "Har pasienten økt risiko for fall?"), reply);
    }

    #[test]
    fn empty_reply_becomes_the_question() {
        assert_eq!(with_follow_up("", "Klarer pasienten å åpne døren selv?"), "Klarer pasienten å åpne døren selv?");
    }
}
