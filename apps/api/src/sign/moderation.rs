//! Wish moderation — length gate plus LLM content classification.

use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::sign::prompts::{BLOCK_REASON, MODERATION_PROMPT_TEMPLATE};

/// Longest wish sent to the LLM, counted in UTF-16 code units.
pub const MAX_WISH_LENGTH: usize = 50;

/// Only the canned block is built locally; allow verdicts come from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationCategory {
    Block,
}

/// The verdict shape the moderation prompt asks for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModerationVerdict {
    pub category: ModerationCategory,
    pub reason: String,
    pub wish: String,
}

impl ModerationVerdict {
    pub fn blocked() -> Self {
        Self {
            category: ModerationCategory::Block,
            reason: BLOCK_REASON.to_string(),
            wish: String::new(),
        }
    }
}

pub fn exceeds_length_limit(wish: &str) -> bool {
    wish.encode_utf16().count() > MAX_WISH_LENGTH
}

pub fn build_moderation_prompt(wish: &str) -> String {
    MODERATION_PROMPT_TEMPLATE.replacen("{{USER_TEXT}}", wish, 1)
}

/// Moderates a non-blank wish. Over-long wishes are blocked without an LLM call;
/// otherwise the model's JSON verdict is returned as-is.
pub async fn moderate_wish(wish: &str, llm: &LlmClient) -> Result<Value, AppError> {
    if exceeds_length_limit(wish) {
        tracing::debug!(
            "Wish exceeds {MAX_WISH_LENGTH} UTF-16 units, blocking without LLM call"
        );
        return Ok(serde_json::to_value(ModerationVerdict::blocked())?);
    }

    let prompt = build_moderation_prompt(wish);
    llm.call_json::<Value>(&prompt)
        .await
        .map_err(AppError::upstream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_limit_counts_utf16_units() {
        assert!(!exceeds_length_limit(&"a".repeat(50)));
        assert!(exceeds_length_limit(&"a".repeat(51)));
        // One CJK char is one UTF-16 unit.
        assert!(!exceeds_length_limit(&"愿".repeat(50)));
        assert!(exceeds_length_limit(&"愿".repeat(51)));
        // An astral-plane emoji is two units.
        assert!(exceeds_length_limit(&"🍀".repeat(26)));
        assert!(!exceeds_length_limit(&"🍀".repeat(25)));
    }

    #[test]
    fn test_build_moderation_prompt_embeds_wish() {
        let prompt = build_moderation_prompt("考试顺利");
        assert!(prompt.contains("<user_text>考试顺利</user_text>"));
        assert!(!prompt.contains("{{USER_TEXT}}"));
    }

    #[test]
    fn test_build_moderation_prompt_does_not_expand_placeholder_in_wish() {
        let prompt = build_moderation_prompt("{{USER_TEXT}}");
        assert_eq!(prompt.matches("{{USER_TEXT}}").count(), 1);
    }

    #[test]
    fn test_blocked_verdict_serializes_lowercase() {
        let value = serde_json::to_value(ModerationVerdict::blocked()).unwrap();
        assert_eq!(value["category"], "block");
        assert_eq!(value["reason"], BLOCK_REASON);
        assert_eq!(value["wish"], "");
    }

    #[tokio::test]
    async fn test_over_long_wish_is_blocked_without_llm_call() {
        // Nothing listens on this port; a request would surface as an upstream error.
        let llm = LlmClient::new("test-key".to_string(), "http://127.0.0.1:9").unwrap();

        let value = moderate_wish(&"愿".repeat(51), &llm).await.unwrap();

        assert_eq!(value, serde_json::to_value(ModerationVerdict::blocked()).unwrap());
    }
}
