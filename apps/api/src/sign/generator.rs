//! Sign text generation — fills the two-persona prompt and returns the model's JSON.

use serde_json::Value;

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::sign::level::SignLevel;
use crate::sign::prompts::SIGN_PROMPT_TEMPLATE;

pub fn build_sign_prompt(wish: &str, level: SignLevel) -> String {
    // Level first: a wish containing "{level}" must not be expanded.
    SIGN_PROMPT_TEMPLATE
        .replace("{level}", level.as_str())
        .replacen("{wish}", wish, 1)
}

pub async fn generate_sign(
    wish: &str,
    level: SignLevel,
    llm: &LlmClient,
) -> Result<Value, AppError> {
    let prompt = build_sign_prompt(wish, level);
    llm.call_json::<Value>(&prompt)
        .await
        .map_err(AppError::upstream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_sign_prompt_fills_all_placeholders() {
        let prompt = build_sign_prompt("找到好工作", SignLevel::Neutral);
        assert!(prompt.contains("用户愿望内容：\n找到好工作\n"));
        assert!(prompt.contains("中（值为：吉 / 中 / 平）"));
        assert!(prompt.contains(r#""level": "中""#));
        assert!(!prompt.contains("{level}"));
        assert!(!prompt.contains("{wish}"));
    }

    #[test]
    fn test_build_sign_prompt_keeps_wish_verbatim() {
        let prompt = build_sign_prompt("{level} {wish}", SignLevel::Plain);
        assert!(prompt.contains("用户愿望内容：\n{level} {wish}\n"));
    }
}
