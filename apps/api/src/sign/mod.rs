// Sign API: level classification, wish moderation, sign text generation.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod generator;
pub mod handlers;
pub mod level;
pub mod moderation;
pub mod prompts;
