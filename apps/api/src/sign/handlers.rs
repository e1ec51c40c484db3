//! Axum route handlers for the sign API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::sign::generator::generate_sign;
use crate::sign::level::{classify, hour_timestamp, trim_wish, SignLevel};
use crate::sign::moderation::moderate_wish;
use crate::state::AppState;

const GENERATION_FAILURE_MESSAGE: &str = "生成签文失败";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

// Absent and `null` fields both read as empty.

#[derive(Debug, Deserialize)]
pub struct WishRequest {
    #[serde(default)]
    pub wish: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateSignRequest {
    #[serde(default)]
    pub wish: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

/// Success envelope shared by every sign endpoint.
#[derive(Debug, Serialize)]
pub struct SignResponse<T> {
    pub status: &'static str,
    pub result: T,
}

impl<T> SignResponse<T> {
    pub fn success(result: T) -> Json<Self> {
        Json(Self {
            status: "success",
            result,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SignLevelResult {
    pub level: SignLevel,
    pub timestamp: String,
    pub wish: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/calculateSignLevel
///
/// Buckets the wish into 吉 / 中 / 平 for the current UTC hour.
pub async fn handle_calculate_sign_level(
    State(state): State<AppState>,
    payload: Result<Json<WishRequest>, JsonRejection>,
) -> Result<Json<SignResponse<SignLevelResult>>, AppError> {
    let Json(request) = payload?;
    let wish = request.wish.unwrap_or_default();
    if trim_wish(&wish).is_empty() {
        return Err(AppError::Validation("愿望内容不能为空".to_string()));
    }

    // One clock read: level and timestamp must describe the same hour.
    let now = state.clock.now();
    let level = classify(&wish, now);
    let timestamp = hour_timestamp(now);
    tracing::debug!("Computed sign level {level} for hour {timestamp}");

    Ok(SignResponse::success(SignLevelResult {
        level,
        timestamp,
        wish,
    }))
}

/// POST /api/validateWish
///
/// Content moderation. Returns the model's `{category, reason, wish}` verdict verbatim.
pub async fn handle_validate_wish(
    State(state): State<AppState>,
    payload: Result<Json<WishRequest>, JsonRejection>,
) -> Result<Json<SignResponse<Value>>, AppError> {
    let Json(request) = payload?;
    let wish = request.wish.unwrap_or_default();
    if trim_wish(&wish).is_empty() {
        return Err(AppError::Validation("愿望内容不能为空".to_string()));
    }

    let verdict = moderate_wish(&wish, &state.llm).await?;

    Ok(SignResponse::success(verdict))
}

/// POST /api/generateSign
///
/// Generates classic and modern sign text for a wish at a given level.
pub async fn handle_generate_sign(
    State(state): State<AppState>,
    payload: Result<Json<GenerateSignRequest>, JsonRejection>,
) -> Result<Json<SignResponse<Value>>, AppError> {
    let Json(request) = payload?;
    let wish = request.wish.unwrap_or_default();
    if trim_wish(&wish).is_empty() {
        return Err(AppError::Validation("缺少必要参数: wish".to_string()));
    }

    let level = request
        .level
        .unwrap_or_default()
        .parse::<SignLevel>()
        .map_err(|_| {
            AppError::Validation(
                "缺少必要参数或参数不合法: level (应为\"吉\"、\"中\"或\"平\")".to_string(),
            )
        })?;

    let sign = generate_sign(&wish, level, &state.llm)
        .await
        .map_err(|e| e.with_failure_message(GENERATION_FAILURE_MESSAGE))?;

    Ok(SignResponse::success(sign))
}
