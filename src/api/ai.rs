//! AI command endpoint.

use axum::{extract::State, Json};

use super::{error, success, ApiResult};
use crate::ai::{split_message, MESSAGE_CHUNK_LIMIT};
use crate::errors::AppError;
use crate::models::{AiQueryRequest, AiQueryResponse};
use crate::AppState;

/// POST /api/ai - Ask the AI models a question.
///
/// The answer comes back pre-split into chat-sized chunks. If the query task
/// itself dies, the error is returned as a chunk for the user to see.
pub async fn ask_ai(
    State(state): State<AppState>,
    Json(request): Json<AiQueryRequest>,
) -> ApiResult<AiQueryResponse> {
    if request.text.trim().is_empty() {
        return error(AppError::Validation("Question text is required".to_string()));
    }

    let ai = state.ai.clone();
    let prompt = request.text;
    let response = match tokio::spawn(async move { ai.query(&prompt).await }).await {
        Ok(outcome) => AiQueryResponse {
            model: outcome.model().map(str::to_string),
            chunks: split_message(&outcome.into_text(), MESSAGE_CHUNK_LIMIT),
        },
        Err(e) => {
            tracing::error!("AI command failed: {}", e);
            AiQueryResponse {
                model: None,
                chunks: vec![format!("❌ Error: {}", e)],
            }
        }
    };

    success(response)
}
