use axum::{extract::State, Json};
use std::sync::Arc;

use deepchat_llm::NormalizedCompletion;

use super::ChatBody;
use crate::{error::ApiResult, state::AppState};

/// Single-shot completion, normalized
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatBody>,
) -> ApiResult<Json<NormalizedCompletion>> {
    let request = req.to_request(&state.config.llm)?;

    let response = state.llm_client.chat(request).await?;
    let text = response.content();

    Ok(Json(NormalizedCompletion::from_complete(&response, &text)))
}
