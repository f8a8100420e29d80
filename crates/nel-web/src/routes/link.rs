//! Entity linking endpoint
//!
//! ```text
//! POST /  {"nerentity": "<NER payload as a JSON string>"}
//!     200 {"meshentity": {"Category": ..., "Concepts": ..., "Tree": ..., "Score": ...}}
//!     400 {"error": ...}   body is not a request object
//!     422 {"error": ...}   payload is not valid NER output
//! ```
//!
//! The body is decoded as JSON whatever its `Content-Type`.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use mesh_nel::LinkResult;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LinkRequest {
    /// NER output, itself JSON-encoded
    pub nerentity: String,
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub meshentity: LinkResult,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// POST /
pub async fn link_entity(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<LinkResponse>, ApiError> {
    let request: LinkRequest = serde_json::from_str(&body).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Invalid request body: {}", e),
            }),
        )
    })?;

    let linker = state.linker.clone();
    let outcome = tokio::task::spawn_blocking(move || linker.link(&request.nerentity)).await;

    match outcome {
        Ok(Ok(result)) => Ok(Json(LinkResponse { meshentity: result })),
        Ok(Err(e)) => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
        Err(e) => {
            tracing::error!(error = %e, "Linking task failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "linking task failed".to_string(),
                }),
            ))
        }
    }
}
