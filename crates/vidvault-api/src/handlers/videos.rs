//! Video catalog handlers.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use vidvault_models::{Video, VideoId};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// List every video, newest first.
pub async fn list_videos(State(state): State<AppState>) -> ApiResult<Json<Vec<Video>>> {
    let videos = state.store.list().await.map_err(|e| {
        error!("Failed to fetch videos: {}", e);
        ApiError::internal("Failed to fetch videos")
    })?;

    debug!("Listed {} videos", videos.len());
    Ok(Json(videos))
}

/// Request body for deleting a video.
#[derive(Debug, Deserialize)]
pub struct DeleteVideoRequest {
    #[serde(default)]
    pub id: Option<String>,
}

/// Response for a successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteVideoResponse {
    pub success: bool,
}

/// Delete a video by id.
///
/// The body is parsed as JSON whatever its content type, so plain `fetch`
/// calls sending `text/plain` work too.
pub async fn delete_video(
    State(state): State<AppState>,
    user: AuthUser,
    body: Bytes,
) -> ApiResult<Json<DeleteVideoResponse>> {
    let request: DeleteVideoRequest = serde_json::from_slice(&body).map_err(|e| {
        debug!("Rejected delete body: {}", e);
        ApiError::bad_request("Invalid request body")
    })?;

    let id = request
        .id
        .filter(|id| !id.trim().is_empty())
        .map(VideoId::from_string)
        .ok_or_else(|| ApiError::bad_request("Missing video id"))?;

    state.store.delete(&id).await.map_err(|e| {
        if e.is_not_found() {
            ApiError::not_found("Video not found")
        } else {
            error!(video_id = %id, "Failed to delete video: {}", e);
            ApiError::internal("Failed to delete video")
        }
    })?;

    info!(user_id = %user.user_id, video_id = %id, "Deleted video");
    Ok(Json(DeleteVideoResponse { success: true }))
}
