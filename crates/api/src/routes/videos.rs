//! Route definitions for the `/videos` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::videos;
use crate::state::AppState;

/// Routes mounted at `/videos`.
///
/// ```text
/// POST   /                  -> create_video
/// POST   /quick             -> create_quick_video
/// GET    /{id}              -> get_video
/// GET    /{id}/status       -> get_video_status
/// GET    /user/{user_id}    -> list_user_videos
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(videos::create_video))
        .route("/quick", post(videos::create_quick_video))
        .route("/{id}", get(videos::get_video))
        .route("/{id}/status", get(videos::get_video_status))
        .route("/user/{user_id}", get(videos::list_user_videos))
}
