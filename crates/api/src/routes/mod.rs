pub mod health;
pub mod videos;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /videos                        create, quick create, lookup, status, per-user listing
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/videos", videos::router())
}
