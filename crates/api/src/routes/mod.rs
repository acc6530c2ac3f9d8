pub mod conversion_status;
pub mod convert;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// All routes under `/api/v1`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(conversion_status::router())
        .merge(convert::router())
}
