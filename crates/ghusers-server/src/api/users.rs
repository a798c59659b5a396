use axum::{
    extract::{Query, State},
    Extension, Json,
};
use ghusers_core::{PageRequest, ProfileRecord};

use crate::middleware::RequestId;

use super::AppState;

/// `POST /retrieveUsers?page=&pageSize=` with a JSON array of usernames.
///
/// Always answers `200 OK`. Usernames that are invalid, out of the requested
/// page, or fail to fetch are simply absent from the array. `null` entries
/// in the body are treated like blanks.
pub(super) async fn retrieve_users(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(page): Query<PageRequest>,
    Json(usernames): Json<Vec<Option<String>>>,
) -> Json<Vec<ProfileRecord>> {
    let usernames: Vec<String> = usernames.into_iter().flatten().collect();
    tracing::info!(
        request_id = %req_id.0,
        submitted = usernames.len(),
        page = page.page,
        page_size = page.page_size,
        "retrieveUsers request received"
    );

    Json(state.pipeline.retrieve(&usernames, page).await)
}
