//! Subscription record read endpoint.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use fanbill_core::{SubscriptionRecord, UserId};
use fanbill_store::Store;

use crate::auth::ServiceAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Fetch a user's subscription record.
pub async fn get_subscription(
    State(state): State<Arc<AppState>>,
    _auth: ServiceAuth,
    Path(user_id): Path<UserId>,
) -> Result<Json<SubscriptionRecord>, ApiError> {
    let record = state
        .store
        .get_subscription(&user_id)?
        .ok_or_else(|| ApiError::NotFound(format!("subscription not found for user {user_id}")))?;

    Ok(Json(record))
}
