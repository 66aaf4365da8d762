//! Referral network endpoints.
//!
//! Each creator holds at most one `referred_by` pointer; the commission
//! cascade walks these one generation at a time.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use fanbill_core::CreatorId;
use fanbill_store::Store;

use crate::auth::ServiceAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for setting a referral pointer.
#[derive(Debug, Deserialize)]
pub struct PutReferralRequest {
    /// The creator who referred this one.
    pub referred_by: CreatorId,
}

/// A creator's referral pointer.
#[derive(Debug, Serialize)]
pub struct ReferralResponse {
    /// The creator.
    pub creator_id: CreatorId,
    /// The referring creator, if any.
    pub referred_by: Option<CreatorId>,
}

/// Set the referring parent of a creator.
pub async fn put_referral(
    State(state): State<Arc<AppState>>,
    _auth: ServiceAuth,
    Path(creator_id): Path<CreatorId>,
    Json(request): Json<PutReferralRequest>,
) -> Result<Json<ReferralResponse>, ApiError> {
    if request.referred_by == creator_id {
        return Err(ApiError::BadRequest(
            "a creator cannot refer itself".into(),
        ));
    }

    state.store.put_referral(&creator_id, &request.referred_by)?;

    tracing::info!(
        creator_id = %creator_id,
        referred_by = %request.referred_by,
        "Referral pointer set"
    );

    Ok(Json(ReferralResponse {
        creator_id,
        referred_by: Some(request.referred_by),
    }))
}

/// Get the referring parent of a creator.
pub async fn get_referral(
    State(state): State<Arc<AppState>>,
    _auth: ServiceAuth,
    Path(creator_id): Path<CreatorId>,
) -> Result<Json<ReferralResponse>, ApiError> {
    let referred_by = state.store.get_referrer(&creator_id)?;

    Ok(Json(ReferralResponse {
        creator_id,
        referred_by,
    }))
}
