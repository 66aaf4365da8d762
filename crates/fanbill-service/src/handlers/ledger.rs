//! Ledger audit endpoints.
//!
//! Read-only queries over the transaction ledger for reconciliation and
//! support tooling. The settlement pipeline itself never reads these.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use fanbill_core::{PayeeId, Transaction, TransactionId};
use fanbill_store::Store;

use crate::auth::ServiceAuth;
use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for listing ledger transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// The payee to list transactions for (`PLATFORM` or a creator ID).
    pub payee_id: PayeeId,
    /// Maximum number of results (default 50, capped at 200).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Number of results to skip.
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

/// Response for listing ledger transactions.
#[derive(Debug, Serialize)]
pub struct ListTransactionsResponse {
    /// The matching transactions, newest first.
    pub transactions: Vec<Transaction>,
    /// Limit applied to this page.
    pub limit: usize,
    /// Offset applied to this page.
    pub offset: usize,
}

/// List ledger transactions for a payee, newest first.
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    _auth: ServiceAuth,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<ListTransactionsResponse>, ApiError> {
    let limit = query.limit.min(200);

    let transactions =
        state
            .store
            .list_transactions_by_payee(&query.payee_id, limit, query.offset)?;

    Ok(Json(ListTransactionsResponse {
        transactions,
        limit,
        offset: query.offset,
    }))
}

/// Fetch a single ledger transaction by ID.
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    _auth: ServiceAuth,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Transaction>, ApiError> {
    let transaction = state
        .store
        .get_transaction(&transaction_id)?
        .ok_or_else(|| ApiError::NotFound(format!("transaction not found: {transaction_id}")))?;

    Ok(Json(transaction))
}
