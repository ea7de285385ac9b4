//! Defines the endpoint for updating a budget's spending limit.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, budget::core::update_budget_limit, user_key::UserKey};

/// The state needed to update a budget limit.
#[derive(Debug, Clone)]
pub struct UpdateBudgetLimitState {
    /// The database connection for the budget aggregates.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateBudgetLimitState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for updating a budget limit.
#[derive(Debug, Deserialize)]
pub struct UpdateBudgetLimitForm {
    /// The key of the user the budget belongs to.
    pub user: String,
    /// The new spending limit. Must be zero or greater.
    pub limit: f64,
}

/// The response body for a budget-limit update.
#[derive(Debug, Serialize)]
pub struct UpdateBudgetLimitResponse {
    /// The number of rows the update touched. Zero means there is no
    /// budget for the category; callers must check this explicitly.
    pub affected: usize,
}

/// A route handler that sets the limit for the category in the path.
///
/// Updating a category with no budget is not an error: the response
/// reports zero affected rows instead.
pub async fn update_budget_limit_endpoint(
    State(state): State<UpdateBudgetLimitState>,
    Path(category): Path<String>,
    Json(form): Json<UpdateBudgetLimitForm>,
) -> Response {
    let user = match UserKey::new(&form.user) {
        Ok(user) => user,
        Err(error) => return error.into_response(),
    };

    if !form.limit.is_finite() || form.limit < 0.0 {
        return Error::InvalidBudgetLimit(form.limit).into_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match update_budget_limit(&user, &category, form.limit, &connection) {
        Ok(affected) => Json(UpdateBudgetLimitResponse { affected }).into_response(),
        Err(error) => error.into_response(),
    }
}
