//! Defines the endpoint for creating a budget.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{AppState, Error, budget::core::create_budget, user_key::UserKey};

/// The state needed to create a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetState {
    /// The database connection for the budget aggregates.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating a budget.
#[derive(Debug, Deserialize)]
pub struct CreateBudgetForm {
    /// The key of the user the budget belongs to.
    pub user: String,
    /// The category to budget for.
    pub category: String,
    /// The spending limit for the category. Must be positive.
    pub limit: f64,
}

/// A route handler for creating a budget with nothing spent yet.
///
/// Responds 201 with the new aggregate, or 409 when a budget for the
/// category already exists.
pub async fn create_budget_endpoint(
    State(state): State<CreateBudgetState>,
    Json(form): Json<CreateBudgetForm>,
) -> Response {
    let user = match UserKey::new(&form.user) {
        Ok(user) => user,
        Err(error) => return error.into_response(),
    };

    let category = form.category.trim();
    if category.is_empty() {
        return Error::EmptyCategory.into_response();
    }

    if !form.limit.is_finite() || form.limit <= 0.0 {
        return Error::InvalidBudgetLimit(form.limit).into_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match create_budget(&user, category, form.limit, &connection) {
        Ok(budget) => (StatusCode::CREATED, Json(budget)).into_response(),
        Err(error) => error.into_response(),
    }
}
