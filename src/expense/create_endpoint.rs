//! Defines the endpoint for recording a new expense.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    expense::{
        alerts::{SpendingAlerts, evaluate_spending_alerts},
        core::{Expense, NewExpense, parse_iso_date, record_expense},
    },
    user_key::UserKey,
};

/// The state needed to record an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection for the ledger and aggregates.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for recording an expense.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseForm {
    /// The key of the user recording the expense.
    pub user: String,
    /// How much money was spent.
    pub amount: f64,
    /// The spending category.
    pub category: String,
    /// What the money was spent on.
    pub description: String,
    /// The calendar date of the expense as an ISO string, e.g. "2024-01-15".
    pub date: String,
}

/// The response body for a recorded expense.
#[derive(Debug, Serialize)]
pub struct CreateExpenseResponse {
    /// The ledger entry as recorded.
    pub expense: Expense,
    /// Advisory alert conditions evaluated after the write.
    pub alerts: SpendingAlerts,
}

/// A route handler that records an expense and reports advisory alerts.
///
/// Responds 201 with the recorded entry on success. Validation problems are
/// 400s; a failed transaction is a 500 that is safe to retry.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Json(form): Json<CreateExpenseForm>,
) -> Response {
    let new_expense = match validate_form(form) {
        Ok(new_expense) => new_expense,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let user = new_expense.user.clone();
    let category = new_expense.category.clone();

    let expense = match record_expense(new_expense, &connection) {
        Ok(expense) => expense,
        Err(error) => return error.into_response(),
    };

    // The write is committed at this point, so a failure to evaluate the
    // advisory alerts must not fail the request.
    let alerts = match evaluate_spending_alerts(&user, &category, &connection) {
        Ok(alerts) => alerts,
        Err(error) => {
            tracing::error!("could not evaluate spending alerts: {error}");
            SpendingAlerts::default()
        }
    };

    (
        StatusCode::CREATED,
        Json(CreateExpenseResponse { expense, alerts }),
    )
        .into_response()
}

fn validate_form(form: CreateExpenseForm) -> Result<NewExpense, Error> {
    let user = UserKey::new(&form.user)?;
    let date = parse_iso_date(&form.date)?;

    NewExpense::new(user, form.amount, &form.category, &form.description, date)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use crate::{budget::get_budget, db::initialize, user_key::UserKey};

    use super::{CreateExpenseForm, CreateExpenseState, create_expense_endpoint};

    fn get_test_state() -> CreateExpenseState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        CreateExpenseState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn valid_form() -> CreateExpenseForm {
        CreateExpenseForm {
            user: "U@X.com".to_owned(),
            amount: 45.20,
            category: "Food".to_owned(),
            description: "Groceries".to_owned(),
            date: "2024-01-15".to_owned(),
        }
    }

    #[tokio::test]
    async fn records_expense_and_aggregate() {
        let state = get_test_state();

        let response = create_expense_endpoint(State(state.clone()), Json(valid_form()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);

        let connection = state.db_connection.lock().unwrap();
        let user = UserKey::new("u@x.com").unwrap();
        let budget = get_budget(&user, "Food", &connection).unwrap();
        assert_eq!(budget.spent, 45.2);
        assert_eq!(budget.limit, 0.0);
    }

    #[tokio::test]
    async fn rejects_bad_date() {
        let state = get_test_state();
        let form = CreateExpenseForm {
            date: "Jan 15".to_owned(),
            ..valid_form()
        };

        let response = create_expense_endpoint(State(state), Json(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_non_positive_amount() {
        let state = get_test_state();
        let form = CreateExpenseForm {
            amount: 0.0,
            ..valid_form()
        };

        let response = create_expense_endpoint(State(state.clone()), Json(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let connection = state.db_connection.lock().unwrap();
        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM expense", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0, "rejected expense must not be recorded");
    }
}
