//! Application router configuration.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Response},
    routing::{get, patch},
};
use serde_json::json;

use crate::{
    AppState, endpoints,
    budget::{create_budget_endpoint, list_budgets_endpoint, update_budget_limit_endpoint},
    expense::{create_expense_endpoint, get_statement_endpoint},
    export::export_expenses_endpoint,
    logging::logging_middleware,
    profile::{get_profile_endpoint, put_profile_endpoint},
    wallet::{get_wallet_endpoint, put_wallet_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::DB_HEALTH, get(get_db_health))
        .route(endpoints::COFFEE, get(get_coffee))
        .route(
            endpoints::WALLET,
            get(get_wallet_endpoint).put(put_wallet_endpoint),
        )
        .route(
            endpoints::PROFILE,
            get(get_profile_endpoint).put(put_profile_endpoint),
        )
        .route(
            endpoints::BUDGETS,
            get(list_budgets_endpoint).post(create_budget_endpoint),
        )
        .route(endpoints::BUDGET_LIMIT, patch(update_budget_limit_endpoint))
        .route(
            endpoints::EXPORT_EXPENSES,
            get(export_expenses_endpoint),
        )
        .route(
            endpoints::EXPENSES,
            get(get_statement_endpoint).post(create_expense_endpoint),
        )
        .layer(middleware::from_fn(logging_middleware))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Report process liveness.
async fn get_health() -> Response {
    Json(json!({ "ok": true })).into_response()
}

/// Report whether the database can serve a trivial query.
async fn get_db_health(State(state): State<AppState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return db_health_failure();
        }
    };

    match connection.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)) {
        Ok(1) => Json(json!({ "ok": true, "db": true })).into_response(),
        Ok(_) | Err(_) => db_health_failure(),
    }
}

fn db_health_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "ok": false })),
    )
        .into_response()
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, Html("I'm a teapot")).into_response()
}

/// The JSON 404 for unknown routes.
async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "not found" })),
    )
        .into_response()
}

#[cfg(test)]
mod route_tests {
    use axum::http::StatusCode;

    use super::{get_404_not_found, get_coffee, get_health};

    #[tokio::test]
    async fn health_is_ok() {
        let response = get_health().await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn coffee_is_a_teapot() {
        let response = get_coffee().await;

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn unknown_routes_are_404s() {
        let response = get_404_not_found().await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
