//! Defines the endpoints for reading and setting the wallet.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    money::validate_finite_amount,
    user_key::UserKey,
    wallet::core::{get_total_funds, set_total_funds},
};

/// The state needed to read or set the wallet.
#[derive(Debug, Clone)]
pub struct WalletState {
    /// The database connection for the wallet store.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for WalletState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for reading the wallet.
#[derive(Debug, Default, Deserialize)]
pub struct GetWalletParams {
    /// The key of the user whose wallet to read.
    pub user: Option<String>,
}

/// The request body for setting the wallet.
#[derive(Debug, Deserialize)]
pub struct SetWalletForm {
    /// The key of the user whose wallet to set.
    pub user: String,
    /// The total funds to store.
    pub total_funds: f64,
}

/// The wallet as returned to clients.
#[derive(Debug, Serialize)]
pub struct WalletResponse {
    /// The total funds available to the user.
    pub total_funds: f64,
}

/// A route handler that reads the wallet, zero when none has been set.
pub async fn get_wallet_endpoint(
    State(state): State<WalletState>,
    Query(params): Query<GetWalletParams>,
) -> Response {
    let user = match UserKey::new(params.user.as_deref().unwrap_or_default()) {
        Ok(user) => user,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match get_total_funds(&user, &connection) {
        Ok(total_funds) => Json(WalletResponse { total_funds }).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler that sets the wallet's total funds, last write wins.
pub async fn put_wallet_endpoint(
    State(state): State<WalletState>,
    Json(form): Json<SetWalletForm>,
) -> Response {
    let user = match UserKey::new(&form.user) {
        Ok(user) => user,
        Err(error) => return error.into_response(),
    };

    let total_funds = match validate_finite_amount(form.total_funds) {
        Ok(total_funds) => total_funds,
        Err(error) => return error.into_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match set_total_funds(&user, total_funds, &connection) {
        Ok(()) => Json(WalletResponse { total_funds }).into_response(),
        Err(error) => error.into_response(),
    }
}
