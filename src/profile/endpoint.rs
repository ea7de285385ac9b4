//! Defines the endpoints for reading and updating the profile.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    profile::core::{Profile, get_profile, set_profile},
    user_key::UserKey,
};

/// The state needed to read or update the profile.
#[derive(Debug, Clone)]
pub struct ProfileState {
    /// The database connection for the user store.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProfileState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for reading the profile.
#[derive(Debug, Default, Deserialize)]
pub struct GetProfileParams {
    /// The key of the user whose profile to read.
    pub user: Option<String>,
}

/// The request body for updating the profile.
#[derive(Debug, Deserialize)]
pub struct SetProfileForm {
    /// The key of the user whose profile to update.
    pub user: String,
    /// The display name to store.
    #[serde(default)]
    pub name: Option<String>,
    /// The avatar reference to store. The upload itself is handled by an
    /// external blob store; only the reference string lands here.
    #[serde(default)]
    pub avatar_ref: Option<String>,
}

/// A route handler that returns the stored profile, 404 when none exists.
pub async fn get_profile_endpoint(
    State(state): State<ProfileState>,
    Query(params): Query<GetProfileParams>,
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

    match get_profile(&user, &connection) {
        Ok(profile) => Json(profile).into_response(),
        Err(error) => error.into_response(),
    }
}

/// A route handler that creates or replaces the stored profile.
pub async fn put_profile_endpoint(
    State(state): State<ProfileState>,
    Json(form): Json<SetProfileForm>,
) -> Response {
    let user = match UserKey::new(&form.user) {
        Ok(user) => user,
        Err(error) => return error.into_response(),
    };

    let profile = Profile {
        name: form.name,
        avatar_ref: form.avatar_ref,
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match set_profile(&user, &profile, &connection) {
        Ok(()) => Json(profile).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Query, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;

    use crate::db::initialize;

    use super::{
        GetProfileParams, ProfileState, SetProfileForm, get_profile_endpoint,
        put_profile_endpoint,
    };

    fn get_test_state() -> ProfileState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        initialize(&connection).expect("Could not initialize database");

        ProfileState {
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    #[tokio::test]
    async fn missing_profile_is_a_404() {
        let state = get_test_state();
        let params = GetProfileParams {
            user: Some("u@x.com".to_owned()),
        };

        let response = get_profile_endpoint(State(state), Query(params))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let state = get_test_state();
        let form = SetProfileForm {
            user: "u@x.com".to_owned(),
            name: Some("Alice".to_owned()),
            avatar_ref: Some("avatars/1".to_owned()),
        };

        let put_response = put_profile_endpoint(State(state.clone()), Json(form))
            .await
            .into_response();
        assert_eq!(put_response.status(), StatusCode::OK);

        let params = GetProfileParams {
            user: Some("u@x.com".to_owned()),
        };
        let get_response = get_profile_endpoint(State(state), Query(params))
            .await
            .into_response();
        assert_eq!(get_response.status(), StatusCode::OK);
    }
}
