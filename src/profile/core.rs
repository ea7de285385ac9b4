//! Profile storage: display name and avatar reference per user.

use rusqlite::{Connection, Row};
use serde::Serialize;

use crate::{Error, user_key::UserKey};

/// A user's profile.
///
/// The avatar reference is an opaque string pointing into an external blob
/// store; the bytes themselves never pass through this service.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Profile {
    /// The user's display name.
    pub name: Option<String>,
    /// An opaque reference to the user's avatar.
    pub avatar_ref: Option<String>,
}

/// Create the user table.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                email TEXT PRIMARY KEY,
                name TEXT,
                avatar_ref TEXT
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row (name, avatar_ref) to a [Profile].
pub fn map_profile_row(row: &Row) -> Result<Profile, rusqlite::Error> {
    Ok(Profile {
        name: row.get(0)?,
        avatar_ref: row.get(1)?,
    })
}

/// Retrieve the stored profile for `user`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the user has no profile row,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_profile(user: &UserKey, connection: &Connection) -> Result<Profile, Error> {
    let profile = connection
        .prepare("SELECT name, avatar_ref FROM user WHERE email = ?1")?
        .query_row([user.as_str()], map_profile_row)?;

    Ok(profile)
}

/// Create or replace the stored profile for `user`.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn set_profile(
    user: &UserKey,
    profile: &Profile,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO user (email, name, avatar_ref) VALUES (?1, ?2, ?3)
         ON CONFLICT(email) DO UPDATE SET
             name = excluded.name,
             avatar_ref = excluded.avatar_ref",
        (user.as_str(), &profile.name, &profile.avatar_ref),
    )?;

    Ok(())
}
