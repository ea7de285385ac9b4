//! Wallet storage: the per-user total-funds scalar.

use rusqlite::{Connection, OptionalExtension};

use crate::{Error, user_key::UserKey};

/// Create the wallet table.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub fn create_wallet_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS wallet (
                user_email TEXT PRIMARY KEY,
                total_funds REAL NOT NULL DEFAULT 0
                )",
        (),
    )?;

    Ok(())
}

/// Read the user's total funds.
///
/// A user with no wallet row yet reads as zero rather than not-found.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_total_funds(user: &UserKey, connection: &Connection) -> Result<f64, Error> {
    let total_funds = connection
        .prepare("SELECT total_funds FROM wallet WHERE user_email = ?1")?
        .query_row([user.as_str()], |row| row.get(0))
        .optional()?;

    Ok(total_funds.unwrap_or(0.0))
}

/// Set the user's total funds, replacing any prior value.
///
/// Last write wins; the value is not derived from or merged with the
/// ledger.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn set_total_funds(
    user: &UserKey,
    total_funds: f64,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO wallet (user_email, total_funds) VALUES (?1, ?2)
         ON CONFLICT(user_email) DO UPDATE SET total_funds = excluded.total_funds",
        (user.as_str(), total_funds),
    )?;

    Ok(())
}
