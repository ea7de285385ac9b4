//! Defines the budget aggregate model and its database operations.

use rusqlite::{Connection, Row};
use serde::Serialize;

use crate::{Error, user_key::UserKey};

/// A per-(user, category) spending aggregate.
///
/// `spent` is only ever mutated by the expense recorder's atomic increment;
/// `limit` is set by the budget endpoints. The pair stays consistent with
/// the ledger as long as every ledger write goes through the recorder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Budget {
    /// The category the aggregate tracks.
    pub category: String,
    /// The spending limit configured for the category.
    pub limit: f64,
    /// The running total of spending recorded against the category.
    pub spent: f64,
}

/// Create the budget aggregate table.
///
/// The uniqueness constraint on (user_email, category) backs the
/// duplicate-category conflict and the recorder's upsert.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_email TEXT NOT NULL,
                category TEXT NOT NULL,
                limit_amount REAL NOT NULL DEFAULT 0,
                spent_amount REAL NOT NULL DEFAULT 0,
                UNIQUE(user_email, category)
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('budget', 0)",
        (),
    )?;

    Ok(())
}

/// Map a database row (category, limit_amount, spent_amount) to a [Budget].
pub fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        category: row.get(0)?,
        limit: row.get(1)?,
        spent: row.get(2)?,
    })
}

/// Create a new budget aggregate with nothing spent yet.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateBudget] if the (user, category) pair already exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_budget(
    user: &UserKey,
    category: &str,
    limit: f64,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .prepare(
            "INSERT INTO budget (user_email, category, limit_amount, spent_amount)
             VALUES (?1, ?2, ?3, 0)
             RETURNING category, limit_amount, spent_amount",
        )?
        .query_row((user.as_str(), category, limit), map_budget_row)
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateBudget(category.to_owned()),
            error => error.into(),
        })
}

/// Set the spending limit for (user, category), leaving `spent` untouched.
///
/// Returns the number of rows affected. Zero means the pair does not
/// exist; callers check the count instead of receiving an error.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn update_budget_limit(
    user: &UserKey,
    category: &str,
    limit: f64,
    connection: &Connection,
) -> Result<usize, Error> {
    connection
        .execute(
            "UPDATE budget SET limit_amount = ?1 WHERE user_email = ?2 AND category = ?3",
            (limit, user.as_str(), category),
        )
        .map_err(|error| error.into())
}

/// List the user's budget aggregates ordered by category.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn list_budgets(user: &UserKey, connection: &Connection) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(
            "SELECT category, limit_amount, spent_amount FROM budget \
             WHERE user_email = ?1 ORDER BY category",
        )?
        .query_map([user.as_str()], map_budget_row)?
        .map(|maybe_budget| maybe_budget.map_err(Error::SqlError))
        .collect()
}

/// Retrieve one budget aggregate.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the (user, category) pair does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_budget(
    user: &UserKey,
    category: &str,
    connection: &Connection,
) -> Result<Budget, Error> {
    let budget = connection
        .prepare(
            "SELECT category, limit_amount, spent_amount FROM budget \
             WHERE user_email = ?1 AND category = ?2",
        )?
        .query_row((user.as_str(), category), map_budget_row)?;

    Ok(budget)
}
