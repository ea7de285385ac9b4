//! One-time schema creation for the application's database.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, budget::create_budget_table, expense::create_expense_table,
    profile::create_user_table, wallet::create_wallet_table,
};

/// Create the tables for the domain models.
///
/// Runs once at process startup, inside a single exclusive transaction,
/// before the server starts accepting traffic. Table creation is
/// idempotent, so calling this on an existing database is a no-op.
///
/// # Errors
/// Returns an error if any table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_wallet_table(&transaction)?;
    create_budget_table(&transaction)?;
    create_expense_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
