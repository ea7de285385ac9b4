//! Defines the core ledger model and the transactional expense recorder.

use rusqlite::{Connection, Row};
use serde::Serialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, money::validate_expense_amount, user_key::UserKey};

/// Alias for the integer type used for ledger entry IDs.
pub type ExpenseId = i64;

/// A single entry in the expense ledger.
///
/// Entries are immutable once recorded: there is no update or delete
/// operation, and the per-category `spent` aggregates are incremented in
/// the same transaction that inserts the entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    /// The ID of the ledger entry.
    pub id: ExpenseId,
    /// The key of the user that recorded the entry.
    pub user: String,
    /// How much money was spent.
    pub amount: f64,
    /// The spending category the entry counts against.
    pub category: String,
    /// A text description of what the money was spent on.
    pub description: String,
    /// The calendar date the expense occurred on.
    pub date: Date,
}

/// A validated ledger entry waiting to be recorded.
///
/// Use [NewExpense::new] to validate the raw fields.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// The key of the user recording the entry.
    pub user: UserKey,
    /// How much money was spent, rounded to cents.
    pub amount: f64,
    /// The spending category the entry counts against.
    pub category: String,
    /// A text description of what the money was spent on.
    pub description: String,
    /// The calendar date the expense occurred on.
    pub date: Date,
}

impl NewExpense {
    /// Validate the raw fields for a ledger entry.
    ///
    /// The amount must be finite and positive (it is rounded to cents),
    /// and the category and description must be non-empty after trimming.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount], [Error::EmptyCategory], or
    /// [Error::EmptyDescription] when the corresponding field is unusable.
    pub fn new(
        user: UserKey,
        amount: f64,
        category: &str,
        description: &str,
        date: Date,
    ) -> Result<Self, Error> {
        let amount = validate_expense_amount(amount)?;

        let category = category.trim();
        if category.is_empty() {
            return Err(Error::EmptyCategory);
        }

        let description = description.trim();
        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        Ok(Self {
            user,
            amount,
            category: category.to_owned(),
            description: description.to_owned(),
            date,
        })
    }
}

/// Record `new_expense` in the ledger and fold its amount into the matching
/// budget aggregate as one atomic unit.
///
/// The aggregate upsert creates the (user, category) row with a zero limit
/// when it does not exist yet, and otherwise increments `spent_amount`
/// inside SQL rather than via an application-level read-modify-write, so
/// concurrent recorders for the same category cannot lose an update.
///
/// # Errors
/// Returns [Error::WriteFailed] if either write fails. The transaction is
/// rolled back in full and no partial state persists, so the call is safe
/// to retry.
pub fn record_expense(new_expense: NewExpense, connection: &Connection) -> Result<Expense, Error> {
    let transaction = connection.unchecked_transaction().map_err(write_failed)?;

    let expense = transaction
        .prepare(
            "INSERT INTO expense (user_email, amount, category, description, date)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, user_email, amount, category, description, date",
        )
        .and_then(|mut statement| {
            statement.query_row(
                (
                    new_expense.user.as_str(),
                    new_expense.amount,
                    &new_expense.category,
                    &new_expense.description,
                    new_expense.date,
                ),
                map_expense_row,
            )
        })
        .map_err(write_failed)?;

    transaction
        .execute(
            "INSERT INTO budget (user_email, category, limit_amount, spent_amount)
             VALUES (?1, ?2, 0, ?3)
             ON CONFLICT(user_email, category)
             DO UPDATE SET spent_amount = spent_amount + excluded.spent_amount",
            (
                new_expense.user.as_str(),
                &new_expense.category,
                new_expense.amount,
            ),
        )
        .map_err(write_failed)?;

    // Dropping an uncommitted rusqlite transaction rolls it back, so every
    // early return above leaves the store untouched.
    transaction.commit().map_err(write_failed)?;

    Ok(expense)
}

fn write_failed(error: rusqlite::Error) -> Error {
    tracing::error!("expense recorder transaction failed: {error}");
    Error::WriteFailed
}

/// Create the expense ledger table.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL
/// error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_email TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                description TEXT NOT NULL,
                date TEXT NOT NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('expense', 0)",
        (),
    )?;

    // Composite index used by the statement query and exports.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_user_date ON expense(user_email, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an [Expense].
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    let id = row.get(0)?;
    let user = row.get(1)?;
    let amount = row.get(2)?;
    let category = row.get(3)?;
    let description = row.get(4)?;
    let date = row.get(5)?;

    Ok(Expense {
        id,
        user,
        amount,
        category,
        description,
        date,
    })
}

const ISO_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse an ISO calendar date string like "2024-01-15".
///
/// # Errors
/// Returns [Error::InvalidDate] if `raw` is not a valid calendar date.
pub fn parse_iso_date(raw: &str) -> Result<Date, Error> {
    Date::parse(raw, &ISO_DATE_FORMAT).map_err(|_| Error::InvalidDate(raw.to_owned()))
}



#[cfg(test)]
mod recorder_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        budget::{create_budget, get_budget},
        db::initialize,
        user_key::UserKey,
    };

    use super::{NewExpense, record_expense};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn test_user() -> UserKey {
        UserKey::new("u@x.com").unwrap()
    }

    fn new_expense(amount: f64, category: &str) -> NewExpense {
        NewExpense::new(
            test_user(),
            amount,
            category,
            "test expense",
            date!(2024 - 01 - 15),
        )
        .unwrap()
    }

    #[test]
    fn creates_missing_aggregate_with_zero_limit() {
        let conn = get_test_connection();

        let expense = record_expense(new_expense(45.20, "Food"), &conn).unwrap();

        assert_eq!(expense.id, 1);
        assert_eq!(expense.amount, 45.2);

        let budget = get_budget(&test_user(), "Food", &conn).unwrap();
        assert_eq!(budget.spent, 45.2);
        assert_eq!(budget.limit, 0.0);
    }

    #[test]
    fn increments_existing_aggregate() {
        let conn = get_test_connection();
        create_budget(&test_user(), "Food", 100.0, &conn).unwrap();

        record_expense(new_expense(45.20, "Food"), &conn).unwrap();
        record_expense(new_expense(4.80, "Food"), &conn).unwrap();

        let budget = get_budget(&test_user(), "Food", &conn).unwrap();
        assert_eq!(budget.spent, 50.0);
        assert_eq!(budget.limit, 100.0, "limit must not change on record");
    }

    #[test]
    fn spent_equals_sum_of_recorded_amounts() {
        let conn = get_test_connection();
        let amounts = [1.25, 2.50, 3.75, 10.0, 0.01];

        for amount in amounts {
            record_expense(new_expense(amount, "Transport"), &conn).unwrap();
        }

        let budget = get_budget(&test_user(), "Transport", &conn).unwrap();
        assert_eq!(budget.spent, amounts.iter().sum::<f64>());
    }

    #[test]
    fn categories_do_not_interfere() {
        let conn = get_test_connection();

        record_expense(new_expense(10.0, "Food"), &conn).unwrap();
        record_expense(new_expense(20.0, "Rent"), &conn).unwrap();

        assert_eq!(get_budget(&test_user(), "Food", &conn).unwrap().spent, 10.0);
        assert_eq!(get_budget(&test_user(), "Rent", &conn).unwrap().spent, 20.0);
    }

    #[test]
    fn failed_insert_rolls_back_aggregate() {
        let conn = get_test_connection();
        record_expense(new_expense(10.0, "Food"), &conn).unwrap();

        // Force a constraint violation on the next ledger insert.
        conn.execute(
            "CREATE UNIQUE INDEX idx_expense_description ON expense(description)",
            (),
        )
        .unwrap();

        let result = record_expense(new_expense(99.0, "Food"), &conn);

        assert_eq!(result, Err(Error::WriteFailed));
        let budget = get_budget(&test_user(), "Food", &conn).unwrap();
        assert_eq!(budget.spent, 10.0, "rolled-back write must not count");
    }

    #[test]
    fn ledger_ids_are_monotonic() {
        let conn = get_test_connection();

        let first = record_expense(new_expense(1.0, "Food"), &conn).unwrap();
        let second = record_expense(new_expense(2.0, "Food"), &conn).unwrap();

        assert!(second.id > first.id);
    }
}
