//! Database queries for the expense statement and exports.

use rusqlite::{Connection, params_from_iter, types::Value};
use time::Date;

use crate::{Error, pagination, user_key::UserKey};

use super::core::{Expense, map_expense_row};

/// The ledger filter shared by the statement query and the export renderer.
#[derive(Debug, Clone)]
pub struct StatementFilter {
    /// The user whose ledger is being read.
    pub user: UserKey,
    /// The earliest date to include, inclusive.
    pub from: Option<Date>,
    /// The latest date to include, inclusive.
    pub to: Option<Date>,
}

impl StatementFilter {
    /// Read the full ledger for `user` with no date bounds.
    pub fn all(user: UserKey) -> Self {
        Self {
            user,
            from: None,
            to: None,
        }
    }

    fn where_clause(&self) -> (String, Vec<Value>) {
        let mut clauses = vec!["user_email = ?1".to_owned()];
        let mut parameters = vec![Value::Text(self.user.as_str().to_owned())];

        if let Some(from) = self.from {
            clauses.push(format!("date >= ?{}", parameters.len() + 1));
            parameters.push(Value::Text(from.to_string()));
        }

        if let Some(to) = self.to {
            clauses.push(format!("date <= ?{}", parameters.len() + 1));
            parameters.push(Value::Text(to.to_string()));
        }

        (format!("WHERE {}", clauses.join(" AND ")), parameters)
    }
}

/// Count the ledger entries matching `filter`.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn count_expenses(filter: &StatementFilter, connection: &Connection) -> Result<u64, Error> {
    let (where_clause, parameters) = filter.where_clause();
    let query = format!("SELECT COUNT(id) FROM expense {where_clause}");

    connection
        .prepare(&query)?
        .query_row(params_from_iter(parameters.iter()), |row| {
            row.get::<_, i64>(0).map(|count| count as u64)
        })
        .map_err(|error| error.into())
}

/// Get one statement page, newest first.
///
/// Entries are ordered by date descending and then by id descending, so
/// same-date entries have a deterministic total order with the most
/// recently recorded entry first.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_statement_page(
    filter: &StatementFilter,
    page: u64,
    page_size: u64,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    let (where_clause, parameters) = filter.where_clause();
    let offset = pagination::offset(page, page_size);
    let query = format!(
        "SELECT id, user_email, amount, category, description, date FROM expense \
         {where_clause} ORDER BY date DESC, id DESC LIMIT {page_size} OFFSET {offset}"
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(parameters.iter()), map_expense_row)?
        .map(|maybe_expense| maybe_expense.map_err(Error::SqlError))
        .collect()
}

/// Get the full matching ledger slice for an export, newest first.
///
/// Unpaginated by design: a statement document always covers the whole
/// filtered range.
///
/// # Errors
/// Returns [Error::SqlError] if there is an SQL error.
pub fn get_expenses_for_export(
    filter: &StatementFilter,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    let (where_clause, parameters) = filter.where_clause();
    let query = format!(
        "SELECT id, user_email, amount, category, description, date FROM expense \
         {where_clause} ORDER BY date DESC, id DESC"
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(parameters.iter()), map_expense_row)?
        .map(|maybe_expense| maybe_expense.map_err(Error::SqlError))
        .collect()
}
