//! The expense ledger: the append-only record of spending, the
//! transactional recorder that keeps budget aggregates consistent with it,
//! and the paginated statement view.

pub(crate) mod alerts;
pub(crate) mod core;
mod create_endpoint;
mod list_endpoint;
pub(crate) mod query;

pub use alerts::{BudgetExceededAlert, InsufficientFundsAlert, SpendingAlerts};
pub use core::{Expense, ExpenseId, NewExpense, create_expense_table, parse_iso_date,
    record_expense};
pub use create_endpoint::create_expense_endpoint;
pub use list_endpoint::get_statement_endpoint;
pub use query::{StatementFilter, count_expenses, get_expenses_for_export, get_statement_page};
