//! Advisory spending alerts evaluated after a successful recording.

use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Error,
    budget::get_budget,
    user_key::UserKey,
    wallet::get_total_funds,
};

/// An advisory warning that a category's spending passed its limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetExceededAlert {
    /// The category that went over.
    pub category: String,
    /// The category's new spent total.
    pub spent: f64,
    /// The category's configured limit.
    pub limit: f64,
}

/// An advisory warning that cumulative spending passed the wallet's funds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsufficientFundsAlert {
    /// The user's cumulative spending across all categories.
    pub total_spent: f64,
    /// The wallet's total funds.
    pub total_funds: f64,
}

/// The alert conditions reported to the caller after recording an expense.
///
/// These are client-observable notifications only; nothing is persisted,
/// and a failure to evaluate them never fails the recorded write.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpendingAlerts {
    /// Set when the category's new spent total exceeds its limit.
    pub budget_exceeded: Option<BudgetExceededAlert>,
    /// Set when cumulative spending exceeds the wallet's funds. Only
    /// evaluated when the wallet holds a positive amount.
    pub insufficient_funds: Option<InsufficientFundsAlert>,
}

/// Evaluate both alert conditions for `user` after an expense in `category`.
///
/// # Errors
/// Returns [Error::NotFound] if the category has no budget aggregate (the
/// recorder always creates one, so this indicates a caller bug), or
/// [Error::SqlError] on any other SQL error.
pub fn evaluate_spending_alerts(
    user: &UserKey,
    category: &str,
    connection: &Connection,
) -> Result<SpendingAlerts, Error> {
    let budget = get_budget(user, category, connection)?;

    let budget_exceeded = (budget.spent > budget.limit).then(|| BudgetExceededAlert {
        category: category.to_owned(),
        spent: budget.spent,
        limit: budget.limit,
    });

    let total_spent: f64 = connection
        .prepare("SELECT COALESCE(SUM(spent_amount), 0) FROM budget WHERE user_email = ?1")?
        .query_row([user.as_str()], |row| row.get(0))?;

    let total_funds = get_total_funds(user, connection)?;

    let insufficient_funds = (total_funds > 0.0 && total_spent > total_funds).then(|| {
        InsufficientFundsAlert {
            total_spent,
            total_funds,
        }
    });

    Ok(SpendingAlerts {
        budget_exceeded,
        insufficient_funds,
    })
}
