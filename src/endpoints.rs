//! The API endpoint URIs.

/// The process liveness probe.
pub const HEALTH: &str = "/api/health";
/// The database connectivity probe.
pub const DB_HEALTH: &str = "/api/db-health";
/// The route to read and set the wallet.
pub const WALLET: &str = "/api/wallet";
/// The route to read and update the profile.
pub const PROFILE: &str = "/api/profile";
/// The route to list and create budgets.
pub const BUDGETS: &str = "/api/budgets";
/// The route to update a budget's spending limit.
pub const BUDGET_LIMIT: &str = "/api/budgets/{category}";
/// The route to list and record expenses.
pub const EXPENSES: &str = "/api/expenses";
/// The route to download an expense statement document.
pub const EXPORT_EXPENSES: &str = "/api/expenses/export";
/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";

// These tests are here so that we know the routes will parse as URIs.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::HEALTH);
        assert_endpoint_is_valid_uri(endpoints::DB_HEALTH);
        assert_endpoint_is_valid_uri(endpoints::WALLET);
        assert_endpoint_is_valid_uri(endpoints::PROFILE);
        assert_endpoint_is_valid_uri(endpoints::BUDGETS);
        assert_endpoint_is_valid_uri(endpoints::BUDGET_LIMIT);
        assert_endpoint_is_valid_uri(endpoints::EXPENSES);
        assert_endpoint_is_valid_uri(endpoints::EXPORT_EXPENSES);
        assert_endpoint_is_valid_uri(endpoints::COFFEE);
    }
}
