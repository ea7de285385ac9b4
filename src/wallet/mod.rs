//! The wallet: a per-user total-funds scalar set independently of the
//! ledger.

pub(crate) mod core;
mod endpoint;

pub use core::{create_wallet_table, get_total_funds, set_total_funds};
pub use endpoint::{get_wallet_endpoint, put_wallet_endpoint};
