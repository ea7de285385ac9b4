//! The profile store: per-user display name and avatar reference.
//!
//! Sign-up and login live in an external authenticator; this module only
//! keeps the key-value user record the rest of the service embeds.

pub(crate) mod core;
mod endpoint;

pub use core::{Profile, create_user_table, get_profile, set_profile};
pub use endpoint::{get_profile_endpoint, put_profile_endpoint};
