//! Request extractors enforcing authentication.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from an access token.

pub mod auth;
