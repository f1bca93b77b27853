//! Custom Axum extractors.
//!
//! Extractors for parsing and validating request data.

pub mod edit_token;

pub use edit_token::{EditToken, EDIT_TOKEN_HEADER};
