//! Shared utilities and common types for the Selka backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Random code and edit token generation, token hashing
//! - Common validation logic

pub mod crypto;
pub mod validation;
