//! Domain layer for the Selka backend.
//!
//! This crate contains:
//! - Domain models (Group, Participation, hizb index, Quran text)
//! - Business logic services (slot allocation, reference data parsing)
//! - Domain error types

pub mod models;
pub mod services;
