//! HTTP route handlers.

pub mod groups;
pub mod health;
pub mod participations;
pub mod reading;
