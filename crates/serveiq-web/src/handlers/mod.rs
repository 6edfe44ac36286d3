//! HTTP handlers for all web routes.

pub mod data;
pub mod system;
