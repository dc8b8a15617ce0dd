//! Nutriflow Library
//!
//! Ingredient catalog, daily intake profile, goal progress and CSV logs.

pub mod build_info;
pub mod config;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod session;
pub mod store;
pub mod tools;
