//! Domain types and pure validation logic shared by every crate.
//!
//! This crate has zero internal dependencies so the db, powerbi and api
//! layers can all use it without cycles.

pub mod cron;
pub mod error;
pub mod orchestration;
pub mod roles;
pub mod scope;
pub mod types;
