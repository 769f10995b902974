//! Core types and trait definitions for the Sigh job-hunt tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies;
//! everything else in the workspace depends on it.

pub mod company;
pub mod hunt;
pub mod interaction;
pub mod person;
pub mod report;
pub mod role;
pub mod status;
pub mod store;
pub mod tag;

/// Row identifier. All entities use SQLite integer autoincrement keys.
pub type Id = i64;
