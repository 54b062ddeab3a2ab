//! Imeliq Core - Shared domain types.
//!
//! This crate provides the types used across all Imeliq components:
//! - `server` - Public intake endpoints and the admin data API
//! - `cli` - Migrations and offline CSV export
//!
//! # Architecture
//!
//! The core crate contains only types and validation rules - no I/O, no
//! database access, no HTTP. The `postgres` feature adds sqlx encode/decode
//! implementations so the server can bind these types directly.
//!
//! # Modules
//!
//! - [`types`] - Emails, typed IDs, survey/order enums, quantity and pricing

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
