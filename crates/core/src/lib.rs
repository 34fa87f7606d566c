//! Client Directory Core - Shared types library.
//!
//! This crate provides the types shared by the directory components:
//! - `api` - REST service for states, cities, locations, clients and addresses
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. The optional `postgres` feature adds `sqlx`
//! encode/decode impls so the types can be bound directly in queries.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails and normalized names
//! - [`normalize`] - Accent and case folding used for duplicate-name checks

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod normalize;
pub mod types;

pub use normalize::normalize;
pub use types::*;
