//! RocketShoes Core - Shared types library.
//!
//! This crate provides the domain types used across all RocketShoes components:
//! - `cart` - Cart store with inventory validation and local persistence
//! - `cli` - Terminal front-end for the cart store
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, catalog records and the cart line list

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
