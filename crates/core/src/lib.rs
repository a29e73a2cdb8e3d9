//! Mboa Market Core - Shared types library.
//!
//! This crate provides common types used across all Mboa Market components:
//! - `storefront` - Public-facing marketplace site (buyers and vendors)
//! - `admin` - Moderation and analytics dashboard
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, phone numbers,
//!   and status enums

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
