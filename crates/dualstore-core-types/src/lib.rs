//! Core types shared across DualStore facilities
//!
//! This crate provides foundational types used by both the error facility
//! and the logging facility:
//!
//! - **Correlation types**: RequestId
//! - **Schema constants**: Canonical field keys, event names and route labels

pub mod correlation;
pub mod schema;

pub use correlation::RequestId;
