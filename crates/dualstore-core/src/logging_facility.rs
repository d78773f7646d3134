//! Structured logging facility for DualStore
//!
//! This module provides the canonical logging facility:
//! - Single initialization point via `init(profile)`
//! - Structured lifecycle macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use dualstore_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```
//!
//! ## Logging Ownership
//!
//! Repositories own lifecycle logging for the calls that reach an adapter.
//! The router emits exactly one `routed` debug event per dispatch and never
//! logs start/end pairs, because it does not await the calls it forwards.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{active_profile, init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
