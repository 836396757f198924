//! Downbar — a live, continuously-reconciled downloads panel engine.
//!
//! This library crate exposes all modules for use by a rendering layer and
//! the integration tests.

pub mod classify;
pub mod format;
pub mod host;
pub mod managers;
pub mod types;
