// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the configuration hub.
//!
//! The hub is the entry point for aggregating files, streams and in-memory sources into
//! a single store.

pub mod hub;

// Re-export commonly used types
pub use hub::{ConfigHub, ConfigHubBuilder, Input};
