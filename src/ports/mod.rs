// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that define the seams of the
//! aggregation pipeline. These traits are implemented by adapters in the adapters layer,
//! and closures can stand in for the simple ones.

pub mod conditional;
pub mod constructor;
pub mod file_handler;
pub mod filter;
pub mod preprocessor;
pub mod strategy;

// Re-export commonly used types
pub use conditional::Conditional;
pub use constructor::ValueConstructor;
pub use file_handler::{read_config_file, FileHandler, MAX_CONFIG_FILE_SIZE};
pub use filter::Filter;
pub use preprocessor::Preprocessor;
pub use strategy::MergeStrategy;
