// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing the stock implementations of the ports.
//!
//! This module contains the preprocessors, filters and merge strategies a store is
//! wired with, the file handlers used by the hub, and the environment and argument
//! namespace sources. Format- and source-specific adapters are gated behind features.

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "dotenv")]
pub mod dotenv_file;
#[cfg(feature = "env")]
pub mod env_var;
pub mod filters;
pub mod flat_strategy;
pub mod json_file;
pub mod preprocessors;
pub mod recursive_strategy;
pub mod typed_value;
#[cfg(feature = "yaml")]
pub mod yaml_file;

// Re-export adapters based on feature flags
#[cfg(feature = "cli")]
pub use cli::ArgNamespace;
#[cfg(feature = "dotenv")]
pub use dotenv_file::DotEnvFileHandler;
#[cfg(feature = "env")]
pub use env_var::EnvVarAdapter;
#[cfg(feature = "yaml")]
pub use yaml_file::YamlFileHandler;

pub use filters::{AcceptAll, KeyFilter, PredicateFilter};
pub use flat_strategy::FlatStrategy;
pub use json_file::JsonFileHandler;
pub use preprocessors::{
    standard_with_casting, CastingPreprocessor, ChainPreprocessor, IdentityPreprocessor,
    RenamePreprocessor, StandardPreprocessor,
};
pub use recursive_strategy::RecursiveStrategy;
pub use typed_value::{ObjectType, TypedValueConstructor};
