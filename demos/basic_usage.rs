// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the cfghub crate.
//!
//! This example demonstrates:
//! - Building a store with key normalization and value casting
//! - Applying several in-memory sources in order
//! - Reading values with and without defaults
//! - Asking which source set a key
//!
//! To run this example:
//! ```bash
//! cargo run --example basic_usage
//! ```

use cfghub::adapters::standard_with_casting;
use cfghub::prelude::*;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== cfghub: Basic Usage ===\n");

    let mut defaults = ConfigMap::new();
    defaults.insert("app name".into(), "DefaultApp".into());
    defaults.insert("database-port".into(), "3000".into());
    defaults.insert("enable debug".into(), "off".into());
    defaults.insert("log level".into(), ConfigValue::Null);

    let mut store = ConfigStore::builder()
        .name("defaults")
        .preprocessor(standard_with_casting())
        .initial(defaults)
        .build()?;

    println!("--- Example 1: Normalized Keys ---");
    let keys: Vec<&str> = store.keys().map(|k| k.as_str()).collect();
    println!("Keys after defaults: {:?}", keys);

    println!("\n--- Example 2: Overrides ---");
    let mut overrides = ConfigMap::new();
    overrides.insert("DATABASE_PORT".into(), "5432".into());
    overrides.insert("Enable.Debug".into(), "yes".into());
    store.update(overrides)?;
    store.set("api timeout", "30.5")?;

    println!("database.port = {}", store.get_or("database.port", 0.into())?);
    println!("enable.debug  = {}", store.get_or("enable.debug", false.into())?);
    println!("api.timeout   = {}", store.get_or("api.timeout", 10.0.into())?);

    println!("\n--- Example 3: Defaults for Null Values ---");
    let log_level = store.get_or("log level", "info".into())?;
    println!("log.level = {} (stored value is null)", log_level);

    println!("\n--- Example 4: Typed Extraction ---");
    let port: u16 = store.get_as("database port")?;
    println!("database port as u16: {}", port);

    println!("\n--- Example 5: Provenance ---");
    for key in ["APP_NAME", "DATABASE_PORT", "API_TIMEOUT"] {
        if let Some(record) = store.applied_from(key) {
            println!("{} <- {}", key, record);
        }
    }

    println!("\n--- Example 6: Whole Store ---");
    println!("{}", store);

    println!("\n=== Example Complete ===");

    Ok(())
}
