// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multi-source aggregation example for the cfghub crate.
//!
//! This example demonstrates:
//! - Enumerated defaults with declared value types
//! - Aggregating a YAML file, environment variables and CLI arguments
//! - Recursive merging of nested sections
//! - Inspecting the provenance history
//!
//! To run this example:
//! ```bash
//! export DEMO_LOG_LEVEL=debug
//! cargo run --example multi_source -- --port 9090 --verbose
//! ```

use cfghub::adapters::standard_with_casting;
use cfghub::prelude::*;
use std::io::Write;

struct ServerDefaults;

impl ConfigEnum for ServerDefaults {
    fn schema() -> ConfigSchema {
        ConfigSchema::new("ServerDefaults")
            .entry("host", "127.0.0.1")
            .typed_entry("port", 8080, "int")
            .entry("log level", "info")
            .entry("verbose", false)
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== cfghub: Multi-Source Aggregation ===\n");

    // A file that would normally live next to the application
    let dir = tempfile::tempdir()?;
    let yaml_path = dir.path().join("config.yaml");
    let mut file = std::fs::File::create(&yaml_path)?;
    writeln!(file, "host: 0.0.0.0")?;
    writeln!(file, "database:")?;
    writeln!(file, "  host: localhost")?;
    writeln!(file, "  pool: 4")?;

    let mut local = ConfigMap::new();
    let mut database = ConfigMap::new();
    database.insert("pool".into(), 16.into());
    local.insert("database".into(), database.into());

    let target = ConfigStore::builder()
        .initial(ConfigSource::from_enum::<ServerDefaults>())
        .preprocessor(standard_with_casting())
        .strategy(RecursiveStrategy::new())
        .none_considered_empty(true)
        .build()?;

    let hub = ConfigHub::new();
    let store = hub.aggregate_into(
        vec![
            Input::from(yaml_path.clone()),
            Input::from(local),
            ConfigSource::from(EnvVarAdapter::with_prefix("DEMO_")).into(),
            ConfigSource::from(ArgNamespace::from_env_args()).into(),
        ],
        target,
    )?;

    println!("--- Resolved Values ---");
    for (key, value) in &store {
        println!("{:<12} = {}", key, value);
    }

    println!("\n--- Provenance ---");
    for key in ["HOST", "PORT", "LOG_LEVEL", "DATABASE"] {
        match store.applied_from(key) {
            Some(record) => println!("{:<10} <- {}", key, record),
            None => println!("{:<10} <- (not set)", key),
        }
    }

    println!("\n--- History ---");
    for record in store.applied_confs() {
        println!("{}", record);
    }

    if let Ok(path) = ConfigHub::default_config_path("demo", "com.example", "config.yaml") {
        println!("\nDefault config location: {}", path.display());
    }

    println!("\n=== Example Complete ===");

    Ok(())
}
