//! JSON Schema generation for the configuration file.

use crate::config::WallflipConfig;

/// Generates a JSON Schema for the wallflip configuration.
#[must_use]
pub fn generate_schema() -> schemars::Schema { schemars::schema_for!(WallflipConfig) }

/// Generates a pretty-printed JSON Schema string for the configuration.
#[must_use]
pub fn generate_schema_json() -> String {
    let schema = generate_schema();
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
