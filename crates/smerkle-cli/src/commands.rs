//! Application command implementations.
//!
//! This module contains the core logic for each CLI subcommand.

mod leaves;
mod proof;
mod settings;
mod tree;

pub use proof::{prove_absence, prove_inclusion};
pub use settings::ConfigOverrides;
pub use tree::{tree_levels, tree_root};

/// Generates and prints the JSON schema for the `TreeConfig` struct.
///
/// # Errors
/// Returns an error if serialization to JSON fails.
#[allow(clippy::print_stdout, reason = "Prints schema to stdout")]
pub fn tree_configuration_schema() -> eyre::Result<()> {
    let schema = schemars::schema_for!(smerkle_core::schema::config::TreeConfig);
    let schema_str = serde_json::to_string_pretty(&schema)?;
    println!("{schema_str}");
    Ok(())
}
