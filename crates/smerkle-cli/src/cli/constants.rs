//! Shared constants for CLI.

// -------------------------
// Environment variables
// -------------------------

pub const SMERKLE_CONFIG_FILE: &str = "SMERKLE_CONFIG_FILE";
pub const SMERKLE_LEAVES_FILE: &str = "SMERKLE_LEAVES_FILE";
pub const SMERKLE_HASH: &str = "SMERKLE_HASH";
pub const SMERKLE_LEAF_ENCODING: &str = "SMERKLE_LEAF_ENCODING";
pub const SMERKLE_PARALLEL: &str = "SMERKLE_PARALLEL";

// -------------------------
// Default values
// -------------------------

pub const DEFAULT_LEAVES_FILE: &str = "leaves.txt";
