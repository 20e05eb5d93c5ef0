//! smerkle base primitives and schemas.

/// Digest type and the domain-separated hash primitives.
pub mod base;
/// Serialized configuration models shared across crates.
pub mod schema;
