//! Domain model persisted through the schema helpers.

pub mod stamp;
