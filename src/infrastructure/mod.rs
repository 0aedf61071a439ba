//! Infrastructure layer - External dependencies and adapters
//!
//! This layer contains implementations that deal with external concerns
//! like the file system, serialization, and other I/O operations.

pub mod content;
pub mod persistence;

pub use content::*;
pub use persistence::*;
