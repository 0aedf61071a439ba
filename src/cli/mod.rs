//! Command-line interface modules

pub mod play;
