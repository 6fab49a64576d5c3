//! Platform helpers shared by the folder registry and configuration.

pub mod path;
