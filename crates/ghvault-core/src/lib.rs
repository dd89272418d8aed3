//! ghvault core - shared functionality for ghvault tools
//!
//! Where things live on disk, and the user settings read from there.

pub mod config;
pub mod paths;

pub use config::{Settings, StorageTier};
pub use paths::Paths;
