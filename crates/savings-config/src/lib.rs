//! savings-config
//!
//! User preferences for Sunny Savings: where plans are stored, under which
//! key, and how many plan backups are kept. Owns the Config model and the
//! config file on disk.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::Config;
