/// Database configuration and connection management
pub mod database;

/// Shop settings loading from config.toml
pub mod shop;

/// Staff directory mapping Discord users to operators
pub mod staff;
