//! Configuration management for Chainsink.
//!
//! Chainsink uses a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `CHAINSINK_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use chainsink::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("chainsink.toml")?;
//!
//! println!("Chunk size: {}", config.export.chunk_size);
//! for mapping in &config.tables {
//!     println!("{} -> {}", mapping.item_type, mapping.table);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [postgresql]
//! connection_string = "${CHAINSINK_DATABASE_URL}"
//! max_connections = 20
//!
//! [export]
//! chunk_size = 200
//! worker_count = 20
//!
//! [[tables]]
//! item_type = "block"
//! table = "blocks"
//! primary_key = ["number"]
//!
//! [[tables]]
//! item_type = "transaction"
//! table = "transactions"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, ChainsinkConfig, ExportConfig, LoggingConfig, PostgreSQLConfig,
    TableMapping,
};
pub use secret::{secret_string, SecretString, SecretValue};
