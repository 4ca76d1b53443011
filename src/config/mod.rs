//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML), or built-in defaults
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ConsoleConfig (validated, immutable)
//!     → cloned into each subsystem at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the contract reference never changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    BlockchainConfig, ConsoleConfig, ExplorerConfig, ListenerConfig, LotteryConfig,
    ObservabilityConfig, SessionConfig,
};
