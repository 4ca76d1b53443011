//! Lottery Console Library

pub mod blockchain;
pub mod config;
pub mod explorer;
pub mod http;
pub mod lifecycle;
pub mod lottery;
pub mod observability;

pub use config::schema::ConsoleConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
