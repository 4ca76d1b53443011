//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! Browser form post / API call
//!     → server.rs (router, request ID, tracing, limits)
//!     → session.rs (cookie or header → session ID)
//!     → pages.rs (HTML) | api.rs (JSON)
//!     → lottery / explorer operation
//!     → ui.rs (render page) | error.rs (status + JSON error)
//! ```

pub mod api;
pub mod error;
pub mod pages;
pub mod server;
pub mod session;
pub mod ui;

pub use error::ApiError;
pub use server::{AppState, HttpServer, StartupError};
pub use session::{SESSION_COOKIE, SESSION_HEADER};
