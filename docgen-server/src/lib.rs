//! # docgen-server
//!
//! HTTP surface of the docgen service, built on axum.
//!
//! ```rust,ignore
//! use docgen_server::{ServerConfig, create_app};
//!
//! let app = create_app(ServerConfig::new(pipeline));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8003").await?;
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod rest;

pub use config::{SecurityConfig, ServerConfig};
pub use error::ApiError;
pub use rest::create_app;

/// Service name reported by `/health`.
pub const SERVICE_NAME: &str = "docgen";
