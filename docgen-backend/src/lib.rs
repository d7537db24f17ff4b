//! # docgen-backend
//!
//! Client for the project backend that supplies project, task, sprint,
//! member, activity and blocker records.
//!
//! [`BackendClient`] implements [`docgen_core::ContextSource`]: the required
//! calls run concurrently and any failure fails the whole fetch, while
//! activity logs and blockers are best-effort. Transient network faults get
//! a single retry; status-code failures never do.

pub mod client;
pub mod config;
pub mod retry;

pub use client::BackendClient;
pub use config::{BACKEND_URL_ENV, BackendConfig, DEFAULT_BACKEND_URL};
pub use retry::{RetryConfig, execute_with_retry};
