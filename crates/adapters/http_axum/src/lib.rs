//! # lumen-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the JSON API for lights and scenes (`/api/lights`, `/api/scenes`)
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map application errors into HTTP status codes
//!
//! ## Dependency rule
//! Depends on `lumen-app` (port traits and services) and `lumen-domain`
//! (types used in request/response mapping). Never leaks axum types into
//! the domain.

pub mod api;
mod error;
pub mod router;
pub mod state;
