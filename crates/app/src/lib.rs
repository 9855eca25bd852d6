//! # lumen-app
//!
//! Application layer: port traits describing the IO boundaries (device
//! backend, scene persistence) and the services orchestrating them (light
//! registry, light control, scene CRUD/replay, refresh scheduler).
//!
//! ## Dependency rule
//! Depends only on `lumen-domain`. Adapters implement the ports defined
//! here; the binary crate wires concrete adapters into the services.

pub mod ports;
pub mod scheduler;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;
