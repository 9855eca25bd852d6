//! # lumen-domain
//!
//! Pure domain model for the lumen light controller.
//!
//! ## Responsibilities
//! - Foundational types: scene identifiers, error conventions
//! - Define **Lights** (cached bulb state and its read-only snapshot)
//! - Define **Colors** (the HSBK tuple bulbs report and accept)
//! - Define **Scenes** (named, ordered lists of per-bulb target states)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod color;
pub mod error;
pub mod id;
pub mod light;
pub mod scene;
