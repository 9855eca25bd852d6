//! Application services.

pub mod light_service;
pub mod registry;
pub mod scene_service;
