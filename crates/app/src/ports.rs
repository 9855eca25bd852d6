//! Port traits — the IO boundaries of the application layer.

mod backend;
mod scene_repo;

pub use backend::{ColorReading, GroupReading, LightBackend, LightHandle};
pub use scene_repo::SceneRepository;
