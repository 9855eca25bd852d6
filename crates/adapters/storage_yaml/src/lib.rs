//! # lumen-adapter-storage-yaml
//!
//! Scene persistence as a single human-readable YAML file
//! (`<storage dir>/scenes.yaml`), compatible with scene files written by
//! earlier versions of this controller.
//!
//! The whole collection is rewritten on every persist — scenes number in the
//! tens, so durability beats cleverness here. A missing file loads as an
//! empty collection (first boot); a present-but-invalid file is an error.

use std::path::{Path, PathBuf};

use lumen_app::ports::SceneRepository;
use lumen_domain::error::PersistenceError;
use lumen_domain::scene::Scene;

const SCENES_FILE: &str = "scenes.yaml";

/// [`SceneRepository`] backed by a YAML file under a storage directory.
pub struct YamlSceneRepository {
    path: PathBuf,
}

impl YamlSceneRepository {
    /// Repository for `<storage_dir>/scenes.yaml`.
    #[must_use]
    pub fn new(storage_dir: impl AsRef<Path>) -> Self {
        Self {
            path: storage_dir.as_ref().join(SCENES_FILE),
        }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SceneRepository for YamlSceneRepository {
    async fn load(&self) -> Result<Vec<Scene>, PersistenceError> {
        tracing::info!(path = %self.path.display(), "loading scenes");
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no scenes file yet, starting empty");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };
        serde_yaml::from_str(&raw).map_err(|err| PersistenceError::InvalidFormat(err.to_string()))
    }

    async fn persist(&self, scenes: &[Scene]) -> Result<(), PersistenceError> {
        let raw = serde_yaml::to_string(scenes)
            .map_err(|err| PersistenceError::InvalidFormat(err.to_string()))?;
        tokio::fs::write(&self.path, raw).await?;
        tracing::debug!(path = %self.path.display(), count = scenes.len(), "saved scenes");
        Ok(())
    }
}
