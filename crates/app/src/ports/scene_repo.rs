//! Scene repository port — flat-file persistence of the scene collection.

use std::future::Future;

use lumen_domain::error::PersistenceError;
use lumen_domain::scene::Scene;

/// Persistence for the scene collection.
///
/// The contract is whole-collection replacement: every mutation rewrites the
/// backing store from the full in-memory list. There is no incremental
/// update and no cross-process locking; the store assumes a single writer.
pub trait SceneRepository: Send + Sync + 'static {
    /// Load the full scene collection.
    fn load(&self) -> impl Future<Output = Result<Vec<Scene>, PersistenceError>> + Send;

    /// Overwrite the backing store with `scenes`.
    fn persist(&self, scenes: &[Scene])
    -> impl Future<Output = Result<(), PersistenceError>> + Send;
}
