//! Common error types used across the workspace.
//!
//! Each layer defines failures in terms of these typed sub-errors and
//! converts into the umbrella [`LumenError`] via `#[from]`. Adapters never
//! invent their own error shapes; they construct [`CapabilityError`] or
//! [`PersistenceError`] and let the conversion do the rest.

/// Umbrella error for all fallible operations in the system.
#[derive(Debug, thiserror::Error)]
pub enum LumenError {
    /// A request failed domain validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A referenced light or scene does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// A call into the device backend failed.
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// The scene store could not be read or written.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// A request violated a domain invariant.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Scene names are required and must be non-empty.
    #[error("scene name must not be empty")]
    EmptyName,
}

/// A lookup by identifier found nothing.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} not found: {id}")]
pub struct NotFoundError {
    /// What was looked up (`"light"`, `"scene"`).
    pub kind: &'static str,
    /// The identifier that failed to resolve.
    pub id: String,
}

impl NotFoundError {
    /// Unknown light address.
    #[must_use]
    pub fn light(mac: impl Into<String>) -> Self {
        Self {
            kind: "light",
            id: mac.into(),
        }
    }

    /// Unknown scene id.
    #[must_use]
    pub fn scene(id: impl Into<String>) -> Self {
        Self {
            kind: "scene",
            id: id.into(),
        }
    }
}

/// A device backend call failed (network or device level).
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("device call '{operation}' failed: {detail}")]
pub struct CapabilityError {
    /// The backend operation that failed (`"discover"`, `"set_power"`, …).
    pub operation: &'static str,
    /// Backend-reported detail, already formatted.
    pub detail: String,
}

impl CapabilityError {
    /// Build a capability error for `operation` with the given detail.
    #[must_use]
    pub fn new(operation: &'static str, detail: impl Into<String>) -> Self {
        Self {
            operation,
            detail: detail.into(),
        }
    }
}

/// The scene backing file could not be read, written, or parsed.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// File IO failure.
    #[error("scene store io failure")]
    Io(#[from] std::io::Error),
    /// The file exists but is not a valid scene collection.
    #[error("scene store contains invalid data: {0}")]
    InvalidFormat(String),
}
