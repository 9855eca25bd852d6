//! Light state — the cached view of one bulb, and its external projection.

use serde::{Deserialize, Serialize};

use crate::color::Hsbk;

/// Mutable, last-observed fields of one bulb.
///
/// Owned by the registry; every read-modify-write goes through the owning
/// light's guard. The bulb's hardware address is deliberately *not* part of
/// this struct — it is immutable and lives beside the guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightState {
    /// Last-known human label.
    pub name: String,
    /// Last known or applied power.
    pub power: bool,
    /// Last-known color.
    pub color: Hsbk,
    /// Last-known group label.
    pub group: String,
}

/// Read-only projection of a light for external consumption.
///
/// JSON field names match the wire format the HTTP API has always served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightSnapshot {
    /// Stable hardware address, the lookup key.
    pub mac: String,
    pub name: String,
    /// Power state.
    pub state: bool,
    pub colour: Hsbk,
    pub group: String,
}

impl LightSnapshot {
    /// Project a cached state into a snapshot for the given address.
    #[must_use]
    pub fn project(mac: &str, state: &LightState) -> Self {
        Self {
            mac: mac.to_string(),
            name: state.name.clone(),
            state: state.power,
            colour: state.color,
            group: state.group.clone(),
        }
    }
}
