//! Scene — a named, replayable list of per-bulb target states.

use serde::{Deserialize, Serialize};

use crate::color::Hsbk;
use crate::error::ValidationError;
use crate::id::SceneId;

/// One bulb's recorded target state within a scene.
///
/// Field names match the persisted YAML layout, which predates this
/// implementation and is kept compatible with existing scene files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneAction {
    /// Address of the targeted bulb.
    pub mac: String,
    /// Desired power.
    pub state: bool,
    pub brightness: u16,
    pub hue: u16,
    pub saturation: u16,
    pub kelvin: u16,
}

impl SceneAction {
    /// Record a target for `mac` from a live power/color observation.
    #[must_use]
    pub fn capture(mac: impl Into<String>, power: bool, color: Hsbk) -> Self {
        Self {
            mac: mac.into(),
            state: power,
            brightness: color.brightness,
            hue: color.hue,
            saturation: color.saturation,
            kelvin: color.kelvin,
        }
    }

    /// The recorded color as an [`Hsbk`].
    #[must_use]
    pub fn color(&self) -> Hsbk {
        Hsbk {
            hue: self.hue,
            saturation: self.saturation,
            brightness: self.brightness,
            kelvin: self.kelvin,
        }
    }
}

/// A persisted scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    pub id: SceneId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub actions: Vec<SceneAction>,
    /// Display ordering rank.
    #[serde(default)]
    pub order: i32,
}

impl Scene {
    /// Check scene invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] when the name is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(())
    }

    /// Summary view used by the list endpoint.
    #[must_use]
    pub fn summarize(&self) -> SceneSummary {
        SceneSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            order: self.order,
            actions: self.actions.iter().map(|a| a.mac.clone()).collect(),
        }
    }
}

/// Per-scene summary: metadata plus the addresses it touches, without the
/// full action detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSummary {
    pub id: SceneId,
    pub name: String,
    pub description: String,
    pub order: i32,
    /// Addresses referenced by the scene's actions.
    pub actions: Vec<String>,
}

/// Create/modify request body: metadata plus the addresses whose live state
/// should be captured into actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneRequest {
    /// Target scene id; ignored on create.
    #[serde(default, rename = "ID")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub order: i32,
}
