//! Virtual bulb — simulated state plus fault-injection switches.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use lumen_app::ports::{ColorReading, GroupReading, LightHandle};
use lumen_domain::color::Hsbk;
use lumen_domain::error::CapabilityError;

/// A simulated smart bulb.
///
/// Commands mutate the simulated state the same way a real bulb would, so a
/// later state query reports what was applied. The `fail_*` switches make
/// the bulb unreachable for queries or commands respectively.
pub struct VirtualBulb {
    mac: String,
    label: String,
    group: String,
    state: Mutex<(bool, Hsbk)>,
    fail_state: AtomicBool,
    fail_commands: AtomicBool,
}

impl VirtualBulb {
    /// A bulb that starts switched off with a default color.
    #[must_use]
    pub fn new(mac: impl Into<String>, label: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            mac: mac.into(),
            label: label.into(),
            group: group.into(),
            state: Mutex::new((false, Hsbk::default())),
            fail_state: AtomicBool::new(false),
            fail_commands: AtomicBool::new(false),
        }
    }

    /// Override the simulated power/color, as if the bulb changed out of
    /// band (a wall switch, another controller).
    pub fn set_reported(&self, power: bool, color: Hsbk) {
        *self.lock_state() = (power, color);
    }

    /// The currently simulated power/color.
    #[must_use]
    pub fn reported(&self) -> (bool, Hsbk) {
        *self.lock_state()
    }

    /// Make state queries fail (or succeed again).
    pub fn fail_state(&self, fail: bool) {
        self.fail_state.store(fail, Ordering::SeqCst);
    }

    /// Make power/color commands fail (or succeed again).
    pub fn fail_commands(&self, fail: bool) {
        self.fail_commands.store(fail, Ordering::SeqCst);
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, (bool, Hsbk)> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Backend handle over a shared [`VirtualBulb`].
///
/// The backend hands these out from discovery; the bulb itself stays
/// accessible through [`VirtualBackend::bulbs`](crate::VirtualBackend::bulbs)
/// so tests can script it while the registry holds the handle.
#[derive(Clone)]
pub struct VirtualHandle(Arc<VirtualBulb>);

impl VirtualHandle {
    /// Handle controlling the given bulb.
    #[must_use]
    pub fn new(bulb: Arc<VirtualBulb>) -> Self {
        Self(bulb)
    }
}

impl LightHandle for VirtualHandle {
    fn address(&self) -> &str {
        &self.0.mac
    }

    async fn color_state(&self) -> Result<ColorReading, CapabilityError> {
        if self.0.fail_state.load(Ordering::SeqCst) {
            return Err(CapabilityError::new("color_state", "virtual bulb unreachable"));
        }
        let (power, color) = *self.0.lock_state();
        Ok(ColorReading {
            label: self.0.label.clone(),
            power,
            color,
        })
    }

    async fn group(&self) -> Result<GroupReading, CapabilityError> {
        if self.0.fail_state.load(Ordering::SeqCst) {
            return Err(CapabilityError::new("group", "virtual bulb unreachable"));
        }
        Ok(GroupReading {
            label: self.0.group.clone(),
        })
    }

    async fn set_power(&self, on: bool) -> Result<(), CapabilityError> {
        if self.0.fail_commands.load(Ordering::SeqCst) {
            return Err(CapabilityError::new("set_power", "virtual bulb unreachable"));
        }
        self.0.lock_state().0 = on;
        Ok(())
    }

    async fn set_color(&self, color: Hsbk, _duration_ms: u32) -> Result<(), CapabilityError> {
        if self.0.fail_commands.load(Ordering::SeqCst) {
            return Err(CapabilityError::new("set_color", "virtual bulb unreachable"));
        }
        self.0.lock_state().1 = color;
        Ok(())
    }
}
