//! In-memory backend fakes shared by the service unit tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use lumen_domain::color::Hsbk;
use lumen_domain::error::CapabilityError;

use crate::ports::{ColorReading, GroupReading, LightBackend, LightHandle};

/// A scriptable simulated bulb. Cloning shares the underlying state.
#[derive(Clone)]
pub struct FakeBulb {
    inner: Arc<BulbInner>,
}

struct BulbInner {
    mac: String,
    label: String,
    group: String,
    live: Mutex<(bool, Hsbk)>,
    fail_state: AtomicBool,
    fail_group: AtomicBool,
    fail_commands: AtomicBool,
    power_calls: Mutex<Vec<bool>>,
    color_calls: Mutex<Vec<(Hsbk, u32)>>,
}

impl FakeBulb {
    pub fn new(mac: &str, label: &str, group: &str) -> Self {
        Self {
            inner: Arc::new(BulbInner {
                mac: mac.to_string(),
                label: label.to_string(),
                group: group.to_string(),
                live: Mutex::new((false, Hsbk::default())),
                fail_state: AtomicBool::new(false),
                fail_group: AtomicBool::new(false),
                fail_commands: AtomicBool::new(false),
                power_calls: Mutex::new(Vec::new()),
                color_calls: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn with_color(self, color: Hsbk) -> Self {
        self.inner.live.lock().unwrap().1 = color;
        self
    }

    pub fn with_power(self, on: bool) -> Self {
        self.inner.live.lock().unwrap().0 = on;
        self
    }

    /// Change what the bulb will report on the next state fetch.
    pub fn set_live(&self, power: bool, color: Hsbk) {
        *self.inner.live.lock().unwrap() = (power, color);
    }

    /// Make state fetches fail (or succeed again).
    pub fn fail_state(&self, fail: bool) {
        self.inner.fail_state.store(fail, Ordering::SeqCst);
    }

    /// Make only group fetches fail, leaving state fetches working.
    pub fn fail_group(&self, fail: bool) {
        self.inner.fail_group.store(fail, Ordering::SeqCst);
    }

    /// Make power/color commands fail (or succeed again).
    pub fn fail_commands(&self, fail: bool) {
        self.inner.fail_commands.store(fail, Ordering::SeqCst);
    }

    /// Every successful `set_power` argument, in call order.
    pub fn power_calls(&self) -> Vec<bool> {
        self.inner.power_calls.lock().unwrap().clone()
    }

    /// Every successful `set_color` argument, in call order.
    pub fn color_calls(&self) -> Vec<(Hsbk, u32)> {
        self.inner.color_calls.lock().unwrap().clone()
    }
}

impl LightHandle for FakeBulb {
    fn address(&self) -> &str {
        &self.inner.mac
    }

    async fn color_state(&self) -> Result<ColorReading, CapabilityError> {
        if self.inner.fail_state.load(Ordering::SeqCst) {
            return Err(CapabilityError::new("color_state", "bulb unreachable"));
        }
        let (power, color) = *self.inner.live.lock().unwrap();
        Ok(ColorReading {
            label: self.inner.label.clone(),
            power,
            color,
        })
    }

    async fn group(&self) -> Result<GroupReading, CapabilityError> {
        if self.inner.fail_group.load(Ordering::SeqCst) {
            return Err(CapabilityError::new("group", "bulb unreachable"));
        }
        Ok(GroupReading {
            label: self.inner.group.clone(),
        })
    }

    async fn set_power(&self, on: bool) -> Result<(), CapabilityError> {
        if self.inner.fail_commands.load(Ordering::SeqCst) {
            return Err(CapabilityError::new("set_power", "bulb unreachable"));
        }
        self.inner.live.lock().unwrap().0 = on;
        self.inner.power_calls.lock().unwrap().push(on);
        Ok(())
    }

    async fn set_color(&self, color: Hsbk, duration_ms: u32) -> Result<(), CapabilityError> {
        if self.inner.fail_commands.load(Ordering::SeqCst) {
            return Err(CapabilityError::new("set_color", "bulb unreachable"));
        }
        self.inner.live.lock().unwrap().1 = color;
        self.inner.color_calls.lock().unwrap().push((color, duration_ms));
        Ok(())
    }
}

/// A backend over a mutable set of [`FakeBulb`]s.
#[derive(Default)]
pub struct FakeBackend {
    bulbs: Mutex<Vec<FakeBulb>>,
    fail_discover: AtomicBool,
}

impl FakeBackend {
    pub fn add(&self, bulb: FakeBulb) {
        self.bulbs.lock().unwrap().push(bulb);
    }

    pub fn clear(&self) {
        self.bulbs.lock().unwrap().clear();
    }

    pub fn fail_discover(&self, fail: bool) {
        self.fail_discover.store(fail, Ordering::SeqCst);
    }
}

impl LightBackend for FakeBackend {
    type Handle = FakeBulb;

    async fn discover(&self) -> Result<Vec<FakeBulb>, CapabilityError> {
        if self.fail_discover.load(Ordering::SeqCst) {
            return Err(CapabilityError::new("discover", "network down"));
        }
        Ok(self.bulbs.lock().unwrap().clone())
    }
}
