//! # lumen-adapter-virtual
//!
//! Simulated smart bulbs behind the [`LightBackend`] port. Used by the
//! binary as the default backend (no hardware required) and by integration
//! tests, which also use the fault-injection switches to exercise the
//! skip/abort policies of the application layer.

mod bulb;

use std::sync::Arc;

use lumen_app::ports::LightBackend;
use lumen_domain::error::CapabilityError;

pub use bulb::{VirtualBulb, VirtualHandle};

/// A backend over a fixed set of simulated bulbs.
pub struct VirtualBackend {
    bulbs: Vec<Arc<VirtualBulb>>,
}

impl VirtualBackend {
    /// Backend over the given bulbs.
    #[must_use]
    pub fn new(bulbs: Vec<Arc<VirtualBulb>>) -> Self {
        Self { bulbs }
    }

    /// A demo fleet of `count` bulbs with generated addresses, spread over
    /// two groups.
    #[must_use]
    pub fn demo(count: usize) -> Self {
        let bulbs = (0..count)
            .map(|i| {
                let group = if i % 2 == 0 { "Living room" } else { "Office" };
                Arc::new(VirtualBulb::new(
                    format!("d0:73:d5:00:00:{i:02x}"),
                    format!("Virtual bulb {i}"),
                    group,
                ))
            })
            .collect();
        Self { bulbs }
    }

    /// The simulated bulbs, for test scripting.
    #[must_use]
    pub fn bulbs(&self) -> &[Arc<VirtualBulb>] {
        &self.bulbs
    }
}

impl LightBackend for VirtualBackend {
    type Handle = VirtualHandle;

    async fn discover(&self) -> Result<Vec<VirtualHandle>, CapabilityError> {
        Ok(self
            .bulbs
            .iter()
            .map(|bulb| VirtualHandle::new(Arc::clone(bulb)))
            .collect())
    }
}
