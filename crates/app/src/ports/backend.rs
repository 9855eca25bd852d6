//! Device backend port — discovery and per-bulb control.
//!
//! A backend bridges a concrete bulb protocol (virtual, LAN vendor protocol,
//! …) into the system. The registry drives discovery through
//! [`LightBackend`] and talks to individual bulbs through [`LightHandle`].
//! Timeouts and transport retries are the backend's own business; the
//! application layer only sees a [`CapabilityError`] when a call fails.

use std::future::Future;

use lumen_domain::color::Hsbk;
use lumen_domain::error::CapabilityError;

/// Live power/color observation of one bulb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorReading {
    /// The bulb's advertised label.
    pub label: String,
    /// Reported power.
    pub power: bool,
    /// Reported color.
    pub color: Hsbk,
}

/// Group membership observation of one bulb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupReading {
    /// The group label the bulb belongs to.
    pub label: String,
}

/// Control surface of one discovered bulb.
pub trait LightHandle: Send + Sync + 'static {
    /// Stable hardware address (MAC-like, the registry's lookup key).
    fn address(&self) -> &str;

    /// Query the bulb's current label, power, and color.
    fn color_state(&self)
    -> impl Future<Output = Result<ColorReading, CapabilityError>> + Send;

    /// Query the bulb's group membership.
    fn group(&self) -> impl Future<Output = Result<GroupReading, CapabilityError>> + Send;

    /// Switch the bulb on or off.
    fn set_power(&self, on: bool) -> impl Future<Output = Result<(), CapabilityError>> + Send;

    /// Apply a color, transitioning over `duration_ms` milliseconds.
    fn set_color(
        &self,
        color: Hsbk,
        duration_ms: u32,
    ) -> impl Future<Output = Result<(), CapabilityError>> + Send;
}

/// A pluggable bulb discovery backend.
pub trait LightBackend: Send + Sync + 'static {
    /// The handle type this backend hands out.
    type Handle: LightHandle;

    /// Scan for bulbs, returning a handle per bulb that answered.
    ///
    /// A bulb missing from one scan and present in the next is normal; the
    /// registry never forgets bulbs it has seen.
    fn discover(&self) -> impl Future<Output = Result<Vec<Self::Handle>, CapabilityError>> + Send;
}
