//! Bus timing parameters
//!
//! The YMF262 bounds every register write with setup, hold and pulse-width
//! times in the tens-of-nanoseconds range. Real delay primitives round up to
//! whatever granularity the platform timer offers, so all values carry a
//! configurable safety multiplier rather than being used raw.

use crate::{Result, Ymf262Error};

/// Minimum address setup time before a strobe (ns), also applied after
/// switching between address and data mode.
pub const ADDRESS_SETUP_NS: u32 = 100;

/// Minimum data setup time before the write strobe falls (ns)
pub const DATA_SETUP_NS: u32 = 40;

/// Minimum data hold time after the write strobe rises (ns)
pub const DATA_HOLD_NS: u32 = 40;

/// Minimum width of the low write-strobe pulse (ns)
pub const WRITE_PULSE_NS: u32 = 200;

/// Default safety multiplier applied to every delay
pub const DEFAULT_MULTIPLIER: u32 = 4;

/// Timing contract for one register-write transaction
///
/// Values are datasheet minimums; [`RegisterBus`](crate::RegisterBus)
/// requests each one scaled by the multiplier through
/// [`BusIo::delay_ns`](crate::BusIo::delay_ns).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusTimings {
    /// Address/mode setup time in nanoseconds
    pub address_setup_ns: u32,
    /// Data setup time in nanoseconds
    pub data_setup_ns: u32,
    /// Data hold time in nanoseconds
    pub data_hold_ns: u32,
    /// Write-strobe pulse width in nanoseconds
    pub write_pulse_ns: u32,
    multiplier: u32,
}

impl Default for BusTimings {
    fn default() -> Self {
        Self {
            address_setup_ns: ADDRESS_SETUP_NS,
            data_setup_ns: DATA_SETUP_NS,
            data_hold_ns: DATA_HOLD_NS,
            write_pulse_ns: WRITE_PULSE_NS,
            multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

impl BusTimings {
    /// Create timings with the datasheet defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the safety multiplier
    ///
    /// A multiplier of zero would collapse every delay to nothing and is
    /// rejected.
    pub fn with_multiplier(mut self, multiplier: u32) -> Result<Self> {
        if multiplier == 0 {
            return Err(Ymf262Error::Config(
                "timing multiplier must be at least 1".to_string(),
            ));
        }
        self.multiplier = multiplier;
        Ok(self)
    }

    /// The active safety multiplier
    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Scaled address setup delay
    pub fn address_setup(&self) -> u32 {
        self.address_setup_ns.saturating_mul(self.multiplier)
    }

    /// Scaled data setup delay
    pub fn data_setup(&self) -> u32 {
        self.data_setup_ns.saturating_mul(self.multiplier)
    }

    /// Scaled data hold delay
    pub fn data_hold(&self) -> u32 {
        self.data_hold_ns.saturating_mul(self.multiplier)
    }

    /// Scaled write-strobe pulse width
    pub fn write_pulse(&self) -> u32 {
        self.write_pulse_ns.saturating_mul(self.multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_scale_by_multiplier() {
        let t = BusTimings::default();
        assert_eq!(t.address_setup(), ADDRESS_SETUP_NS * DEFAULT_MULTIPLIER);
        assert_eq!(t.write_pulse(), WRITE_PULSE_NS * DEFAULT_MULTIPLIER);
    }

    #[test]
    fn test_custom_multiplier() {
        let t = BusTimings::new().with_multiplier(1).unwrap();
        assert_eq!(t.data_setup(), DATA_SETUP_NS);
        assert_eq!(t.data_hold(), DATA_HOLD_NS);
    }

    #[test]
    fn test_zero_multiplier_rejected() {
        assert!(BusTimings::new().with_multiplier(0).is_err());
    }
}
