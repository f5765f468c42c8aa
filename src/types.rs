//! Shared types used across the TNC firmware
//!
//! This module defines domain-specific types that enforce invariants
//! at compile time and provide type safety throughout the codebase.

use core::fmt;

use heapless::Vec;

use crate::config::FRAME_BUFFER_LEN;

/// A complete link-layer frame (address/control fields plus payload)
///
/// Sized for the largest frame either direction can produce.
pub type Frame = Vec<u8, FRAME_BUFFER_LEN>;

/// Monotonic tick counter in milliseconds
///
/// The counter is 32 bits wide and wraps after ~49 days. All comparisons
/// go through [`Ticks::elapsed_since`], which uses wrapping arithmetic, so a
/// roll-over between two snapshots still yields the correct interval.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Ticks(u32);

impl Ticks {
    /// Tick zero
    pub const ZERO: Self = Self(0);

    /// Create a tick value from a millisecond count
    #[must_use]
    pub const fn from_millis(ms: u32) -> Self {
        Self(ms)
    }

    /// Get the raw millisecond count
    #[must_use]
    pub const fn as_millis(self) -> u32 {
        self.0
    }

    /// Milliseconds elapsed from `earlier` to `self`
    #[must_use]
    pub const fn elapsed_since(self, earlier: Self) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// Advance by a number of milliseconds (wrapping)
    #[must_use]
    pub const fn add_millis(self, ms: u32) -> Self {
        Self(self.0.wrapping_add(ms))
    }
}

impl fmt::Debug for Ticks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ticks({} ms)", self.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Ticks {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} ms", self.0);
    }
}

/// Build mode, fixed for the process lifetime
///
/// Alters the SimpleSerial overflow and timeout policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Interactive debugging: line feed flushes, overflow discards
    Debug,
    /// Never drops a byte; flushes on capacity or idle timeout
    #[default]
    Production,
}

impl BuildMode {
    /// Check if this is the debug mode
    #[must_use]
    pub const fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for BuildMode {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Debug => defmt::write!(f, "debug"),
            Self::Production => defmt::write!(f, "production"),
        }
    }
}

/// Host framing protocol variant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ProtocolVariant {
    /// KISS multiplexed framing
    #[default]
    Kiss,
    /// Raw, undelimited single-frame stream
    SimpleSerial,
}

#[cfg(feature = "embedded")]
impl defmt::Format for ProtocolVariant {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Kiss => defmt::write!(f, "KISS"),
            Self::SimpleSerial => defmt::write!(f, "SimpleSerial"),
        }
    }
}

/// Channel access parameters configurable from the host
///
/// The link layer uses these for p-persistent CSMA and key-up timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelParams {
    /// Preamble length before the first flag, in milliseconds
    pub tx_delay_ms: u16,
    /// p-persistence, where p = (persistence + 1) / 256
    pub persistence: u8,
    /// CSMA slot time in milliseconds
    pub slot_time_ms: u16,
    /// Flags sent after the last frame, in milliseconds
    pub tx_tail_ms: u16,
    /// Transmit without waiting for a clear channel
    pub full_duplex: bool,
}

impl ChannelParams {
    /// Default preamble (350 ms)
    pub const DEFAULT_TX_DELAY_MS: u16 = 350;

    /// Default persistence (p = 0.25)
    pub const DEFAULT_PERSISTENCE: u8 = 63;

    /// Default slot time (100 ms)
    pub const DEFAULT_SLOT_TIME_MS: u16 = 100;

    /// Default tail (50 ms)
    pub const DEFAULT_TX_TAIL_MS: u16 = 50;

    /// Create the default parameter set
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tx_delay_ms: Self::DEFAULT_TX_DELAY_MS,
            persistence: Self::DEFAULT_PERSISTENCE,
            slot_time_ms: Self::DEFAULT_SLOT_TIME_MS,
            tx_tail_ms: Self::DEFAULT_TX_TAIL_MS,
            full_duplex: false,
        }
    }
}

impl Default for ChannelParams {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ChannelParams {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "txdelay={}ms p={} slot={}ms tail={}ms fdx={}",
            self.tx_delay_ms,
            self.persistence,
            self.slot_time_ms,
            self.tx_tail_ms,
            self.full_duplex
        );
    }
}
