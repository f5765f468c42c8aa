//! System configuration and build constants
//!
//! This module defines compile-time constants for the TNC firmware.
//! Frame sizes, timeouts, serial parameters and pin mappings are
//! centralized here; [`TncConfig`] carries the startup selection that the
//! dispatch loop is built from.

use crate::types::{BuildMode, ProtocolVariant};

/// Largest AX.25 frame handled by the link layer, in bytes
pub const MAX_FRAME_LEN: usize = 330;

/// Frame buffer size (one extra byte admits the capacity-filling byte in
/// production mode)
pub const FRAME_BUFFER_LEN: usize = MAX_FRAME_LEN + 1;

/// Idle interval before a production-mode SimpleSerial flush, in milliseconds
pub const TX_MAXWAIT_MS: u32 = 2;

/// Longest accepted idle interval (wrapping tick comparison limit)
pub const TX_MAXWAIT_LIMIT_MS: u32 = u32::MAX / 2;

/// Default build mode
pub const DEFAULT_BUILD_MODE: BuildMode = BuildMode::Production;

/// Default host framing protocol
pub const DEFAULT_PROTOCOL: ProtocolVariant = ProtocolVariant::Kiss;

/// Host serial baud rate
pub const HOST_BAUD_RATE: u32 = 9600;

/// Host UART receive buffer size (filled by interrupt)
pub const HOST_RX_BUFFER_SIZE: usize = 128;

/// Longest host encoding of one frame: every byte KISS-escaped, framed by
/// `FEND`, command byte and `FEND`
pub const MAX_ENCODED_FRAME_LEN: usize = 2 * FRAME_BUFFER_LEN + 3;

/// Host UART transmit buffer size (drained by interrupt)
///
/// Holds the frame still draining plus one worst-case frame, so queuing a
/// frame never waits on the UART.
pub const HOST_TX_BUFFER_SIZE: usize = 2 * MAX_ENCODED_FRAME_LEN;

/// Frames buffered in each direction between the loop and the modem task
pub const LINK_QUEUE_DEPTH: usize = 2;

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the schematic

    /// Status LED, lit once initialization completes
    pub const LED_STATUS: &str = "PA5";

    /// Host UART TX (USART2)
    pub const HOST_TX: &str = "PA2";

    /// Host UART RX (USART2)
    pub const HOST_RX: &str = "PA3";
}

/// Startup configuration errors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Production mode needs a nonzero idle interval
    ZeroMaxWait,
    /// Idle interval exceeds the wrapping tick comparison range
    MaxWaitTooLong(u32),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ZeroMaxWait => write!(f, "TX max wait must be nonzero in production mode"),
            Self::MaxWaitTooLong(ms) => {
                write!(f, "TX max wait {ms} ms exceeds {TX_MAXWAIT_LIMIT_MS} ms")
            }
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for ConfigError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::ZeroMaxWait => defmt::write!(f, "ZeroMaxWait"),
            Self::MaxWaitTooLong(ms) => defmt::write!(f, "MaxWaitTooLong({} ms)", ms),
        }
    }
}

/// Startup configuration, immutable once the loop is running
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TncConfig {
    /// Active host framing protocol
    pub protocol: ProtocolVariant,
    /// Overflow and timeout policy
    pub mode: BuildMode,
    /// Production-mode idle flush interval in milliseconds
    pub tx_maxwait_ms: u32,
}

impl TncConfig {
    /// Configuration built from the compile-time defaults
    pub const DEFAULT: Self = Self {
        protocol: DEFAULT_PROTOCOL,
        mode: DEFAULT_BUILD_MODE,
        tx_maxwait_ms: TX_MAXWAIT_MS,
    };

    /// Select the protocol variant
    #[must_use]
    pub const fn with_protocol(self, protocol: ProtocolVariant) -> Self {
        Self { protocol, ..self }
    }

    /// Select the build mode
    #[must_use]
    pub const fn with_mode(self, mode: BuildMode) -> Self {
        Self { mode, ..self }
    }

    /// Set the idle flush interval
    #[must_use]
    pub const fn with_tx_maxwait_ms(self, tx_maxwait_ms: u32) -> Self {
        Self {
            tx_maxwait_ms,
            ..self
        }
    }

    /// Check the startup contract
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the idle interval is zero in production
    /// mode or too long to compare with wrapping ticks.
    pub const fn validate(self) -> Result<Self, ConfigError> {
        if self.tx_maxwait_ms > TX_MAXWAIT_LIMIT_MS {
            return Err(ConfigError::MaxWaitTooLong(self.tx_maxwait_ms));
        }
        if self.tx_maxwait_ms == 0 && !self.mode.is_debug() {
            return Err(ConfigError::ZeroMaxWait);
        }
        Ok(self)
    }
}

impl Default for TncConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
