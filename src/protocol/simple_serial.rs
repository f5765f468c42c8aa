//! SimpleSerial host framing
//!
//! The host sends raw frame bytes with no delimiter. Frame boundaries are
//! inferred from buffer capacity and, in production mode, from an idle gap;
//! in debug mode a line feed also ends a frame.
//!
//! ```text
//!            byte                    capacity / LF / idle timeout
//!  Idle ─────────────▶ Accumulating ─────────────────────────────▶ ReadyToFlush
//!   ▲                                                                   │
//!   └──────────────────────────── flush (send + reset) ─────────────────┘
//! ```

use heapless::Vec;

use super::HostProtocol;
use crate::config::{TncConfig, FRAME_BUFFER_LEN};
use crate::host::HostTransport;
use crate::link::LinkLayer;
use crate::types::{BuildMode, Ticks};

/// Byte that ends a frame in debug mode
pub const LINE_FEED: u8 = 0x0A;

/// Accumulation state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AccumState {
    /// Nothing buffered
    #[default]
    Idle,
    /// Collecting bytes for the next frame
    Accumulating,
    /// Frame complete, waiting to be handed to the link layer
    ReadyToFlush,
}

#[cfg(feature = "embedded")]
impl defmt::Format for AccumState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Idle => defmt::write!(f, "IDLE"),
            Self::Accumulating => defmt::write!(f, "ACCUMULATING"),
            Self::ReadyToFlush => defmt::write!(f, "READY_TO_FLUSH"),
        }
    }
}

/// SimpleSerial accumulator
///
/// `N` is the buffer size; the frame length limit is `N - 1`, the extra
/// slot holding the byte that fills capacity in production mode.
#[derive(Clone, Debug)]
pub struct SimpleSerial<const N: usize = FRAME_BUFFER_LEN> {
    /// Frame buffer
    buffer: Vec<u8, N>,
    /// Overflow and timeout policy
    mode: BuildMode,
    /// Idle interval before a production flush, in milliseconds
    max_wait_ms: u32,
    /// Arrival time of the newest byte of the current frame
    last_byte_at: Ticks,
    /// Current state
    state: AccumState,
    /// Bytes consumed without being stored (debug mode)
    discarded: u32,
}

impl<const N: usize> SimpleSerial<N> {
    /// Frame length limit
    pub const MAX_FRAME_LEN: usize = N - 1;

    /// Create an accumulator
    #[must_use]
    pub const fn new(mode: BuildMode, max_wait_ms: u32) -> Self {
        Self {
            buffer: Vec::new(),
            mode,
            max_wait_ms,
            last_byte_at: Ticks::ZERO,
            state: AccumState::Idle,
            discarded: 0,
        }
    }

    /// Create an accumulator from the startup configuration
    #[must_use]
    pub const fn from_config(config: &TncConfig) -> Self {
        Self::new(config.mode, config.tx_maxwait_ms)
    }

    /// Get current state
    #[must_use]
    pub const fn state(&self) -> AccumState {
        self.state
    }

    /// Get build mode
    #[must_use]
    pub const fn mode(&self) -> BuildMode {
        self.mode
    }

    /// Bytes buffered for the current frame
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if nothing is buffered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Buffered bytes of the current frame
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Bytes consumed but not stored since startup
    #[must_use]
    pub const fn discarded(&self) -> u32 {
        self.discarded
    }

    /// Time of the newest byte in the current frame
    #[must_use]
    pub const fn last_byte_at(&self) -> Ticks {
        self.last_byte_at
    }

    /// Advance the state machine with one host byte
    ///
    /// Returns the resulting state. Once [`AccumState::ReadyToFlush`] is
    /// returned, further bytes are refused until [`Self::flush`] runs.
    pub fn on_byte(&mut self, byte: u8, now: Ticks) -> AccumState {
        if self.state == AccumState::ReadyToFlush {
            return self.state;
        }

        match self.mode {
            BuildMode::Debug => {
                if self.buffer.len() < Self::MAX_FRAME_LEN && byte != LINE_FEED {
                    self.store(byte, now);
                } else {
                    // The trigger byte ends the frame and is not kept
                    self.discarded += 1;
                    self.state = AccumState::ReadyToFlush;
                }
            }
            BuildMode::Production => {
                self.store(byte, now);
                if self.buffer.len() == N {
                    self.state = AccumState::ReadyToFlush;
                }
            }
        }

        self.state
    }

    /// Advance the state machine on an iteration with no host byte
    ///
    /// In production mode a non-empty frame whose newest byte is older than
    /// the idle interval becomes ready to flush.
    pub fn on_idle(&mut self, now: Ticks) -> AccumState {
        if self.state == AccumState::Accumulating
            && !self.mode.is_debug()
            && now.elapsed_since(self.last_byte_at) > self.max_wait_ms
        {
            self.state = AccumState::ReadyToFlush;
        }
        self.state
    }

    /// Hand a ready frame to the link layer and reset
    ///
    /// Returns the number of bytes sent. Does nothing unless the state is
    /// [`AccumState::ReadyToFlush`]; an empty frame is dropped rather than
    /// sent.
    pub fn flush(&mut self, link: &mut dyn LinkLayer) -> Option<usize> {
        if self.state != AccumState::ReadyToFlush {
            return None;
        }

        let len = self.buffer.len();
        if len > 0 {
            link.send(&self.buffer);
        }
        self.buffer.clear();
        self.state = AccumState::Idle;

        (len > 0).then_some(len)
    }

    fn store(&mut self, byte: u8, now: Ticks) {
        // Production re-arms the idle deadline on every byte
        if self.buffer.is_empty() || !self.mode.is_debug() {
            self.last_byte_at = now;
        }
        // Capacity is checked by the caller
        let _ = self.buffer.push(byte);
        self.state = AccumState::Accumulating;
    }
}

impl<const N: usize> Default for SimpleSerial<N> {
    fn default() -> Self {
        Self::from_config(&TncConfig::DEFAULT)
    }
}

impl<const N: usize> HostProtocol for SimpleSerial<N> {
    fn init(&mut self) {
        self.buffer.clear();
        self.state = AccumState::Idle;
        info!("simple serial: {} mode, {} byte frames", self.mode, Self::MAX_FRAME_LEN);
    }

    fn inbound_byte(&mut self, byte: u8, now: Ticks, link: &mut dyn LinkLayer) -> Option<usize> {
        if self.on_byte(byte, now) == AccumState::ReadyToFlush {
            let sent = self.flush(link);
            trace!("simple serial: flushed {} bytes on byte", sent.unwrap_or(0));
            sent
        } else {
            None
        }
    }

    fn idle(&mut self, now: Ticks, link: &mut dyn LinkLayer) -> Option<usize> {
        if self.on_idle(now) == AccumState::ReadyToFlush {
            let sent = self.flush(link);
            trace!("simple serial: flushed {} bytes on timeout", sent.unwrap_or(0));
            sent
        } else {
            None
        }
    }

    fn outbound_frame(&mut self, frame: &[u8], host: &mut dyn HostTransport) {
        host.write_all(frame);
        if self.mode.is_debug() {
            host.write_all(b"\r\n");
        }
    }
}
