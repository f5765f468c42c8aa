//! Host Framing Protocols
//!
//! Converts between the host byte stream and link-layer frames.
//! Two variants are available, selected once at startup:
//! - KISS: `FEND`-delimited, multiplexed commands
//! - SimpleSerial: raw bytes, boundaries from capacity and idle time

pub mod kiss;
pub mod simple_serial;

use crate::config::TncConfig;
use crate::host::HostTransport;
use crate::link::LinkLayer;
use crate::types::{ProtocolVariant, Ticks};

pub use kiss::Kiss;
pub use simple_serial::{AccumState, SimpleSerial};

/// Host framing protocol capability
///
/// The dispatch loop is written once against this trait.
pub trait HostProtocol {
    /// Reset protocol state before the loop starts
    fn init(&mut self) {}

    /// Feed one host byte
    ///
    /// Returns the length of the frame handed to `link`, if one was.
    fn inbound_byte(&mut self, byte: u8, now: Ticks, link: &mut dyn LinkLayer) -> Option<usize>;

    /// Called on loop iterations where no host byte was available
    ///
    /// Returns the length of the frame handed to `link`, if one was.
    fn idle(&mut self, _now: Ticks, _link: &mut dyn LinkLayer) -> Option<usize> {
        None
    }

    /// Serialize a decoded radio frame to the host
    fn outbound_frame(&mut self, frame: &[u8], host: &mut dyn HostTransport);
}

/// Protocol selected at startup
pub enum Protocol {
    /// KISS framing
    Kiss(Kiss),
    /// SimpleSerial framing
    SimpleSerial(SimpleSerial),
}

impl Protocol {
    /// Build the variant named by the configuration
    #[must_use]
    pub const fn from_config(config: &TncConfig) -> Self {
        match config.protocol {
            ProtocolVariant::Kiss => Self::Kiss(Kiss::new()),
            ProtocolVariant::SimpleSerial => {
                Self::SimpleSerial(SimpleSerial::from_config(config))
            }
        }
    }

    /// Variant tag
    #[must_use]
    pub const fn variant(&self) -> ProtocolVariant {
        match self {
            Self::Kiss(_) => ProtocolVariant::Kiss,
            Self::SimpleSerial(_) => ProtocolVariant::SimpleSerial,
        }
    }

    fn as_dyn(&mut self) -> &mut dyn HostProtocol {
        match self {
            Self::Kiss(p) => p,
            Self::SimpleSerial(p) => p,
        }
    }
}

impl HostProtocol for Protocol {
    fn init(&mut self) {
        self.as_dyn().init();
    }

    fn inbound_byte(&mut self, byte: u8, now: Ticks, link: &mut dyn LinkLayer) -> Option<usize> {
        self.as_dyn().inbound_byte(byte, now, link)
    }

    fn idle(&mut self, now: Ticks, link: &mut dyn LinkLayer) -> Option<usize> {
        self.as_dyn().idle(now, link)
    }

    fn outbound_frame(&mut self, frame: &[u8], host: &mut dyn HostTransport) {
        self.as_dyn().outbound_frame(frame, host);
    }
}
