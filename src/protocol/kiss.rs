//! KISS host framing
//!
//! Frames are delimited by `FEND`; the first byte of each frame is the
//! command (high nibble = port, ignored). `FEND` and `FESC` inside a frame
//! are escaped as `FESC TFEND` and `FESC TFESC`.

use heapless::Vec;

use super::HostProtocol;
use crate::config::MAX_FRAME_LEN;
use crate::host::HostTransport;
use crate::link::LinkLayer;
use crate::types::{ChannelParams, Ticks};

/// Frame end
pub const FEND: u8 = 0xC0;
/// Frame escape
pub const FESC: u8 = 0xDB;
/// Transposed frame end
pub const TFEND: u8 = 0xDC;
/// Transposed frame escape
pub const TFESC: u8 = 0xDD;

/// KISS command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KissCommand {
    /// Frame payload
    Data,
    /// Preamble length in 10 ms units
    TxDelay,
    /// Persistence parameter
    Persistence,
    /// Slot time in 10 ms units
    SlotTime,
    /// Tail length in 10 ms units
    TxTail,
    /// Full duplex on/off
    FullDuplex,
    /// Hardware-specific setting
    SetHardware,
    /// Any other command nibble
    Unknown(u8),
}

impl KissCommand {
    /// Decode a command byte, dropping the port nibble
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte & 0x0F {
            0x00 => Self::Data,
            0x01 => Self::TxDelay,
            0x02 => Self::Persistence,
            0x03 => Self::SlotTime,
            0x04 => Self::TxTail,
            0x05 => Self::FullDuplex,
            0x06 => Self::SetHardware,
            other => Self::Unknown(other),
        }
    }

    /// Command nibble
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Data => 0x00,
            Self::TxDelay => 0x01,
            Self::Persistence => 0x02,
            Self::SlotTime => 0x03,
            Self::TxTail => 0x04,
            Self::FullDuplex => 0x05,
            Self::SetHardware => 0x06,
            Self::Unknown(b) => b,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for KissCommand {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Data => defmt::write!(f, "DATA"),
            Self::TxDelay => defmt::write!(f, "TXDELAY"),
            Self::Persistence => defmt::write!(f, "P"),
            Self::SlotTime => defmt::write!(f, "SLOTTIME"),
            Self::TxTail => defmt::write!(f, "TXTAIL"),
            Self::FullDuplex => defmt::write!(f, "FULLDUPLEX"),
            Self::SetHardware => defmt::write!(f, "SETHARDWARE"),
            Self::Unknown(b) => defmt::write!(f, "UNKNOWN({=u8:#x})", b),
        }
    }
}

/// KISS decoder/encoder
pub struct Kiss {
    /// Payload of the data frame being received
    buffer: Vec<u8, MAX_FRAME_LEN>,
    /// Between an opening and closing FEND
    in_frame: bool,
    /// Previous byte was FESC
    escape: bool,
    /// Command of the current frame, once seen
    command: Option<KissCommand>,
    /// Channel access parameters set by the host
    params: ChannelParams,
}

impl Kiss {
    /// Create a decoder with default channel parameters
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            in_frame: false,
            escape: false,
            command: None,
            params: ChannelParams::new(),
        }
    }

    /// Channel access parameters set by the host
    #[must_use]
    pub const fn params(&self) -> &ChannelParams {
        &self.params
    }

    /// Check if a frame is open
    #[must_use]
    pub const fn in_frame(&self) -> bool {
        self.in_frame
    }

    /// Payload bytes of the open data frame
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        &self.buffer
    }

    /// Feed one host byte
    ///
    /// Returns the payload length handed to the link layer when a data
    /// frame closes.
    pub fn feed(&mut self, byte: u8, link: &mut dyn LinkLayer) -> Option<usize> {
        if byte == FEND {
            let sent = self.close_frame(link);
            // Every FEND also opens the next frame
            self.in_frame = true;
            self.escape = false;
            self.command = None;
            self.buffer.clear();
            return sent;
        }

        if !self.in_frame {
            return None;
        }

        let Some(command) = self.command else {
            self.command = Some(KissCommand::from_byte(byte));
            return None;
        };

        match command {
            KissCommand::Data => self.push_data(byte),
            KissCommand::TxDelay => {
                self.params.tx_delay_ms = u16::from(byte) * 10;
                link.set_channel_params(&self.params);
            }
            KissCommand::Persistence => {
                self.params.persistence = byte;
                link.set_channel_params(&self.params);
            }
            KissCommand::SlotTime => {
                self.params.slot_time_ms = u16::from(byte) * 10;
                link.set_channel_params(&self.params);
            }
            KissCommand::TxTail => {
                self.params.tx_tail_ms = u16::from(byte) * 10;
                link.set_channel_params(&self.params);
            }
            KissCommand::FullDuplex => {
                self.params.full_duplex = byte != 0;
                link.set_channel_params(&self.params);
            }
            KissCommand::SetHardware | KissCommand::Unknown(_) => {}
        }

        None
    }

    fn push_data(&mut self, byte: u8) {
        if byte == FESC {
            self.escape = true;
            return;
        }

        let byte = if self.escape {
            self.escape = false;
            match byte {
                TFEND => FEND,
                TFESC => FESC,
                other => other,
            }
        } else {
            byte
        };

        // Bytes past the frame limit are dropped
        let _ = self.buffer.push(byte);
    }

    fn close_frame(&mut self, link: &mut dyn LinkLayer) -> Option<usize> {
        if !self.in_frame || self.buffer.is_empty() {
            return None;
        }
        match self.command {
            Some(KissCommand::Data) => {
                link.send(&self.buffer);
                debug!("kiss: {} byte frame to radio", self.buffer.len());
                Some(self.buffer.len())
            }
            _ => None,
        }
    }
}

impl Default for Kiss {
    fn default() -> Self {
        Self::new()
    }
}

impl HostProtocol for Kiss {
    fn init(&mut self) {
        *self = Self::new();
        info!("kiss: ready, {}", self.params);
    }

    fn inbound_byte(&mut self, byte: u8, _now: Ticks, link: &mut dyn LinkLayer) -> Option<usize> {
        self.feed(byte, link)
    }

    fn outbound_frame(&mut self, frame: &[u8], host: &mut dyn HostTransport) {
        write_frame(frame, host);
    }
}

/// Write `frame` to the host as a KISS data frame on port 0
pub fn write_frame(frame: &[u8], host: &mut dyn HostTransport) {
    host.write_byte(FEND);
    host.write_byte(KissCommand::Data.as_byte());
    for &byte in frame {
        match byte {
            FEND => {
                host.write_byte(FESC);
                host.write_byte(TFEND);
            }
            FESC => {
                host.write_byte(FESC);
                host.write_byte(TFESC);
            }
            other => host.write_byte(other),
        }
    }
    host.write_byte(FEND);
}
