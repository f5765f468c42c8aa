//! Modem binding
//!
//! The AFSK modem and AX.25 engine run as their own task. The loop reaches
//! them through [`ModemChannels`]: decoded frames come in, frames to key up
//! go out, and the latest host channel parameters are published as a
//! signal. Every operation on the loop side is `try_*` and never waits.
//!
//! The modem task owns the other ends:
//! - pushes CRC-checked frames with [`ModemChannels::decoded_sender`];
//! - keeps draining [`ModemChannels::transmit_receiver`], or host frames
//!   are dropped once `LINK_QUEUE_DEPTH` are waiting;
//! - reads [`ModemChannels::params`] before each channel access.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_sync::signal::Signal;

use crate::config::LINK_QUEUE_DEPTH;
use crate::link::{LinkLayer, Modem};
use crate::types::{ChannelParams, Frame};

type FrameChannel = Channel<CriticalSectionRawMutex, Frame, LINK_QUEUE_DEPTH>;

/// Frame queues shared between the loop and the modem task
pub struct ModemChannels {
    decoded: FrameChannel,
    transmit: FrameChannel,
    params: Signal<CriticalSectionRawMutex, ChannelParams>,
}

impl ModemChannels {
    /// Create empty queues (usable in a `static`)
    #[must_use]
    pub const fn new() -> Self {
        Self {
            decoded: Channel::new(),
            transmit: Channel::new(),
            params: Signal::new(),
        }
    }

    /// Modem side: push frames that passed CRC
    pub fn decoded_sender(
        &'static self,
    ) -> Sender<'static, CriticalSectionRawMutex, Frame, LINK_QUEUE_DEPTH> {
        self.decoded.sender()
    }

    /// Modem side: frames waiting to be transmitted
    pub fn transmit_receiver(
        &'static self,
    ) -> Receiver<'static, CriticalSectionRawMutex, Frame, LINK_QUEUE_DEPTH> {
        self.transmit.receiver()
    }

    /// Modem side: latest channel parameters from the host
    pub fn params(&'static self) -> &'static Signal<CriticalSectionRawMutex, ChannelParams> {
        &self.params
    }
}

impl Default for ModemChannels {
    fn default() -> Self {
        Self::new()
    }
}

/// Loop-side handle to the modem queues
pub struct ModemPort {
    decoded: Receiver<'static, CriticalSectionRawMutex, Frame, LINK_QUEUE_DEPTH>,
    transmit: Sender<'static, CriticalSectionRawMutex, Frame, LINK_QUEUE_DEPTH>,
    params: &'static Signal<CriticalSectionRawMutex, ChannelParams>,
}

impl Modem for &'static ModemChannels {
    type Descriptor = ModemPort;

    fn init(&mut self) -> ModemPort {
        let channels: &'static ModemChannels = *self;
        channels.params.signal(ChannelParams::new());
        ModemPort {
            decoded: channels.decoded.receiver(),
            transmit: channels.transmit.sender(),
            params: &channels.params,
        }
    }
}

/// Link layer bound to a [`ModemPort`]
pub struct ChannelLink {
    port: ModemPort,
}

impl ChannelLink {
    /// Bind to the modem descriptor
    #[must_use]
    pub const fn new(port: ModemPort) -> Self {
        Self { port }
    }
}

impl LinkLayer for ChannelLink {
    fn poll(&mut self) -> Option<Frame> {
        self.port.decoded.try_receive().ok()
    }

    fn send(&mut self, frame: &[u8]) {
        let Ok(frame) = Frame::from_slice(frame) else {
            warn!("modem: {} byte frame too long", frame.len());
            return;
        };
        if self.port.transmit.try_send(frame).is_err() {
            warn!("modem: tx queue full, frame dropped");
        }
    }

    fn set_channel_params(&mut self, params: &ChannelParams) {
        debug!("modem: {}", params);
        self.port.params.signal(*params);
    }
}
