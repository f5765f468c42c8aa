//! Dispatch Loop
//!
//! The cooperative superloop of the TNC. Each [`Tnc::step`] polls the link
//! layer once, dispatching at most one decoded frame to the host, then
//! consumes at most one host byte. Nothing in a step blocks, so latency in
//! either direction is bounded by one iteration.

use crate::host::HostTransport;
use crate::link::{LinkLayer, Modem};
use crate::protocol::HostProtocol;
use crate::types::Ticks;

/// What one loop iteration did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Step {
    /// A decoded radio frame was written to the host
    pub inbound: bool,
    /// Host byte consumed this iteration
    pub consumed: Option<u8>,
    /// Length of the frame handed to the link layer this iteration
    pub flushed: Option<usize>,
}

impl Step {
    /// Check if the iteration did nothing
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        !self.inbound && self.consumed.is_none() && self.flushed.is_none()
    }
}

/// Running totals since startup
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    /// Radio frames dispatched to the host
    pub frames_to_host: u32,
    /// Frames handed to the link layer
    pub frames_to_radio: u32,
    /// Host bytes consumed
    pub host_bytes: u32,
}

#[cfg(feature = "embedded")]
impl defmt::Format for Counters {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "to_host={} to_radio={} host_bytes={}",
            self.frames_to_host,
            self.frames_to_radio,
            self.host_bytes
        );
    }
}

/// TNC control core
///
/// Owns the link layer, the host transport and the selected protocol.
pub struct Tnc<L, H, P> {
    link: L,
    host: H,
    protocol: P,
    counters: Counters,
}

impl<L, H, P> Tnc<L, H, P>
where
    L: LinkLayer,
    H: HostTransport,
    P: HostProtocol,
{
    /// Assemble a core from initialized collaborators
    ///
    /// `link` must already be bound to its modem; see [`bring_up`] for the
    /// full initialization order.
    pub fn new(link: L, host: H, mut protocol: P) -> Self {
        protocol.init();
        Self {
            link,
            host,
            protocol,
            counters: Counters::default(),
        }
    }

    /// Run one loop iteration at time `now`
    pub fn step(&mut self, now: Ticks) -> Step {
        let mut step = Step::default();

        // Radio to host first: the callback completes before host input
        if let Some(frame) = self.link.poll() {
            self.protocol.outbound_frame(&frame, &mut self.host);
            self.counters.frames_to_host = self.counters.frames_to_host.wrapping_add(1);
            trace!("tnc: {} byte frame to host", frame.len());
            step.inbound = true;
        }

        let byte = if self.host.byte_available() {
            self.host.read_byte_nowait()
        } else {
            None
        };

        step.flushed = match byte {
            Some(byte) => {
                self.counters.host_bytes = self.counters.host_bytes.wrapping_add(1);
                step.consumed = Some(byte);
                self.protocol.inbound_byte(byte, now, &mut self.link)
            }
            None => self.protocol.idle(now, &mut self.link),
        };

        if step.flushed.is_some() {
            self.counters.frames_to_radio = self.counters.frames_to_radio.wrapping_add(1);
        }

        step
    }

    /// Loop forever, reading the time from `clock` before each iteration
    pub fn run(&mut self, mut clock: impl FnMut() -> Ticks) -> ! {
        loop {
            self.step(clock());
        }
    }

    /// Running totals
    #[must_use]
    pub const fn counters(&self) -> &Counters {
        &self.counters
    }

    /// Link layer
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Link layer, mutably
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Host transport
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Host transport, mutably
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Active protocol
    pub fn protocol(&self) -> &P {
        &self.protocol
    }
}

/// Initialize every collaborator in order and assemble the core
///
/// 1. the modem comes up and yields its descriptor;
/// 2. `bind` builds the link layer on that descriptor;
/// 3. the host transport comes up;
/// 4. the protocol is reset.
pub fn bring_up<M, L, H, P>(
    modem: &mut M,
    bind: impl FnOnce(M::Descriptor) -> L,
    mut host: H,
    protocol: P,
) -> Tnc<L, H, P>
where
    M: Modem,
    L: LinkLayer,
    H: HostTransport,
    P: HostProtocol,
{
    let descriptor = modem.init();
    let link = bind(descriptor);
    host.init();
    let tnc = Tnc::new(link, host, protocol);
    info!("tnc: core up");
    tnc
}
