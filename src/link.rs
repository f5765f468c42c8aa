//! Radio link-layer contracts
//!
//! The AFSK modem and the AX.25 engine (flag sync, bit stuffing, CRC,
//! addressing) live outside this crate. The dispatch loop only depends on
//! the two traits below. [`QueueLink`] is an in-memory binding used for
//! host tests and for bridging to a modem running elsewhere.

use heapless::Deque;

use crate::types::{ChannelParams, Frame};

/// Radio modem
///
/// Initialization yields the descriptor the link layer is bound to.
pub trait Modem {
    /// Handle the link layer reads decoded bytes from and writes frames to
    type Descriptor;

    /// Bring up the modem and return its descriptor
    fn init(&mut self) -> Self::Descriptor;
}

/// AX.25 link-layer engine
///
/// Implementations hold a modem descriptor from construction, so a value of
/// this type is always ready to be polled.
pub trait LinkLayer {
    /// Non-blocking poll for a completed, CRC-checked frame
    ///
    /// Yields at most one frame per call.
    fn poll(&mut self) -> Option<Frame>;

    /// Queue a complete frame (address/control fields plus payload) for
    /// transmission
    fn send(&mut self, frame: &[u8]);

    /// Apply host-supplied channel access parameters
    fn set_channel_params(&mut self, _params: &ChannelParams) {}
}

/// Queue-backed link layer
///
/// Inbound frames are queued with [`QueueLink::deliver`]; transmitted frames
/// accumulate until drained with [`QueueLink::take_sent`]. Both queues are
/// bounded; a frame offered to a full queue is dropped and counted.
pub struct QueueLink<const DEPTH: usize> {
    inbound: Deque<Frame, DEPTH>,
    outbound: Deque<Frame, DEPTH>,
    params: ChannelParams,
    dropped: u32,
}

impl<const DEPTH: usize> QueueLink<DEPTH> {
    /// Create an empty link
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inbound: Deque::new(),
            outbound: Deque::new(),
            params: ChannelParams::new(),
            dropped: 0,
        }
    }

    /// Queue a decoded frame as if the modem had just completed it
    ///
    /// Returns `false` if the inbound queue is full or the frame too long.
    pub fn deliver(&mut self, frame: &[u8]) -> bool {
        let Ok(frame) = Frame::from_slice(frame) else {
            self.dropped += 1;
            return false;
        };
        if self.inbound.push_back(frame).is_err() {
            self.dropped += 1;
            return false;
        }
        true
    }

    /// Remove the oldest transmitted frame
    pub fn take_sent(&mut self) -> Option<Frame> {
        self.outbound.pop_front()
    }

    /// Iterate over transmitted frames not yet taken
    pub fn sent(&self) -> impl Iterator<Item = &Frame> {
        self.outbound.iter()
    }

    /// Number of transmitted frames not yet taken
    #[must_use]
    pub fn sent_len(&self) -> usize {
        self.outbound.len()
    }

    /// Number of inbound frames not yet polled
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inbound.len()
    }

    /// Channel parameters last applied by the host
    #[must_use]
    pub const fn params(&self) -> &ChannelParams {
        &self.params
    }

    /// Frames dropped on a full queue
    #[must_use]
    pub const fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl<const DEPTH: usize> Default for QueueLink<DEPTH> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const DEPTH: usize> LinkLayer for QueueLink<DEPTH> {
    fn poll(&mut self) -> Option<Frame> {
        self.inbound.pop_front()
    }

    fn send(&mut self, frame: &[u8]) {
        // Frame buffers are FRAME_BUFFER_LEN long, so only a full queue fails
        let pushed = Frame::from_slice(frame)
            .ok()
            .is_some_and(|f| self.outbound.push_back(f).is_ok());
        if !pushed {
            self.dropped += 1;
            warn!("link: tx queue full, dropped {} byte frame", frame.len());
        }
    }

    fn set_channel_params(&mut self, params: &ChannelParams) {
        self.params = *params;
    }
}
