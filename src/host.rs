//! Host serial transport
//!
//! The UART driver and its interrupt buffering are external; the loop sees
//! a non-blocking byte interface. [`BufferedHost`] mirrors that interface
//! with bounded in-memory queues for host tests.

use heapless::Deque;

/// Non-blocking host byte stream
pub trait HostTransport {
    /// Bring up the transport
    fn init(&mut self) {}

    /// Check whether a received byte is waiting
    fn byte_available(&mut self) -> bool;

    /// Take one received byte without waiting
    fn read_byte_nowait(&mut self) -> Option<u8>;

    /// Queue one byte towards the host
    fn write_byte(&mut self, byte: u8);

    /// Queue a run of bytes towards the host
    fn write_all(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.write_byte(byte);
        }
    }
}

/// Queue-backed host transport
///
/// `RX` bytes may wait to be read, `TX` bytes may wait to be drained.
/// Overflow in either direction drops the byte, as a UART FIFO would.
pub struct BufferedHost<const RX: usize, const TX: usize> {
    rx: Deque<u8, RX>,
    tx: Deque<u8, TX>,
    overruns: u32,
}

impl<const RX: usize, const TX: usize> BufferedHost<RX, TX> {
    /// Create an empty transport
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rx: Deque::new(),
            tx: Deque::new(),
            overruns: 0,
        }
    }

    /// Push bytes as if the host had just sent them
    ///
    /// Returns the number of bytes accepted.
    pub fn receive(&mut self, data: &[u8]) -> usize {
        let mut accepted = 0;
        for &byte in data {
            if self.rx.push_back(byte).is_err() {
                self.overruns += 1;
            } else {
                accepted += 1;
            }
        }
        accepted
    }

    /// Drain everything written towards the host
    pub fn drain_tx(&mut self) -> impl Iterator<Item = u8> + '_ {
        core::iter::from_fn(move || self.tx.pop_front())
    }

    /// Bytes waiting to be read
    #[must_use]
    pub fn rx_len(&self) -> usize {
        self.rx.len()
    }

    /// Bytes waiting to be drained
    #[must_use]
    pub fn tx_len(&self) -> usize {
        self.tx.len()
    }

    /// Bytes dropped on a full queue
    #[must_use]
    pub const fn overruns(&self) -> u32 {
        self.overruns
    }
}

impl<const RX: usize, const TX: usize> Default for BufferedHost<RX, TX> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const RX: usize, const TX: usize> HostTransport for BufferedHost<RX, TX> {
    fn byte_available(&mut self) -> bool {
        !self.rx.is_empty()
    }

    fn read_byte_nowait(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn write_byte(&mut self, byte: u8) {
        if self.tx.push_back(byte).is_err() {
            self.overruns += 1;
        }
    }
}
