//! Host UART transport
//!
//! Adapts any interrupt-buffered UART implementing the blocking
//! `embedded-io` traits (embassy-stm32 `BufferedUart` on this board) to the
//! loop's non-blocking [`HostTransport`]. Reads only happen after
//! `read_ready` reports data, so they never wait. Writes never wait while
//! the UART's transmit ring is at least
//! [`HOST_TX_BUFFER_SIZE`](crate::config::HOST_TX_BUFFER_SIZE) long: the
//! loop queues at most one encoded frame per step, and the host line drains
//! a frame faster than the radio channel can deliver the next.

use embedded_io::{Read, ReadReady, Write};

use crate::host::HostTransport;

/// Host serial port
pub struct SerialHost<T> {
    uart: T,
    errors: u32,
}

impl<T> SerialHost<T>
where
    T: Read + ReadReady + Write,
{
    /// Wrap a configured UART
    pub const fn new(uart: T) -> Self {
        Self { uart, errors: 0 }
    }

    /// Underlying UART
    pub fn uart(&self) -> &T {
        &self.uart
    }

    /// Underlying UART, mutably
    pub fn uart_mut(&mut self) -> &mut T {
        &mut self.uart
    }

    /// Transport errors seen since startup
    #[must_use]
    pub const fn errors(&self) -> u32 {
        self.errors
    }

    fn record_error(&mut self) {
        self.errors = self.errors.wrapping_add(1);
    }
}

impl<T> HostTransport for SerialHost<T>
where
    T: Read + ReadReady + Write,
{
    fn init(&mut self) {
        // Bytes that arrived before the loop started belong to no frame
        while self.byte_available() {
            if self.read_byte_nowait().is_none() {
                break;
            }
        }
    }

    fn byte_available(&mut self) -> bool {
        match self.uart.read_ready() {
            Ok(ready) => ready,
            Err(_) => {
                self.record_error();
                false
            }
        }
    }

    fn read_byte_nowait(&mut self) -> Option<u8> {
        let mut byte = [0u8; 1];
        match self.uart.read(&mut byte) {
            Ok(1) => Some(byte[0]),
            Ok(_) => None,
            Err(_) => {
                self.record_error();
                warn!("uart: read error");
                None
            }
        }
    }

    fn write_byte(&mut self, byte: u8) {
        HostTransport::write_all(self, &[byte]);
    }

    fn write_all(&mut self, bytes: &[u8]) {
        if Write::write_all(&mut self.uart, bytes).is_err() {
            self.record_error();
            warn!("uart: dropped {} bytes to host", bytes.len());
        }
    }
}
