//! Hardware Abstraction Layer
//!
//! Binds the control core to STM32G474 peripherals: the host UART, the
//! modem task queues, the monotonic clock and the status LED. Only the clock
//! needs the embassy time driver; the rest is generic over `embedded-hal`,
//! `embedded-io` and `embassy-sync` and builds on the host too.

pub mod gpio;
pub mod modem;
#[cfg(feature = "embedded")]
pub mod timer;
pub mod uart;
