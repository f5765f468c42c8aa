//! Packet-Radio TNC Firmware Library
//!
//! This library provides the control core of an STM32G474-based terminal
//! node controller (TNC). The TNC bridges a host computer's serial byte
//! stream and a radio channel carrying AX.25 frames as AFSK audio.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    DISPATCH LOOP (tnc)                       │
//! │   poll link ─▶ frame to host  │  host byte ─▶ protocol       │
//! ├─────────────────────────────────────────────────────────────┤
//! │                 HOST FRAMING (protocol)                      │
//! │        KISS          │        SimpleSerial                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │           COLLABORATOR CONTRACTS (link, host)                │
//! │  Modem  │  LinkLayer (AX.25)  │  HostTransport (UART)        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    HAL / SCHEDULER                           │
//! │     embassy-stm32 UART, embassy-sync queues, embassy-time    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Nothing blocks**: every poll and read in the loop checks and returns
//! - **Explicit state**: accumulation state is a value owned by the loop
//! - **Step function**: one iteration is [`tnc::Tnc::step`], driven by
//!   synthetic ticks in tests
//! - **No unsafe in application code**

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Must come first so the logging macros are visible to every module
#[macro_use]
mod fmt;

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// UART, modem queues, clock and LED bindings for the STM32G474.
pub mod hal;

/// Dispatch Loop
///
/// The cooperative superloop and its initialization order.
pub mod tnc;

/// Host Framing Protocols
///
/// KISS and SimpleSerial framing behind one capability trait.
pub mod protocol;

/// Radio link-layer contracts
pub mod link;

/// Host serial transport contract
pub mod host;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    pub use crate::host::HostTransport;
    pub use crate::link::{LinkLayer, Modem};
    pub use crate::protocol::{HostProtocol, Protocol};
    pub use crate::tnc::{bring_up, Step, Tnc};

    // Common traits
    pub use embedded_hal::digital::OutputPin;

    // Embassy
    pub use embassy_time::{Duration, Instant, Timer};

    // Error handling
    pub use core::result::Result;

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
