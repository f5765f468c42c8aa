//! HAL Binding Tests
//!
//! Tests for the host UART transport, the status LED and the modem queues,
//! driven with in-memory peripherals.
//! Run with: cargo test --no-default-features --features std --test hal_tests

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_io::{ErrorKind, ErrorType, Read, ReadReady, Write};

use tnc_firmware::config::{FRAME_BUFFER_LEN, LINK_QUEUE_DEPTH, MAX_ENCODED_FRAME_LEN};
use tnc_firmware::hal::gpio::{LedState, StatusLed};
use tnc_firmware::hal::modem::{ChannelLink, ModemChannels};
use tnc_firmware::hal::uart::SerialHost;
use tnc_firmware::host::HostTransport;
use tnc_firmware::link::{LinkLayer, Modem};
use tnc_firmware::protocol::kiss::{write_frame, FEND};
use tnc_firmware::types::{ChannelParams, Frame};

// ============================================================================
// In-Memory UART
// ============================================================================

#[derive(Default)]
struct FakeUart {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
    fail_ready: bool,
    fail_writes: bool,
}

impl ErrorType for FakeUart {
    type Error = ErrorKind;
}

impl Read for FakeUart {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ErrorKind> {
        // A buffered UART waits here for data
        assert!(!self.rx.is_empty(), "read on an empty receiver");
        let n = buf.len().min(self.rx.len());
        for slot in &mut buf[..n] {
            *slot = self.rx.pop_front().unwrap();
        }
        Ok(n)
    }
}

impl ReadReady for FakeUart {
    fn read_ready(&mut self) -> Result<bool, ErrorKind> {
        if self.fail_ready {
            return Err(ErrorKind::Other);
        }
        Ok(!self.rx.is_empty())
    }
}

impl Write for FakeUart {
    fn write(&mut self, buf: &[u8]) -> Result<usize, ErrorKind> {
        if self.fail_writes {
            return Err(ErrorKind::Other);
        }
        self.tx.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), ErrorKind> {
        Ok(())
    }
}

fn serial(rx: &[u8]) -> SerialHost<FakeUart> {
    SerialHost::new(FakeUart {
        rx: rx.iter().copied().collect(),
        ..FakeUart::default()
    })
}

// ============================================================================
// Serial Host Tests
// ============================================================================

#[test]
fn init_discards_bytes_received_during_boot() {
    let mut host = serial(b"boot noise");

    host.init();

    assert!(!host.byte_available());
    assert!(host.uart().rx.is_empty());
    assert_eq!(host.errors(), 0);
}

#[test]
fn reads_one_byte_per_call() {
    let mut host = serial(b"ab");

    assert!(host.byte_available());
    assert_eq!(host.read_byte_nowait(), Some(b'a'));
    assert_eq!(host.uart().rx.len(), 1);
}

#[test]
fn no_byte_available_on_empty_line() {
    let mut host = serial(&[]);
    assert!(!host.byte_available());
}

#[test]
fn ready_error_counts_and_reports_nothing() {
    let mut host = serial(b"x");
    host.uart_mut().fail_ready = true;

    assert!(!host.byte_available());
    assert_eq!(host.errors(), 1);
}

#[test]
fn writes_reach_the_uart() {
    let mut host = serial(&[]);

    host.write_byte(b'>');
    host.write_all(b"ok");

    assert_eq!(host.uart().tx, b">ok");
}

#[test]
fn write_error_is_counted_not_propagated() {
    let mut host = serial(&[]);
    host.uart_mut().fail_writes = true;

    host.write_all(b"lost");

    assert_eq!(host.errors(), 1);
    assert!(host.uart().tx.is_empty());
}

#[test]
fn worst_case_kiss_frame_is_queued_whole() {
    let mut host = serial(&[]);

    write_frame(&[FEND; FRAME_BUFFER_LEN], &mut host);

    assert_eq!(host.uart().tx.len(), MAX_ENCODED_FRAME_LEN);
    assert_eq!(host.errors(), 0);
}

// ============================================================================
// Status LED Tests
// ============================================================================

struct FakePin {
    high: Rc<Cell<bool>>,
}

impl embedded_hal::digital::ErrorType for FakePin {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high.set(true);
        Ok(())
    }
}

fn led() -> (StatusLed<FakePin>, Rc<Cell<bool>>) {
    let high = Rc::new(Cell::new(true));
    let led = StatusLed::new(FakePin { high: high.clone() });
    (led, high)
}

#[test]
fn led_starts_off() {
    let (led, high) = led();
    assert_eq!(led.state(), LedState::Off);
    assert!(!high.get());
}

#[test]
fn led_blinks_off_on_activity() {
    let (mut led, high) = led();
    led.on();
    assert!(high.get());

    led.activity(true);
    assert_eq!(led.state(), LedState::Off);
    assert!(!high.get());

    led.activity(false);
    assert_eq!(led.state(), LedState::On);
    assert!(high.get());
}

#[test]
fn led_stays_off_across_consecutive_activity() {
    let (mut led, high) = led();
    led.on();

    led.activity(true);
    led.activity(true);
    assert!(!high.get());

    led.off();
    assert_eq!(led.state(), LedState::Off);
}

// ============================================================================
// Modem Queue Tests
// ============================================================================

fn bind(channels: &'static ModemChannels) -> ChannelLink {
    let mut modem = channels;
    ChannelLink::new(modem.init())
}

#[test]
fn init_publishes_default_params() {
    static CHANNELS: ModemChannels = ModemChannels::new();
    let _link = bind(&CHANNELS);

    assert_eq!(CHANNELS.params().try_take(), Some(ChannelParams::default()));
}

#[test]
fn decoded_frames_are_polled_in_order() {
    static CHANNELS: ModemChannels = ModemChannels::new();
    let mut link = bind(&CHANNELS);
    let decoded = CHANNELS.decoded_sender();

    assert!(link.poll().is_none());
    assert!(decoded.try_send(Frame::from_slice(b"one").unwrap()).is_ok());
    assert!(decoded.try_send(Frame::from_slice(b"two").unwrap()).is_ok());

    assert_eq!(link.poll().as_deref(), Some(&b"one"[..]));
    assert_eq!(link.poll().as_deref(), Some(&b"two"[..]));
    assert!(link.poll().is_none());
}

#[test]
fn sent_frames_reach_the_modem() {
    static CHANNELS: ModemChannels = ModemChannels::new();
    let mut link = bind(&CHANNELS);

    link.send(b"to air");

    let frame = CHANNELS.transmit_receiver().try_receive().ok();
    assert_eq!(frame.as_deref(), Some(&b"to air"[..]));
}

#[test]
fn full_transmit_queue_drops_without_waiting() {
    static CHANNELS: ModemChannels = ModemChannels::new();
    let mut link = bind(&CHANNELS);

    for _ in 0..=LINK_QUEUE_DEPTH {
        link.send(b"x");
    }

    let transmit = CHANNELS.transmit_receiver();
    let queued = core::iter::from_fn(|| transmit.try_receive().ok()).count();
    assert_eq!(queued, LINK_QUEUE_DEPTH);
}

#[test]
fn channel_params_are_signalled() {
    static CHANNELS: ModemChannels = ModemChannels::new();
    let mut link = bind(&CHANNELS);
    let _ = CHANNELS.params().try_take();

    let params = ChannelParams {
        tx_delay_ms: 500,
        ..ChannelParams::new()
    };
    link.set_channel_params(&params);

    assert_eq!(CHANNELS.params().try_take(), Some(params));
}
