//! KISS Protocol Tests
//!
//! Tests for KISS frame decoding from the host and encoding to the host.
//! Run with: cargo test --no-default-features --features std --test kiss_tests

use tnc_firmware::config::{FRAME_BUFFER_LEN, MAX_ENCODED_FRAME_LEN};
use tnc_firmware::host::BufferedHost;
use tnc_firmware::link::QueueLink;
use tnc_firmware::protocol::kiss::{write_frame, KissCommand, FEND, FESC, TFEND, TFESC};
use tnc_firmware::protocol::{HostProtocol, Kiss};
use tnc_firmware::types::{ChannelParams, Ticks};

fn feed(kiss: &mut Kiss, link: &mut QueueLink<4>, bytes: &[u8]) -> Vec<usize> {
    bytes
        .iter()
        .filter_map(|&b| kiss.inbound_byte(b, Ticks::ZERO, link))
        .collect()
}

fn encode(frame: &[u8]) -> Vec<u8> {
    let mut host = BufferedHost::<8, 1024>::new();
    write_frame(frame, &mut host);
    host.drain_tx().collect()
}

// ============================================================================
// Command Byte Tests
// ============================================================================

#[test]
fn command_strips_port_nibble() {
    assert_eq!(KissCommand::from_byte(0x00), KissCommand::Data);
    assert_eq!(KissCommand::from_byte(0x10), KissCommand::Data);
    assert_eq!(KissCommand::from_byte(0x21), KissCommand::TxDelay);
    assert_eq!(KissCommand::from_byte(0x06), KissCommand::SetHardware);
    assert_eq!(KissCommand::from_byte(0xFF), KissCommand::Unknown(0x0F));
}

#[test]
fn command_byte_round_trip() {
    for b in 0x00..=0x0F {
        assert_eq!(KissCommand::from_byte(b).as_byte(), b);
    }
}

// ============================================================================
// Decoder Tests
// ============================================================================

#[test]
fn data_frame_is_sent() {
    let mut kiss = Kiss::new();
    let mut link = QueueLink::<4>::new();

    let sent = feed(&mut kiss, &mut link, &[FEND, 0x00, b'h', b'i', FEND]);

    assert_eq!(sent, vec![2]);
    assert_eq!(link.take_sent().as_deref(), Some(&b"hi"[..]));
}

#[test]
fn escaped_bytes_are_restored() {
    let mut kiss = Kiss::new();
    let mut link = QueueLink::<4>::new();

    feed(
        &mut kiss,
        &mut link,
        &[FEND, 0x00, FESC, TFEND, b'x', FESC, TFESC, FEND],
    );

    assert_eq!(link.take_sent().as_deref(), Some(&[FEND, b'x', FESC][..]));
}

#[test]
fn unknown_escape_passes_through() {
    let mut kiss = Kiss::new();
    let mut link = QueueLink::<4>::new();

    feed(&mut kiss, &mut link, &[FEND, 0x00, FESC, b'q', FEND]);

    assert_eq!(link.take_sent().as_deref(), Some(&b"q"[..]));
}

#[test]
fn empty_frames_are_not_sent() {
    let mut kiss = Kiss::new();
    let mut link = QueueLink::<4>::new();

    let sent = feed(&mut kiss, &mut link, &[FEND, FEND, FEND, 0x00, FEND]);

    assert!(sent.is_empty());
    assert_eq!(link.sent_len(), 0);
}

#[test]
fn bytes_outside_a_frame_are_ignored() {
    let mut kiss = Kiss::new();
    let mut link = QueueLink::<4>::new();

    feed(&mut kiss, &mut link, b"noise");

    assert!(!kiss.in_frame());
    assert_eq!(link.sent_len(), 0);
}

#[test]
fn shared_fend_between_frames() {
    let mut kiss = Kiss::new();
    let mut link = QueueLink::<4>::new();

    let sent = feed(&mut kiss, &mut link, &[FEND, 0x00, b'a', FEND, 0x00, b'b', FEND]);

    assert_eq!(sent, vec![1, 1]);
    assert_eq!(link.take_sent().as_deref(), Some(&b"a"[..]));
    assert_eq!(link.take_sent().as_deref(), Some(&b"b"[..]));
}

#[test]
fn data_on_other_port_is_sent() {
    let mut kiss = Kiss::new();
    let mut link = QueueLink::<4>::new();

    feed(&mut kiss, &mut link, &[FEND, 0x10, b'z', FEND]);

    assert_eq!(link.take_sent().as_deref(), Some(&b"z"[..]));
}

#[test]
fn oversized_frame_is_truncated() {
    let mut kiss = Kiss::new();
    let mut link = QueueLink::<4>::new();

    let mut bytes = vec![FEND, 0x00];
    bytes.extend(std::iter::repeat(0x55).take(400));
    bytes.push(FEND);
    let sent = feed(&mut kiss, &mut link, &bytes);

    assert_eq!(sent, vec![tnc_firmware::config::MAX_FRAME_LEN]);
}

#[test]
fn partial_frame_is_pending() {
    let mut kiss = Kiss::new();
    let mut link = QueueLink::<4>::new();

    feed(&mut kiss, &mut link, &[FEND, 0x00, 1, 2, 3]);

    assert!(kiss.in_frame());
    assert_eq!(kiss.pending(), &[1, 2, 3]);
    assert_eq!(link.sent_len(), 0);
}

#[test]
fn idle_never_flushes() {
    let mut kiss = Kiss::new();
    let mut link = QueueLink::<4>::new();

    feed(&mut kiss, &mut link, &[FEND, 0x00, 1]);

    assert_eq!(kiss.idle(Ticks::from_millis(60_000), &mut link), None);
    assert_eq!(link.sent_len(), 0);
}

// ============================================================================
// Parameter Command Tests
// ============================================================================

#[test]
fn default_params() {
    let kiss = Kiss::new();
    assert_eq!(*kiss.params(), ChannelParams::default());
    assert_eq!(kiss.params().tx_delay_ms, 350);
    assert_eq!(kiss.params().persistence, 63);
}

#[test]
fn tx_delay_in_ten_ms_units() {
    let mut kiss = Kiss::new();
    let mut link = QueueLink::<4>::new();

    feed(&mut kiss, &mut link, &[FEND, 0x01, 30, FEND]);

    assert_eq!(kiss.params().tx_delay_ms, 300);
    assert_eq!(link.params().tx_delay_ms, 300);
    assert_eq!(link.sent_len(), 0);
}

#[test]
fn persistence_slot_time_tail() {
    let mut kiss = Kiss::new();
    let mut link = QueueLink::<4>::new();

    feed(&mut kiss, &mut link, &[FEND, 0x02, 127, FEND]);
    feed(&mut kiss, &mut link, &[FEND, 0x03, 20, FEND]);
    feed(&mut kiss, &mut link, &[FEND, 0x04, 255, FEND]);

    let params = link.params();
    assert_eq!(params.persistence, 127);
    assert_eq!(params.slot_time_ms, 200);
    assert_eq!(params.tx_tail_ms, 2550);
}

#[test]
fn full_duplex_toggle() {
    let mut kiss = Kiss::new();
    let mut link = QueueLink::<4>::new();

    feed(&mut kiss, &mut link, &[FEND, 0x05, 1, FEND]);
    assert!(link.params().full_duplex);

    feed(&mut kiss, &mut link, &[FEND, 0x05, 0, FEND]);
    assert!(!link.params().full_duplex);
}

#[test]
fn set_hardware_is_ignored() {
    let mut kiss = Kiss::new();
    let mut link = QueueLink::<4>::new();

    feed(&mut kiss, &mut link, &[FEND, 0x06, 1, 2, 3, FEND]);

    assert_eq!(*link.params(), ChannelParams::default());
    assert_eq!(link.sent_len(), 0);
}

#[test]
fn init_restores_defaults() {
    let mut kiss = Kiss::new();
    let mut link = QueueLink::<4>::new();
    feed(&mut kiss, &mut link, &[FEND, 0x02, 1, FEND, 0x00, 9]);

    kiss.init();

    assert_eq!(*kiss.params(), ChannelParams::default());
    assert!(!kiss.in_frame());
}

// ============================================================================
// Encoder Tests
// ============================================================================

#[test]
fn encode_plain_frame() {
    assert_eq!(encode(b"abc"), vec![FEND, 0x00, b'a', b'b', b'c', FEND]);
}

#[test]
fn encode_escapes_specials() {
    assert_eq!(
        encode(&[FEND, FESC, 0x01]),
        vec![FEND, 0x00, FESC, TFEND, FESC, TFESC, 0x01, FEND]
    );
}

#[test]
fn all_fend_frame_hits_encoding_bound() {
    let encoded = encode(&[FEND; FRAME_BUFFER_LEN]);
    assert_eq!(encoded.len(), MAX_ENCODED_FRAME_LEN);
}

#[test]
fn encoded_frame_decodes_to_original() {
    let frame: Vec<u8> = vec![0x82, FEND, 0x40, FESC, FESC, 0x03, 0xF0, b'!'];
    let mut kiss = Kiss::new();
    let mut link = QueueLink::<4>::new();

    feed(&mut kiss, &mut link, &encode(&frame));

    assert_eq!(link.take_sent().as_deref(), Some(frame.as_slice()));
}

#[test]
fn outbound_frame_uses_kiss_encoding() {
    let mut kiss = Kiss::new();
    let mut host = BufferedHost::<8, 64>::new();

    kiss.outbound_frame(b"ok", &mut host);

    assert_eq!(host.drain_tx().collect::<Vec<_>>(), vec![FEND, 0x00, b'o', b'k', FEND]);
}
