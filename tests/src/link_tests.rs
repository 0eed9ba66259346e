//! Pin-level link behaviour against scripted embedded-hal mocks

use embedded_hal_mock::eh1::pin::{Mock as PinMock, State, Transaction as PinTransaction};
use morselink_core::link::{Frame, LinkDecoder, LinkEncoder, LinkError};
use morselink_core::test_utils::virtual_time::MockClock;
use morselink_core::test_utils::wire::Wire;
use morselink_core::{BusyWait, NoIdle};
use rstest::rstest;

fn level(bit: bool) -> State {
    if bit {
        State::High
    } else {
        State::Low
    }
}

fn bits_of(byte: u8) -> impl Iterator<Item = bool> {
    (0..8).rev().map(move |bit| byte & (1 << bit) != 0)
}

/// Pin writes the encoder must make for `bytes`
fn encoder_script(bytes: &[u8]) -> (Vec<PinTransaction>, Vec<PinTransaction>) {
    let mut clock = Vec::new();
    let mut data = Vec::new();
    for &byte in bytes {
        for bit in bits_of(byte) {
            data.push(PinTransaction::set(level(bit)));
            clock.push(PinTransaction::set(State::High));
            clock.push(PinTransaction::set(State::Low));
        }
    }
    (clock, data)
}

/// Pin reads a decoder makes for `bytes` when every edge is already there
fn decoder_script(bytes: &[u8]) -> (Vec<PinTransaction>, Vec<PinTransaction>) {
    let mut clock = Vec::new();
    let mut data = Vec::new();
    for &byte in bytes {
        for bit in bits_of(byte) {
            clock.push(PinTransaction::get(State::High));
            data.push(PinTransaction::get(level(bit)));
            clock.push(PinTransaction::get(State::Low));
        }
    }
    (clock, data)
}

#[test]
fn test_encoder_drives_data_before_each_rising_clock() {
    let clock = MockClock::stepping(1);
    let scheduler = BusyWait::new(&clock);
    let (clock_script, data_script) = encoder_script(&[0xA5]);
    let clock_pin = PinMock::new(&clock_script);
    let data_pin = PinMock::new(&data_script);

    let mut encoder = LinkEncoder::new(clock_pin, data_pin, 1);
    encoder.send_byte(&scheduler, &mut NoIdle, 0xA5).unwrap();

    let (mut clock_pin, mut data_pin) = encoder.release();
    clock_pin.done();
    data_pin.done();
}

#[test]
fn test_encoder_frame_transactions() {
    let clock = MockClock::stepping(1);
    let scheduler = BusyWait::new(&clock);
    let image = Frame::from_text("RST").unwrap().encode();
    let (clock_script, data_script) = encoder_script(&image);

    let mut encoder = LinkEncoder::new(PinMock::new(&clock_script), PinMock::new(&data_script), 1);
    encoder.transmit_frame(&scheduler, &mut NoIdle, b"RST").unwrap();

    let (mut clock_pin, mut data_pin) = encoder.release();
    clock_pin.done();
    data_pin.done();
}

#[test]
fn test_encoder_parks_lines_low() {
    let mut clock_pin = PinMock::new(&[PinTransaction::set(State::Low)]);
    let mut data_pin = PinMock::new(&[PinTransaction::set(State::Low)]);

    let mut encoder = LinkEncoder::new(clock_pin.clone(), data_pin.clone(), 1);
    encoder.idle_lines().unwrap();

    clock_pin.done();
    data_pin.done();
}

#[test]
fn test_decoder_reads_scripted_frame() {
    let clock = MockClock::stepping(1);
    let scheduler = BusyWait::new(&clock);
    let image = Frame::from_text("No").unwrap().encode();
    let (clock_script, data_script) = decoder_script(&image);

    let mut decoder = LinkDecoder::new(
        PinMock::new(&clock_script),
        PinMock::new(&data_script),
        Some(10),
    );
    let frame = decoder.receive_frame(&scheduler, &mut NoIdle).unwrap();
    assert_eq!(frame.text(), Some("No"));

    let (mut clock_pin, mut data_pin) = decoder.release();
    clock_pin.done();
    data_pin.done();
}

#[rstest]
#[case::bad_start(vec![0x12, 0x00, 0x00, 0x55], LinkError::BadStartMarker(0x12))]
#[case::length_too_long(vec![0xAA, 65], LinkError::LengthOutOfRange(65))]
#[case::checksum(
    vec![0xAA, 0x01, b'x', 0x00, 0x55],
    LinkError::ChecksumMismatch { computed: 0x79, received: 0x00 }
)]
#[case::bad_end(vec![0xAA, 0x00, 0x00, 0x54], LinkError::BadEndMarker(0x54))]
fn test_decoder_rejects_malformed_frames(#[case] bytes: Vec<u8>, #[case] expected: LinkError) {
    let clock = MockClock::stepping(1);
    let scheduler = BusyWait::new(&clock);
    let wire = Wire::new();
    wire.drive_bytes(&bytes);

    let mut decoder = LinkDecoder::new(wire.clock_in(), wire.data_in(), Some(20));
    let error = decoder.receive_frame(&scheduler, &mut NoIdle).unwrap_err();
    assert_eq!(error, expected);
    assert!(error.is_discarded_frame());
}

#[rstest]
#[case::after_start(1)]
#[case::mid_payload(4)]
#[case::before_end(6)]
fn test_decoder_times_out_when_sender_stops(#[case] bytes_sent: usize) {
    let clock = MockClock::stepping(1);
    let scheduler = BusyWait::new(&clock);
    let wire = Wire::new();
    let image = Frame::from_text("Help").unwrap().encode();
    wire.drive_bytes(&image[..bytes_sent]);

    let mut decoder = LinkDecoder::new(wire.clock_in(), wire.data_in(), Some(20));
    assert_eq!(
        decoder.receive_frame(&scheduler, &mut NoIdle),
        Err(LinkError::EdgeTimeout)
    );
}

#[test]
fn test_decoder_recovers_on_next_frame_after_drop() {
    let clock = MockClock::stepping(1);
    let scheduler = BusyWait::new(&clock);
    let wire = Wire::new();
    let mut corrupt = Frame::from_text("Yes").unwrap().encode();
    corrupt[3] ^= 0x01;
    wire.drive_bytes(&corrupt);
    wire.drive_bytes(&Frame::from_text("No").unwrap().encode());

    let mut decoder = LinkDecoder::new(wire.clock_in(), wire.data_in(), Some(20));
    assert!(matches!(
        decoder.receive_frame(&scheduler, &mut NoIdle),
        Err(LinkError::ChecksumMismatch { .. })
    ));
    let frame = decoder.receive_frame(&scheduler, &mut NoIdle).unwrap();
    assert_eq!(frame.text(), Some("No"));
}

#[test]
fn test_encoder_to_decoder_over_wire() {
    let clock = MockClock::stepping(1);
    let scheduler = BusyWait::new(&clock);
    let wire = Wire::new();
    let mut encoder = LinkEncoder::new(wire.clock_out(), wire.data_out(), 3);
    for text in ["Yes", "", "Cleared Sequence"] {
        encoder
            .transmit_frame(&scheduler, &mut NoIdle, text.as_bytes())
            .unwrap();
    }

    let mut decoder = LinkDecoder::new(wire.clock_in(), wire.data_in(), Some(20));
    for text in ["Yes", "", "Cleared Sequence"] {
        let frame = decoder.receive_frame(&scheduler, &mut NoIdle).unwrap();
        assert_eq!(frame.text(), Some(text));
    }
    assert_eq!(
        decoder.receive_frame(&scheduler, &mut NoIdle),
        Err(LinkError::Idle)
    );
}
