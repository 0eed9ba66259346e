//! Property tests for framing and the timed state machines

use morselink_core::link::{checksum, Frame, FrameParser, LinkError, MAX_PAYLOAD};
use morselink_core::test_utils::virtual_time::MockClock;
use morselink_core::test_utils::wire::Wire;
use morselink_core::{BusyWait, LinkDecoder, LinkEncoder, NoIdle, Tick, UndoLog};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_frames_survive_the_wire(payload in proptest::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD)) {
        let clock = MockClock::stepping(1);
        let scheduler = BusyWait::new(&clock);
        let wire = Wire::new();

        let mut encoder = LinkEncoder::new(wire.clock_out(), wire.data_out(), 1);
        encoder.transmit_frame(&scheduler, &mut NoIdle, &payload).unwrap();

        let mut decoder = LinkDecoder::new(wire.clock_in(), wire.data_in(), Some(20));
        let frame = decoder.receive_frame(&scheduler, &mut NoIdle).unwrap();
        prop_assert_eq!(frame.payload(), payload.as_slice());
    }

    #[test]
    fn prop_single_byte_payload_corruption_is_rejected(
        payload in proptest::collection::vec(any::<u8>(), 1..=MAX_PAYLOAD),
        index in any::<prop::sample::Index>(),
        flip in 1u8..=255,
    ) {
        let mut image = Frame::new(&payload).unwrap().encode();
        // Payload bytes sit between the length and the checksum
        let target = 2 + index.index(payload.len());
        image[target] ^= flip;

        let mut parser = FrameParser::new();
        let result = parser.feed_bytes(&image);
        let is_checksum_error = matches!(result, Err(LinkError::ChecksumMismatch { .. }));
        prop_assert!(is_checksum_error);
        prop_assert!(parser.is_idle());
    }

    #[test]
    fn prop_checksum_counts_length(payload in proptest::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD)) {
        let sum = payload.iter().fold(0u32, |acc, &byte| acc + u32::from(byte));
        let expected = ((payload.len() as u32 + sum) % 256) as u8;
        prop_assert_eq!(checksum(&payload), expected);
    }

    #[test]
    fn prop_oversized_payloads_are_refused(extra in 1usize..64) {
        let payload = vec![b'x'; MAX_PAYLOAD + extra];
        prop_assert_eq!(Frame::new(&payload), Err(LinkError::PayloadTooLarge));
    }

    #[test]
    fn prop_elapsed_survives_wraparound(start in any::<u32>(), delta in 0u32..u32::MAX / 2) {
        let earlier = Tick::from_raw(start);
        let later = earlier.wrapping_add(delta);
        prop_assert_eq!(later.since(earlier), delta);
        prop_assert!(later.has_elapsed(earlier, delta));
    }

    #[test]
    fn prop_undo_log_never_exceeds_capacity(gaps in proptest::collection::vec(0u32..100, 0..40)) {
        let mut log = UndoLog::new();
        let mut now = Tick::ZERO;
        for gap in &gaps {
            now = now.wrapping_add(*gap);
            log.record(now);
        }
        prop_assert!(log.len() <= 10);
        prop_assert_eq!(log.len(), gaps.len().min(10));
        prop_assert!(log.count_within(now, u32::MAX / 2) <= log.len());
    }
}
