use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use morselink_core::link::{Frame, FrameParser, MAX_PAYLOAD};
use morselink_core::test_utils::virtual_time::MockClock;
use morselink_core::test_utils::wire::Wire;
use morselink_core::{BusyWait, LinkDecoder, LinkEncoder, NoIdle};

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| b'a' + (i % 26) as u8).collect()
}

fn bench_frame_parser(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_parser");
    for len in [0, 16, MAX_PAYLOAD] {
        let image = Frame::new(&payload(len)).unwrap().encode();
        group.bench_with_input(BenchmarkId::from_parameter(len), &image, |b, image| {
            let mut parser = FrameParser::new();
            b.iter(|| parser.feed_bytes(black_box(image)).unwrap());
        });
    }
    group.finish();
}

fn bench_wire_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("wire_round_trip");
    for len in [3, MAX_PAYLOAD] {
        let bytes = payload(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &bytes, |b, bytes| {
            b.iter(|| {
                let clock = MockClock::stepping(1);
                let scheduler = BusyWait::new(&clock);
                let wire = Wire::new();
                let mut encoder = LinkEncoder::new(wire.clock_out(), wire.data_out(), 1);
                encoder
                    .transmit_frame(&scheduler, &mut NoIdle, black_box(bytes))
                    .unwrap();
                let mut decoder = LinkDecoder::new(wire.clock_in(), wire.data_in(), Some(20));
                decoder.receive_frame(&scheduler, &mut NoIdle).unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_frame_parser, bench_wire_round_trip);
criterion_main!(benches);
