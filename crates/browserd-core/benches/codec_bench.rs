//! Criterion benchmarks for the browserd input protocol and SDP transform.
//!
//! Run with:
//! ```bash
//! cargo bench --package browserd-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use browserd_core::protocol::encoder::{PointerPress, SurfaceEvent, SurfaceOrigin};
use browserd_core::protocol::messages::KeyState;
use browserd_core::{
    decode_bytes, encode_key, encode_pointer, to_wire_bytes, CodecPrioritizer, SdpTransform,
};

const OFFER: &str = "v=0\r\n\
o=- 4215775240449105457 2 IN IP4 127.0.0.1\r\n\
s=-\r\n\
t=0 0\r\n\
m=audio 9 UDP/TLS/RTP/SAVPF 111\r\n\
a=rtpmap:111 opus/48000/2\r\n\
m=video 9 UDP/TLS/RTP/SAVPF 96 97 102\r\n\
a=rtpmap:96 VP8/90000\r\n\
a=rtpmap:97 VP9/90000\r\n\
a=rtpmap:102 H264/90000\r\n";

fn bench_encode(c: &mut Criterion) {
    let press = PointerPress {
        event: SurfaceEvent::MouseDown,
        client_x: 640.0,
        client_y: 360.0,
    };
    let origin = SurfaceOrigin {
        left: 8.0,
        top: 8.0,
    };

    c.bench_function("encode_pointer", |b| {
        b.iter(|| {
            let encoded = encode_pointer(black_box(&press), origin);
            to_wire_bytes(&encoded.message).unwrap()
        })
    });
}

fn bench_decode(c: &mut Criterion) {
    let touch = to_wire_bytes(
        &encode_pointer(
            &PointerPress {
                event: SurfaceEvent::MouseUp,
                client_x: 10.0,
                client_y: 10.0,
            },
            SurfaceOrigin::default(),
        )
        .message,
    )
    .unwrap();
    let key = to_wire_bytes(&encode_key("PageDown", KeyState::Pressed)).unwrap();

    let mut group = c.benchmark_group("decode");
    group.bench_function("touch", |b| b.iter(|| decode_bytes(black_box(&touch)).unwrap()));
    group.bench_function("keyboard", |b| b.iter(|| decode_bytes(black_box(&key)).unwrap()));
    group.finish();
}

fn bench_sdp(c: &mut Criterion) {
    let prioritizer = CodecPrioritizer::default();
    c.bench_function("prioritize_h264", |b| {
        b.iter(|| prioritizer.transform_sdp(black_box(OFFER)).unwrap())
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_sdp);
criterion_main!(benches);
