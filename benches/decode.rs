//! Benchmark full decodes and header-only parses of a synthetic image.
use baseline_jpeg::Decoder;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn segment(out: &mut Vec<u8>, marker: u8, payload: &[u8]) {
    out.extend_from_slice(&[0xFF, marker]);
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(payload);
}

/// A flat grey grayscale image, every MCU is two zero bits (DC category
/// zero plus end-of-block).
fn flat_grey_image(width: u16, height: u16) -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8];

    segment(
        &mut out,
        0xE0,
        &[
            b'J', b'F', b'I', b'F', 0x00, 0x01, 0x02, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00,
        ],
    );

    let mut dqt = vec![0x00];
    dqt.extend_from_slice(&[1; 64]);
    segment(&mut out, 0xDB, &dqt);

    // single length-1 code mapping to symbol zero, for both classes
    let mut counts = [0_u8; 16];
    counts[0] = 1;

    let mut dht = vec![0x00];
    dht.extend_from_slice(&counts);
    dht.push(0x00);
    segment(&mut out, 0xC4, &dht);

    dht = vec![0x10];
    dht.extend_from_slice(&counts);
    dht.push(0x00);
    segment(&mut out, 0xC4, &dht);

    let mut sof = vec![0x08];
    sof.extend_from_slice(&height.to_be_bytes());
    sof.extend_from_slice(&width.to_be_bytes());
    sof.extend_from_slice(&[0x01, 0x01, 0x11, 0x00]);
    segment(&mut out, 0xC0, &sof);

    segment(&mut out, 0xDA, &[0x01, 0x01, 0x00, 0x00, 0x3F, 0x00]);

    // two zero bits per MCU
    let mcus = usize::from((width + 7) / 8) * usize::from((height + 7) / 8);
    out.extend(std::iter::repeat(0x00).take((mcus * 2 + 7) / 8));

    out.extend_from_slice(&[0xFF, 0xD9]);

    out
}

fn criterion_benchmark(c: &mut Criterion) {
    let data = flat_grey_image(256, 256);

    c.bench_function("Baseline decode 256x256 grayscale", |b| {
        b.iter(|| {
            let mut decoder = Decoder::new();
            black_box(decoder.decode_buffer(&data).unwrap())
        })
    });

    c.bench_function("Header-only parse 256x256 grayscale", |b| {
        b.iter(|| {
            let mut decoder = Decoder::new();
            decoder.read_headers(&data).unwrap();
            black_box(decoder.width())
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
