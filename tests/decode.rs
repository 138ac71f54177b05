//! Decode tests over hand-assembled JFIF streams with known pixels.

use baseline_jpeg::{ColorSpace, Decoder};

mod common;

use common::{BitWriter, StreamBuilder};

#[test]
fn flat_grey_grayscale()
{
    let mut bits = BitWriter::new();

    // DC category 0 then end of block, every coefficient stays zero
    bits.push(0b0, 1);
    bits.push(0b0, 1);

    let stream = StreamBuilder::new()
        .jfif()
        .flat_quantization()
        .standard_tables()
        .sof0(8, 8, &[(1, 0)])
        .sos_baseline(&[1])
        .entropy(bits)
        .eoi()
        .build();

    let mut decoder = Decoder::new();
    let pixels = decoder.decode_buffer(&stream).unwrap();

    assert_eq!(pixels, vec![128; 64]);
    assert_eq!(decoder.width(), 8);
    assert_eq!(decoder.height(), 8);
    assert_eq!(decoder.output_colorspace(), ColorSpace::Grayscale);
}

#[test]
fn dc_differentials_accumulate_in_the_predictor()
{
    // three MCUs with DC differentials +1, +2, -1 give predictors
    // 1, 3 and 2; against a flat quantizer of 8 the blocks come out
    // uniformly 129, 131 and 130
    let mut bits = BitWriter::new();

    bits.push(0b10, 2); // category 1
    bits.push(0b1, 1); // +1
    bits.push(0b0, 1); // EOB

    bits.push(0b110, 3); // category 2
    bits.push(0b10, 2); // +2
    bits.push(0b0, 1); // EOB

    bits.push(0b10, 2); // category 1
    bits.push(0b0, 1); // -1
    bits.push(0b0, 1); // EOB

    let stream = StreamBuilder::new()
        .jfif()
        .dqt8(0, &[8; 64])
        .standard_tables()
        .sof0(24, 8, &[(1, 0)])
        .sos_baseline(&[1])
        .entropy(bits)
        .eoi()
        .build();

    let pixels = Decoder::new().decode_buffer(&stream).unwrap();

    assert_eq!(pixels.len(), 24 * 8);

    for row in 0..8
    {
        assert!(pixels[row * 24..row * 24 + 8].iter().all(|p| *p == 129));
        assert!(pixels[row * 24 + 8..row * 24 + 16].iter().all(|p| *p == 131));
        assert!(pixels[row * 24 + 16..row * 24 + 24].iter().all(|p| *p == 130));
    }
}

#[test]
fn flat_grey_ycbcr()
{
    // all-zero Y, Cb and Cr blocks convert to mid grey RGB
    let mut bits = BitWriter::new();

    for _ in 0..3
    {
        bits.push(0b0, 1);
        bits.push(0b0, 1);
    }

    let stream = StreamBuilder::new()
        .jfif()
        .flat_quantization()
        .standard_tables()
        .sof0(8, 8, &[(1, 0), (2, 0), (3, 0)])
        .sos_baseline(&[1, 2, 3])
        .entropy(bits)
        .eoi()
        .build();

    let mut decoder = Decoder::new();
    let pixels = decoder.decode_buffer(&stream).unwrap();

    assert_eq!(pixels, vec![128; 8 * 8 * 3]);
    assert_eq!(decoder.info().unwrap().components, 3);
    assert_eq!(decoder.output_colorspace(), ColorSpace::RGB);
}

#[test]
fn odd_dimensions_round_up_to_whole_blocks()
{
    // 12x10 needs a 2x2 MCU grid, the padding samples are discarded
    let mut bits = BitWriter::new();

    for _ in 0..4
    {
        bits.push(0b0, 1);
        bits.push(0b0, 1);
    }

    let stream = StreamBuilder::new()
        .jfif()
        .flat_quantization()
        .standard_tables()
        .sof0(12, 10, &[(1, 0)])
        .sos_baseline(&[1])
        .entropy(bits)
        .eoi()
        .build();

    let pixels = Decoder::new().decode_buffer(&stream).unwrap();

    assert_eq!(pixels, vec![128; 12 * 10]);
}

#[test]
fn stuffed_bytes_decode_transparently()
{
    // two category-10 AC coefficients of +1023 produce a 0xFF byte in
    // the entropy data, which the writer stuffs and the reader unstuffs
    let mut bits = BitWriter::new();

    bits.push(0b0, 1); // DC category 0
    bits.push(0b1110, 4); // AC 0x0A, run 0 category 10
    bits.push(0x3FF, 10); // +1023
    bits.push(0b1110, 4);
    bits.push(0x3FF, 10);
    bits.push(0b0, 1); // EOB

    let stream = StreamBuilder::new()
        .jfif()
        .flat_quantization()
        .standard_tables()
        .sof0(8, 8, &[(1, 0)])
        .sos_baseline(&[1])
        .entropy(bits)
        .eoi()
        .build();

    assert!(
        stream.windows(2).any(|w| w == [0xFF, 0x00]),
        "stream should exercise byte stuffing"
    );

    let pixels = Decoder::new().decode_buffer(&stream).unwrap();

    assert_eq!(pixels.len(), 64);
}

#[test]
fn sixteen_bit_quantization_tables()
{
    // DC differential of +1 against a 16 bit quantizer of 256 lifts the
    // whole block by 32
    let mut bits = BitWriter::new();

    bits.push(0b10, 2); // category 1
    bits.push(0b1, 1); // +1
    bits.push(0b0, 1); // EOB

    let stream = StreamBuilder::new()
        .jfif()
        .dqt16(0, &[256; 64])
        .standard_tables()
        .sof0(8, 8, &[(1, 0)])
        .sos_baseline(&[1])
        .entropy(bits)
        .eoi()
        .build();

    let pixels = Decoder::new().decode_buffer(&stream).unwrap();

    assert_eq!(pixels, vec![160; 64]);
}

#[test]
fn zero_run_symbol_skips_sixteen_positions()
{
    // 0xF0 inserts sixteen zeroes; with an EOB right after, the block
    // stays empty and the run must not overshoot position 63
    let mut bits = BitWriter::new();

    bits.push(0b0, 1); // DC category 0
    bits.push(0b110, 3); // AC 0xF0
    bits.push(0b0, 1); // EOB

    let stream = StreamBuilder::new()
        .jfif()
        .flat_quantization()
        .standard_tables()
        .sof0(8, 8, &[(1, 0)])
        .sos_baseline(&[1])
        .entropy(bits)
        .eoi()
        .build();

    let pixels = Decoder::new().decode_buffer(&stream).unwrap();

    assert_eq!(pixels, vec![128; 64]);
}

#[test]
fn ac_coefficient_lands_after_its_zero_run()
{
    // run 8 category 1 places +1 at zig-zag position 9, natural
    // position 24, i.e. (v,u) = (3,0)
    let mut bits = BitWriter::new();

    bits.push(0b0, 1); // DC category 0
    bits.push(0b11110, 5); // AC 0x81, run 8 category 1
    bits.push(0b1, 1); // +1
    bits.push(0b0, 1); // EOB

    let stream = StreamBuilder::new()
        .jfif()
        .dqt8(0, &[8; 64])
        .standard_tables()
        .sof0(8, 8, &[(1, 0)])
        .sos_baseline(&[1])
        .entropy(bits)
        .eoi()
        .build();

    let pixels = Decoder::new().decode_buffer(&stream).unwrap();

    // a (3,0) basis function varies down the block only: the top row
    // rises to 129, the bottom row dips to 127
    assert!(pixels[0..8].iter().all(|p| *p == 129));
    assert!(pixels[56..64].iter().all(|p| *p == 127));
}

#[test]
fn missing_eoi_is_tolerated()
{
    // the entropy data covers both MCUs, the file just ends without an
    // EOI trailer
    let stream = StreamBuilder::new()
        .jfif()
        .flat_quantization()
        .standard_tables()
        .sof0(16, 8, &[(1, 0)])
        .sos_baseline(&[1])
        .raw(&[0x00])
        .build();

    let pixels = Decoder::new().decode_buffer(&stream).unwrap();

    assert_eq!(pixels, vec![128; 16 * 8]);
}

#[test]
fn read_headers_without_decoding()
{
    let stream = StreamBuilder::new()
        .jfif()
        .flat_quantization()
        .standard_tables()
        .sof0(640, 480, &[(1, 0), (2, 0), (3, 0)])
        .sos_baseline(&[1, 2, 3])
        .build();

    let mut decoder = Decoder::new();

    assert!(decoder.info().is_none());

    decoder.read_headers(&stream).unwrap();

    let info = decoder.info().unwrap();

    assert_eq!((info.width, info.height, info.components), (640, 480, 3));
}
