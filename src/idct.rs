#![allow(
    clippy::excessive_precision,
    clippy::unreadable_literal,
    clippy::needless_range_loop,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]
//! Dequantization and the inverse DCT.
//!
//! The transform is the separable formulation of T.81 A.3.3, one 1-D pass
//! over rows and one over columns against a precomputed cosine table,
//! with the 1/4 scale split evenly between the passes. The level shift
//! (+128) is folded into the final rounding so a block leaves here as
//! samples in `[0, 255]`.

/// `COSINES[u * 8 + x]` = cos((2x+1)·u·π/16)
#[rustfmt::skip]
const COSINES: [f32; 64] = [
     1.000000000,  1.000000000,  1.000000000,  1.000000000,  1.000000000,  1.000000000,  1.000000000,  1.000000000,
     0.980785280,  0.831469612,  0.555570233,  0.195090322, -0.195090322, -0.555570233, -0.831469612, -0.980785280,
     0.923879533,  0.382683432, -0.382683432, -0.923879533, -0.923879533, -0.382683432,  0.382683432,  0.923879533,
     0.831469612, -0.195090322, -0.980785280, -0.555570233,  0.555570233,  0.980785280,  0.195090322, -0.831469612,
     0.707106781, -0.707106781, -0.707106781,  0.707106781,  0.707106781, -0.707106781, -0.707106781,  0.707106781,
     0.555570233, -0.980785280,  0.195090322,  0.831469612, -0.831469612, -0.195090322,  0.980785280, -0.555570233,
     0.382683432, -0.923879533,  0.923879533, -0.382683432, -0.382683432,  0.923879533, -0.923879533,  0.382683432,
     0.195090322, -0.555570233,  0.831469612, -0.980785280,  0.980785280, -0.831469612,  0.555570233, -0.195090322,
];

/// Normalization factors, 1/sqrt(2) for the DC basis function.
const C: [f32; 8] = [
    std::f32::consts::FRAC_1_SQRT_2,
    1.0,
    1.0,
    1.0,
    1.0,
    1.0,
    1.0,
    1.0,
];

/// Dequantize one 8x8 coefficient block and take its inverse DCT.
///
/// `coeffs` is in natural order (the scan engine already inverted the
/// zig-zag) and so is `qtable`. Output samples are rounded, level
/// shifted and clamped to `[0, 255]`.
pub(crate) fn dequantize_and_idct_block(coeffs: &[i16; 64], qtable: &[i32; 64]) -> [i16; 64]
{
    // dequantization is pointwise, products of a 12 bit coefficient and
    // a 16 bit quantizer need the i32 before the float conversion
    let mut block = [0_f32; 64];

    for i in 0..64
    {
        block[i] = (i32::from(coeffs[i]) * qtable[i]) as f32;
    }

    // row pass, u is the horizontal frequency index
    let mut tmp = [0_f32; 64];

    for v in 0..8
    {
        for x in 0..8
        {
            let mut sum = 0_f32;

            for u in 0..8
            {
                sum += C[u] * block[v * 8 + u] * COSINES[u * 8 + x];
            }

            tmp[v * 8 + x] = 0.5 * sum;
        }
    }

    // column pass, v is the vertical frequency index
    let mut out = [0_i16; 64];

    for y in 0..8
    {
        for x in 0..8
        {
            let mut sum = 0_f32;

            for v in 0..8
            {
                sum += C[v] * tmp[v * 8 + x] * COSINES[v * 8 + y];
            }

            out[y * 8 + x] = level_shift(0.5 * sum);
        }
    }

    out
}

/// Round, add 128 and clamp to the unsigned sample range.
#[inline]
fn level_shift(x: f32) -> i16
{
    #[allow(clippy::cast_possible_truncation)]
    let p = (x.round() as i32) + 128;

    p.clamp(0, 255) as i16
}
