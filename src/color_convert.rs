#![allow(
    clippy::many_single_char_names,
    clippy::similar_names,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
//! YCbCr to RGB conversion
//!
//! The JFIF relation with K_r = 0.299, K_g = 0.587, K_b = 0.114 reduces to
//! ```text
//! R = Y + 1.40200 * Cr
//! G = Y - 0.34414 * Cb - 0.71414 * Cr
//! B = Y + 1.77200 * Cb
//! ```
//! computed here in 16 bit fixed point, which keeps every channel within
//! one of the floating point result.

/// Limit values to 0 and 255
#[inline]
fn clamp(a: i32) -> u8
{
    a.clamp(0, 255) as u8
}

/// Convert a run of level-shifted YCbCr samples (each in `[0, 255]`) to
/// RGB triples, written to `output` starting at `*pos`.
///
/// `pos` is advanced by three bytes per pixel.
pub(crate) fn ycbcr_to_rgb(y: &[i16], cb: &[i16], cr: &[i16], output: &mut [u8], pos: &mut usize)
{
    for (y, (cb, cr)) in y.iter().zip(cb.iter().zip(cr.iter()))
    {
        let y = i32::from(*y);

        // chroma is centred on 128
        let cb = i32::from(*cb) - 128;
        let cr = i32::from(*cr) - 128;

        // coefficients scaled by 1<<16, the added 32768 rounds
        let r = y + ((91881 * cr + 32768) >> 16);
        let g = y - ((22554 * cb + 46802 * cr + 32768) >> 16);
        let b = y + ((116131 * cb + 32768) >> 16);

        output[*pos] = clamp(r);
        output[*pos + 1] = clamp(g);
        output[*pos + 2] = clamp(b);

        *pos += 3;
    }
}
