//! Small utilities shared by the rest of the decoder, byte reading helpers,
//! the zig-zag permutation and colorspace identifiers.

use std::io::{BufRead, Read, Seek, SeekFrom};

use crate::errors::DecodeErrors;

/// Undo zig-zag ordering of coefficients by placing them in natural
/// (row major) order.
///
/// `UN_ZIGZAG[k]` is the natural-order offset of the coefficient at
/// position `k` of the encoding order.
#[rustfmt::skip]
pub const UN_ZIGZAG: [usize; 64] = [
    0,  1,  8,  16, 9,  2,  3, 10,
    17, 24, 32, 25, 18, 11, 4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13, 6,  7,  14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

/// Color spaces the decoder deals with.
///
/// The input side is either `YCbCr`(three components) or
/// `Grayscale`(one component), the output side is `RGB` or `Grayscale`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ColorSpace
{
    /// Red, Green, Blue
    RGB,
    /// Monochrome
    Grayscale,
    /// Y/Cb/Cr, (also known as YUV)
    YCbCr,
}

impl ColorSpace
{
    /// Number of channels in this color space
    #[must_use]
    pub const fn num_components(self) -> usize
    {
        match self
        {
            Self::RGB | Self::YCbCr => 3,
            Self::Grayscale => 1,
        }
    }
}

/// Read a single byte from the stream.
///
/// # Errors
/// `ExhaustedData` when the stream has no byte left.
#[inline]
pub fn read_u8<R>(reader: &mut R) -> Result<u8, DecodeErrors>
where
    R: Read,
{
    let mut tmp = [0; 1];

    reader
        .read_exact(&mut tmp)
        .map_err(|_| DecodeErrors::ExhaustedData)?;

    Ok(tmp[0])
}

/// Read two bytes and combine them into a `u16` in big endian order, the
/// byte order of every multi-byte field in a JPEG stream.
///
/// # Errors
/// `ExhaustedData` when fewer than two bytes remain.
#[inline]
pub fn read_u16_be<R>(reader: &mut R) -> Result<u16, DecodeErrors>
where
    R: Read,
{
    let mut tmp: [u8; 2] = [0, 0];

    reader
        .read_exact(&mut tmp)
        .map_err(|_| DecodeErrors::ExhaustedData)?;

    Ok(u16::from_be_bytes(tmp))
}

/// Skip `count` bytes of payload, used for APPn and COM segments whose
/// content we do not interpret.
#[inline]
pub fn skip_bytes<R>(reader: &mut R, count: i64) -> Result<(), DecodeErrors>
where
    R: BufRead + Seek,
{
    reader.seek(SeekFrom::Current(count))?;

    Ok(())
}
