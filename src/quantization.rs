//! Quantization table storage.
//!
//! DQT segments carry either 8 or 16 bit entries, the two shapes are kept
//! as a tagged variant so the slot array has one type, and widened to
//! `i32` in one go before dequantization so the per-coefficient path never
//! branches on precision.

/// A dequantization table in natural (row major) order.
///
/// The writer stores entries in zig-zag order, the parser inverts that
/// before constructing one of these.
#[derive(Clone)]
pub enum QuantizationTable
{
    /// 8 bit entries, the common case
    Bit8([u8; 64]),
    /// 16 bit entries
    Bit16([u16; 64]),
}

impl QuantizationTable
{
    /// Widen the table to `i32` multipliers for the dequantizer.
    #[must_use]
    pub fn expand(&self) -> [i32; 64]
    {
        let mut out = [0_i32; 64];

        match self
        {
            Self::Bit8(entries) =>
            {
                for (value, entry) in out.iter_mut().zip(entries.iter())
                {
                    *value = i32::from(*entry);
                }
            }
            Self::Bit16(entries) =>
            {
                for (value, entry) in out.iter_mut().zip(entries.iter())
                {
                    *value = i32::from(*entry);
                }
            }
        }

        out
    }
}
