#![allow(clippy::cast_possible_truncation)]
//! Per-component state extracted from a SOF header and updated by the
//! scan header.

use crate::errors::DecodeErrors;

/// Component data from the start of frame
#[derive(Clone)]
pub(crate) struct Components
{
    /// The component identifier the stream uses for this channel,
    /// scan headers refer back to it.
    pub id: u8,
    /// Sampling ratio of this component in the x plane, 1..=4
    pub horizontal_sample: usize,
    /// Sampling ratio of this component in the y plane, 1..=4
    pub vertical_sample: usize,
    /// Quantization table slot, 0..=3
    pub quantization_table_number: u8,
    /// DC Huffman table slot, bound by the scan header
    pub dc_huff_table: usize,
    /// AC Huffman table slot, bound by the scan header
    pub ac_huff_table: usize,
    /// DC prediction for the component, reset at every scan start
    pub dc_pred: i32,
}

impl Components
{
    /// Create a new instance from the three bytes a SOF header carries
    /// per component.
    pub fn from(a: [u8; 3]) -> Result<Components, DecodeErrors>
    {
        let id = a[0];

        let horizontal_sample = usize::from(a[1] >> 4);
        let vertical_sample = usize::from(a[1] & 0x0F);
        let quantization_table_number = a[2];

        if !(1..=4).contains(&horizontal_sample) || !(1..=4).contains(&vertical_sample)
        {
            return Err(DecodeErrors::InvalidSamplingFactor(
                horizontal_sample as u8,
                vertical_sample as u8,
            ));
        }

        if quantization_table_number > 3
        {
            return Err(DecodeErrors::Format(format!(
                "Too large quantization table slot {}, expected a value between 0 and 3",
                quantization_table_number
            )));
        }

        info!(
            "Component ID:{} HS:{} VS:{} QT:{}",
            id, horizontal_sample, vertical_sample, quantization_table_number
        );

        Ok(Components {
            id,
            horizontal_sample,
            vertical_sample,
            quantization_table_number,
            // bound later by the scan header
            dc_huff_table: 0,
            ac_huff_table: 0,
            dc_pred: 0,
        })
    }
}
