//! Implements routines to decode the MCUs of a scan.
//!
//! For the supported subset (no sub-sampling) an MCU is exactly one 8x8
//! block per scan component and the grid is `ceil(width/8) x
//! ceil(height/8)` MCUs in raster order.

use std::io::BufRead;

use crate::bitstream::BitStream;
use crate::errors::DecodeErrors;
use crate::huffman::HuffmanTable;
use crate::marker::Marker;
use crate::worker::post_process;
use crate::Decoder;

/// The number of coefficients in one block.
pub(crate) const DCT_BLOCK: usize = 64;

impl Decoder
{
    /// Decode the entropy coded data following the scan header into the
    /// coefficient grid, then run the post-entropy pass and return the
    /// pixels.
    #[allow(clippy::unwrap_used)]
    pub(crate) fn decode_mcu_baseline<R>(&mut self, reader: &mut R) -> Result<Vec<u8>, DecodeErrors>
    where
        R: BufRead,
    {
        let mcu_count = self.mcu_x * self.mcu_y;

        let scan_order = self.scan_components.clone();

        // Resolve every table binding before the hot loop so a missing
        // slot fails here with a specific error.
        let mut dc_tables: Vec<&HuffmanTable> = Vec::with_capacity(scan_order.len());
        let mut ac_tables: Vec<&HuffmanTable> = Vec::with_capacity(scan_order.len());
        let mut qt_tables: Vec<[i32; 64]> = Vec::with_capacity(scan_order.len());

        for &pos in &scan_order
        {
            let component = &self.components[pos];

            dc_tables.push(
                self.dc_huffman_tables[component.dc_huff_table]
                    .as_ref()
                    .ok_or(DecodeErrors::NonexistentDCHuffmanTableReferenced(
                        component.dc_huff_table,
                    ))?,
            );

            ac_tables.push(
                self.ac_huffman_tables[component.ac_huff_table]
                    .as_ref()
                    .ok_or(DecodeErrors::NonexistentACHuffmanTableReferenced(
                        component.ac_huff_table,
                    ))?,
            );

            qt_tables.push(
                self.qt_tables[usize::from(component.quantization_table_number)]
                    .as_ref()
                    .ok_or(DecodeErrors::UnknownQuantizationTableReferenced(
                        component.quantization_table_number,
                    ))?
                    .expand(),
            );
        }

        // The coefficient grid, one plane per scan component with blocks
        // in MCU raster order. Blocks a truncated stream never reaches
        // stay zero.
        let mut blocks: Vec<Vec<i16>> = scan_order
            .iter()
            .map(|_| vec![0_i16; mcu_count * DCT_BLOCK])
            .collect();

        let mut stream = BitStream::new();

        'scan: for mcu in 0..mcu_count
        {
            for (scan_pos, &comp_pos) in scan_order.iter().enumerate()
            {
                let component = &mut self.components[comp_pos];

                let start = mcu * DCT_BLOCK;

                let block: &mut [i16; 64] = (&mut blocks[scan_pos][start..start + DCT_BLOCK])
                    .try_into()
                    .unwrap();

                stream.decode_block(
                    reader,
                    dc_tables[scan_pos],
                    ac_tables[scan_pos],
                    block,
                    &mut component.dc_pred,
                )?;

                if let Some(marker) = stream.marker
                {
                    match marker
                    {
                        Marker::EOI =>
                        {
                            debug!("EOI marker found inside entropy data, wrapping up here");

                            break 'scan;
                        }
                        Marker::SOF(_) =>
                        {
                            warn!("{:?} found inside entropy data, treating it as end of scan", marker);

                            break 'scan;
                        }
                        _ =>
                        {
                            return Err(DecodeErrors::Format(format!(
                                "Marker {:?} found inside entropy coded data, cannot continue",
                                marker
                            )));
                        }
                    }
                }

                if stream.eof
                {
                    warn!("Premature end of entropy coded data");

                    break 'scan;
                }
            }
        }

        if stream.marker.is_none() && !stream.eof
        {
            consume_trailing_marker(reader);
        }

        debug!("Finished decoding the scan");

        Ok(post_process(
            &blocks,
            &qt_tables,
            usize::from(self.info.width),
            usize::from(self.info.height),
            self.mcu_x,
            self.output_colorspace(),
        ))
    }
}

/// Walk past any padding after the entropy data and confirm the stream
/// closes with EOI. Purely informational, a missing trailer does not fail
/// a fully decoded image.
fn consume_trailing_marker<R>(reader: &mut R)
where
    R: BufRead,
{
    let mut tmp = [0_u8; 1];

    loop
    {
        if reader.read_exact(&mut tmp).is_err()
        {
            warn!("No EOI marker at the end of the stream");

            return;
        }

        if tmp[0] != 0xFF
        {
            continue;
        }

        // skip fill bytes
        while tmp[0] == 0xFF
        {
            if reader.read_exact(&mut tmp).is_err()
            {
                warn!("No EOI marker at the end of the stream");

                return;
            }
        }

        match tmp[0]
        {
            // a stuffed data byte, keep walking
            0x00 => continue,
            0xD9 =>
            {
                debug!("EOI marker found");

                return;
            }
            code =>
            {
                warn!("Expected EOI at the end of the stream, found 0xFF{:02X}", code);

                return;
            }
        }
    }
}
