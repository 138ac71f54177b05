#![allow(clippy::cast_possible_truncation)]
//! Decode JPEG markers/segments
//!
//! This file deals with decoding header information in a JPEG file, the
//! JFIF prolog, quantization tables, Huffman tables, the frame header and
//! the scan header.

use std::io::{BufRead, Read, Seek, SeekFrom};

use crate::components::Components;
use crate::decoder::{Decoder, MAX_DIMENSIONS};
use crate::errors::DecodeErrors;
use crate::huffman::HuffmanTable;
use crate::misc::{read_u8, read_u16_be, skip_bytes, ColorSpace, UN_ZIGZAG};
use crate::quantization::QuantizationTable;

/// **JFIF B.1** APP0 application segment.
///
/// The decoder insists on a JFIF stream, SOI must be followed by an APP0
/// whose identifier is `"JFIF\0"`, carrying no thumbnail. A second APP0
/// directly after the first is rejected as well.
pub(crate) fn parse_jfif<R>(decoder: &mut Decoder, buf: &mut R) -> Result<(), DecodeErrors>
where
    R: BufRead + Seek,
{
    let length = read_u16_be(buf)?;

    if length < 16
    {
        return Err(DecodeErrors::InvalidMagicHeader(
            "APP0 segment too short to hold a JFIF header",
        ));
    }

    let mut identifier = [0_u8; 5];

    buf.read_exact(&mut identifier)
        .map_err(|_| DecodeErrors::ExhaustedData)?;

    if &identifier != b"JFIF\0"
    {
        return Err(DecodeErrors::InvalidMagicHeader(
            "APP0 identifier is not JFIF",
        ));
    }

    let version_major = read_u8(buf)?;
    let version_minor = read_u8(buf)?;

    debug!("JFIF revision {}.{:02}", version_major, version_minor);

    let density_unit = read_u8(buf)?;

    if density_unit > 2
    {
        warn!("Unknown density unit {}, ignoring", density_unit);
    }

    decoder.info.pixel_density = density_unit;
    decoder.info.x_density = read_u16_be(buf)?;
    decoder.info.y_density = read_u16_be(buf)?;

    let thumbnail_width = read_u8(buf)?;
    let thumbnail_height = read_u8(buf)?;

    if thumbnail_width != 0 || thumbnail_height != 0
    {
        return Err(DecodeErrors::InvalidMagicHeader(
            "JFIF header carries an embedded thumbnail",
        ));
    }

    // tolerate trailing bytes the length still accounts for
    if length > 16
    {
        warn!("Skipping {} trailing bytes in the APP0 segment", length - 16);

        skip_bytes(buf, i64::from(length) - 16)?;
    }

    // look ahead one marker, a conforming stream carries a single APP0
    if read_u16_be(buf)? == 0xFFE0
    {
        return Err(DecodeErrors::InvalidMagicHeader(
            "a second APP0 segment follows the JFIF header",
        ));
    }

    buf.seek(SeekFrom::Current(-2))?;

    Ok(())
}

/// **B.2.4.1 Quantization table-specification syntax**
///
/// A single DQT segment may carry multiple tables, each 64 entries in
/// zig-zag order which are inverted into natural order here, once.
pub(crate) fn parse_dqt<R>(decoder: &mut Decoder, buf: &mut R) -> Result<(), DecodeErrors>
where
    R: Read,
{
    let qt_length = read_u16_be(buf)?.checked_sub(2).ok_or_else(|| {
        DecodeErrors::Format("Invalid DQT segment length, cannot be less than 2".to_string())
    })?;

    let mut length_read: u16 = 0;

    while length_read < qt_length
    {
        let qt_info = read_u8(buf)?;

        // 0 = 8 bit, 1 = 16 bit
        let precision = qt_info >> 4;
        // lower 4 bits give the destination slot
        let table_position = usize::from(qt_info & 0x0F);

        if table_position > 3
        {
            return Err(DecodeErrors::Format(format!(
                "Too large quantization table slot {}, expected a value between 0 and 3",
                table_position
            )));
        }

        let table = match precision
        {
            0 =>
            {
                let mut qt_values = [0_u8; 64];

                buf.read_exact(&mut qt_values)
                    .map_err(|_| DecodeErrors::ExhaustedData)?;

                length_read += 65;

                QuantizationTable::Bit8(un_zig_zag(&qt_values))
            }
            1 =>
            {
                let mut qt_values = [0_u16; 64];

                for value in &mut qt_values
                {
                    *value = read_u16_be(buf)?;
                }

                length_read += 129;

                QuantizationTable::Bit16(un_zig_zag(&qt_values))
            }
            _ =>
            {
                return Err(DecodeErrors::UnknownQuantizationTablePrecision(precision));
            }
        };

        info!(
            "Installing {} bit quantization table in slot {}",
            8 * (u16::from(precision) + 1),
            table_position
        );

        // a later table overwrites any previous occupant of the slot
        decoder.qt_tables[table_position] = Some(table);
    }

    Ok(())
}

/// **B.2.4.2 Huffman table-specification syntax**
#[allow(clippy::similar_names)]
pub(crate) fn parse_huffman<R>(decoder: &mut Decoder, buf: &mut R) -> Result<(), DecodeErrors>
where
    R: Read,
{
    let dht_length = read_u16_be(buf)?.checked_sub(2).ok_or_else(|| {
        DecodeErrors::Format("Invalid DHT segment length, cannot be less than 2".to_string())
    })?;

    let mut length_read: u16 = 0;

    // A single DHT marker may contain multiple Huffman Tables.
    while length_read < dht_length
    {
        let ht_info = read_u8(buf)?;

        // high nibble: 0 = DC table, 1 = AC table
        let table_class = ht_info >> 4;
        // low nibble: destination slot, baseline allows 0 and 1
        let index = usize::from(ht_info & 0x0F);

        if table_class > 1
        {
            return Err(DecodeErrors::InvalidHuffmanTable(
                "table class outside DC(0)/AC(1)",
            ));
        }

        if index > 1
        {
            return Err(DecodeErrors::Format(format!(
                "Huffman table slot {} is outside the baseline range of 0..=1",
                index
            )));
        }

        // the number of codes of each bit length, 1-indexed
        let mut code_counts: [u8; 17] = [0; 17];

        buf.read_exact(&mut code_counts[1..17])
            .map_err(|_| DecodeErrors::IncompleteHuffmanTable)?;

        let symbols_sum: u16 = code_counts.iter().map(|f| u16::from(*f)).sum();

        if symbols_sum > 256
        {
            return Err(DecodeErrors::InvalidHuffmanTable(
                "code counts demand more than 256 symbols",
            ));
        }

        // symbols in order of increasing code length
        let mut symbols: Vec<u8> = vec![0; symbols_sum.into()];

        buf.read_exact(&mut symbols)
            .map_err(|_| DecodeErrors::IncompleteHuffmanTable)?;

        length_read += 17 + symbols_sum;

        let table = HuffmanTable::new(&code_counts, symbols)?;

        if table_class == 0
        {
            decoder.dc_huffman_tables[index] = Some(table);
        }
        else
        {
            decoder.ac_huffman_tables[index] = Some(table);
        }
    }

    Ok(())
}

/// **B.2.2 Frame header syntax**, baseline DCT only.
pub(crate) fn parse_start_of_frame<R>(decoder: &mut Decoder, buf: &mut R) -> Result<(), DecodeErrors>
where
    R: Read,
{
    let length = read_u16_be(buf)?;

    // usually 8, but can be 12 and 16 in extended schemes we reject
    let precision = read_u8(buf)?;

    if precision != 8
    {
        return Err(DecodeErrors::UnsupportedPrecision(precision));
    }

    let img_height = read_u16_be(buf)?;
    let img_width = read_u16_be(buf)?;

    if img_width == 0 || img_height == 0
    {
        return Err(DecodeErrors::Format(
            "Image width or height is set to zero, cannot continue".to_string(),
        ));
    }

    if usize::from(img_width) * usize::from(img_height) > MAX_DIMENSIONS
    {
        return Err(DecodeErrors::Format(format!(
            "Image dimensions {}x{} are larger than the library supports",
            img_width, img_height
        )));
    }

    let num_components = read_u8(buf)?;

    if num_components != 1 && num_components != 3
    {
        return Err(DecodeErrors::InvalidComponentCount(num_components));
    }

    // the declared length must exactly account for the bytes read
    if length != u16::from(8 + 3 * num_components)
    {
        return Err(DecodeErrors::Format(format!(
            "Length of start of frame differs from expected {}, value is {}",
            8 + 3 * num_components,
            length
        )));
    }

    info!("Image dimensions: {} x {}", img_width, img_height);

    decoder.info.width = img_width;
    decoder.info.height = img_height;
    decoder.info.components = num_components;

    let mut components = Vec::with_capacity(usize::from(num_components));
    let mut temp = [0; 3];

    for _ in 0..num_components
    {
        buf.read_exact(&mut temp)
            .map_err(|_| DecodeErrors::ExhaustedData)?;

        components.push(Components::from(temp)?);
    }

    // the MCU grid assumes one block per component, which only holds when
    // nothing is sub-sampled
    for component in &components
    {
        if component.horizontal_sample != 1 || component.vertical_sample != 1
        {
            return Err(DecodeErrors::InvalidSamplingFactor(
                component.horizontal_sample as u8,
                component.vertical_sample as u8,
            ));
        }
    }

    decoder.input_colorspace = if num_components == 1
    {
        ColorSpace::Grayscale
    }
    else
    {
        ColorSpace::YCbCr
    };

    decoder.mcu_x = (usize::from(img_width) + 7) / 8;
    decoder.mcu_y = (usize::from(img_height) + 7) / 8;

    decoder.components = components;

    Ok(())
}

/// **B.2.3 Scan header syntax**
///
/// Binds each named frame component to its DC and AC Huffman tables and
/// resets the DC predictors, entropy coded data follows immediately.
pub(crate) fn parse_sos<R>(decoder: &mut Decoder, buf: &mut R) -> Result<(), DecodeErrors>
where
    R: Read,
{
    let ls = read_u16_be(buf)?;

    // number of image components in the scan
    let ns = read_u8(buf)?;

    if !(1..=4).contains(&ns)
    {
        return Err(DecodeErrors::InvalidComponentCount(ns));
    }

    if ls != u16::from(6 + 2 * ns)
    {
        return Err(DecodeErrors::Format(
            "Bad SOS length, corrupt jpeg".to_string(),
        ));
    }

    if usize::from(ns) != decoder.components.len()
    {
        // a scan covering a subset of the frame implies multiple scans
        return Err(DecodeErrors::UnsupportedFeature(
            "multi-scan sequential images",
        ));
    }

    decoder.scan_components.clear();

    for _ in 0..ns
    {
        let component_id = read_u8(buf)?;

        let position = decoder
            .components
            .iter()
            .position(|c| c.id == component_id)
            .ok_or(DecodeErrors::UnknownComponentInScan(component_id))?;

        // top 4 bits name the DC table, the lower four the AC table
        let tables = read_u8(buf)?;

        let dc_table = usize::from(tables >> 4);
        let ac_table = usize::from(tables & 0x0F);

        if dc_table > 1 || ac_table > 1
        {
            return Err(DecodeErrors::Format(format!(
                "Huffman table selectors ({},{}) are outside the baseline range of 0..=1",
                dc_table, ac_table
            )));
        }

        decoder.components[position].dc_huff_table = dc_table;
        decoder.components[position].ac_huff_table = ac_table;

        decoder.scan_components.push(position);
    }

    // spectral selection and successive approximation parameters
    let spec_start = read_u8(buf)?;
    let spec_end = read_u8(buf)?;

    let approx = read_u8(buf)?;

    let approx_high = approx >> 4;
    let approx_low = approx & 0x0F;

    if spec_start > 63 || spec_end > 63
    {
        return Err(DecodeErrors::InvalidSpectralSelectionValue(
            "spectral selection bound above 63",
        ));
    }

    if spec_end < spec_start
    {
        return Err(DecodeErrors::InvalidSpectralSelectionValue(
            "end of spectral selection smaller than its start",
        ));
    }

    if spec_start == 0 && spec_end != 63
    {
        return Err(DecodeErrors::InvalidSpectralSelectionValue(
            "a scan starting at the DC coefficient must span the full spectrum",
        ));
    }

    // a baseline scan is always the full spectrum with no approximation
    if (spec_start, spec_end, approx_high, approx_low) != (0, 63, 0, 0)
    {
        return Err(DecodeErrors::UnsupportedFeature(
            "progressive spectral selection or successive approximation",
        ));
    }

    // predictors start from zero in every scan
    for component in &mut decoder.components
    {
        component.dc_pred = 0;
    }

    Ok(())
}

/// Invert the writer's zig-zag ordering into natural (row major) order.
fn un_zig_zag<T>(a: &[T; 64]) -> [T; 64]
where
    T: Copy + Default,
{
    let mut output = [T::default(); 64];

    for i in 0..64
    {
        output[UN_ZIGZAG[i]] = a[i];
    }

    output
}
