//! Main decoder logic.
//!
//! The `Decoder` owns the table slots and frame state, walks the stream
//! marker by marker dispatching each segment to its parser, and hands the
//! entropy coded data that follows the scan header to the MCU engine.
#![allow(clippy::doc_markdown)]

use std::fs::read;
use std::io::{BufRead, Cursor, Seek};
use std::path::Path;

use crate::components::Components;
use crate::errors::DecodeErrors;
use crate::headers::{parse_dqt, parse_huffman, parse_jfif, parse_sos, parse_start_of_frame};
use crate::huffman::HuffmanTable;
use crate::marker::Marker;
use crate::misc::{read_u8, read_u16_be, skip_bytes, ColorSpace};
use crate::quantization::QuantizationTable;

/// Quantization table slots
pub(crate) const MAX_QT_TABLES: usize = 4;

/// Huffman table slots per class, baseline allows two
pub(crate) const MAX_HUFFMAN_TABLES: usize = 2;

/// Maximum image dimensions supported.
pub(crate) const MAX_DIMENSIONS: usize = 1 << 27;

/// A Decoder instance
pub struct Decoder
{
    /// Image information from the headers
    pub(crate) info: ImageInfo,
    /// Quantization tables, installed by DQT segments
    pub(crate) qt_tables: [Option<QuantizationTable>; MAX_QT_TABLES],
    /// DC Huffman tables, installed by DHT segments
    pub(crate) dc_huffman_tables: [Option<HuffmanTable>; MAX_HUFFMAN_TABLES],
    /// AC Huffman tables, installed by DHT segments
    pub(crate) ac_huffman_tables: [Option<HuffmanTable>; MAX_HUFFMAN_TABLES],
    /// Image components, holds DC predictions and table bindings per
    /// component
    pub(crate) components: Vec<Components>,
    /// Indices into `components` in the interleave order the scan header
    /// declared
    pub(crate) scan_components: Vec<usize>,
    /// Number of MCUs in the x plane
    pub(crate) mcu_x: usize,
    /// Number of MCUs in the y plane
    pub(crate) mcu_y: usize,
    /// Image input colorspace, YCbCr for a colour image, might be
    /// grayscale too
    pub(crate) input_colorspace: ColorSpace,
    /// Set when a frame header was parsed, a second one is an error
    pub(crate) seen_sof: bool,
}

impl Default for Decoder
{
    fn default() -> Self
    {
        Decoder {
            info: ImageInfo::default(),
            qt_tables: [None, None, None, None],
            dc_huffman_tables: [None, None],
            ac_huffman_tables: [None, None],
            components: vec![],
            scan_components: vec![],
            mcu_x: 0,
            mcu_y: 0,
            input_colorspace: ColorSpace::YCbCr,
            seen_sof: false,
        }
    }
}

impl Decoder
{
    /// Create a new Decoder instance
    #[must_use]
    pub fn new() -> Decoder
    {
        Decoder::default()
    }

    /// Decode a buffer already in memory
    ///
    /// The buffer should be a valid jpeg file, perhaps created by the
    /// command `std::fs::read()` or a JPEG file downloaded from the
    /// internet.
    ///
    /// Returns the pixels as a flat buffer in row major order, one byte
    /// per pixel for a grayscale image and an RGB triple per pixel for a
    /// colour image.
    ///
    /// # Errors
    /// See [`DecodeErrors`] for an explanation
    pub fn decode_buffer(&mut self, buf: &[u8]) -> Result<Vec<u8>, DecodeErrors>
    {
        self.decode_internal(&mut Cursor::new(buf))
    }

    /// Decode a valid jpeg file
    ///
    /// # Errors
    /// See [`DecodeErrors`] for an explanation
    pub fn decode_file<P>(&mut self, file: P) -> Result<Vec<u8>, DecodeErrors>
    where
        P: AsRef<Path>,
    {
        // Read to an in memory buffer
        let buffer = read(file)?;

        info!("File size: {} bytes", buffer.len());

        self.decode_internal(&mut Cursor::new(buffer.as_slice()))
    }

    /// Read only headers from a jpeg image buffer
    ///
    /// This allows you to extract important information like image width
    /// and height without decoding the full image
    ///
    /// # Errors
    /// See [`DecodeErrors`] enum for list of possible errors during
    /// decoding
    pub fn read_headers(&mut self, buf: &[u8]) -> Result<(), DecodeErrors>
    {
        self.decode_headers_internal(&mut Cursor::new(buf))
    }

    /// Returns the image information
    ///
    /// This **must** be called after a call to `decode_buffer`,
    /// `decode_file` or `read_headers`, otherwise it will return `None`
    #[must_use]
    pub fn info(&self) -> Option<ImageInfo>
    {
        // width cannot be zero in a decodable image, so a zero here means
        // no frame header was parsed yet
        if self.info.width == 0
        {
            return None;
        }

        Some(self.info.clone())
    }

    /// Get the width of the image as a u16
    #[must_use]
    pub fn width(&self) -> u16
    {
        self.info.width
    }

    /// Get the height of the image as a u16
    #[must_use]
    pub fn height(&self) -> u16
    {
        self.info.height
    }

    /// The colorspace pixels will be decoded into, `Grayscale` for a one
    /// component image and `RGB` otherwise.
    #[must_use]
    pub fn output_colorspace(&self) -> ColorSpace
    {
        if self.input_colorspace == ColorSpace::Grayscale
        {
            return ColorSpace::Grayscale;
        }

        ColorSpace::RGB
    }

    fn decode_internal<R>(&mut self, buf: &mut R) -> Result<Vec<u8>, DecodeErrors>
    where
        R: BufRead + Seek,
    {
        self.decode_headers_internal(buf)?;

        self.decode_mcu_baseline(buf)
    }

    /// Decode headers up to and including the start of scan.
    ///
    /// # Supported headers
    ///  - APP(0), which must directly follow SOI and carry a JFIF header
    ///  - SOF(0)
    ///  - DQT -> Quantization tables
    ///  - DHT -> Huffman tables
    ///  - SOS -> Start of Scan
    /// # Unsupported headers
    ///  - SOF(n) for n other than 0
    ///  - DAC, DRI, DNL, DHP, EXP
    fn decode_headers_internal<R>(&mut self, buf: &mut R) -> Result<(), DecodeErrors>
    where
        R: BufRead + Seek,
    {
        // First two bytes should be the jpeg soi marker
        if read_u16_be(buf)? != 0xFFD8
        {
            return Err(DecodeErrors::InvalidMagicHeader(
                "stream does not start with SOI",
            ));
        }

        // and the segment that follows must be the JFIF APP0
        if read_u16_be(buf)? != 0xFFE0
        {
            return Err(DecodeErrors::InvalidMagicHeader(
                "SOI is not followed by an APP0 segment",
            ));
        }

        parse_jfif(self, buf)?;

        loop
        {
            let marker = read_marker(buf)?;

            if self.parse_marker_inner(marker, buf)?
            {
                // Start of scan seen, what follows is the image data
                return Ok(());
            }
        }
    }

    /// Dispatch a single marker, returning `true` once the scan header
    /// has been consumed.
    fn parse_marker_inner<R>(&mut self, marker: Marker, buf: &mut R) -> Result<bool, DecodeErrors>
    where
        R: BufRead + Seek,
    {
        match marker
        {
            Marker::SOF(0) =>
            {
                if self.seen_sof
                {
                    return Err(DecodeErrors::UnsupportedMultiframe);
                }

                info!("Image encoding scheme = Baseline DCT");

                parse_start_of_frame(self, buf)?;

                self.seen_sof = true;
            }
            // Start of frame segments the decoder does not support
            Marker::SOF(v) =>
            {
                return Err(DecodeErrors::UnsupportedFrameFormat(v));
            }
            // Quantization tables
            Marker::DQT =>
            {
                parse_dqt(self, buf)?;
            }
            // Huffman tables
            Marker::DHT =>
            {
                parse_huffman(self, buf)?;
            }
            // Start of scan data
            Marker::SOS =>
            {
                if !self.seen_sof
                {
                    return Err(DecodeErrors::Format(
                        "Scan header appears before the frame header".to_string(),
                    ));
                }

                parse_sos(self, buf)?;

                return Ok(true);
            }
            Marker::DAC =>
            {
                return Err(DecodeErrors::UnsupportedFeature("arithmetic coding"));
            }
            Marker::DNL =>
            {
                return Err(DecodeErrors::UnsupportedFeature(
                    "define-number-of-lines segments",
                ));
            }
            Marker::DRI =>
            {
                return Err(DecodeErrors::UnsupportedFeature("restart intervals"));
            }
            Marker::DHP =>
            {
                return Err(DecodeErrors::UnsupportedFeature("hierarchical progression"));
            }
            Marker::EXP =>
            {
                return Err(DecodeErrors::UnsupportedFeature(
                    "reference component expansion",
                ));
            }
            Marker::EOI =>
            {
                return Err(DecodeErrors::Format("Premature end of image".to_string()));
            }
            Marker::APP(_) | Marker::COM =>
            {
                // legal between segments before the frame, opaque either
                // way
                if self.seen_sof
                {
                    return Err(DecodeErrors::UnknownMarkerInFrame(marker));
                }

                skip_segment(marker, buf)?;
            }
            Marker::SOI | Marker::RST(_) | Marker::TEM =>
            {
                if self.seen_sof
                {
                    return Err(DecodeErrors::UnknownMarkerInFrame(marker));
                }

                return Err(DecodeErrors::Format(format!(
                    "Marker {:?} is not valid between header segments",
                    marker
                )));
            }
        }

        Ok(false)
    }
}

/// Read the next marker, tolerating 0xFF fill bytes before the code.
fn read_marker<R>(buf: &mut R) -> Result<Marker, DecodeErrors>
where
    R: BufRead,
{
    let byte = read_u8(buf)?;

    if byte != 0xFF
    {
        return Err(DecodeErrors::Format(format!(
            "Expected a marker, found stray byte 0x{:02X}",
            byte
        )));
    }

    let mut code = read_u8(buf)?;

    while code == 0xFF
    {
        code = read_u8(buf)?;
    }

    Marker::from_u8(code).ok_or(DecodeErrors::UnknownMarker(code))
}

/// Skip a length-prefixed segment we do not interpret.
fn skip_segment<R>(marker: Marker, buf: &mut R) -> Result<(), DecodeErrors>
where
    R: BufRead + Seek,
{
    let length = read_u16_be(buf)?;

    if length < 2
    {
        return Err(DecodeErrors::Format(format!(
            "Found a marker with invalid length: {}",
            length
        )));
    }

    warn!("Skipping {:?} segment, {} bytes", marker, length - 2);

    skip_bytes(buf, i64::from(length) - 2)?;

    Ok(())
}

/// A struct representing image information
#[derive(Default, Clone, Eq, PartialEq)]
#[allow(clippy::module_name_repetitions)]
pub struct ImageInfo
{
    /// Width of the image
    pub width: u16,
    /// Height of image
    pub height: u16,
    /// JFIF density unit, 0 = aspect ratio only, 1 = dpi, 2 = dpcm
    pub pixel_density: u8,
    /// Horizontal pixel density
    pub x_density: u16,
    /// Vertical pixel density
    pub y_density: u16,
    /// Number of components
    pub components: u8,
}
