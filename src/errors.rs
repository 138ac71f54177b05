//! Contains most common errors that may be encountered in decoding a JPEG
//! image.
//!
//! Every error is terminal, the decoder gives up at the point of detection
//! and returns without yielding pixels.
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::io;

use crate::marker::Marker;

/// Common decode errors
#[allow(clippy::module_name_repetitions)]
pub enum DecodeErrors
{
    /// The SOI/APP0/JFIF prolog is absent or damaged, a thumbnail is
    /// present, or a second APP0 follows the first.
    InvalidMagicHeader(&'static str),
    /// Start of frame marker other than Baseline DCT(SOF0), carries the
    /// frame number.
    UnsupportedFrameFormat(u8),
    /// Sample precision other than 8 bits.
    UnsupportedPrecision(u8),
    /// A feature the baseline subset does not carry, e.g restart intervals
    /// or progressive spectral selection.
    UnsupportedFeature(&'static str),
    /// A second start of frame was found in the same stream.
    UnsupportedMultiframe,
    /// Component count outside {1,3} for a frame or [1,4] for a scan.
    InvalidComponentCount(u8),
    /// Sampling factor outside 1..=4, or not 1x1 for this decoder.
    InvalidSamplingFactor(u8, u8),
    /// Spectral selection parameters are not structurally valid.
    InvalidSpectralSelectionValue(&'static str),
    /// A Huffman table whose canonical construction is impossible.
    InvalidHuffmanTable(&'static str),
    /// The code count vector or symbol list ended early.
    IncompleteHuffmanTable,
    /// 16 bits were consumed without matching any assigned code.
    NoSuchHuffmanCode,
    /// DC magnitude category above 11.
    InvalidDCMagnitude(u8),
    /// AC magnitude category above 10.
    InvalidACMagnitude(u8),
    /// DQT precision nibble outside {0,1}.
    UnknownQuantizationTablePrecision(u8),
    /// A frame component selects a quantization table slot never filled.
    UnknownQuantizationTableReferenced(u8),
    /// A scan component selects a DC Huffman slot never filled.
    NonexistentDCHuffmanTableReferenced(usize),
    /// A scan component selects an AC Huffman slot never filled.
    NonexistentACHuffmanTableReferenced(usize),
    /// The scan names a component id the frame does not declare.
    UnknownComponentInScan(u8),
    /// A marker byte the decoder does not know.
    UnknownMarker(u8),
    /// Inside a frame, any marker other than DHT/DQT/SOS.
    UnknownMarkerInFrame(Marker),
    /// The stream ended while a header still needed bytes.
    ExhaustedData,
    /// Malformed stream outside the named kinds above.
    Format(String),
}

impl Display for DecodeErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            Self::InvalidMagicHeader(reason) =>
            {
                write!(f, "Not a JFIF baseline image. Reason: {}", reason)
            }
            Self::UnsupportedFrameFormat(sof) =>
            {
                write!(
                    f,
                    "The library can only decode Baseline DCT images, found SOF{}",
                    sof
                )
            }
            Self::UnsupportedPrecision(precision) =>
            {
                write!(
                    f,
                    "The library can only decode 8-bit images, the image has {} bits of precision",
                    precision
                )
            }
            Self::UnsupportedFeature(feature) =>
            {
                write!(f, "The library cannot decode images using {}", feature)
            }
            Self::UnsupportedMultiframe =>
            {
                write!(f, "Second start of frame marker found, multi-frame images are not supported")
            }
            Self::InvalidComponentCount(count) =>
            {
                write!(f, "Invalid number of components: {}", count)
            }
            Self::InvalidSamplingFactor(h, v) =>
            {
                write!(
                    f,
                    "Invalid sampling factors ({},{}), the library only decodes 1x1 sampling",
                    h, v
                )
            }
            Self::InvalidSpectralSelectionValue(reason) =>
            {
                write!(f, "Invalid spectral selection in scan header: {}", reason)
            }
            Self::InvalidHuffmanTable(reason) =>
            {
                write!(f, "Error decoding Huffman table. Reason: {}", reason)
            }
            Self::IncompleteHuffmanTable =>
            {
                write!(f, "Huffman table definition ended before its code counts or symbols")
            }
            Self::NoSuchHuffmanCode =>
            {
                write!(f, "Consumed 16 bits without matching a Huffman code, corrupt stream")
            }
            Self::InvalidDCMagnitude(category) =>
            {
                write!(f, "Invalid DC magnitude category {}, maximum is 11", category)
            }
            Self::InvalidACMagnitude(category) =>
            {
                write!(f, "Invalid AC magnitude category {}, maximum is 10", category)
            }
            Self::UnknownQuantizationTablePrecision(precision) =>
            {
                write!(
                    f,
                    "Expected QT precision value of either 0 or 1, found {}",
                    precision
                )
            }
            Self::UnknownQuantizationTableReferenced(slot) =>
            {
                write!(f, "No quantization table in referenced slot {}", slot)
            }
            Self::NonexistentDCHuffmanTableReferenced(slot) =>
            {
                write!(f, "No DC Huffman table in referenced slot {}", slot)
            }
            Self::NonexistentACHuffmanTableReferenced(slot) =>
            {
                write!(f, "No AC Huffman table in referenced slot {}", slot)
            }
            Self::UnknownComponentInScan(id) =>
            {
                write!(f, "Scan references component id {} absent from the frame", id)
            }
            Self::UnknownMarker(marker) =>
            {
                write!(f, "Marker 0xFF{:02X} is not known", marker)
            }
            Self::UnknownMarkerInFrame(marker) =>
            {
                write!(
                    f,
                    "Marker {:?} is not allowed between a frame header and its scan",
                    marker
                )
            }
            Self::ExhaustedData => write!(f, "The stream ended prematurely, exhausted data"),
            Self::Format(ref reason) => write!(f, "Error parsing image. Reason: {}", reason),
        }
    }
}

impl Debug for DecodeErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        Display::fmt(self, f)
    }
}

impl Error for DecodeErrors {}

impl From<io::Error> for DecodeErrors
{
    fn from(err: io::Error) -> DecodeErrors
    {
        DecodeErrors::Format(format!("Underlying read failed: {}", err))
    }
}
