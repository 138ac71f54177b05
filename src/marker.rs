//! JPEG marker codes.
//!
//! Markers partition the stream, each one is a `0xFF` byte followed by a
//! code between `0x01` and `0xFE`.

/// Markers that can appear in a JPEG stream
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Marker
{
    /// Start of image
    SOI,
    /// End of image
    EOI,
    /// Start of frame, the argument is the frame type `n` in `SOFn`
    SOF(u8),
    /// Define Huffman tables
    DHT,
    /// Define quantization tables
    DQT,
    /// Define arithmetic coding conditioning
    DAC,
    /// Define number of lines
    DNL,
    /// Define restart interval
    DRI,
    /// Define hierarchical progression
    DHP,
    /// Expand reference components
    EXP,
    /// Start of scan
    SOS,
    /// Restart marker, the argument lies between 0 and 7
    RST(u8),
    /// Application segment, the argument is `n` in `APPn`
    APP(u8),
    /// Comment
    COM,
    /// Temporary private use
    TEM,
}

impl Marker
{
    /// Map the byte after an `0xFF` to a marker, `None` if the code is
    /// reserved or unknown.
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Marker>
    {
        match value
        {
            0x01 => Some(Marker::TEM),
            // SOF0-SOF15, minus the codes DHT(0xC4), JPG(0xC8) and
            // DAC(0xCC) share the range with.
            0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF => Some(Marker::SOF(value - 0xC0)),
            0xC4 => Some(Marker::DHT),
            0xCC => Some(Marker::DAC),
            0xD0..=0xD7 => Some(Marker::RST(value - 0xD0)),
            0xD8 => Some(Marker::SOI),
            0xD9 => Some(Marker::EOI),
            0xDA => Some(Marker::SOS),
            0xDB => Some(Marker::DQT),
            0xDC => Some(Marker::DNL),
            0xDD => Some(Marker::DRI),
            0xDE => Some(Marker::DHP),
            0xDF => Some(Marker::EXP),
            0xE0..=0xEF => Some(Marker::APP(value - 0xE0)),
            0xFE => Some(Marker::COM),
            _ => None,
        }
    }
}
