//! Cheap format detection.

/// Probe a buffer and return a boolean to show if this looks like a JFIF
/// image.
///
/// True iff the stream opens with an SOI marker and carries the ASCII
/// bytes `JFIF` at absolute offset 6, where the APP0 identifier of a
/// conforming file lives. No headers are parsed.
#[must_use]
pub fn probe(buffer: &[u8]) -> bool
{
    buffer.len() >= 10 && buffer[..2] == [0xFF, 0xD8] && &buffer[6..10] == b"JFIF"
}
