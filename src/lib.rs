//! A baseline sequential JPEG (JFIF) decoder.
//!
//! This crate decodes Baseline DCT, Huffman coded, 8 bit precision JPEG
//! images wrapped in a JFIF container into a flat pixel buffer, either
//! grayscale(one component) or 24 bit RGB(three components).
//!
//! Anything fancier than that(progressive, arithmetic coding, 12 bit
//! precision, sub-sampled chroma, restart markers) is rejected with a
//! specific error, see [`errors::DecodeErrors`].
//!
//! # Example
//! ```no_run
//! use baseline_jpeg::Decoder;
//!
//! let data = std::fs::read("image.jpg").unwrap();
//! let pixels = Decoder::new().decode_buffer(&data).unwrap();
//! ```
#![allow(
    clippy::needless_return,
    clippy::similar_names,
    clippy::inline_always
)]
#![warn(clippy::correctness, clippy::perf, clippy::pedantic)]
#[macro_use]
extern crate log;

pub use crate::decoder::{Decoder, ImageInfo};
pub use crate::misc::ColorSpace;
pub use crate::probe::probe;

pub mod bitstream;
mod color_convert;
mod components;
mod decoder;
pub mod errors;
mod headers;
mod huffman;
mod idct;
pub mod marker;
mod mcu;
mod misc;
mod probe;
mod quantization;
mod worker;
