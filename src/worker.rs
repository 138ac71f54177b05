//! The post-entropy pass.
//!
//! Once the scan is fully entropy decoded, every block goes through
//! dequantization and the inverse DCT and the samples are converted to
//! the output colorspace. Each 8 row band of output depends only on its
//! own MCU row of blocks, so with the `threads` feature the bands are
//! handed to a scoped thread pool; the output is identical either way.

use crate::color_convert::ycbcr_to_rgb;
use crate::idct::dequantize_and_idct_block;
use crate::mcu::DCT_BLOCK;
use crate::misc::ColorSpace;

/// Reconstruct pixels from the decoded coefficient grid.
///
/// `blocks` holds one coefficient plane per scan component in MCU raster
/// order and `qt_tables` the matching dequantization tables in natural
/// order.
pub(crate) fn post_process(
    blocks: &[Vec<i16>], qt_tables: &[[i32; 64]], width: usize, height: usize, mcu_x: usize,
    output_colorspace: ColorSpace,
) -> Vec<u8>
{
    let ncomp = output_colorspace.num_components();

    let mut pixels = vec![0_u8; width * height * ncomp];

    // one band per MCU row, the last one may be shorter than 8 rows
    let band_size = width * 8 * ncomp;

    #[cfg(feature = "threads")]
    {
        let threads = num_cpus::get().max(1);

        debug!("Running the post-entropy pass on {} threads", threads);

        #[allow(clippy::cast_possible_truncation)]
        let mut pool = scoped_threadpool::Pool::new(threads as u32);

        pool.scoped(|scope| {
            for (band_row, band) in pixels.chunks_mut(band_size).enumerate()
            {
                scope.execute(move || {
                    post_process_band(blocks, qt_tables, width, mcu_x, output_colorspace, band_row, band);
                });
            }
        });
    }

    #[cfg(not(feature = "threads"))]
    {
        for (band_row, band) in pixels.chunks_mut(band_size).enumerate()
        {
            post_process_band(blocks, qt_tables, width, mcu_x, output_colorspace, band_row, band);
        }
    }

    pixels
}

/// Dequantize, transform and colour convert one MCU row into its band of
/// output rows.
fn post_process_band(
    blocks: &[Vec<i16>], qt_tables: &[[i32; 64]], width: usize, mcu_x: usize,
    output_colorspace: ColorSpace, band_row: usize, band: &mut [u8],
)
{
    let ncomp = output_colorspace.num_components();

    // sample planes span whole blocks, samples right of the image width
    // are transform padding and are discarded below
    let stride = mcu_x * 8;

    let mut planes: Vec<Vec<i16>> = Vec::with_capacity(blocks.len());

    for (plane_blocks, qt_table) in blocks.iter().zip(qt_tables.iter())
    {
        let mut plane = vec![0_i16; stride * 8];

        for m in 0..mcu_x
        {
            let start = (band_row * mcu_x + m) * DCT_BLOCK;

            let coeffs: &[i16; 64] = plane_blocks[start..start + DCT_BLOCK]
                .try_into()
                .unwrap();

            let samples = dequantize_and_idct_block(coeffs, qt_table);

            for row in 0..8
            {
                plane[row * stride + m * 8..row * stride + m * 8 + 8]
                    .copy_from_slice(&samples[row * 8..row * 8 + 8]);
            }
        }

        planes.push(plane);
    }

    // rows below the image height never made it into the band
    let rows = band.len() / (width * ncomp);

    match output_colorspace
    {
        ColorSpace::Grayscale =>
        {
            for row in 0..rows
            {
                for x in 0..width
                {
                    // IDCT output is already level shifted to [0, 255]
                    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
                    {
                        band[row * width + x] = planes[0][row * stride + x] as u8;
                    }
                }
            }
        }
        _ =>
        {
            let mut position = 0;

            for row in 0..rows
            {
                let offset = row * stride;

                ycbcr_to_rgb(
                    &planes[0][offset..offset + width],
                    &planes[1][offset..offset + width],
                    &planes[2][offset..offset + width],
                    band,
                    &mut position,
                );
            }
        }
    }
}
