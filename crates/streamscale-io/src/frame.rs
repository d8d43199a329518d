//! Frame transport
//!
//! Converts between whole images and the word streams the resizer
//! consumes and produces, and wraps one complete frame round trip in
//! [`resize_image`].

use crate::{IoError, IoResult};
use log::warn;
use streamscale_core::{
    ConfigWord, Error, Geometry, GrayImage, Lanes, MAX_LANES, PixelWord, ScaleFactor,
    StreamFormat,
};
use streamscale_stream::{PipelineOptions, from_iter, resize_frame};

fn check_word_width(pixels_per_word: u32) -> IoResult<()> {
    if pixels_per_word == 0 || pixels_per_word > MAX_LANES {
        return Err(Error::InvalidFormat(format!(
            "{pixels_per_word} pixels per word (must be 1..={MAX_LANES})"
        ))
        .into());
    }
    Ok(())
}

/// The 4-word configuration burst for a frame.
pub fn config_words(geometry: Geometry, scale: ScaleFactor) -> [ConfigWord; 4] {
    let (scale, inv_scale) = scale.to_raw();
    [
        ConfigWord::new(geometry.width),
        ConfigWord::new(geometry.height),
        ConfigWord::new(u32::from(scale)),
        ConfigWord::last(u32::from(inv_scale)),
    ]
}

/// Pack an image row-major into words of `pixels_per_word` pixels.
///
/// Rows are contiguous across word boundaries. The final word carries the
/// terminal marker; its unused lanes are zero.
///
/// # Errors
///
/// Returns [`IoError::Core`] if `pixels_per_word` is not in `1..=16`.
pub fn pack_frame(image: &GrayImage, pixels_per_word: u32) -> IoResult<Vec<PixelWord>> {
    check_word_width(pixels_per_word)?;
    let chunks = image.as_slice().chunks(pixels_per_word as usize);
    let count = chunks.len();
    Ok(chunks
        .enumerate()
        .map(|(i, chunk)| PixelWord::from_lanes(Lanes::from_pixels(chunk), i + 1 == count))
        .collect())
}

/// Rebuild a `width x height` image from a word stream.
///
/// Reading stops after the first word with the terminal marker. Lanes past
/// the last pixel are ignored.
///
/// # Errors
///
/// Returns [`IoError::InvalidData`] if the stream ends before `width *
/// height` pixels, and [`IoError::Core`] for an invalid word width or zero
/// dimensions.
pub fn unpack_frame(
    words: &[PixelWord],
    pixels_per_word: u32,
    width: u32,
    height: u32,
) -> IoResult<GrayImage> {
    check_word_width(pixels_per_word)?;
    let len = (width as usize) * (height as usize);
    let mut pixels = Vec::with_capacity(len);
    let mut terminated = false;
    for word in words {
        pixels.extend(word.lanes().to_pixels(pixels_per_word));
        if word.last {
            terminated = true;
            break;
        }
    }
    if !terminated {
        warn!("frame: word stream has no terminal marker");
    }
    if pixels.len() < len {
        return Err(IoError::InvalidData(format!(
            "word stream holds {} pixels, {}x{} needs {}",
            pixels.len(),
            width,
            height,
            len
        )));
    }
    pixels.truncate(len);
    Ok(GrayImage::from_vec(width, height, pixels)?)
}

/// Run one image through the resizer.
///
/// Builds the configuration burst and source stream for `image`, runs the
/// frame, and decodes the output stream.
///
/// # Errors
///
/// Returns [`IoError::Stream`] if the pipeline fails and [`IoError::Core`]
/// if the scaled image would be empty.
pub fn resize_image(
    image: &GrayImage,
    scale: ScaleFactor,
    format: StreamFormat,
    options: &PipelineOptions,
) -> IoResult<GrayImage> {
    let mut config = from_iter(config_words(image.geometry(), scale));
    let mut pixels = from_iter(pack_frame(image, format.input_pixels())?);
    let out = resize_frame(&mut config, &mut pixels, format, options)?;
    unpack_frame(
        &out.pixels,
        format.output_pixels(),
        out.context.derived.new_width,
        out.context.derived.new_height,
    )
}
