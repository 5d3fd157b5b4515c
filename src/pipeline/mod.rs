//! Six-stage image processing pipeline.
//!
//! Raw image → cleaning → enhancement → feature extraction. Each stage is a
//! pure transform over `image` buffers; one invocation per uploaded image,
//! no retained state between invocations.

mod clahe;
mod codec;
mod ops;

pub use codec::{
    decode_rgb, detect_mime_from_bytes, encode_gray_png, encode_rgb_png, to_data_url,
    validate_image_bytes,
};

use image::{GrayImage, RgbImage};

/// Errors at the decode/encode boundary. The transforms themselves are
/// total functions on decoded images and cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Image data too small to be valid")]
    TooSmall,

    #[error("Image data exceeds {0} MB limit")]
    TooLarge(usize),

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("PNG encoding failed: {0}")]
    Encoding(String),
}

/// Contrast enhancement parameters: clip limit and tile grid.
const CLAHE_CLIP_LIMIT: f32 = 2.0;
const CLAHE_GRID_SIZE: u32 = 8;

/// The six derived images, in display order.
#[derive(Debug)]
pub struct PipelineOutput {
    /// Input scaled to half width/height, 3-channel.
    pub resized: RgbImage,
    /// Resized image reduced to BT.601 luma.
    pub grayscale: GrayImage,
    /// Grayscale after a 5×5 Gaussian smoothing pass.
    pub denoised: GrayImage,
    /// |grayscale − denoised| — what the blur removed.
    pub noise_removed: GrayImage,
    /// Denoised image after contrast-limited adaptive equalization.
    pub enhanced: GrayImage,
    /// Binary Canny edge map of the enhanced image.
    pub edges: GrayImage,
}

/// Run the full pipeline on one decoded color image.
///
/// Pure function: running it twice on the same input produces bit-identical
/// outputs. Degenerate inputs (down to 1×1) are handled by every stage.
pub fn run(input: &RgbImage) -> PipelineOutput {
    let resized = ops::resize_half(input);
    let grayscale = ops::to_grayscale(&resized);
    let denoised = ops::denoise(&grayscale);
    let noise_removed = ops::absolute_difference(&grayscale, &denoised);
    let enhanced = clahe::clahe(&denoised, CLAHE_CLIP_LIMIT, CLAHE_GRID_SIZE, CLAHE_GRID_SIZE);
    let edges = ops::detect_edges(&enhanced);

    PipelineOutput {
        resized,
        grayscale,
        denoised,
        noise_removed,
        enhanced,
        edges,
    }
}
