//! The individual raster transforms of the pipeline.

use image::imageops::FilterType;
use image::{GrayImage, Luma, RgbImage};
use imageproc::edges::canny;

/// Kernel size of the denoise stage.
const DENOISE_KERNEL: u32 = 5;

/// Canny hysteresis thresholds.
const CANNY_LOW: f32 = 50.0;
const CANNY_HIGH: f32 = 150.0;

/// Scale an image to half its width and height with bilinear interpolation.
/// Dimensions round half-up and never drop below 1 px.
pub fn resize_half(img: &RgbImage) -> RgbImage {
    let w = half_dim(img.width());
    let h = half_dim(img.height());
    image::imageops::resize(img, w, h, FilterType::Triangle)
}

fn half_dim(d: u32) -> u32 {
    ((d as f32 * 0.5).round() as u32).max(1)
}

/// Convert an RGB image to grayscale using ITU-R BT.601 luminance.
pub fn to_grayscale(rgb: &RgbImage) -> GrayImage {
    let (w, h) = (rgb.width(), rgb.height());
    let mut gray = GrayImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let p = rgb.get_pixel(x, y);
            let luma = (0.299 * p.0[0] as f32
                + 0.587 * p.0[1] as f32
                + 0.114 * p.0[2] as f32) as u8;
            gray.put_pixel(x, y, Luma([luma]));
        }
    }
    gray
}

/// Sigma for a Gaussian kernel of the given size — the standard
/// `0.3·((k−1)/2 − 1) + 0.8` rule used when only a kernel size is given
/// (OpenCV's auto-sigma convention; k=5 gives σ=1.1).
fn gaussian_sigma(kernel: u32) -> f32 {
    0.3 * ((kernel as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Gaussian smoothing with the pipeline's 5×5 kernel.
pub fn denoise(gray: &GrayImage) -> GrayImage {
    let kernel = gaussian_kernel(DENOISE_KERNEL, gaussian_sigma(DENOISE_KERNEL));
    gaussian_blur(gray, &kernel)
}

/// Normalized 1-D Gaussian taps for a separable blur.
fn gaussian_kernel(size: u32, sigma: f32) -> Vec<f32> {
    let radius = (size / 2) as i64;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|d| (-((d * d) as f32) / denom).exp())
        .collect();
    let sum: f32 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }
    kernel
}

/// Separable Gaussian blur with clamp-to-edge borders.
///
/// The horizontal pass accumulates into an f32 buffer so rounding happens
/// exactly once, after the vertical pass — flat regions stay exactly flat.
fn gaussian_blur(src: &GrayImage, kernel: &[f32]) -> GrayImage {
    let (w, h) = src.dimensions();
    let radius = (kernel.len() / 2) as i64;

    let mut tmp = vec![0.0f32; (w * h) as usize];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f32;
            for (i, &weight) in kernel.iter().enumerate() {
                let sx = (x as i64 + i as i64 - radius).clamp(0, w as i64 - 1) as u32;
                acc += weight * src.get_pixel(sx, y)[0] as f32;
            }
            tmp[(y * w + x) as usize] = acc;
        }
    }

    let mut out = GrayImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f32;
            for (i, &weight) in kernel.iter().enumerate() {
                let sy = (y as i64 + i as i64 - radius).clamp(0, h as i64 - 1) as u32;
                acc += weight * tmp[(sy * w + x) as usize];
            }
            out.put_pixel(x, y, Luma([acc.round().clamp(0.0, 255.0) as u8]));
        }
    }
    out
}

/// Per-pixel absolute difference — visualizes what the blur removed.
pub fn absolute_difference(a: &GrayImage, b: &GrayImage) -> GrayImage {
    debug_assert_eq!(a.dimensions(), b.dimensions());
    let mut out = GrayImage::new(a.width(), a.height());
    for (x, y, px) in out.enumerate_pixels_mut() {
        *px = Luma([a.get_pixel(x, y)[0].abs_diff(b.get_pixel(x, y)[0])]);
    }
    out
}

/// Binary Canny edge map with the pipeline's 50/150 hysteresis thresholds.
pub fn detect_edges(gray: &GrayImage) -> GrayImage {
    canny(gray, CANNY_LOW, CANNY_HIGH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn half_dim_rounds_and_floors_at_one() {
        assert_eq!(half_dim(100), 50);
        assert_eq!(half_dim(101), 51); // 50.5 rounds up
        assert_eq!(half_dim(2), 1);
        assert_eq!(half_dim(1), 1);
    }

    #[test]
    fn resize_half_keeps_a_solid_color_solid() {
        let img = RgbImage::from_pixel(20, 20, Rgb([17, 130, 201]));
        let resized = resize_half(&img);
        assert_eq!(resized.dimensions(), (10, 10));
        assert!(resized.pixels().all(|p| p.0 == [17, 130, 201]));
    }

    #[test]
    fn grayscale_uses_bt601_weights() {
        let red = RgbImage::from_pixel(1, 1, Rgb([255, 0, 0]));
        let green = RgbImage::from_pixel(1, 1, Rgb([0, 255, 0]));
        let blue = RgbImage::from_pixel(1, 1, Rgb([0, 0, 255]));
        let white = RgbImage::from_pixel(1, 1, Rgb([255, 255, 255]));

        assert_eq!(to_grayscale(&red).get_pixel(0, 0)[0], 76);
        assert_eq!(to_grayscale(&green).get_pixel(0, 0)[0], 149);
        assert_eq!(to_grayscale(&blue).get_pixel(0, 0)[0], 29);
        assert_eq!(to_grayscale(&white).get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn gaussian_sigma_matches_the_five_tap_kernel() {
        assert!((gaussian_sigma(5) - 1.1).abs() < 1e-6);
    }

    #[test]
    fn gaussian_kernel_is_normalized_and_symmetric() {
        let k = gaussian_kernel(5, 1.1);
        assert_eq!(k.len(), 5);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert_eq!(k[0], k[4]);
        assert_eq!(k[1], k[3]);
        assert!(k[2] > k[1] && k[1] > k[0]);
    }

    #[test]
    fn denoise_preserves_flat_regions_exactly() {
        let img = GrayImage::from_pixel(32, 32, Luma([140]));
        let blurred = denoise(&img);
        assert!(blurred.pixels().all(|p| p[0] == 140));
    }

    #[test]
    fn denoise_attenuates_an_isolated_spike() {
        let mut img = GrayImage::from_pixel(31, 31, Luma([0]));
        img.put_pixel(15, 15, Luma([255]));
        let blurred = denoise(&img);
        assert!(blurred.get_pixel(15, 15)[0] < 255);
        // Energy spreads into the neighborhood.
        assert!(blurred.get_pixel(14, 15)[0] > 0);
    }

    #[test]
    fn denoise_handles_images_smaller_than_the_kernel() {
        let img = GrayImage::from_pixel(2, 2, Luma([99]));
        let blurred = denoise(&img);
        assert_eq!(blurred.dimensions(), (2, 2));
        assert!(blurred.pixels().all(|p| p[0] == 99));
    }

    #[test]
    fn absolute_difference_is_symmetric() {
        let a = GrayImage::from_pixel(4, 4, Luma([200]));
        let b = GrayImage::from_pixel(4, 4, Luma([50]));
        let ab = absolute_difference(&a, &b);
        let ba = absolute_difference(&b, &a);
        assert!(ab.pixels().all(|p| p[0] == 150));
        assert_eq!(ab.as_raw(), ba.as_raw());
    }

    #[test]
    fn identical_inputs_difference_to_zero() {
        let a = GrayImage::from_pixel(8, 8, Luma([77]));
        let d = absolute_difference(&a, &a);
        assert!(d.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn detect_edges_finds_a_step_and_stays_binary() {
        let mut img = GrayImage::from_pixel(64, 64, Luma([10]));
        for y in 0..64 {
            for x in 32..64 {
                img.put_pixel(x, y, Luma([240]));
            }
        }
        let edges = detect_edges(&img);
        assert!(edges.pixels().all(|p| p[0] == 0 || p[0] == 255));
        assert!(edges.pixels().any(|p| p[0] == 255));
    }

    #[test]
    fn detect_edges_on_flat_input_is_empty() {
        let img = GrayImage::from_pixel(32, 32, Luma([128]));
        let edges = detect_edges(&img);
        assert!(edges.pixels().all(|p| p[0] == 0));
    }
}
