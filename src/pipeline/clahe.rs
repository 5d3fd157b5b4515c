//! Contrast-limited adaptive histogram equalization.
//!
//! Histogram equalization computed per tile, with a clip limit bounding how
//! steep any local mapping can get. Per-pixel output is a bilinear blend of
//! the lookup tables of the four nearest tile centers, which hides the tile
//! seams plain tiled equalization would show. The image is extended to a
//! whole number of tiles by edge replication so every tile sees the same
//! pixel count — the same convention OpenCV's `createCLAHE` uses.

use image::GrayImage;

/// Equalize `src` over a `grid_cols` × `grid_rows` tile grid.
///
/// `clip_limit` is the relative histogram ceiling: each tile bin is capped
/// at `clip_limit · tile_pixels / 256` (floor 1) and the clipped excess is
/// redistributed across the histogram before the mapping is built.
pub fn clahe(src: &GrayImage, clip_limit: f32, grid_cols: u32, grid_rows: u32) -> GrayImage {
    let (w, h) = src.dimensions();
    if w == 0 || h == 0 {
        return src.clone();
    }

    // Degenerate images get a grid no finer than their pixel count.
    let cols = grid_cols.clamp(1, w);
    let rows = grid_rows.clamp(1, h);
    let tile_w = w.div_ceil(cols);
    let tile_h = h.div_ceil(rows);

    let padded = pad_to_grid(src, tile_w * cols, tile_h * rows);
    let luts = tile_luts(&padded, clip_limit, cols, rows, tile_w, tile_h);

    let mut out = GrayImage::new(w, h);
    for y in 0..h {
        // Position in tile-center coordinates.
        let fy = (y as f32 + 0.5) / tile_h as f32 - 0.5;
        let ty = fy.floor();
        let wy = fy - ty;
        let r0 = (ty as i64).clamp(0, (rows - 1) as i64) as usize;
        let r1 = (ty as i64 + 1).clamp(0, (rows - 1) as i64) as usize;

        for x in 0..w {
            let fx = (x as f32 + 0.5) / tile_w as f32 - 0.5;
            let tx = fx.floor();
            let wx = fx - tx;
            let c0 = (tx as i64).clamp(0, (cols - 1) as i64) as usize;
            let c1 = (tx as i64 + 1).clamp(0, (cols - 1) as i64) as usize;

            let p = src.get_pixel(x, y)[0] as usize;
            let top = luts[r0 * cols as usize + c0][p] as f32 * (1.0 - wx)
                + luts[r0 * cols as usize + c1][p] as f32 * wx;
            let bottom = luts[r1 * cols as usize + c0][p] as f32 * (1.0 - wx)
                + luts[r1 * cols as usize + c1][p] as f32 * wx;
            let v = top * (1.0 - wy) + bottom * wy;

            out.put_pixel(x, y, image::Luma([v.round().clamp(0.0, 255.0) as u8]));
        }
    }
    out
}

/// Extend an image to `(pw, ph)` by replicating its last column and row.
fn pad_to_grid(src: &GrayImage, pw: u32, ph: u32) -> GrayImage {
    let (w, h) = src.dimensions();
    if (w, h) == (pw, ph) {
        return src.clone();
    }
    GrayImage::from_fn(pw, ph, |x, y| *src.get_pixel(x.min(w - 1), y.min(h - 1)))
}

/// Build one clipped-equalization lookup table per tile.
fn tile_luts(
    padded: &GrayImage,
    clip_limit: f32,
    cols: u32,
    rows: u32,
    tile_w: u32,
    tile_h: u32,
) -> Vec<[u8; 256]> {
    let tile_pixels = tile_w * tile_h;
    let clip = (((clip_limit * tile_pixels as f32) / 256.0) as u32).max(1);

    let mut luts = Vec::with_capacity((cols * rows) as usize);
    for ty in 0..rows {
        for tx in 0..cols {
            let mut hist = [0u32; 256];
            for y in ty * tile_h..(ty + 1) * tile_h {
                for x in tx * tile_w..(tx + 1) * tile_w {
                    hist[padded.get_pixel(x, y)[0] as usize] += 1;
                }
            }
            clip_histogram(&mut hist, clip);
            luts.push(histogram_to_lut(&hist, tile_pixels));
        }
    }
    luts
}

/// Cap each bin at `clip` and redistribute the excess: a uniform share to
/// every bin, then the remainder spread over strided bins so no range of
/// the histogram is systematically favored.
fn clip_histogram(hist: &mut [u32; 256], clip: u32) {
    let mut excess = 0u32;
    for bin in hist.iter_mut() {
        if *bin > clip {
            excess += *bin - clip;
            *bin = clip;
        }
    }

    let batch = excess / 256;
    let mut residual = excess % 256;
    if batch > 0 {
        for bin in hist.iter_mut() {
            *bin += batch;
        }
    }
    if residual > 0 {
        let step = (256 / residual).max(1) as usize;
        let mut i = 0;
        while i < 256 && residual > 0 {
            hist[i] += 1;
            residual -= 1;
            i += step;
        }
    }
}

/// Cumulative histogram scaled onto the full 0–255 output range.
fn histogram_to_lut(hist: &[u32; 256], tile_pixels: u32) -> [u8; 256] {
    let scale = 255.0 / tile_pixels as f32;
    let mut lut = [0u8; 256];
    let mut cumulative = 0u32;
    for (i, &count) in hist.iter().enumerate() {
        cumulative += count;
        lut[i] = (cumulative as f32 * scale).round().clamp(0.0, 255.0) as u8;
    }
    lut
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn preserves_dimensions_including_non_divisible_sizes() {
        let img = GrayImage::from_pixel(70, 53, Luma([90]));
        let out = clahe(&img, 2.0, 8, 8);
        assert_eq!(out.dimensions(), (70, 53));
    }

    #[test]
    fn flat_image_stays_flat() {
        // 100 is not divisible by 8 — exercises the edge-replication path.
        let img = GrayImage::from_pixel(100, 100, Luma([128]));
        let out = clahe(&img, 2.0, 8, 8);
        let first = out.get_pixel(0, 0)[0];
        assert!(out.pixels().all(|p| p[0] == first));
    }

    #[test]
    fn deterministic_across_runs() {
        let img = GrayImage::from_fn(64, 64, |x, y| Luma([((x * 3 + y * 5) % 256) as u8]));
        let a = clahe(&img, 2.0, 8, 8);
        let b = clahe(&img, 2.0, 8, 8);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn generous_clip_limit_stretches_a_two_tone_image() {
        // 8-px checkerboard of two close grays: spread 20 on input.
        let img = GrayImage::from_fn(128, 128, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                Luma([100])
            } else {
                Luma([120])
            }
        });
        let out = clahe(&img, 40.0, 8, 8);
        let min = out.pixels().map(|p| p[0]).min().unwrap();
        let max = out.pixels().map(|p| p[0]).max().unwrap();
        assert!(
            max - min > 20,
            "expected contrast stretch, got spread {}",
            max - min
        );
    }

    #[test]
    fn tight_clip_limit_bounds_the_stretch() {
        let img = GrayImage::from_fn(128, 128, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                Luma([100])
            } else {
                Luma([120])
            }
        });
        let tight = clahe(&img, 2.0, 8, 8);
        let loose = clahe(&img, 40.0, 8, 8);
        let spread = |img: &GrayImage| {
            let min = img.pixels().map(|p| p[0]).min().unwrap();
            let max = img.pixels().map(|p| p[0]).max().unwrap();
            (max - min) as u32
        };
        assert!(spread(&tight) < spread(&loose));
    }

    #[test]
    fn one_pixel_image_is_a_fixed_point_shape() {
        let img = GrayImage::from_pixel(1, 1, Luma([42]));
        let out = clahe(&img, 2.0, 8, 8);
        assert_eq!(out.dimensions(), (1, 1));
    }
}
