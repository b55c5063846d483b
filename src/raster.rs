//! Pixel-based ruling detection on a rasterized page (spec.md §4.G).
//!
//! Gated behind the `raster` feature since it is the crate's only
//! dependency on the `image` crate.

use image::GrayImage;

use crate::config::DetectionConfig;
use crate::geometry::Ruling;

/// Detects horizontal and vertical rulings in a grayscale raster of a
/// page at `dpi` (the raster is assumed to be 2x page units per pixel at
/// 144 DPI, per the fixed detector thresholds in `config`).
///
/// Returns `(horizontal, vertical)` rulings already snapped, normalized,
/// collapsed, and halved back into page coordinate space.
pub fn detect_rulings(image: &GrayImage, config: &DetectionConfig) -> (Vec<Ruling>, Vec<Ruling>) {
    let horizontal_runs = scan_horizontal_runs(image, config.intensity_threshold, config.h_min_width);
    let vertical_runs = scan_vertical_runs(image, config.intensity_threshold, config.v_min_height);

    let mut horizontal: Vec<Ruling> = horizontal_runs
        .into_iter()
        .map(|(y, x0, x1)| Ruling::from_coords(x0 as f64, y as f64, x1 as f64, y as f64))
        .collect();
    let mut vertical: Vec<Ruling> = vertical_runs
        .into_iter()
        .map(|(x, y0, y1)| Ruling::from_coords(x as f64, y0 as f64, x as f64, y1 as f64))
        .collect();

    let mut combined: Vec<Ruling> = horizontal.drain(..).chain(vertical.drain(..)).collect();
    Ruling::snap_all(&mut combined, config.point_snap);

    let normalized: Vec<Ruling> = combined.iter().filter_map(|r| r.normalize(config.point_snap)).collect();

    let (h, v): (Vec<Ruling>, Vec<Ruling>) = normalized
        .into_iter()
        .partition(|r| r.normalized_orientation() == crate::geometry::Orientation::Horizontal);

    let h = Ruling::collapse_oriented_rulings(&h, config.collapse_expansion);
    let v = Ruling::collapse_oriented_rulings(&v, config.collapse_expansion);

    (halve(&h), halve(&v))
}

/// Halves every coordinate: the raster is 2x page units at 144 DPI.
fn halve(rulings: &[Ruling]) -> Vec<Ruling> {
    rulings
        .iter()
        .map(|r| Ruling::from_coords(r.p1.x / 2.0, r.p1.y / 2.0, r.p2.x / 2.0, r.p2.y / 2.0))
        .collect()
}

fn intensity(image: &GrayImage, x: u32, y: u32) -> i16 {
    image.get_pixel(x, y).0[0] as i16
}

/// For each starting column, walks down looking for a grayscale jump,
/// then walks right while the vertical jump persists and the in-line
/// color stays consistent. Returns `(y, x_start, x_end)` triples.
fn scan_horizontal_runs(image: &GrayImage, threshold: u8, min_width: f64) -> Vec<(u32, u32, u32)> {
    let (width, height) = image.dimensions();
    if width == 0 || height < 2 {
        return Vec::new();
    }
    let threshold = threshold as i16;
    let mut covered = vec![false; (width as usize) * (height as usize)];
    let mut runs = Vec::new();

    for x in 0..width {
        for y in 1..height {
            if covered[(y as usize) * (width as usize) + (x as usize)] {
                continue;
            }
            let jump = (intensity(image, x, y) - intensity(image, x, y - 1)).abs();
            if jump <= threshold {
                continue;
            }

            let base_color = intensity(image, x, y);
            let mut end_x = x;
            let mut lx = x;
            while lx < width {
                let vjump = (intensity(image, lx, y) - intensity(image, lx, y - 1)).abs();
                let consistent = (intensity(image, lx, y) - base_color).abs() <= threshold;
                if vjump > threshold && consistent {
                    end_x = lx;
                    lx += 1;
                } else {
                    break;
                }
            }

            let run_len = (end_x - x) as f64 + 1.0;
            if run_len >= min_width {
                runs.push((y, x, end_x));
                for cx in x..=end_x {
                    covered[(y as usize) * (width as usize) + (cx as usize)] = true;
                }
            }
        }
    }
    runs
}

/// Transpose of [`scan_horizontal_runs`]: for each starting row, walks
/// across looking for a jump, then walks down while the horizontal jump
/// persists and the in-line color stays consistent. Returns
/// `(x, y_start, y_end)` triples.
fn scan_vertical_runs(image: &GrayImage, threshold: u8, min_height: f64) -> Vec<(u32, u32, u32)> {
    let (width, height) = image.dimensions();
    if height == 0 || width < 2 {
        return Vec::new();
    }
    let threshold = threshold as i16;
    let mut covered = vec![false; (width as usize) * (height as usize)];
    let mut runs = Vec::new();

    for y in 0..height {
        for x in 1..width {
            if covered[(y as usize) * (width as usize) + (x as usize)] {
                continue;
            }
            let jump = (intensity(image, x, y) - intensity(image, x - 1, y)).abs();
            if jump <= threshold {
                continue;
            }

            let base_color = intensity(image, x, y);
            let mut end_y = y;
            let mut ly = y;
            while ly < height {
                let hjump = (intensity(image, x, ly) - intensity(image, x - 1, ly)).abs();
                let consistent = (intensity(image, x, ly) - base_color).abs() <= threshold;
                if hjump > threshold && consistent {
                    end_y = ly;
                    ly += 1;
                } else {
                    break;
                }
            }

            let run_len = (end_y - y) as f64 + 1.0;
            if run_len >= min_height {
                runs.push((x, y, end_y));
                for cy in y..=end_y {
                    covered[(cy as usize) * (width as usize) + (x as usize)] = true;
                }
            }
        }
    }
    runs
}
