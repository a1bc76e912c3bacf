//! Deterministic test rasters for panel calibration and codec checks.
//!
//! Every pattern is a pure function of the requested dimensions, built on
//! the codec's single-pixel writes, so the emitted files are stable inputs
//! for comparing two decoder implementations.

use {
    crate::{bitmap::PackedBitmap, error::GrainError},
    glam::DVec2,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientDirection {
    Horizontal,
    Vertical,
    Diagonal,
    Radial,
}

/// Smooth level ramp 0 -> 3 across the raster.
pub fn gradient(
    width: usize,
    height: usize,
    direction: GradientDirection,
) -> Result<PackedBitmap, GrainError> {
    let mut bitmap = PackedBitmap::new(width, height)?;
    let center = DVec2::new((width / 2) as f64, (height / 2) as f64);
    let max_dist = center.length();

    for y in 0..height {
        for x in 0..width {
            let level = match direction {
                GradientDirection::Horizontal => x * 3 / (width - 1).max(1),
                GradientDirection::Vertical => y * 3 / (height - 1).max(1),
                GradientDirection::Diagonal => (x + y) * 3 / (width + height - 2).max(1),
                GradientDirection::Radial => {
                    let dist = DVec2::new(x as f64, y as f64).distance(center);
                    (dist * 3.0 / max_dist) as usize
                }
            };
            bitmap.set(x as i32, y as i32, level.min(3) as u8);
        }
    }

    Ok(bitmap)
}

/// Four horizontal bands, level 0 on top through level 3, height/4 rows
/// each. The e-paper calibration reference.
pub fn calibration_strips(width: usize, height: usize) -> Result<PackedBitmap, GrainError> {
    let mut bitmap = PackedBitmap::new(width, height)?;
    let strip_height = height / 4;

    for level in 0..4u8 {
        let y_start = level as usize * strip_height;
        let y_end = ((level as usize + 1) * strip_height).min(height);

        for y in y_start..y_end {
            for x in 0..width {
                bitmap.set(x as i32, y as i32, level);
            }
        }
    }

    Ok(bitmap)
}

/// N vertical columns stepping across the level ramp.
pub fn steps(width: usize, height: usize, steps: usize) -> Result<PackedBitmap, GrainError> {
    let mut bitmap = PackedBitmap::new(width, height)?;
    let step_width = width / steps.max(1);

    for step in 0..steps {
        let level = (step * 3 / (steps - 1).max(1)).min(3) as u8;
        let x_start = step * step_width;
        let x_end = ((step + 1) * step_width).min(width);

        for y in 0..height {
            for x in x_start..x_end {
                bitmap.set(x as i32, y as i32, level);
            }
        }
    }

    Ok(bitmap)
}

/// Alternating white/black squares.
pub fn checkerboard(width: usize, height: usize, square: usize) -> Result<PackedBitmap, GrainError> {
    let mut bitmap = PackedBitmap::new(width, height)?;
    let square = square.max(1);

    for y in 0..height {
        for x in 0..width {
            let level = if (x / square + y / square) % 2 == 1 { 3 } else { 0 };
            bitmap.set(x as i32, y as i32, level);
        }
    }

    Ok(bitmap)
}

/// Light-gray field with 3x3 dots on a 20-px lattice, dot level cycling
/// through 0..3 by position. Probes fine-detail rendering.
pub fn dots(width: usize, height: usize) -> Result<PackedBitmap, GrainError> {
    let mut bitmap = PackedBitmap::new(width, height)?;
    let spacing = 20;

    for y in 0..height {
        for x in 0..width {
            bitmap.set(x as i32, y as i32, 1);
        }
    }

    for y in (spacing / 2..height).step_by(spacing) {
        for x in (spacing / 2..width).step_by(spacing) {
            let level = ((x + y) / spacing % 4) as u8;

            // the codec drops out-of-range writes, so edge dots need no clipping
            for dy in -1..=1 {
                for dx in -1..=1 {
                    bitmap.set(x as i32 + dx, y as i32 + dy, level);
                }
            }
        }
    }

    Ok(bitmap)
}

/// Composite demo: swatches, diamond rings, hatching, a checkerboard block,
/// a filled circle with an outer ring, and a 1-px border. Overlays are
/// layered with darker-wins compositing so they read through each other.
pub fn showcase(width: usize, height: usize) -> Result<PackedBitmap, GrainError> {
    let mut bitmap = PackedBitmap::new(width, height)?;
    let w = width as i32;
    let h = height as i32;

    // light gray background
    for y in 0..h {
        for x in 0..w {
            bitmap.set(x, y, 1);
        }
    }

    // top swatches, one per level
    let band_h = h * 12 / 100;
    let swatch_w = w / 4;
    for level in 0..4 {
        for y in 0..band_h {
            for x in level * swatch_w..(level + 1) * swatch_w {
                bitmap.set(x, y, level as u8);
            }
        }
    }

    // concentric diamond rings from the center, Manhattan metric
    let cx = w / 2;
    let cy = h / 2;
    for y in 0..h {
        let dy = (y - cy).abs();
        for x in 0..w {
            let d = (x - cx).abs() + dy;
            bitmap.set_max(x, y, (d / 8 & 3) as u8);
        }
    }

    // diagonal hatch overlay in both directions
    for y in 0..h {
        for x in 0..w {
            if (x + y) % 20 == 0 || (x - y + 1000) % 20 == 0 {
                bitmap.set_max(x, y, 2);
            }
        }
    }

    // bottom-right checkerboard block
    let block_w = w * 42 / 100;
    let block_h = h * 42 / 100;
    let bx = w - block_w;
    let by = h - block_h;
    for y in by..h {
        for x in bx..w {
            let level = if ((x - bx) / 10 + (y - by) / 10) % 2 == 1 { 3 } else { 0 };
            bitmap.set(x, y, level);
        }
    }

    // filled center circle and an outer ring
    let center = DVec2::new(cx as f64, cy as f64);
    let r_fill = (w.min(h) * 14 / 100) as f64;
    let r_ring = (w.min(h) * 30 / 100) as f64;
    for y in 0..h {
        for x in 0..w {
            let dist = DVec2::new(x as f64, y as f64).distance(center);
            if dist <= r_fill {
                bitmap.set_max(x, y, 3);
            } else if (dist - r_ring).abs() <= 3.0 {
                bitmap.set_max(x, y, 2);
            }
        }
    }

    // black border
    for x in 0..w {
        bitmap.set(x, 0, 3);
        bitmap.set(x, h - 1, 3);
    }
    for y in 0..h {
        bitmap.set(0, y, 3);
        bitmap.set(w - 1, y, 3);
    }

    Ok(bitmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calibration_strips_have_no_bleed() {
        let bitmap = calibration_strips(200, 200).unwrap();

        for y in 0..200 {
            let expected = (y / 50) as u8;
            for x in 0..200 {
                assert_eq!(
                    bitmap.get(x as i32, y as i32),
                    expected,
                    "wrong level at ({x}, {y})"
                );
            }
        }

        // each band packs to a single repeated byte value
        let bytes = bitmap.as_bytes();
        assert!(bytes[..2_500].iter().all(|&b| b == 0x00));
        assert!(bytes[2_500..5_000].iter().all(|&b| b == 0x55));
        assert!(bytes[5_000..7_500].iter().all(|&b| b == 0xAA));
        assert!(bytes[7_500..].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn calibration_strips_crc_is_frozen() {
        // independently computed over 2500 bytes each of 00/55/AA/FF
        let bitmap = calibration_strips(200, 200).unwrap();
        assert_eq!(bitmap.crc32(), 0x4440_A099);
    }

    #[test]
    fn horizontal_gradient_spans_the_ramp() {
        let bitmap = gradient(200, 200, GradientDirection::Horizontal).unwrap();
        assert_eq!(bitmap.get(0, 0), 0);
        assert_eq!(bitmap.get(199, 0), 3);

        // level never decreases left to right
        let mut last = 0;
        for x in 0..200 {
            let level = bitmap.get(x, 100);
            assert!(level >= last);
            last = level;
        }
    }

    #[test]
    fn radial_gradient_is_light_in_the_center() {
        let bitmap = gradient(200, 200, GradientDirection::Radial).unwrap();
        assert_eq!(bitmap.get(100, 100), 0);
        // edge midpoint sits at ratio 100/141.4 of the radius
        assert_eq!(bitmap.get(0, 100), 2);
        // the corner is the farthest point; exact level 3 there depends on
        // the last float rounding, so only require the darkest ring
        assert!(bitmap.get(0, 0) >= 2);
    }

    #[test]
    fn checkerboard_alternates() {
        let bitmap = checkerboard(64, 64, 8).unwrap();
        assert_eq!(bitmap.get(0, 0), 0);
        assert_eq!(bitmap.get(8, 0), 3);
        assert_eq!(bitmap.get(0, 8), 3);
        assert_eq!(bitmap.get(8, 8), 0);
    }

    #[test]
    fn steps_cover_the_ramp() {
        let bitmap = steps(160, 40, 16).unwrap();
        assert_eq!(bitmap.get(0, 0), 0);
        assert_eq!(bitmap.get(159, 0), 3);
    }

    #[test]
    fn dots_sit_on_a_light_background() {
        let bitmap = dots(200, 200).unwrap();
        // off-lattice pixel keeps the background level
        assert_eq!(bitmap.get(0, 0), 1);
        // lattice point (10, 10): level (10 + 10) / 20 % 4 == 1 as well,
        // the next one over differs
        assert_eq!(bitmap.get(30, 10), 2);
    }

    #[test]
    fn showcase_has_a_black_border() {
        let bitmap = showcase(200, 200).unwrap();
        for x in 0..200 {
            assert_eq!(bitmap.get(x, 0), 3);
            assert_eq!(bitmap.get(x, 199), 3);
        }
        for y in 0..200 {
            assert_eq!(bitmap.get(0, y), 3);
            assert_eq!(bitmap.get(199, y), 3);
        }
    }

    #[test]
    fn showcase_uses_all_levels() {
        let bitmap = showcase(200, 200).unwrap();

        // the filled circle always wins the center
        assert_eq!(bitmap.get(100, 100), 3);

        let grid = bitmap.unpack();
        let mut counts = [0usize; 4];
        for &level in grid.levels() {
            counts[level as usize] += 1;
        }
        assert!(counts.iter().all(|&n| n > 0), "missing a level: {counts:?}");
    }
}
