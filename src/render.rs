use {
    crate::{
        bitmap::PackedBitmap,
        error::GrainError,
        levels::{LEVEL_COUNT, LEVEL_GLYPHS, LEVEL_TO_GRAY},
    },
    image::{GrayImage, Luma},
    std::{fmt::Write as _, path::Path},
};

/// Per-level pixel counts over a packed buffer. Works on raw bytes so it
/// never needs the dimensions: every byte is exactly 4 pixels.
pub struct LevelHistogram {
    counts: [usize; LEVEL_COUNT],
}

impl LevelHistogram {
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut counts = [0; LEVEL_COUNT];

        for &byte in bytes {
            for slot in 0..4 {
                let level = (byte >> ((3 - slot) * 2)) & 0x3;
                counts[level as usize] += 1;
            }
        }

        Self { counts }
    }

    pub fn counts(&self) -> [usize; LEVEL_COUNT] {
        self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn percentage(&self, level: usize) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.counts[level] as f64 * 100.0 / total as f64
    }
}

/// Offset-prefixed hex dump of the first `max_bytes` bytes, 16 per row.
pub fn hex_dump(bytes: &[u8], max_bytes: usize) -> String {
    let n = bytes.len().min(max_bytes);
    let mut out = String::new();

    for (i, chunk) in bytes[..n].chunks(16).enumerate() {
        let _ = write!(out, "{:04X}:", i * 16);
        for byte in chunk {
            let _ = write!(out, " {byte:02X}");
        }
        out.push('\n');
    }

    if n < bytes.len() {
        let _ = writeln!(out, "... ({} bytes omitted)", bytes.len() - n);
    }

    out
}

/// Downsampled glyph preview inside a `+---+` frame, one glyph per
/// `scale` x `scale` block (sampling the block center), plus a legend.
pub fn ascii_preview(bitmap: &PackedBitmap, scale: usize) -> String {
    let scale = scale.max(1);
    let display_w = bitmap.width() / scale;
    let display_h = bitmap.height() / scale;

    let mut out = String::new();
    let _ = writeln!(out, "+{}+", "-".repeat(display_w));

    for dy in 0..display_h {
        out.push('|');
        for dx in 0..display_w {
            let x = (dx * scale + scale / 2) as i32;
            let y = (dy * scale + scale / 2) as i32;
            out.push(LEVEL_GLYPHS[bitmap.get(x, y) as usize]);
        }
        out.push('|');
        out.push('\n');
    }

    let _ = writeln!(out, "+{}+", "-".repeat(display_w));
    let _ = writeln!(
        out,
        "legend: '{}'=white '{}'=light gray '{}'=dark gray '{}'=black",
        LEVEL_GLYPHS[0], LEVEL_GLYPHS[1], LEVEL_GLYPHS[2], LEVEL_GLYPHS[3]
    );

    out
}

/// Export as an 8-bit grayscale PNG through the shared gray ramp.
pub fn export_png(bitmap: &PackedBitmap, path: &Path) -> Result<(), GrainError> {
    let image = GrayImage::from_fn(bitmap.width() as u32, bitmap.height() as u32, |x, y| {
        Luma([LEVEL_TO_GRAY[bitmap.get(x as i32, y as i32) as usize]])
    });

    image.save(path)?;
    Ok(())
}

/// Degenerate-content probe for a raster that is supposed to hold noise.
pub struct PatternAnalysis {
    /// Leading probe window holds a single byte value.
    pub uniform: bool,
    /// Shortest short period (1/2/4/8/16) repeating at least 4 times.
    pub repeating_period: Option<usize>,
    /// Distinct byte values in the sampled prefix.
    pub unique_bytes: usize,
    /// Bytes sampled for the distinct-value count.
    pub sampled: usize,
}

pub fn analyze(bytes: &[u8]) -> PatternAnalysis {
    let probe = &bytes[..bytes.len().min(100)];
    let uniform = !probe.is_empty() && probe.iter().all(|&b| b == probe[0]);

    let mut repeating_period = None;
    for period in [1usize, 2, 4, 8, 16] {
        if bytes.len() < period * 4 {
            continue;
        }

        let pattern = &bytes[..period];
        let mut repeats = 0;
        let mut start = period;
        while start + period <= bytes.len() && start < period * 10 {
            if &bytes[start..start + period] == pattern {
                repeats += 1;
                start += period;
            } else {
                break;
            }
        }

        if repeats >= 3 {
            repeating_period = Some(period);
            break;
        }
    }

    let sampled = bytes.len().min(1000);
    let mut seen = [false; 256];
    for &byte in &bytes[..sampled] {
        seen[byte as usize] = true;
    }
    let unique_bytes = seen.iter().filter(|&&s| s).count();

    PatternAnalysis {
        uniform,
        repeating_period,
        unique_bytes,
        sampled,
    }
}
