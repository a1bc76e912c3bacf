use {
    crate::{
        bitmap::PackedBitmap,
        error::GrainError,
        levels::quantize,
        utils::{fade, lerp},
    },
    glam::DVec2,
};

// 8 gradient directions, picked by the low 3 bits of a corner hash
const GRADIENTS: [DVec2; 8] = [
    DVec2::new(1.0, 1.0),
    DVec2::new(1.0, -1.0),
    DVec2::new(-1.0, 1.0),
    DVec2::new(-1.0, -1.0),
    DVec2::new(1.0, 0.0),
    DVec2::new(-1.0, 0.0),
    DVec2::new(0.0, 1.0),
    DVec2::new(0.0, -1.0),
];

/// Seeded permutation of 0..=255, stored doubled so lattice lookups up to
/// index 511 never wrap explicitly.
pub struct PermutationTable {
    values: [u8; 512],
}

impl PermutationTable {
    /// Shuffle the identity sequence with a Fisher-Yates pass driven by an
    /// xorshift64* generator seeded directly with `seed`. The generator is
    /// local to this function, so the seed -> table mapping is fixed and two
    /// tables built from the same seed are identical byte for byte.
    pub fn build(seed: u64) -> Self {
        let mut base = (0i32..256).map(|x| x as u8).collect::<Vec<u8>>();

        let mut hash = seed;
        for i in (0..256u64).rev() {
            hash ^= hash >> 12;
            hash ^= hash << 25;
            hash ^= hash >> 27;
            hash = hash.wrapping_mul(0x2545F4914F6CDD1D);

            let j = (hash % (i + 1)) as usize;
            base.swap(i as usize, j);
        }

        let mut values = [0u8; 512];
        for (i, value) in values.iter_mut().enumerate() {
            *value = base[i % 256];
        }

        Self { values }
    }

    pub fn lookup(&self, i: usize) -> u8 {
        self.values[i]
    }
}

/// Classic lattice gradient noise over a seeded permutation table.
pub struct PerlinNoise {
    table: PermutationTable,
}

impl PerlinNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            table: PermutationTable::build(seed),
        }
    }

    /// Raw noise in roughly [-1, 1], unclamped. The [0, 1] remap happens
    /// once in the fBm layer, never here.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let xi = (x.floor() as i64 & 255) as usize;
        let yi = (y.floor() as i64 & 255) as usize;
        let xf = x - x.floor();
        let yf = y - y.floor();

        let u = fade(xf);
        let v = fade(yf);

        // hash the 4 lattice corners through nested table lookups
        let a = self.table.lookup(xi) as usize + yi;
        let b = self.table.lookup(xi + 1) as usize + yi;
        let aa = self.table.lookup(a);
        let ab = self.table.lookup(a + 1);
        let ba = self.table.lookup(b);
        let bb = self.table.lookup(b + 1);

        let n00 = Self::grad(aa, DVec2::new(xf, yf));
        let n10 = Self::grad(ba, DVec2::new(xf - 1.0, yf));
        let n01 = Self::grad(ab, DVec2::new(xf, yf - 1.0));
        let n11 = Self::grad(bb, DVec2::new(xf - 1.0, yf - 1.0));

        let x1 = lerp(n00, n10, u);
        let x2 = lerp(n01, n11, u);
        lerp(x1, x2, v)
    }

    fn grad(hash: u8, offset: DVec2) -> f64 {
        GRADIENTS[(hash & 7) as usize].dot(offset)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldConfig {
    pub octaves: usize,
    pub lacunarity: f64,
    pub gain: f64,
    pub scale: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            octaves: 4,
            lacunarity: 2.0,
            gain: 0.5,
            scale: 40.0,
        }
    }
}

impl FieldConfig {
    /// A non-positive scale would divide the sample coordinates by zero;
    /// everything else (including zero octaves) keeps sampling total.
    pub fn validate(&self) -> Result<(), GrainError> {
        if self.scale <= 0.0 {
            return Err(GrainError::Config(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        Ok(())
    }
}

/// Fractional Brownian motion over [`PerlinNoise`].
pub struct FractalField {
    noise: PerlinNoise,
    config: FieldConfig,
}

impl FractalField {
    pub fn new(seed: u64, config: FieldConfig) -> Self {
        Self {
            noise: PerlinNoise::new(seed),
            config,
        }
    }

    /// Normalized fBm sample in [0, 1].
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut norm = 0.0;

        for _ in 0..self.config.octaves {
            let sample_x = x * frequency / self.config.scale;
            let sample_y = y * frequency / self.config.scale;

            value += amplitude * self.noise.sample(sample_x, sample_y);
            norm += amplitude;

            amplitude *= self.config.gain;
            frequency *= self.config.lacunarity;
        }

        // zero octaves leave nothing to normalize by
        if norm == 0.0 {
            return 0.0;
        }

        0.5 * (value / norm + 1.0)
    }

    /// Quantize the field over a width x height grid straight into a packed
    /// 2-bpp raster.
    pub fn render(&self, width: usize, height: usize) -> Result<PackedBitmap, GrainError> {
        self.config.validate()?;
        let mut bitmap = PackedBitmap::new(width, height)?;

        for y in 0..height {
            for x in 0..width {
                let v = self.sample(x as f64, y as f64);
                bitmap.set(x as i32, y as i32, quantize(v));
            }
        }

        Ok(bitmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_a_bijection_for_many_seeds() {
        for seed in 0..64 {
            let table = PermutationTable::build(seed);
            let mut sorted = (0..256).map(|i| table.lookup(i)).collect::<Vec<u8>>();
            sorted.sort_unstable();
            let identity = (0i32..256).map(|x| x as u8).collect::<Vec<u8>>();
            assert_eq!(sorted, identity, "seed {seed} lost a value");
        }
    }

    #[test]
    fn table_upper_half_mirrors_lower_half() {
        let table = PermutationTable::build(0xDEADBEEF);
        for i in 0..256 {
            assert_eq!(table.lookup(i), table.lookup(i + 256));
        }
    }

    #[test]
    fn table_prefix_is_frozen() {
        // computed independently from the documented xorshift64* shuffle;
        // a change here means every stored raster reproduces differently
        let table = PermutationTable::build(1337);
        let prefix = (0..8).map(|i| table.lookup(i)).collect::<Vec<u8>>();
        assert_eq!(prefix, [223, 251, 99, 2, 111, 162, 82, 180]);

        let table = PermutationTable::build(0);
        let prefix = (0..8).map(|i| table.lookup(i)).collect::<Vec<u8>>();
        assert_eq!(prefix, [1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn different_seeds_give_different_tables() {
        let a = PermutationTable::build(1);
        let b = PermutationTable::build(2);
        assert!((0..256).any(|i| a.lookup(i) != b.lookup(i)));
    }

    #[test]
    fn field_is_deterministic() {
        let a = FractalField::new(42, FieldConfig::default());
        let b = FractalField::new(42, FieldConfig::default());

        for i in 0..32 {
            let x = i as f64 * 13.7;
            let y = i as f64 * 7.3;
            assert_eq!(a.sample(x, y).to_bits(), b.sample(x, y).to_bits());
        }
    }

    #[test]
    fn field_stays_in_unit_range() {
        let field = FractalField::new(7, FieldConfig::default());
        for y in 0..50 {
            for x in 0..50 {
                let v = field.sample(x as f64 * 3.1, y as f64 * 2.7);
                assert!((0.0..=1.0).contains(&v), "sample {v} out of range");
            }
        }
    }

    #[test]
    fn zero_octaves_collapse_to_zero() {
        let config = FieldConfig {
            octaves: 0,
            ..FieldConfig::default()
        };
        let field = FractalField::new(5, config);
        assert_eq!(field.sample(12.0, 34.0), 0.0);
    }

    #[test]
    fn field_is_smooth() {
        let field = FractalField::new(99, FieldConfig::default());
        let points = [(3.7, 9.2), (81.4, 17.9), (150.2, 63.3), (12.5, 140.8)];

        // summed step differences must shrink as the step does
        let mut last = f64::INFINITY;
        for eps in [0.4, 0.04, 0.004, 0.0004] {
            let total = points
                .iter()
                .map(|&(x, y)| (field.sample(x + eps, y) - field.sample(x, y)).abs())
                .sum::<f64>();
            assert!(total < last, "difference grew at eps {eps}");
            last = total;
        }
    }

    #[test]
    fn negative_coordinates_are_valid() {
        let field = FractalField::new(11, FieldConfig::default());
        let v = field.sample(-123.4, -0.5);
        assert!((0.0..=1.0).contains(&v));
    }

    #[test]
    fn non_positive_scale_is_rejected() {
        let config = FieldConfig {
            scale: 0.0,
            ..FieldConfig::default()
        };
        assert!(config.validate().is_err());

        let config = FieldConfig {
            scale: -3.0,
            ..FieldConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
