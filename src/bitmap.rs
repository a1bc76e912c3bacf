use crate::error::GrainError;

pub const PIXELS_PER_BYTE: usize = 4;

/// Unpacked width x height grid of levels in {0, 1, 2, 3}, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    levels: Vec<u8>,
}

impl PixelGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            levels: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.levels[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, level: u8) {
        self.levels[y * self.width + x] = level & 0x3;
    }

    pub fn levels(&self) -> &[u8] {
        &self.levels
    }
}

/// Packed 2-bpp raster: 4 row-major pixels per byte, first pixel in the
/// most significant bits. A 200x200 raster is exactly 10,000 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBitmap {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PackedBitmap {
    pub fn packed_len(width: usize, height: usize) -> usize {
        width * height / PIXELS_PER_BYTE
    }

    /// All-zero (white) raster.
    pub fn new(width: usize, height: usize) -> Result<Self, GrainError> {
        if width * height % PIXELS_PER_BYTE != 0 {
            return Err(GrainError::Dimension { width, height });
        }

        Ok(Self {
            width,
            height,
            data: vec![0; Self::packed_len(width, height)],
        })
    }

    /// Adopt an existing packed buffer. The length must match the
    /// dimensions exactly; padding or truncating is the caller's business.
    pub fn from_bytes(bytes: Vec<u8>, width: usize, height: usize) -> Result<Self, GrainError> {
        if width * height % PIXELS_PER_BYTE != 0 {
            return Err(GrainError::Dimension { width, height });
        }

        let expected = Self::packed_len(width, height);
        if bytes.len() != expected {
            return Err(GrainError::Format {
                expected,
                actual: bytes.len(),
                width,
                height,
            });
        }

        Ok(Self {
            width,
            height,
            data: bytes,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Write one pixel. Out-of-range coordinates are a silent no-op so
    /// drawing helpers never need their own bounds checks. The write is a
    /// read-modify-write on the 2-bit slot, the other three pixels of the
    /// byte are untouched.
    pub fn set(&mut self, x: i32, y: i32, level: u8) {
        if x < 0 || x >= self.width as i32 || y < 0 || y >= self.height as i32 {
            return;
        }

        let i = y as usize * self.width + x as usize;
        let shift = (3 - (i & 3)) * 2;
        let byte = &mut self.data[i >> 2];
        *byte = (*byte & !(0x3 << shift)) | ((level & 0x3) << shift);
    }

    /// Compositing write, darker wins (levels order 0 = white .. 3 = black).
    pub fn set_max(&mut self, x: i32, y: i32, level: u8) {
        if (level & 0x3) > self.get(x, y) {
            self.set(x, y, level);
        }
    }

    /// Read one pixel; out-of-range reads come back white.
    pub fn get(&self, x: i32, y: i32) -> u8 {
        if x < 0 || x >= self.width as i32 || y < 0 || y >= self.height as i32 {
            return 0;
        }

        let i = y as usize * self.width + x as usize;
        (self.data[i >> 2] >> ((3 - (i & 3)) * 2)) & 0x3
    }

    /// Encode a grid of levels into a fresh packed raster.
    pub fn pack(grid: &PixelGrid) -> Result<Self, GrainError> {
        let mut bitmap = Self::new(grid.width(), grid.height())?;

        for (i, &level) in grid.levels().iter().enumerate() {
            let shift = (3 - (i & 3)) * 2;
            bitmap.data[i >> 2] |= (level & 0x3) << shift;
        }

        Ok(bitmap)
    }

    /// Decode back into a grid of levels, the exact inverse of [`pack`].
    ///
    /// [`pack`]: PackedBitmap::pack
    pub fn unpack(&self) -> PixelGrid {
        let mut grid = PixelGrid::new(self.width, self.height);

        for i in 0..self.width * self.height {
            let level = (self.data[i >> 2] >> ((3 - (i & 3)) * 2)) & 0x3;
            grid.levels[i] = level;
        }

        grid
    }

    /// CRC-32 (polynomial 0xEDB88320, reflected, init/final 0xFFFFFFFF)
    /// over the packed bytes. This is the integrity contract every tool
    /// exchanging raster files checks against.
    pub fn crc32(&self) -> u32 {
        crc32fast::hash(&self.data)
    }
}
