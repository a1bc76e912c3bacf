use thiserror::Error;

#[derive(Debug, Error)]
pub enum GrainError {
    #[error("invalid field config: {0}")]
    Config(String),

    #[error("grid {width}x{height} cannot be packed, width*height must be divisible by 4")]
    Dimension { width: usize, height: usize },

    #[error("packed buffer is {actual} bytes, expected {expected} for {width}x{height}")]
    Format {
        expected: usize,
        actual: usize,
        width: usize,
        height: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("png export failed: {0}")]
    Png(#[from] image::ImageError),
}
