use thiserror::Error;

/// tinyqr error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Payload of {len} bytes exceeds the maximum of {max} bytes")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("Scale must be at least one pixel per module")]
    InvalidScale,

    #[error("A {modules} module symbol at scale {scale} with margin {margin} exceeds the pixel range")]
    CanvasTooLarge { modules: usize, scale: u32, margin: u32 },

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Codewords do not fit the symbol: {remaining_bits} bits left over")]
    LayoutMismatch { remaining_bits: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
