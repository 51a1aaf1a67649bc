/// Error type for compression operations
#[derive(Debug)]
pub enum CompressError {
    /// Input is not a decodable image
    DecodeError(String),
    /// The encoder rejected the rasterized surface
    EncodeError(String),
    InvalidOptions(String),
    /// Background task failed to complete
    TaskError(String),
}

impl std::fmt::Display for CompressError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompressError::DecodeError(msg) => write!(f, "Image decode error: {}", msg),
            CompressError::EncodeError(msg) => write!(f, "Image encode error: {}", msg),
            CompressError::InvalidOptions(msg) => write!(f, "Invalid compression options: {}", msg),
            CompressError::TaskError(msg) => write!(f, "Compression task error: {}", msg),
        }
    }
}

impl std::error::Error for CompressError {}

impl From<tokio::task::JoinError> for CompressError {
    fn from(err: tokio::task::JoinError) -> Self {
        CompressError::TaskError(err.to_string())
    }
}
