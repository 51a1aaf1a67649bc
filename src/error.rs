use std::fmt;

/// Central error types for the crisis checklist core
#[derive(Debug)]
pub enum AppError {
    /// Database error (rusqlite)
    Database(rusqlite::Error),
    /// Filesystem error
    Filesystem(std::io::Error),
    /// On-device key/value storage failed
    Storage(property_proximity::StoreError),
    /// Missing or malformed configuration
    Config(String),
    /// Property registry could not be loaded
    Registry(property_proximity::RegistryError),
    /// Photo could not be decoded or re-encoded
    Compression(photo_compress::CompressError),
    /// Webhook transport failure
    Network(String),
    /// Validation error (e.g. invalid inputs)
    Validation(String),
    /// General error
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Database(e) => write!(f, "Database error: {}", e),
            AppError::Filesystem(e) => write!(f, "Filesystem error: {}", e),
            AppError::Storage(e) => write!(f, "{}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Registry(e) => write!(f, "Property registry error: {}", e),
            AppError::Compression(e) => write!(f, "{}", e),
            AppError::Network(msg) => write!(f, "Network error: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}

// Conversions from other error types
impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Database(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Filesystem(e)
    }
}

impl From<property_proximity::StoreError> for AppError {
    fn from(e: property_proximity::StoreError) -> Self {
        AppError::Storage(e)
    }
}

impl From<property_proximity::RegistryError> for AppError {
    fn from(e: property_proximity::RegistryError) -> Self {
        AppError::Registry(e)
    }
}

impl From<photo_compress::CompressError> for AppError {
    fn from(e: photo_compress::CompressError) -> Self {
        AppError::Compression(e)
    }
}

impl From<toml::de::Error> for AppError {
    fn from(e: toml::de::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Network(e.to_string())
    }
}

/// User-friendly error messages for UI
impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::Storage(_) => {
                "A database error occurred. Please try again.".to_string()
            }
            AppError::Filesystem(_) => {
                "Error accessing files. Please check app permissions.".to_string()
            }
            AppError::Config(_) | AppError::Registry(_) => {
                "The app is not configured correctly. Contact your administrator.".to_string()
            }
            AppError::Compression(_) => "Error processing image.".to_string(),
            AppError::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            AppError::Validation(msg) => msg.clone(),
            AppError::Other(msg) => msg.clone(),
        }
    }
}
