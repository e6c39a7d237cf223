use thiserror::Error;

/// Errors from the pin registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] postcard::Error),
}
