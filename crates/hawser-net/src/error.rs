use thiserror::Error;

/// Errors from uploads, gateway retrieval, and pin management.
#[derive(Debug, Error)]
pub enum NetError {
    /// The pinning endpoint rejected an upload or it failed in transit.
    #[error("upload failed: {0}")]
    UploadFailed(String),

    /// A pin or unpin call was rejected or failed in transit.
    #[error("pin operation failed: {0}")]
    PinFailed(String),

    /// One gateway attempt failed. The retriever's failover loop swallows
    /// these; callers see [`NetError::AllGatewaysExhausted`] instead.
    #[error("gateway fetch failed: {0}")]
    GatewayFetch(String),

    /// Every configured gateway failed or timed out for a retrieval.
    #[error("all {attempts} gateways exhausted")]
    AllGatewaysExhausted { attempts: usize },

    /// The pinning endpoint answered with a body that does not match the
    /// expected shape.
    #[error("invalid response from pinning endpoint: {0}")]
    InvalidResponse(String),
}
