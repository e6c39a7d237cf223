use thiserror::Error;

/// Top-level client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Upload, gateway retrieval, or pin call failure.
    #[error("network error: {0}")]
    Net(#[from] hawser_net::NetError),

    /// Pin registry persistence failure.
    #[error("registry error: {0}")]
    Registry(#[from] hawser_registry::RegistryError),

    /// The client was configured without any gateways.
    #[error("gateway list is empty")]
    NoGateways,
}
