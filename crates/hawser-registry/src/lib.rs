//! Durable pin registry.
//!
//! Persists the latest confirmed pin state per content identifier and
//! scope in a fjall keyspace, so pin history survives restarts. Values
//! are postcard-encoded [`hawser_types::PinRecord`]s.

mod error;
mod store;

pub use error::RegistryError;
pub use store::PinRegistry;
