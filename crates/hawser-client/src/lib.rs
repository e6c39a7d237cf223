//! High-level client facade.
//!
//! [`HawserClient`] ties the components together: direct or chunked
//! uploads through the bounded dispatcher, gateway retrieval behind the
//! TTL cache, and pin management backed by the durable registry.

mod client;
mod error;

pub use client::{HawserClient, HawserConfig};
pub use error::ClientError;
