//! # Platform API
//!
//! Port and adapters for the remote platform backend.
//!
//! ## Port
//!
//! - [`PlatformApi`]: Reads and upserts for all record families
//!
//! ## Implementations
//!
//! - [`HttpPlatformApi`]: Talks to the hosted document store over HTTP
//! - [`InMemoryPlatformApi`]: In-memory storage for tests and offline flows

pub mod error;
pub mod http;
pub mod in_memory;
pub mod traits;

pub use error::{ApiError, ApiResult};
pub use http::HttpPlatformApi;
pub use in_memory::InMemoryPlatformApi;
pub use traits::PlatformApi;
