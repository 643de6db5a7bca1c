//! # Infrastructure Layer
//!
//! Adapters connecting the domain to the outside world.
//!
//! ## Modules
//!
//! - [`api`]: Port and adapters for the remote platform backend
//! - [`snapshot`]: Polled last-known-good view of all platform records
//! - [`idempotency`]: Replay protection for acceptance retries

pub mod api;
pub mod idempotency;
pub mod snapshot;

pub use api::{ApiError, ApiResult, HttpPlatformApi, InMemoryPlatformApi, PlatformApi};
pub use idempotency::{IdempotencyKey, IdempotencyRegistry};
pub use snapshot::{PlatformSnapshot, SnapshotRefresher, SnapshotStore};
