//! # Domain Layer
//!
//! Pure business logic: the negotiation entities, their value objects, the
//! domain services that span them, and the domain error type. Nothing in
//! this layer performs I/O; persistence and transport live in
//! [`crate::infrastructure`].

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;

pub use errors::{DomainError, DomainResult};
