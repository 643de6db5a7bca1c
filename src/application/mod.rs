//! # Application Layer
//!
//! Use cases and their error surface. Services here check identity and
//! role, call into the domain, talk to the backend through
//! [`crate::infrastructure::api`], and keep the local snapshot patched.

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use services::{
    AdminService, NegotiationService, NotificationCounts, NotificationService, UserService,
};
