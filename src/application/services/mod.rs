//! # Application Services
//!
//! Use-case orchestration over the domain and the backend API.
//!
//! This module provides the platform's application-level services:
//! - [`NegotiationService`]: proposal and response lifecycles, acceptance
//! - [`AdminService`]: review queues, overrides, proxy authoring
//! - [`UserService`]: registration, self-service edits, profile views
//! - [`NotificationService`]: pending-action counts per viewer

pub mod admin;
pub mod negotiation;
pub mod notifications;
pub mod users;

pub use admin::AdminService;
pub use negotiation::{NegotiationService, ProposalRevision, ResponseRevision};
pub use notifications::{NotificationCounts, NotificationService, counts_for};
pub use users::{Registration, UserService};
