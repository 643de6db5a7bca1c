//! # Domain Services
//!
//! Domain services encapsulating complex business logic that doesn't
//! naturally belong to a single entity or value object.
//!
//! ## Services
//!
//! - [`fee_schedule::FeeSchedule`]: volume-tier derivation of the management
//!   fee (and, by mirroring, the penalty fee)
//! - [`visibility`]: counterparty anonymization policy

pub mod fee_schedule;
pub mod visibility;

pub use fee_schedule::FeeSchedule;
pub use visibility::{PROTECTED_SUBTEXT, PublicProfile, public_view};
