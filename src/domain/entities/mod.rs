//! # Domain Entities
//!
//! Aggregate roots and entities representing core business concepts.
//!
//! ## Aggregates
//!
//! - [`Proposal`]: a sourcing requirement or marketplace listing, with the
//!   admin-gated lifecycle and derived management fee
//! - [`Response`]: an offer or purchase offer answering a proposal, with
//!   per-clause positions and the mirrored penalty fee
//!
//! ## Entities
//!
//! - [`Commitment`]: provisional deal derived from an accepted response
//! - [`User`]: platform participant with staged identity edits
//! - [`CommunicationLog`]: append-only negotiation history

pub mod commitment;
pub mod communication_log;
pub mod proposal;
pub mod response;
pub mod user;

pub use commitment::Commitment;
pub use communication_log::{CommunicationLog, LogEntry, LogEventType};
pub use proposal::{PriceTerms, Proposal, ProposalBuilder};
pub use response::Response;
pub use user::{IdentityField, User};
