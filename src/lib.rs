//! # recimat
//!
//! Negotiation core for a two-sided recycled-materials trading platform.
//!
//! The platform runs two mirrored modules: **sourcing**, where buyers
//! publish material requirements and sellers respond with offers, and the
//! **marketplace**, where sellers publish listings and buyers respond with
//! purchase offers. Every published record passes admin review, every
//! response passes the same gate, and an accepted response settles into an
//! immutable commitment that consumes the proposal's remaining stock.
//!
//! Three platform rules cut across everything:
//!
//! - **Volume-tier fees.** Publishing costs a per-kilogram management fee
//!   derived from the total volume ([`domain::services::FeeSchedule`]), and
//!   every response must mirror that exact fee as its no-show penalty.
//! - **Anonymity until commitment.** Counterparties see each other as a
//!   role-and-city label ([`domain::services::visibility`]) until a deal is
//!   struck; only admins and the user themself see the full profile.
//! - **Eventually consistent views.** The authoritative state lives behind
//!   a remote API. A background poller replaces an in-memory snapshot every
//!   few seconds ([`infrastructure::snapshot`]); mutations patch it
//!   optimistically and transient backend failures degrade to the last
//!   known snapshot instead of clearing it.
//!
//! # Architecture
//!
//! | Layer               | Contents                                            |
//! |---------------------|-----------------------------------------------------|
//! | [`domain`]          | Entities, state machines, fees, visibility policy   |
//! | [`application`]     | Use-case services, identity checks, error surface   |
//! | [`infrastructure`]  | Backend API client, snapshot store, idempotency     |
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use recimat::domain::entities::{PriceTerms, ProposalBuilder};
//! use recimat::domain::value_objects::{Quantity, TradeModule, UserId};
//! use rust_decimal::Decimal;
//!
//! let listing = ProposalBuilder::new(
//!     TradeModule::Marketplace,
//!     UserId::new("u-42"),
//!     "Cartón corrugado",
//!     Quantity::new(1000.0).unwrap(),
//!     PriceTerms::Flat(Decimal::new(900, 0)),
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
//! )
//! .accept_management_fee()
//! .build()
//! .unwrap();
//!
//! // 1000 kg sits in the second volume tier: 200 COP/kg.
//! let fee = listing.management_fee_per_kg().unwrap();
//! assert_eq!(fee.as_decimal(), Decimal::new(200, 0));
//!
//! // Responders must mirror that exact fee as their accepted penalty.
//! assert_eq!(listing.expected_penalty_fee(), fee);
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::{ApplicationError, ApplicationResult};
pub use domain::{DomainError, DomainResult};
