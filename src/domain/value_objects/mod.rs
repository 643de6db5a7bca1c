//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`EntityId`]: canonical `{MODULE}-{TYPE}-{yyyymmdd}-{random4}` identifier
//! - [`UserId`]: opaque user identifier
//!
//! ## Numeric Types
//!
//! - [`Quantity`]: kilogram quantity with checked arithmetic
//! - [`FeePerKg`]: per-kilogram fee in COP
//!
//! ## Arithmetic
//!
//! - [`ArithmeticError`]: Error type for arithmetic failures
//! - [`CheckedArithmetic`]: Trait for safe arithmetic operations
//! - [`Rounding`]: Enum for explicit rounding direction
//!
//! ## Negotiation
//!
//! - [`NegotiationTerms`], [`ClauseDecision`], [`CounterProposal`], [`StructuredPrice`]:
//!   the per-clause accept/counter model
//! - [`DeliveryFrequency`]: delivery cadence with derived per-delivery quantity
//!
//! ## State Machines
//!
//! - [`ProposalState`]: requirement and listing lifecycle
//! - [`ResponseState`]: offer and purchase-offer lifecycle
//!
//! ## Domain Enums
//!
//! - [`Role`]: buyer, seller, or admin
//! - [`TradeModule`]: sourcing or marketplace
//! - [`EntityKind`], [`Unit`], [`Currency`], [`RejectionKind`]

pub mod arithmetic;
pub mod attachment;
pub mod clause;
pub mod delivery;
pub mod enums;
pub mod fee;
pub mod ids;
pub mod proposal_state;
pub mod quantity;
pub mod response_state;
pub mod timestamp;

pub use arithmetic::{ArithmeticError, ArithmeticResult, CheckedArithmetic};
pub use attachment::Attachment;
pub use clause::{
    ClauseDecision, ClauseKind, CounterProposal, NegotiationTerms, PriceVariable, StructuredPrice,
};
pub use delivery::DeliveryFrequency;
pub use enums::{Currency, EntityKind, ParseEnumError, RejectionKind, Role, TradeModule, Unit};
pub use fee::FeePerKg;
pub use ids::{EntityId, IdFinding, IdParts, UserId};
pub use proposal_state::{InvalidProposalStateError, ProposalState};
pub use quantity::Quantity;
pub use response_state::{InvalidResponseStateError, ResponseState};
pub use timestamp::Timestamp;
