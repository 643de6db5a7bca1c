//! # Response State
//!
//! Lifecycle state machine for offers and purchase offers.
//!
//! This module provides the [`ResponseState`] enum representing the lifecycle
//! of a response (a seller's offer against a sourcing requirement, or a
//! buyer's purchase offer against a marketplace listing) from submission
//! through admin vetting to the proposal owner's decision.
//!
//! # State Machine
//!
//! ```text
//! PendingAdmin          → PendingBuyer | PendingSeller | Rejected
//! PendingBuyerApproval  → PendingSeller | Rejected  (proxy-authored, buyer ratifies)
//! PendingSellerApproval → PendingBuyer | Rejected   (proxy-authored, seller ratifies)
//! PendingBuyer          → Accepted | Rejected
//! PendingSeller         → Accepted | Rejected
//! Rejected              → PendingBuyer | PendingSeller  (author edits and resubmits)
//! Accepted              (terminal, triggers commitment derivation)
//! ```
//!
//! Admin approval routes to the proposal owner's decision state: offers
//! against a requirement go to the buyer, purchase offers against a listing
//! go to the seller. Resubmission after a rejection returns straight to that
//! decision state rather than re-entering the admin gate.
//!
//! # Examples
//!
//! ```
//! use recimat::domain::value_objects::response_state::ResponseState;
//!
//! let state = ResponseState::PendingSeller;
//! assert!(state.can_transition_to(ResponseState::Accepted));
//! assert!(!state.can_transition_to(ResponseState::PendingAdmin));
//! ```

use crate::domain::value_objects::enums::{Role, TradeModule};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Response lifecycle state.
///
/// State transitions are enforced via
/// [`can_transition_to`](ResponseState::can_transition_to).
///
/// # Terminal States
///
/// - [`Accepted`](ResponseState::Accepted): the proposal owner accepted the
///   terms; the only terminal state, and the trigger for commitment
///   derivation. Rejected records stay editable and resubmittable.
///
/// # Examples
///
/// ```
/// use recimat::domain::value_objects::response_state::ResponseState;
///
/// assert!(ResponseState::Accepted.is_terminal());
/// assert!(!ResponseState::Rejected.is_terminal());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum ResponseState {
    /// Awaiting admin vetting of the submitted response.
    #[default]
    PendingAdmin = 0,

    /// Admin-proxy-authored record awaiting the buyer's ratification.
    PendingBuyerApproval = 1,

    /// Admin-proxy-authored record awaiting the seller's ratification.
    PendingSellerApproval = 2,

    /// Awaiting the buyer's accept/reject decision.
    PendingBuyer = 3,

    /// Awaiting the seller's accept/reject decision.
    PendingSeller = 4,

    /// Accepted by the proposal owner (terminal).
    Accepted = 5,

    /// Rejected or returned for adjustment; reason stored on the record.
    Rejected = 6,
}

impl ResponseState {
    /// Returns true if this is a terminal state.
    ///
    /// # Examples
    ///
    /// ```
    /// use recimat::domain::value_objects::response_state::ResponseState;
    ///
    /// assert!(ResponseState::Accepted.is_terminal());
    /// assert!(!ResponseState::PendingBuyer.is_terminal());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Returns true if this state can transition to the target state.
    ///
    /// # Arguments
    ///
    /// * `target` - The target state to transition to
    ///
    /// # Examples
    ///
    /// ```
    /// use recimat::domain::value_objects::response_state::ResponseState;
    ///
    /// assert!(ResponseState::PendingAdmin.can_transition_to(ResponseState::PendingBuyer));
    /// assert!(!ResponseState::Accepted.can_transition_to(ResponseState::Rejected));
    /// ```
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            // Admin vetting routes to the proposal owner's decision state
            (Self::PendingAdmin, Self::PendingBuyer)
                | (Self::PendingAdmin, Self::PendingSeller)
                | (Self::PendingAdmin, Self::Rejected)
                // Ratification of proxy-authored records
                | (Self::PendingBuyerApproval, Self::PendingSeller)
                | (Self::PendingBuyerApproval, Self::Rejected)
                | (Self::PendingSellerApproval, Self::PendingBuyer)
                | (Self::PendingSellerApproval, Self::Rejected)
                // Owner decision
                | (Self::PendingBuyer, Self::Accepted)
                | (Self::PendingBuyer, Self::Rejected)
                | (Self::PendingSeller, Self::Accepted)
                | (Self::PendingSeller, Self::Rejected)
                // Resubmission returns straight to the owner's decision state
                | (Self::Rejected, Self::PendingBuyer)
                | (Self::Rejected, Self::PendingSeller)
        )
    }

    /// Returns the valid next states from this state.
    #[must_use]
    pub fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Self::PendingAdmin => vec![Self::PendingBuyer, Self::PendingSeller, Self::Rejected],
            Self::PendingBuyerApproval => vec![Self::PendingSeller, Self::Rejected],
            Self::PendingSellerApproval => vec![Self::PendingBuyer, Self::Rejected],
            Self::PendingBuyer | Self::PendingSeller => vec![Self::Accepted, Self::Rejected],
            Self::Rejected => vec![Self::PendingBuyer, Self::PendingSeller],
            Self::Accepted => vec![],
        }
    }

    /// Returns the decision state a vetted response routes to in a module.
    ///
    /// The proposal owner decides: offers against a sourcing requirement go
    /// to the buyer, purchase offers against a marketplace listing go to the
    /// seller.
    ///
    /// # Examples
    ///
    /// ```
    /// use recimat::domain::value_objects::enums::TradeModule;
    /// use recimat::domain::value_objects::response_state::ResponseState;
    ///
    /// assert_eq!(
    ///     ResponseState::decision_for(TradeModule::Sourcing),
    ///     ResponseState::PendingBuyer
    /// );
    /// assert_eq!(
    ///     ResponseState::decision_for(TradeModule::Marketplace),
    ///     ResponseState::PendingSeller
    /// );
    /// ```
    #[inline]
    #[must_use]
    pub const fn decision_for(module: TradeModule) -> Self {
        match module.proposal_owner_role() {
            Role::Buyer => Self::PendingBuyer,
            Role::Seller | Role::Admin => Self::PendingSeller,
        }
    }

    /// Returns the ratification state for a proxy-authored response.
    ///
    /// The nominal author ratifies: a proxy offer awaits its seller, a proxy
    /// purchase offer awaits its buyer.
    #[inline]
    #[must_use]
    pub const fn ratification_for(module: TradeModule) -> Self {
        match module.responder_role() {
            Role::Buyer => Self::PendingBuyerApproval,
            Role::Seller | Role::Admin => Self::PendingSellerApproval,
        }
    }

    /// Returns the role whose action this state is waiting on, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use recimat::domain::value_objects::enums::Role;
    /// use recimat::domain::value_objects::response_state::ResponseState;
    ///
    /// assert_eq!(ResponseState::PendingAdmin.decider_role(), Some(Role::Admin));
    /// assert_eq!(ResponseState::PendingSeller.decider_role(), Some(Role::Seller));
    /// assert_eq!(ResponseState::Accepted.decider_role(), None);
    /// ```
    #[inline]
    #[must_use]
    pub const fn decider_role(&self) -> Option<Role> {
        match self {
            Self::PendingAdmin => Some(Role::Admin),
            Self::PendingBuyer | Self::PendingBuyerApproval => Some(Role::Buyer),
            Self::PendingSeller | Self::PendingSellerApproval => Some(Role::Seller),
            Self::Accepted | Self::Rejected => None,
        }
    }

    /// Returns true if the record sits in the admin work queue.
    #[inline]
    #[must_use]
    pub const fn needs_admin(&self) -> bool {
        matches!(self, Self::PendingAdmin)
    }

    /// Returns true if the record awaits ratification by its nominal author.
    #[inline]
    #[must_use]
    pub const fn awaits_ratification(&self) -> bool {
        matches!(self, Self::PendingBuyerApproval | Self::PendingSellerApproval)
    }

    /// Returns true if the record awaits the proposal owner's decision.
    #[inline]
    #[must_use]
    pub const fn awaits_decision(&self) -> bool {
        matches!(self, Self::PendingBuyer | Self::PendingSeller)
    }

    /// Returns the numeric value of this state.
    #[inline]
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for ResponseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::PendingAdmin => "PENDING_ADMIN",
            Self::PendingBuyerApproval => "PENDING_BUYER_APPROVAL",
            Self::PendingSellerApproval => "PENDING_SELLER_APPROVAL",
            Self::PendingBuyer => "PENDING_BUYER",
            Self::PendingSeller => "PENDING_SELLER",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
        };
        write!(f, "{s}")
    }
}

/// Error returned when converting an invalid u8 to ResponseState.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidResponseStateError(
    /// The invalid u8 value.
    pub u8,
);

impl fmt::Display for InvalidResponseStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid response state value: {}", self.0)
    }
}

impl std::error::Error for InvalidResponseStateError {}

impl TryFrom<u8> for ResponseState {
    type Error = InvalidResponseStateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::PendingAdmin),
            1 => Ok(Self::PendingBuyerApproval),
            2 => Ok(Self::PendingSellerApproval),
            3 => Ok(Self::PendingBuyer),
            4 => Ok(Self::PendingSeller),
            5 => Ok(Self::Accepted),
            6 => Ok(Self::Rejected),
            _ => Err(InvalidResponseStateError(value)),
        }
    }
}
