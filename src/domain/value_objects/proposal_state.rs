//! # Proposal State
//!
//! Lifecycle state machine for requirements and marketplace listings.
//!
//! This module provides the [`ProposalState`] enum representing the lifecycle
//! of a proposal (a buyer-authored sourcing requirement or a seller-authored
//! marketplace listing) from submission through admin arbitration to
//! fulfilment.
//!
//! # State Machine
//!
//! ```text
//! PendingAdmin            → Active | Rejected
//! PendingBuyerApproval    → Active | Rejected   (proxy-authored, buyer ratifies)
//! PendingSellerApproval   → Active | Rejected   (proxy-authored, seller ratifies)
//! Active                  → Sold | HiddenByAdmin | PendingQuantityIncrease
//! PendingQuantityIncrease → Active
//! HiddenByAdmin           → Active
//! Rejected                → PendingAdmin        (owner edits and resubmits)
//! Sold                    (terminal)
//! ```
//!
//! # Examples
//!
//! ```
//! use recimat::domain::value_objects::proposal_state::ProposalState;
//!
//! let state = ProposalState::PendingAdmin;
//! assert!(state.can_transition_to(ProposalState::Active));
//! assert!(!state.can_transition_to(ProposalState::Sold));
//! ```

use crate::domain::value_objects::enums::TradeModule;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Proposal lifecycle state.
///
/// State transitions are enforced via
/// [`can_transition_to`](ProposalState::can_transition_to); admin force-sets
/// bypass the table at the service layer and are logged.
///
/// # Terminal States
///
/// - [`Sold`](ProposalState::Sold): remaining quantity reached zero
///
/// # Examples
///
/// ```
/// use recimat::domain::value_objects::proposal_state::ProposalState;
///
/// assert!(!ProposalState::Active.is_terminal());
/// assert!(ProposalState::Sold.is_terminal());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum ProposalState {
    /// Awaiting admin review of the submitted terms.
    #[default]
    PendingAdmin = 0,

    /// Admin-proxy-authored record awaiting the buyer's ratification.
    PendingBuyerApproval = 1,

    /// Admin-proxy-authored record awaiting the seller's ratification.
    PendingSellerApproval = 2,

    /// Published and open to responses.
    Active = 3,

    /// Owner requested a stock increase, awaiting admin arbitration.
    PendingQuantityIncrease = 4,

    /// Remaining quantity reached zero (terminal).
    Sold = 5,

    /// Rejected or returned for adjustment; reason stored on the record.
    Rejected = 6,

    /// Withdrawn from public view by an admin.
    HiddenByAdmin = 7,
}

impl ProposalState {
    /// Returns true if this is a terminal state.
    ///
    /// # Examples
    ///
    /// ```
    /// use recimat::domain::value_objects::proposal_state::ProposalState;
    ///
    /// assert!(ProposalState::Sold.is_terminal());
    /// assert!(!ProposalState::Rejected.is_terminal());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Sold)
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
    /// use recimat::domain::value_objects::proposal_state::ProposalState;
    ///
    /// assert!(ProposalState::Active.can_transition_to(ProposalState::Sold));
    /// assert!(!ProposalState::Sold.can_transition_to(ProposalState::Active));
    /// ```
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            // From the admin gate
            (Self::PendingAdmin, Self::Active)
                | (Self::PendingAdmin, Self::Rejected)
                // From ratification of proxy-authored records
                | (Self::PendingBuyerApproval, Self::Active)
                | (Self::PendingBuyerApproval, Self::Rejected)
                | (Self::PendingSellerApproval, Self::Active)
                | (Self::PendingSellerApproval, Self::Rejected)
                // From Active
                | (Self::Active, Self::Sold)
                | (Self::Active, Self::HiddenByAdmin)
                | (Self::Active, Self::PendingQuantityIncrease)
                // Amendment resolved either way
                | (Self::PendingQuantityIncrease, Self::Active)
                // Unhide
                | (Self::HiddenByAdmin, Self::Active)
                // Owner resubmits through the admin gate
                | (Self::Rejected, Self::PendingAdmin)
        )
    }

    /// Returns the valid next states from this state.
    ///
    /// # Examples
    ///
    /// ```
    /// use recimat::domain::value_objects::proposal_state::ProposalState;
    ///
    /// let next = ProposalState::Active.valid_transitions();
    /// assert!(next.contains(&ProposalState::Sold));
    /// ```
    #[must_use]
    pub fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Self::PendingAdmin
            | Self::PendingBuyerApproval
            | Self::PendingSellerApproval => vec![Self::Active, Self::Rejected],
            Self::Active => vec![
                Self::Sold,
                Self::HiddenByAdmin,
                Self::PendingQuantityIncrease,
            ],
            Self::PendingQuantityIncrease | Self::HiddenByAdmin => vec![Self::Active],
            Self::Rejected => vec![Self::PendingAdmin],
            Self::Sold => vec![],
        }
    }

    /// Returns the ratification state for a proxy-authored proposal.
    ///
    /// Requirements are ratified by the buyer they were created for,
    /// listings by the seller.
    ///
    /// # Examples
    ///
    /// ```
    /// use recimat::domain::value_objects::enums::TradeModule;
    /// use recimat::domain::value_objects::proposal_state::ProposalState;
    ///
    /// assert_eq!(
    ///     ProposalState::ratification_for(TradeModule::Sourcing),
    ///     ProposalState::PendingBuyerApproval
    /// );
    /// ```
    #[inline]
    #[must_use]
    pub const fn ratification_for(module: TradeModule) -> Self {
        match module {
            TradeModule::Sourcing => Self::PendingBuyerApproval,
            TradeModule::Marketplace => Self::PendingSellerApproval,
        }
    }

    /// Returns true if the record sits in an admin work queue.
    #[inline]
    #[must_use]
    pub const fn needs_admin(&self) -> bool {
        matches!(self, Self::PendingAdmin | Self::PendingQuantityIncrease)
    }

    /// Returns true if the record awaits ratification by its nominal owner.
    #[inline]
    #[must_use]
    pub const fn awaits_ratification(&self) -> bool {
        matches!(self, Self::PendingBuyerApproval | Self::PendingSellerApproval)
    }

    /// Returns true if counterparties may submit responses against the record.
    ///
    /// A pending stock-increase amendment does not close the record; the
    /// already-published remaining quantity stays tradeable while the admin
    /// arbitrates the increase.
    #[inline]
    #[must_use]
    pub const fn accepts_responses(&self) -> bool {
        matches!(self, Self::Active | Self::PendingQuantityIncrease)
    }

    /// Returns the numeric value of this state.
    #[inline]
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::PendingAdmin => "PENDING_ADMIN",
            Self::PendingBuyerApproval => "PENDING_BUYER_APPROVAL",
            Self::PendingSellerApproval => "PENDING_SELLER_APPROVAL",
            Self::Active => "ACTIVE",
            Self::PendingQuantityIncrease => "PENDING_QUANTITY_INCREASE",
            Self::Sold => "SOLD",
            Self::Rejected => "REJECTED",
            Self::HiddenByAdmin => "HIDDEN_BY_ADMIN",
        };
        write!(f, "{s}")
    }
}

/// Error returned when converting an invalid u8 to ProposalState.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidProposalStateError(
    /// The invalid u8 value.
    pub u8,
);

impl fmt::Display for InvalidProposalStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid proposal state value: {}", self.0)
    }
}

impl std::error::Error for InvalidProposalStateError {}

impl TryFrom<u8> for ProposalState {
    type Error = InvalidProposalStateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::PendingAdmin),
            1 => Ok(Self::PendingBuyerApproval),
            2 => Ok(Self::PendingSellerApproval),
            3 => Ok(Self::Active),
            4 => Ok(Self::PendingQuantityIncrease),
            5 => Ok(Self::Sold),
            6 => Ok(Self::Rejected),
            7 => Ok(Self::HiddenByAdmin),
            _ => Err(InvalidProposalStateError(value)),
        }
    }
}
