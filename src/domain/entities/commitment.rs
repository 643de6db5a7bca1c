//! # Commitment Record
//!
//! The provisional deal derived from an accepted response. A commitment is
//! immutable once derived: it records which response was accepted, against
//! which proposal, and for what volume.
//!
//! The id is derived deterministically from the accepted response's id (same
//! module, date and suffix, kind `COM`), so deriving twice from the same
//! response yields the same commitment id. That determinism is what makes
//! the acceptance step idempotent under retries.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::entities::response::Response;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{EntityId, EntityKind, Quantity, Timestamp, TradeModule};

/// A provisional deal between a proposal's owner and a responder.
///
/// # Invariants
///
/// - Derived only from a response in the accepted state.
/// - The id is a pure function of the response id.
/// - Never mutated after derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Commitment {
    /// Deterministic identifier derived from the response id.
    id: EntityId,
    /// Sourcing or marketplace, inherited from the response.
    module: TradeModule,
    /// The proposal whose stock this commitment consumes.
    proposal_id: EntityId,
    /// The accepted response this commitment settles.
    response_id: EntityId,
    /// Committed volume in kilograms.
    volume: Quantity,
    /// When the commitment was derived.
    created_at: Timestamp,
}

impl Commitment {
    /// Derives the commitment for an accepted response.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the response is not accepted.
    pub fn derive(response: &Response) -> DomainResult<Self> {
        if !response.state().is_terminal() {
            return Err(DomainError::validation(format!(
                "response {} is not accepted, cannot derive a commitment",
                response.id()
            )));
        }
        Ok(Self {
            id: Self::id_for(response.id()),
            module: response.module(),
            proposal_id: response.proposal_id().clone(),
            response_id: response.id().clone(),
            volume: response.quantity_requested(),
            created_at: Timestamp::now(),
        })
    }

    /// Returns the commitment id a response would derive to.
    ///
    /// Canonical response ids keep their date and suffix with the kind
    /// swapped to `COM`; legacy ids that do not parse get a `-COM` suffix
    /// appended. Both derivations are deterministic, and acceptance uses
    /// this to check for an already-derived commitment before writing
    /// anything.
    #[must_use]
    pub fn id_for(response_id: &EntityId) -> EntityId {
        match response_id.parts() {
            Some(parts) => {
                EntityId::from_parts(parts.module, EntityKind::Com, parts.date, &parts.suffix)
            }
            None => EntityId::from(format!("{}-COM", response_id.as_str())),
        }
    }

    /// Returns the entity identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> &EntityId {
        &self.id
    }

    /// Returns the trade module.
    #[inline]
    #[must_use]
    pub const fn module(&self) -> TradeModule {
        self.module
    }

    /// Returns the proposal whose stock this commitment consumes.
    #[inline]
    #[must_use]
    pub const fn proposal_id(&self) -> &EntityId {
        &self.proposal_id
    }

    /// Returns the accepted response this commitment settles.
    #[inline]
    #[must_use]
    pub const fn response_id(&self) -> &EntityId {
        &self.response_id
    }

    /// Returns the committed volume in kilograms.
    #[inline]
    #[must_use]
    pub const fn volume(&self) -> Quantity {
        self.volume
    }

    /// Returns when the commitment was derived.
    #[inline]
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Commitment[{}] settles {} for {} kg",
            self.id, self.response_id, self.volume
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::proposal::{PriceTerms, Proposal, ProposalBuilder};
    use crate::domain::value_objects::{NegotiationTerms, UserId};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn active_listing() -> Proposal {
        let mut listing = ProposalBuilder::new(
            TradeModule::Marketplace,
            UserId::new("seller-1"),
            "PET molido",
            Quantity::new(1000.0).unwrap(),
            PriceTerms::Flat(Decimal::new(1200, 0)),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        )
        .accept_management_fee()
        .build()
        .unwrap();
        listing.approve(&UserId::new("admin-1")).unwrap();
        listing
    }

    fn accepted_bid(listing: &Proposal) -> Response {
        let mut bid = Response::submit(
            listing,
            UserId::new("buyer-1"),
            Quantity::new(400.0).unwrap(),
            NegotiationTerms::accept_all(),
            listing.expected_penalty_fee(),
            true,
        )
        .unwrap();
        bid.approve(&UserId::new("admin-1")).unwrap();
        bid.accept(&UserId::new("seller-1")).unwrap();
        bid
    }

    #[test]
    fn derive_settles_the_accepted_response() {
        let listing = active_listing();
        let bid = accepted_bid(&listing);
        let commitment = Commitment::derive(&bid).unwrap();

        assert_eq!(commitment.response_id(), bid.id());
        assert_eq!(commitment.proposal_id(), listing.id());
        assert_eq!(commitment.volume(), Quantity::new(400.0).unwrap());
        assert_eq!(commitment.module(), TradeModule::Marketplace);
    }

    #[test]
    fn derive_rejects_non_accepted_responses() {
        let listing = active_listing();
        let bid = Response::submit(
            &listing,
            UserId::new("buyer-1"),
            Quantity::new(400.0).unwrap(),
            NegotiationTerms::accept_all(),
            listing.expected_penalty_fee(),
            true,
        )
        .unwrap();
        let result = Commitment::derive(&bid);
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn canonical_id_swaps_kind_and_keeps_date_and_suffix() {
        let id = Commitment::id_for(&EntityId::from("M2-BID-20240115-K3F9"));
        assert_eq!(id.as_str(), "M2-COM-20240115-K3F9");

        let id = Commitment::id_for(&EntityId::from("M1-OFF-20240320-A7K2"));
        assert_eq!(id.as_str(), "M1-COM-20240320-A7K2");
    }

    #[test]
    fn legacy_id_gets_a_com_suffix() {
        let id = Commitment::id_for(&EntityId::from("bid-7"));
        assert_eq!(id.as_str(), "bid-7-COM");
    }

    #[test]
    fn id_derivation_is_deterministic() {
        let listing = active_listing();
        let bid = accepted_bid(&listing);
        let first = Commitment::derive(&bid).unwrap();
        let second = Commitment::derive(&bid).unwrap();
        assert_eq!(first.id(), second.id());
    }

    #[test]
    fn derived_commitment_id_is_canonical() {
        let listing = active_listing();
        let bid = accepted_bid(&listing);
        let commitment = Commitment::derive(&bid).unwrap();
        assert!(commitment.id().validate().is_empty());
        assert_eq!(commitment.id().parts().unwrap().kind, EntityKind::Com);
    }

    #[test]
    fn serde_uses_camel_case_keys() {
        let listing = active_listing();
        let bid = accepted_bid(&listing);
        let commitment = Commitment::derive(&bid).unwrap();
        let json = serde_json::to_string(&commitment).unwrap();
        assert!(json.contains("\"proposalId\""));
        assert!(json.contains("\"responseId\""));
        assert!(json.contains("\"createdAt\""));
    }
}
