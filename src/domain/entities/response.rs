//! # Response Aggregate
//!
//! The answering side of a negotiation: a seller's Offer against a sourcing
//! Requirement, or a buyer's PurchaseOffer against a marketplace Listing.
//!
//! A response takes a position on every negotiable clause of the proposal it
//! answers (accept verbatim or counter with justification) and carries the
//! penalty fee mirrored from that proposal's management fee. Submission is
//! where the clause-justification and fee-mirroring rules are enforced.
//!
//! # State Machine
//!
//! ```text
//! PENDING_ADMIN ──approve──→ PENDING_BUYER / PENDING_SELLER ──accept──→ ACCEPTED
//!      │                        │        ↑
//!      │reject            reject│        │resubmit
//!      ↓                        ↓        │
//!   REJECTED ←──────────────────┘────────┘
//!
//! PENDING_BUYER_APPROVAL / PENDING_SELLER_APPROVAL ──ratify──→ decision state
//! ```
//!
//! Resubmission after a rejection returns straight to the proposal owner's
//! decision state; the admin gate is only passed once per record.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use recimat::domain::entities::proposal::{PriceTerms, ProposalBuilder};
//! use recimat::domain::entities::response::Response;
//! use recimat::domain::value_objects::{
//!     NegotiationTerms, Quantity, ResponseState, TradeModule, UserId,
//! };
//! use rust_decimal::Decimal;
//!
//! let mut listing = ProposalBuilder::new(
//!     TradeModule::Marketplace,
//!     UserId::new("seller-1"),
//!     "PET molido",
//!     Quantity::new(1000.0).unwrap(),
//!     PriceTerms::Flat(Decimal::new(1200, 0)),
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
//! )
//! .accept_management_fee()
//! .build()
//! .unwrap();
//! listing.approve(&UserId::new("admin-1")).unwrap();
//!
//! let bid = Response::submit(
//!     &listing,
//!     UserId::new("buyer-1"),
//!     Quantity::new(400.0).unwrap(),
//!     NegotiationTerms::accept_all(),
//!     listing.expected_penalty_fee(),
//!     true,
//! )
//! .unwrap();
//!
//! assert_eq!(bid.state(), ResponseState::PendingAdmin);
//! assert_eq!(bid.penalty_fee_per_kg(), listing.expected_penalty_fee());
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::entities::communication_log::{CommunicationLog, LogEventType};
use crate::domain::entities::proposal::Proposal;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    EntityId, EntityKind, FeePerKg, NegotiationTerms, Quantity, RejectionKind, ResponseState,
    Timestamp, TradeModule, UserId,
};

/// A counterparty's answer to a proposal.
///
/// # Invariants
///
/// - `penalty_fee_per_kg` always equals the answered proposal's management
///   fee at submission time; there is no independent negotiation of it.
/// - Every countered clause carries a substantive justification.
/// - `ACCEPTED` is a one-way door; only rejected records can be edited and
///   resubmitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Canonical entity identifier.
    id: EntityId,
    /// Sourcing or marketplace, inherited from the proposal.
    module: TradeModule,
    /// The proposal this record answers.
    proposal_id: EntityId,
    /// The counterparty the response belongs to.
    responder: UserId,
    /// Who actually authored the record; differs from `responder` for
    /// admin-proxy records.
    created_by: UserId,
    /// Volume the responder wants, in kilograms.
    quantity_requested: Quantity,
    /// Position taken on each negotiable clause.
    terms: NegotiationTerms,
    /// Penalty mirrored from the proposal's management fee.
    penalty_fee_per_kg: FeePerKg,
    /// Whether the responder accepted the mirrored penalty.
    penalty_fee_accepted: bool,
    /// Lifecycle state.
    state: ResponseState,
    /// Why the record was rejected or returned, if it was.
    rejection_reason: Option<String>,
    /// Append-only negotiation history.
    log: CommunicationLog,
    /// Bumped on every mutation.
    version: u64,
    /// When the record was created.
    created_at: Timestamp,
    /// When the record last changed.
    updated_at: Timestamp,
}

impl Response {
    /// Submits a response against a proposal.
    ///
    /// Structured counter-proposal totals are recomputed from their
    /// components before validation; client arithmetic is not trusted. The
    /// declared penalty must equal the proposal's management fee exactly.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the proposal is not open to responses
    /// or the responder is the proposal's own owner,
    /// [`DomainError::InvalidQuantity`] for a zero volume,
    /// [`DomainError::QuantityExceedsAvailable`] when the volume exceeds the
    /// remaining stock, [`DomainError::MissingJustification`] for a clause
    /// rejected without explanation, [`DomainError::PenaltyFeeMismatch`] when
    /// the declared penalty does not mirror the management fee, and
    /// [`DomainError::PenaltyFeeNotAccepted`] when the mirrored penalty was
    /// not accepted.
    pub fn submit(
        proposal: &Proposal,
        responder: UserId,
        quantity_requested: Quantity,
        terms: NegotiationTerms,
        declared_penalty: FeePerKg,
        penalty_fee_accepted: bool,
    ) -> DomainResult<Self> {
        let author = responder.clone();
        Self::submit_inner(
            proposal,
            responder,
            author,
            quantity_requested,
            terms,
            declared_penalty,
            penalty_fee_accepted,
        )
    }

    /// Submits a response authored by an admin on the responder's behalf.
    ///
    /// The record starts in the responder's ratification state instead of
    /// the admin gate; the nominal author must ratify it before the proposal
    /// owner sees it.
    ///
    /// # Errors
    ///
    /// Same as [`Self::submit`].
    pub fn submit_proxy(
        proposal: &Proposal,
        responder: UserId,
        author: UserId,
        quantity_requested: Quantity,
        terms: NegotiationTerms,
        declared_penalty: FeePerKg,
        penalty_fee_accepted: bool,
    ) -> DomainResult<Self> {
        Self::submit_inner(
            proposal,
            responder,
            author,
            quantity_requested,
            terms,
            declared_penalty,
            penalty_fee_accepted,
        )
    }

    fn submit_inner(
        proposal: &Proposal,
        responder: UserId,
        author: UserId,
        quantity_requested: Quantity,
        terms: NegotiationTerms,
        declared_penalty: FeePerKg,
        penalty_fee_accepted: bool,
    ) -> DomainResult<Self> {
        if !proposal.is_tradeable() {
            return Err(DomainError::validation(format!(
                "proposal {} is not open to responses in state {}",
                proposal.id(),
                proposal.state()
            )));
        }
        if &responder == proposal.owner() {
            return Err(DomainError::validation(
                "cannot respond to a record you own",
            ));
        }
        if quantity_requested.is_zero() {
            return Err(DomainError::invalid_quantity(
                "requested quantity must be positive",
            ));
        }
        if quantity_requested > proposal.remaining_quantity() {
            return Err(DomainError::QuantityExceedsAvailable {
                requested: quantity_requested.as_decimal(),
                available: proposal.remaining_quantity().as_decimal(),
            });
        }
        let terms = terms.with_recomputed_totals();
        terms.validate()?;

        let expected = proposal.expected_penalty_fee();
        if declared_penalty != expected {
            return Err(DomainError::PenaltyFeeMismatch {
                expected: expected.as_decimal(),
                actual: declared_penalty.as_decimal(),
            });
        }
        if !penalty_fee_accepted {
            return Err(DomainError::PenaltyFeeNotAccepted);
        }

        let module = proposal.module();
        let is_proxy = author != responder;
        let state = if is_proxy {
            ResponseState::ratification_for(module)
        } else {
            ResponseState::PendingAdmin
        };

        let now = Timestamp::now();
        let mut log = CommunicationLog::new();
        let message = if is_proxy {
            "Respuesta creada por administración en nombre del usuario"
        } else {
            "Respuesta enviada a revisión"
        };
        log.log(author.clone(), LogEventType::Submitted, message);
        if let Some(summary) = countered_summary(&terms) {
            log.log(author.clone(), LogEventType::CounterProposed, summary);
        }

        Ok(Self {
            id: EntityId::generate(module, module.response_kind()),
            module,
            proposal_id: proposal.id().clone(),
            responder,
            created_by: author,
            quantity_requested,
            terms,
            penalty_fee_per_kg: expected,
            penalty_fee_accepted,
            state,
            rejection_reason: None,
            log,
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
        self.version = self.version.saturating_add(1);
    }

    fn transition_to(&mut self, target: ResponseState) -> DomainResult<()> {
        if !self.state.can_transition_to(target) {
            return Err(DomainError::InvalidResponseStateTransition {
                from: self.state,
                to: target,
            });
        }
        self.state = target;
        self.touch();
        Ok(())
    }

    // ========== Accessors ==========

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

    /// Returns the entity kind (`OFF` or `BID`).
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.module.response_kind()
    }

    /// Returns the id of the proposal this record answers.
    #[inline]
    #[must_use]
    pub const fn proposal_id(&self) -> &EntityId {
        &self.proposal_id
    }

    /// Returns the counterparty the response belongs to.
    #[inline]
    #[must_use]
    pub const fn responder(&self) -> &UserId {
        &self.responder
    }

    /// Returns who authored the record.
    #[inline]
    #[must_use]
    pub const fn created_by(&self) -> &UserId {
        &self.created_by
    }

    /// Returns whether an admin authored this record on the responder's
    /// behalf.
    #[must_use]
    pub fn is_proxy_authored(&self) -> bool {
        self.created_by != self.responder
    }

    /// Returns the requested volume in kilograms.
    #[inline]
    #[must_use]
    pub const fn quantity_requested(&self) -> Quantity {
        self.quantity_requested
    }

    /// Returns the position taken on each clause.
    #[inline]
    #[must_use]
    pub const fn terms(&self) -> &NegotiationTerms {
        &self.terms
    }

    /// Returns whether any clause was countered rather than accepted.
    #[must_use]
    pub fn has_counters(&self) -> bool {
        !self.terms.countered_clauses().is_empty()
    }

    /// Returns the mirrored penalty fee.
    #[inline]
    #[must_use]
    pub const fn penalty_fee_per_kg(&self) -> FeePerKg {
        self.penalty_fee_per_kg
    }

    /// Returns whether the responder accepted the mirrored penalty.
    #[inline]
    #[must_use]
    pub const fn penalty_fee_accepted(&self) -> bool {
        self.penalty_fee_accepted
    }

    /// Returns the lifecycle state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> ResponseState {
        self.state
    }

    /// Returns the stored rejection reason, if any.
    #[inline]
    #[must_use]
    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    /// Returns the negotiation history.
    #[inline]
    #[must_use]
    pub const fn log(&self) -> &CommunicationLog {
        &self.log
    }

    /// Returns the mutation counter.
    #[inline]
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns when the record was created.
    #[inline]
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when the record last changed.
    #[inline]
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    // ========== Admin Actions ==========

    /// Approves a vetted response, routing it to the proposal owner's
    /// decision state.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidResponseStateTransition`] when the
    /// record is not at the admin gate.
    pub fn approve(&mut self, admin: &UserId) -> DomainResult<()> {
        if self.state != ResponseState::PendingAdmin {
            return Err(DomainError::InvalidResponseStateTransition {
                from: self.state,
                to: ResponseState::decision_for(self.module),
            });
        }
        self.transition_to(ResponseState::decision_for(self.module))?;
        self.log.log(
            admin.clone(),
            LogEventType::AdminApproved,
            "Respuesta aprobada y enviada a decisión del titular",
        );
        Ok(())
    }

    /// Rejects or returns the record with a mandatory reason.
    ///
    /// Available at the admin gate and in the owner's decision states; both
    /// roles must explain a rejection so the author can self-correct.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyRejectionReason`] for a blank reason or
    /// [`DomainError::InvalidResponseStateTransition`] when the record
    /// cannot be rejected from its current state.
    pub fn reject(&mut self, reason: &str, kind: RejectionKind, actor: &UserId) -> DomainResult<()> {
        if reason.trim().is_empty() {
            return Err(DomainError::EmptyRejectionReason);
        }
        self.transition_to(ResponseState::Rejected)?;
        let annotated = kind.annotate(reason);
        let event = match kind {
            RejectionKind::Returned => LogEventType::Returned,
            RejectionKind::Final => LogEventType::Rejected,
        };
        self.log.log(actor.clone(), event, annotated.clone());
        self.rejection_reason = Some(annotated);
        Ok(())
    }

    // ========== Responder Actions ==========

    /// Ratifies an admin-authored record, routing it to the proposal owner.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidResponseStateTransition`] when the
    /// record is not awaiting ratification.
    pub fn ratify(&mut self, author: &UserId) -> DomainResult<()> {
        if !self.state.awaits_ratification() {
            return Err(DomainError::InvalidResponseStateTransition {
                from: self.state,
                to: ResponseState::decision_for(self.module),
            });
        }
        self.transition_to(ResponseState::decision_for(self.module))?;
        self.log.log(
            author.clone(),
            LogEventType::Ratified,
            "Respuesta ratificada por el autor",
        );
        Ok(())
    }

    /// Replaces the requested volume on a rejected record.
    ///
    /// `available` is the answered proposal's remaining stock at the time of
    /// the edit.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the record is not rejected,
    /// [`DomainError::InvalidQuantity`] for a zero volume, or
    /// [`DomainError::QuantityExceedsAvailable`] when the volume exceeds the
    /// remaining stock.
    pub fn set_quantity_requested(
        &mut self,
        quantity: Quantity,
        available: Quantity,
    ) -> DomainResult<()> {
        if self.state != ResponseState::Rejected {
            return Err(DomainError::validation(format!(
                "response {} cannot be edited in state {}",
                self.id, self.state
            )));
        }
        if quantity.is_zero() {
            return Err(DomainError::invalid_quantity(
                "requested quantity must be positive",
            ));
        }
        if quantity > available {
            return Err(DomainError::QuantityExceedsAvailable {
                requested: quantity.as_decimal(),
                available: available.as_decimal(),
            });
        }
        self.quantity_requested = quantity;
        self.touch();
        Ok(())
    }

    /// Resubmits a rejected record with adjusted terms.
    ///
    /// The record keeps its identity and returns straight to the proposal
    /// owner's decision state; the admin gate is not passed again. The
    /// stored rejection reason is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingJustification`] when the adjusted terms
    /// counter a clause without explanation, or
    /// [`DomainError::InvalidResponseStateTransition`] when the record is
    /// not rejected.
    pub fn resubmit(&mut self, terms: NegotiationTerms, actor: &UserId) -> DomainResult<()> {
        let terms = terms.with_recomputed_totals();
        terms.validate()?;
        self.transition_to(ResponseState::decision_for(self.module))?;
        self.terms = terms;
        self.rejection_reason = None;
        self.log.log(
            actor.clone(),
            LogEventType::Resubmitted,
            "Respuesta corregida y reenviada al titular",
        );
        if let Some(summary) = countered_summary(&self.terms) {
            self.log
                .log(actor.clone(), LogEventType::CounterProposed, summary);
        }
        Ok(())
    }

    // ========== Owner Decision ==========

    /// Accepts the response, closing the negotiation.
    ///
    /// This is the one-way door of the whole flow: an accepted response is
    /// terminal and triggers commitment derivation. A later rejection or
    /// resubmission of the same record is impossible.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidResponseStateTransition`] when the
    /// record is not awaiting the owner's decision.
    pub fn accept(&mut self, owner: &UserId) -> DomainResult<()> {
        if !self.state.awaits_decision() {
            return Err(DomainError::InvalidResponseStateTransition {
                from: self.state,
                to: ResponseState::Accepted,
            });
        }
        self.transition_to(ResponseState::Accepted)?;
        self.log.log(
            owner.clone(),
            LogEventType::Accepted,
            "Respuesta aceptada; compromiso en derivación",
        );
        Ok(())
    }

    // ========== Messaging ==========

    /// Appends a free-text message to the negotiation history.
    pub fn post_message(&mut self, author: &UserId, text: impl Into<String>) {
        self.log.log(author.clone(), LogEventType::Message, text);
        self.touch();
    }
}

fn countered_summary(terms: &NegotiationTerms) -> Option<String> {
    let countered = terms.countered_clauses();
    if countered.is_empty() {
        return None;
    }
    let labels: Vec<&str> = countered.iter().map(|kind| kind.label_es()).collect();
    Some(format!("Contrapropuesta en: {}", labels.join(", ")))
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Response[{}] answers {} state={} qty={} kg",
            self.id, self.proposal_id, self.state, self.quantity_requested
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::proposal::{PriceTerms, ProposalBuilder};
    use crate::domain::value_objects::{ClauseDecision, ClauseKind, CounterProposal};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn seller() -> UserId {
        UserId::new("seller-1")
    }

    fn buyer() -> UserId {
        UserId::new("buyer-1")
    }

    fn admin() -> UserId {
        UserId::new("admin-1")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn active_listing() -> Proposal {
        let mut listing = ProposalBuilder::new(
            TradeModule::Marketplace,
            seller(),
            "PET molido cristal",
            Quantity::new(1000.0).unwrap(),
            PriceTerms::Flat(Decimal::new(1200, 0)),
            date(2024, 1, 1),
            date(2024, 6, 30),
        )
        .accept_management_fee()
        .build()
        .unwrap();
        listing.approve(&admin()).unwrap();
        listing
    }

    fn active_requirement() -> Proposal {
        let mut requirement = ProposalBuilder::new(
            TradeModule::Sourcing,
            buyer(),
            "Cartón OCC",
            Quantity::new(5000.0).unwrap(),
            PriceTerms::Flat(Decimal::new(800, 0)),
            date(2024, 1, 1),
            date(2024, 12, 31),
        )
        .accept_management_fee()
        .build()
        .unwrap();
        requirement.approve(&admin()).unwrap();
        requirement
    }

    fn submit_bid(listing: &Proposal, kg: f64) -> Response {
        Response::submit(
            listing,
            buyer(),
            Quantity::new(kg).unwrap(),
            NegotiationTerms::accept_all(),
            listing.expected_penalty_fee(),
            true,
        )
        .unwrap()
    }

    mod submission {
        use super::*;

        #[test]
        fn submit_mirrors_the_management_fee() {
            let listing = active_listing();
            let bid = submit_bid(&listing, 400.0);

            assert_eq!(bid.state(), ResponseState::PendingAdmin);
            assert_eq!(bid.penalty_fee_per_kg(), listing.expected_penalty_fee());
            assert_eq!(bid.kind(), EntityKind::Bid);
            assert!(bid.id().as_str().starts_with("M2-BID-"));
            assert_eq!(bid.proposal_id(), listing.id());
            assert_eq!(bid.log().last_event(), Some(LogEventType::Submitted));
        }

        #[test]
        fn offer_against_requirement_gets_sourcing_kind() {
            let requirement = active_requirement();
            let offer = Response::submit(
                &requirement,
                seller(),
                Quantity::new(2000.0).unwrap(),
                NegotiationTerms::accept_all(),
                requirement.expected_penalty_fee(),
                true,
            )
            .unwrap();
            assert_eq!(offer.kind(), EntityKind::Off);
            assert!(offer.id().as_str().starts_with("M1-OFF-"));
        }

        #[test]
        fn mismatched_penalty_is_rejected() {
            let listing = active_listing();
            let result = Response::submit(
                &listing,
                buyer(),
                Quantity::new(400.0).unwrap(),
                NegotiationTerms::accept_all(),
                FeePerKg::new(Decimal::new(210, 0)).unwrap(),
                true,
            );
            assert!(matches!(
                result,
                Err(DomainError::PenaltyFeeMismatch { .. })
            ));
        }

        #[test]
        fn unaccepted_penalty_is_rejected() {
            let listing = active_listing();
            let result = Response::submit(
                &listing,
                buyer(),
                Quantity::new(400.0).unwrap(),
                NegotiationTerms::accept_all(),
                listing.expected_penalty_fee(),
                false,
            );
            assert!(matches!(result, Err(DomainError::PenaltyFeeNotAccepted)));
        }

        #[test]
        fn countered_clause_without_justification_is_rejected() {
            let listing = active_listing();
            let terms = NegotiationTerms::accept_all().with_clause(
                ClauseKind::Quality,
                ClauseDecision::counter(CounterProposal::text("")),
            );
            let result = Response::submit(
                &listing,
                buyer(),
                Quantity::new(400.0).unwrap(),
                terms,
                listing.expected_penalty_fee(),
                true,
            );
            assert!(matches!(
                result,
                Err(DomainError::MissingJustification(ClauseKind::Quality))
            ));
        }

        #[test]
        fn countered_clause_with_justification_is_logged() {
            let listing = active_listing();
            let terms = NegotiationTerms::accept_all().with_clause(
                ClauseKind::Logistics,
                ClauseDecision::counter(CounterProposal::text("recogemos en planta")),
            );
            let bid = Response::submit(
                &listing,
                buyer(),
                Quantity::new(400.0).unwrap(),
                terms,
                listing.expected_penalty_fee(),
                true,
            )
            .unwrap();
            assert!(bid.has_counters());
            assert_eq!(bid.log().last_event(), Some(LogEventType::CounterProposed));
        }

        #[test]
        fn over_stock_request_is_rejected() {
            let listing = active_listing();
            let result = Response::submit(
                &listing,
                buyer(),
                Quantity::new(1500.0).unwrap(),
                NegotiationTerms::accept_all(),
                listing.expected_penalty_fee(),
                true,
            );
            assert!(matches!(
                result,
                Err(DomainError::QuantityExceedsAvailable { .. })
            ));
        }

        #[test]
        fn zero_quantity_is_rejected() {
            let listing = active_listing();
            let result = Response::submit(
                &listing,
                buyer(),
                Quantity::zero(),
                NegotiationTerms::accept_all(),
                listing.expected_penalty_fee(),
                true,
            );
            assert!(matches!(result, Err(DomainError::InvalidQuantity(_))));
        }

        #[test]
        fn owner_cannot_answer_own_record() {
            let listing = active_listing();
            let result = Response::submit(
                &listing,
                seller(),
                Quantity::new(400.0).unwrap(),
                NegotiationTerms::accept_all(),
                listing.expected_penalty_fee(),
                true,
            );
            assert!(matches!(result, Err(DomainError::ValidationError(_))));
        }

        #[test]
        fn pending_proposal_takes_no_responses() {
            let pending = ProposalBuilder::new(
                TradeModule::Marketplace,
                seller(),
                "PET molido",
                Quantity::new(1000.0).unwrap(),
                PriceTerms::Flat(Decimal::new(1200, 0)),
                date(2024, 1, 1),
                date(2024, 6, 30),
            )
            .accept_management_fee()
            .build()
            .unwrap();
            let result = Response::submit(
                &pending,
                buyer(),
                Quantity::new(400.0).unwrap(),
                NegotiationTerms::accept_all(),
                pending.expected_penalty_fee(),
                true,
            );
            assert!(matches!(result, Err(DomainError::ValidationError(_))));
        }
    }

    mod admin_gate {
        use super::*;

        #[test]
        fn approve_routes_to_seller_decision_in_marketplace() {
            let listing = active_listing();
            let mut bid = submit_bid(&listing, 400.0);
            bid.approve(&admin()).unwrap();
            assert_eq!(bid.state(), ResponseState::PendingSeller);
            assert_eq!(bid.log().last_event(), Some(LogEventType::AdminApproved));
        }

        #[test]
        fn approve_routes_to_buyer_decision_in_sourcing() {
            let requirement = active_requirement();
            let mut offer = Response::submit(
                &requirement,
                seller(),
                Quantity::new(2000.0).unwrap(),
                NegotiationTerms::accept_all(),
                requirement.expected_penalty_fee(),
                true,
            )
            .unwrap();
            offer.approve(&admin()).unwrap();
            assert_eq!(offer.state(), ResponseState::PendingBuyer);
        }

        #[test]
        fn approve_twice_fails() {
            let listing = active_listing();
            let mut bid = submit_bid(&listing, 400.0);
            bid.approve(&admin()).unwrap();
            let result = bid.approve(&admin());
            assert!(matches!(
                result,
                Err(DomainError::InvalidResponseStateTransition { .. })
            ));
        }

        #[test]
        fn reject_at_gate_requires_reason() {
            let listing = active_listing();
            let mut bid = submit_bid(&listing, 400.0);
            let result = bid.reject("", RejectionKind::Final, &admin());
            assert!(matches!(result, Err(DomainError::EmptyRejectionReason)));
        }
    }

    mod decision {
        use super::*;

        #[test]
        fn accept_is_terminal() {
            let listing = active_listing();
            let mut bid = submit_bid(&listing, 400.0);
            bid.approve(&admin()).unwrap();
            bid.accept(&seller()).unwrap();

            assert_eq!(bid.state(), ResponseState::Accepted);
            assert_eq!(bid.log().last_event(), Some(LogEventType::Accepted));
        }

        #[test]
        fn accept_before_vetting_fails() {
            let listing = active_listing();
            let mut bid = submit_bid(&listing, 400.0);
            let result = bid.accept(&seller());
            assert!(matches!(
                result,
                Err(DomainError::InvalidResponseStateTransition { .. })
            ));
        }

        #[test]
        fn accepted_record_cannot_be_rejected() {
            let listing = active_listing();
            let mut bid = submit_bid(&listing, 400.0);
            bid.approve(&admin()).unwrap();
            bid.accept(&seller()).unwrap();

            let result = bid.reject("cambio de opinión", RejectionKind::Final, &seller());
            assert!(matches!(
                result,
                Err(DomainError::InvalidResponseStateTransition { .. })
            ));
        }

        #[test]
        fn accepted_record_cannot_be_resubmitted() {
            let listing = active_listing();
            let mut bid = submit_bid(&listing, 400.0);
            bid.approve(&admin()).unwrap();
            bid.accept(&seller()).unwrap();

            let result = bid.resubmit(NegotiationTerms::accept_all(), &buyer());
            assert!(matches!(
                result,
                Err(DomainError::InvalidResponseStateTransition { .. })
            ));
        }
    }

    mod rejection_and_resubmission {
        use super::*;

        #[test]
        fn owner_rejection_stores_annotated_reason() {
            let listing = active_listing();
            let mut bid = submit_bid(&listing, 400.0);
            bid.approve(&admin()).unwrap();
            bid.reject("precio muy bajo", RejectionKind::Returned, &seller())
                .unwrap();

            assert_eq!(bid.state(), ResponseState::Rejected);
            assert_eq!(bid.rejection_reason(), Some("DEVUELTO: precio muy bajo"));
        }

        #[test]
        fn resubmission_returns_to_owner_not_admin() {
            let listing = active_listing();
            let mut bid = submit_bid(&listing, 400.0);
            bid.approve(&admin()).unwrap();
            bid.reject("precio muy bajo", RejectionKind::Returned, &seller())
                .unwrap();
            let original_id = bid.id().clone();

            let terms = NegotiationTerms::accept_all().with_clause(
                ClauseKind::Price,
                ClauseDecision::counter(CounterProposal::text("subimos a 1250 COP/kg")),
            );
            bid.resubmit(terms, &buyer()).unwrap();

            assert_eq!(bid.id(), &original_id);
            assert_eq!(bid.state(), ResponseState::PendingSeller);
            assert!(bid.rejection_reason().is_none());
            assert!(bid.has_counters());
        }

        #[test]
        fn resubmission_validates_the_new_terms() {
            let listing = active_listing();
            let mut bid = submit_bid(&listing, 400.0);
            bid.approve(&admin()).unwrap();
            bid.reject("precio muy bajo", RejectionKind::Returned, &seller())
                .unwrap();

            let broken = NegotiationTerms::accept_all().with_clause(
                ClauseKind::Price,
                ClauseDecision::counter(CounterProposal::text("   ")),
            );
            let result = bid.resubmit(broken, &buyer());
            assert!(matches!(
                result,
                Err(DomainError::MissingJustification(ClauseKind::Price))
            ));
            assert_eq!(bid.state(), ResponseState::Rejected);
        }

        #[test]
        fn quantity_edit_only_while_rejected() {
            let listing = active_listing();
            let mut bid = submit_bid(&listing, 400.0);
            let result =
                bid.set_quantity_requested(Quantity::new(500.0).unwrap(), Quantity::new(1000.0).unwrap());
            assert!(matches!(result, Err(DomainError::ValidationError(_))));

            bid.reject("ajustar volumen", RejectionKind::Returned, &admin())
                .unwrap();
            bid.set_quantity_requested(Quantity::new(500.0).unwrap(), Quantity::new(1000.0).unwrap())
                .unwrap();
            assert_eq!(bid.quantity_requested(), Quantity::new(500.0).unwrap());
        }

        #[test]
        fn quantity_edit_checks_remaining_stock() {
            let listing = active_listing();
            let mut bid = submit_bid(&listing, 400.0);
            bid.reject("ajustar volumen", RejectionKind::Returned, &admin())
                .unwrap();
            let result =
                bid.set_quantity_requested(Quantity::new(900.0).unwrap(), Quantity::new(600.0).unwrap());
            assert!(matches!(
                result,
                Err(DomainError::QuantityExceedsAvailable { .. })
            ));
        }
    }

    mod proxy {
        use super::*;

        #[test]
        fn proxy_bid_awaits_buyer_ratification() {
            let listing = active_listing();
            let bid = Response::submit_proxy(
                &listing,
                buyer(),
                admin(),
                Quantity::new(400.0).unwrap(),
                NegotiationTerms::accept_all(),
                listing.expected_penalty_fee(),
                true,
            )
            .unwrap();
            assert!(bid.is_proxy_authored());
            assert_eq!(bid.state(), ResponseState::PendingBuyerApproval);
        }

        #[test]
        fn ratified_proxy_bid_goes_to_the_seller() {
            let listing = active_listing();
            let mut bid = Response::submit_proxy(
                &listing,
                buyer(),
                admin(),
                Quantity::new(400.0).unwrap(),
                NegotiationTerms::accept_all(),
                listing.expected_penalty_fee(),
                true,
            )
            .unwrap();
            bid.ratify(&buyer()).unwrap();
            assert_eq!(bid.state(), ResponseState::PendingSeller);
            assert_eq!(bid.log().last_event(), Some(LogEventType::Ratified));
        }

        #[test]
        fn ratify_fails_on_self_authored_record() {
            let listing = active_listing();
            let mut bid = submit_bid(&listing, 400.0);
            let result = bid.ratify(&buyer());
            assert!(matches!(
                result,
                Err(DomainError::InvalidResponseStateTransition { .. })
            ));
        }
    }

    mod messaging {
        use super::*;

        #[test]
        fn messages_append_to_the_history() {
            let listing = active_listing();
            let mut bid = submit_bid(&listing, 400.0);
            let before = bid.version();
            bid.post_message(&seller(), "¿Pueden entregar la primera semana?");
            assert_eq!(bid.log().last_event(), Some(LogEventType::Message));
            assert!(bid.version() > before);
        }
    }

    mod wire {
        use super::*;

        #[test]
        fn serde_uses_camel_case_keys() {
            let listing = active_listing();
            let bid = submit_bid(&listing, 400.0);
            let json = serde_json::to_string(&bid).unwrap();
            assert!(json.contains("\"penaltyFeePerKg\""));
            assert!(json.contains("\"penaltyFeeAccepted\""));
            assert!(json.contains("\"quantityRequested\""));
            assert!(json.contains("\"proposalId\""));
        }

        #[test]
        fn serde_roundtrip() {
            let listing = active_listing();
            let mut bid = submit_bid(&listing, 400.0);
            bid.approve(&admin()).unwrap();

            let json = serde_json::to_string(&bid).unwrap();
            let back: Response = serde_json::from_str(&json).unwrap();
            assert_eq!(bid, back);
        }
    }
}
