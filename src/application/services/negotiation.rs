//! # Negotiation Service
//!
//! Participant-facing use cases for the two trading modules.
//!
//! This module provides the [`NegotiationService`] which coordinates the
//! proposal and response lifecycles against the remote backend: publishing
//! and revising records, submitting and deciding responses, and deriving
//! commitments on acceptance.
//!
//! Domain entities enforce state machines and business rules; this layer
//! adds identity checks (who may act on which record), backend round trips,
//! and the optimistic snapshot patches that keep views current between
//! polls.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::{Commitment, PriceTerms, Proposal, ProposalBuilder, Response, User};
use crate::domain::value_objects::{
    EntityId, FeePerKg, NegotiationTerms, Quantity, RejectionKind, Role, TradeModule, UserId,
};
use crate::infrastructure::api::traits::PlatformApi;
use crate::infrastructure::idempotency::{IdempotencyKey, IdempotencyRegistry};
use crate::infrastructure::snapshot::SnapshotStore;
use chrono::NaiveDate;
use std::sync::Arc;

/// Partial edit of a proposal's negotiable terms.
///
/// Fields left as `None` keep their current value. Edits are only accepted
/// while the record is in the owner's hands (pending review or returned).
#[derive(Debug, Clone, Default)]
pub struct ProposalRevision {
    /// Replacement price terms.
    pub price: Option<PriceTerms>,
    /// Replacement total quantity.
    pub total_quantity: Option<Quantity>,
    /// Replacement validity window.
    pub validity_window: Option<(NaiveDate, NaiveDate)>,
}

impl ProposalRevision {
    /// Returns true when the revision changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.price.is_none() && self.total_quantity.is_none() && self.validity_window.is_none()
    }
}

/// Corrected content for resubmitting a returned response.
#[derive(Debug, Clone)]
pub struct ResponseRevision {
    /// The revised clause decision set.
    pub terms: NegotiationTerms,
    /// Replacement requested volume, when the volume itself was the problem.
    pub quantity_requested: Option<Quantity>,
}

/// Participant-facing negotiation flows.
///
/// Every mutation follows the same shape: load the authoritative record
/// from the backend, run the domain operation, persist the result, then
/// patch the local snapshot so views update without waiting for the next
/// poll.
#[derive(Debug)]
pub struct NegotiationService {
    api: Arc<dyn PlatformApi>,
    store: Arc<SnapshotStore>,
    registry: Arc<IdempotencyRegistry>,
}

impl NegotiationService {
    /// Creates a new negotiation service.
    #[must_use]
    pub fn new(
        api: Arc<dyn PlatformApi>,
        store: Arc<SnapshotStore>,
        registry: Arc<IdempotencyRegistry>,
    ) -> Self {
        Self {
            api,
            store,
            registry,
        }
    }

    // ========== Proposal lifecycle ==========

    /// Publishes a new proposal owned by the caller.
    ///
    /// The record lands in the admin review queue. Admin-authored records
    /// go through [`AdminService::create_proposal_for`] instead.
    ///
    /// [`AdminService::create_proposal_for`]: crate::application::services::admin::AdminService
    ///
    /// # Errors
    ///
    /// Returns a domain error when the draft fails validation, a validation
    /// error when the caller's role does not match the module side, and
    /// `Unauthorized` when the builder names someone else as owner.
    pub async fn create_proposal(
        &self,
        actor: &UserId,
        builder: ProposalBuilder,
    ) -> ApplicationResult<Proposal> {
        let proposal = builder.build()?;
        if proposal.owner() != actor || proposal.is_proxy_authored() {
            return Err(ApplicationError::unauthorized());
        }
        let owner = self.require_user(actor).await?;
        let expected = proposal.module().proposal_owner_role();
        if owner.role() != expected {
            return Err(ApplicationError::validation(format!(
                "role {} cannot publish a {} record",
                owner.role(),
                proposal.module()
            )));
        }

        self.api.save_proposal(&proposal).await?;
        self.store.patch_proposal(&proposal);
        Ok(proposal)
    }

    /// Applies a revision to a proposal the caller owns.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-owners and a domain error when the
    /// record is not editable in its current state or a value is invalid.
    pub async fn revise_proposal(
        &self,
        actor: &UserId,
        id: &EntityId,
        revision: ProposalRevision,
    ) -> ApplicationResult<Proposal> {
        if revision.is_empty() {
            return Err(ApplicationError::validation("revision changes nothing"));
        }
        let mut proposal = self.require_owned_proposal(actor, id).await?;
        if let Some(price) = revision.price {
            proposal.set_price(price)?;
        }
        if let Some(quantity) = revision.total_quantity {
            proposal.set_total_quantity(quantity)?;
        }
        if let Some((from, until)) = revision.validity_window {
            proposal.set_validity_window(from, until)?;
        }

        self.api.save_proposal(&proposal).await?;
        self.store.patch_proposal(&proposal);
        Ok(proposal)
    }

    /// Records the owner's acceptance of the derived management fee.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-owners.
    pub async fn accept_management_fee(
        &self,
        actor: &UserId,
        id: &EntityId,
    ) -> ApplicationResult<Proposal> {
        let mut proposal = self.require_owned_proposal(actor, id).await?;
        proposal.accept_management_fee();

        self.api.save_proposal(&proposal).await?;
        self.store.patch_proposal(&proposal);
        Ok(proposal)
    }

    /// Sends a returned proposal back to admin review.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-owners and a domain error when the
    /// record is not in a returnable state.
    pub async fn resubmit_proposal(
        &self,
        actor: &UserId,
        id: &EntityId,
    ) -> ApplicationResult<Proposal> {
        let mut proposal = self.require_owned_proposal(actor, id).await?;
        proposal.resubmit(actor)?;

        self.api.save_proposal(&proposal).await?;
        self.store.patch_proposal(&proposal);
        Ok(proposal)
    }

    /// Ratifies an admin-authored proposal, activating it.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when the caller is not the nominal owner.
    pub async fn ratify_proposal(
        &self,
        actor: &UserId,
        id: &EntityId,
    ) -> ApplicationResult<Proposal> {
        let mut proposal = self.require_owned_proposal(actor, id).await?;
        proposal.ratify(actor)?;

        self.api.save_proposal(&proposal).await?;
        self.store.patch_proposal(&proposal);
        Ok(proposal)
    }

    /// Asks for more volume on an active proposal.
    ///
    /// The record leaves circulation until an admin arbitrates the request.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-owners and a domain error for a zero
    /// increase or an inactive record.
    pub async fn request_quantity_increase(
        &self,
        actor: &UserId,
        id: &EntityId,
        additional: Quantity,
    ) -> ApplicationResult<Proposal> {
        let mut proposal = self.require_owned_proposal(actor, id).await?;
        proposal.request_quantity_increase(additional, actor)?;

        self.api.save_proposal(&proposal).await?;
        self.store.patch_proposal(&proposal);
        Ok(proposal)
    }

    // ========== Response lifecycle ==========

    /// Submits a response to a tradeable proposal.
    ///
    /// `declared_penalty` is the per-kg penalty the client showed the
    /// responder; it must mirror the proposal's management fee exactly.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the caller's role does not match the
    /// module's responding side, and domain errors for every submission
    /// rule (stock, fee mirror, clause justification, self-response).
    pub async fn submit_response(
        &self,
        actor: &UserId,
        proposal_id: &EntityId,
        quantity_requested: Quantity,
        terms: NegotiationTerms,
        declared_penalty: FeePerKg,
        penalty_fee_accepted: bool,
    ) -> ApplicationResult<Response> {
        let proposal = self.require_proposal(proposal_id).await?;
        let responder = self.require_user(actor).await?;
        let expected = proposal.module().responder_role();
        if responder.role() != expected {
            return Err(ApplicationError::validation(format!(
                "role {} cannot respond in {}",
                responder.role(),
                proposal.module()
            )));
        }
        if !proposal.has_stored_fee() {
            tracing::warn!(
                proposal = %proposal.id(),
                "record predates fee stamping, mirroring a recomputed management fee"
            );
        }

        let response = Response::submit(
            &proposal,
            actor.clone(),
            quantity_requested,
            terms,
            declared_penalty,
            penalty_fee_accepted,
        )?;

        self.api.save_response(&response).await?;
        self.store.patch_response(&response);
        Ok(response)
    }

    /// Ratifies an admin-authored response, forwarding it to the owner.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when the caller is not the nominal responder.
    pub async fn ratify_response(
        &self,
        actor: &UserId,
        id: &EntityId,
    ) -> ApplicationResult<Response> {
        let mut response = self.require_response(id).await?;
        if response.responder() != actor {
            return Err(ApplicationError::unauthorized());
        }
        response.ratify(actor)?;

        self.api.save_response(&response).await?;
        self.store.patch_response(&response);
        Ok(response)
    }

    /// Resubmits a returned response with corrected content.
    ///
    /// The corrected record goes straight back to the proposal owner's
    /// decision queue; admin review happened on first submission.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when the caller is not the responder, and
    /// domain errors when the record is not returned or the corrections
    /// fail validation.
    pub async fn resubmit_response(
        &self,
        actor: &UserId,
        id: &EntityId,
        revision: ResponseRevision,
    ) -> ApplicationResult<Response> {
        let mut response = self.require_response(id).await?;
        if response.responder() != actor {
            return Err(ApplicationError::unauthorized());
        }
        if let Some(quantity) = revision.quantity_requested {
            let proposal = self.require_proposal(response.proposal_id()).await?;
            response.set_quantity_requested(quantity, proposal.remaining_quantity())?;
        }
        response.resubmit(revision.terms, actor)?;

        self.api.save_response(&response).await?;
        self.store.patch_response(&response);
        Ok(response)
    }

    /// Rejects a response as the proposal owner, with a reason.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when the caller does not own the answered
    /// proposal, and a domain error for a blank reason or a terminal record.
    pub async fn reject_response(
        &self,
        actor: &UserId,
        id: &EntityId,
        reason: &str,
        kind: RejectionKind,
    ) -> ApplicationResult<Response> {
        let mut response = self.require_response(id).await?;
        let proposal = self.require_proposal(response.proposal_id()).await?;
        if proposal.owner() != actor {
            return Err(ApplicationError::unauthorized());
        }
        response.reject(reason, kind, actor)?;

        self.api.save_response(&response).await?;
        self.store.patch_response(&response);
        Ok(response)
    }

    /// Accepts a response and derives its commitment.
    ///
    /// The operation is idempotent. Retries with the same `key` return the
    /// commitment recorded for the first completed attempt, and an already
    /// materialized commitment short-circuits regardless of the key. The
    /// remaining stock is re-checked against the freshly fetched proposal,
    /// never against the local snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when the caller does not own the answered
    /// proposal, and domain errors when the response does not await a
    /// decision or the requested volume no longer fits the remaining stock.
    pub async fn accept_response(
        &self,
        actor: &UserId,
        id: &EntityId,
        key: IdempotencyKey,
    ) -> ApplicationResult<Commitment> {
        if let Some(commitment_id) = self.registry.lookup(&key) {
            if let Some(existing) = self.api.get_commitment(&commitment_id).await? {
                return Ok(existing);
            }
        }

        let mut response = self.require_response(id).await?;
        let mut proposal = self.require_proposal(response.proposal_id()).await?;
        if proposal.owner() != actor {
            return Err(ApplicationError::unauthorized());
        }

        let commitment_id = Commitment::id_for(response.id());
        if let Some(existing) = self.api.get_commitment(&commitment_id).await? {
            self.registry.record(key, commitment_id);
            return Ok(existing);
        }

        // A response left Accepted by a previous partial attempt skips
        // straight to the derivation steps it is missing.
        if !response.state().is_terminal() {
            response.accept(actor)?;
            self.api.save_response(&response).await?;
            self.store.patch_response(&response);
        }

        let commitment = Commitment::derive(&response)?;
        self.api.save_commitment(&commitment).await?;
        self.store.patch_commitment(&commitment);

        proposal.reserve(response.quantity_requested(), actor)?;
        self.api.save_proposal(&proposal).await?;
        self.store.patch_proposal(&proposal);

        self.registry.record(key, commitment.id().clone());
        Ok(commitment)
    }

    /// Materializes commitments for accepted responses that lost theirs.
    ///
    /// Sweeps both modules and repairs each accepted response with no
    /// commitment record through the same deterministic derivation the
    /// accept path uses. Returns the repaired commitments.
    ///
    /// # Errors
    ///
    /// Returns the first backend error encountered; already repaired
    /// records stay repaired.
    pub async fn reconcile_commitments(&self) -> ApplicationResult<Vec<Commitment>> {
        let (sourcing, marketplace) = tokio::try_join!(
            self.api.list_responses(TradeModule::Sourcing),
            self.api.list_responses(TradeModule::Marketplace),
        )?;

        let mut repaired = Vec::new();
        for response in sourcing.into_iter().chain(marketplace) {
            if !response.state().is_terminal() {
                continue;
            }
            let commitment_id = Commitment::id_for(response.id());
            if self.api.get_commitment(&commitment_id).await?.is_some() {
                continue;
            }
            let commitment = Commitment::derive(&response)?;
            self.api.save_commitment(&commitment).await?;
            self.store.patch_commitment(&commitment);
            tracing::warn!(
                response = %response.id(),
                commitment = %commitment.id(),
                "materialized missing commitment for accepted response"
            );
            repaired.push(commitment);
        }
        Ok(repaired)
    }

    // ========== Messaging ==========

    /// Posts a free-text message to a proposal's negotiation thread.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when the caller is neither the owner nor an
    /// admin.
    pub async fn post_proposal_message(
        &self,
        actor: &UserId,
        id: &EntityId,
        text: impl Into<String> + Send,
    ) -> ApplicationResult<Proposal> {
        let mut proposal = self.require_proposal(id).await?;
        if proposal.owner() != actor && !self.is_admin(actor).await? {
            return Err(ApplicationError::unauthorized());
        }
        proposal.post_message(actor, text);

        self.api.save_proposal(&proposal).await?;
        self.store.patch_proposal(&proposal);
        Ok(proposal)
    }

    /// Posts a free-text message to a response's negotiation thread.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` when the caller is not a negotiation
    /// participant (responder, proposal owner, or admin).
    pub async fn post_response_message(
        &self,
        actor: &UserId,
        id: &EntityId,
        text: impl Into<String> + Send,
    ) -> ApplicationResult<Response> {
        let mut response = self.require_response(id).await?;
        if response.responder() != actor {
            let proposal = self.require_proposal(response.proposal_id()).await?;
            if proposal.owner() != actor && !self.is_admin(actor).await? {
                return Err(ApplicationError::unauthorized());
            }
        }
        response.post_message(actor, text);

        self.api.save_response(&response).await?;
        self.store.patch_response(&response);
        Ok(response)
    }

    // ========== Lookups ==========

    async fn require_proposal(&self, id: &EntityId) -> ApplicationResult<Proposal> {
        let proposal = self
            .api
            .get_proposal(id)
            .await?
            .ok_or_else(|| ApplicationError::proposal_not_found(id.as_str()))?;
        warn_on_legacy_id(proposal.id());
        Ok(proposal)
    }

    async fn require_owned_proposal(
        &self,
        actor: &UserId,
        id: &EntityId,
    ) -> ApplicationResult<Proposal> {
        let proposal = self.require_proposal(id).await?;
        if proposal.owner() != actor {
            return Err(ApplicationError::unauthorized());
        }
        Ok(proposal)
    }

    async fn require_response(&self, id: &EntityId) -> ApplicationResult<Response> {
        let response = self
            .api
            .get_response(id)
            .await?
            .ok_or_else(|| ApplicationError::response_not_found(id.as_str()))?;
        warn_on_legacy_id(response.id());
        Ok(response)
    }

    async fn require_user(&self, id: &UserId) -> ApplicationResult<User> {
        self.api
            .get_user(id)
            .await?
            .ok_or_else(|| ApplicationError::user_not_found(id.as_str()))
    }

    async fn is_admin(&self, id: &UserId) -> ApplicationResult<bool> {
        Ok(self.require_user(id).await?.role() == Role::Admin)
    }
}

/// Logs advisory findings for ids that predate the canonical format.
fn warn_on_legacy_id(id: &EntityId) {
    for finding in id.validate() {
        tracing::warn!(id = %id, finding = %finding, "record carries a non-canonical id");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ResponseState;
    use crate::infrastructure::api::in_memory::InMemoryPlatformApi;
    use rust_decimal::Decimal;

    struct Harness {
        api: Arc<InMemoryPlatformApi>,
        store: Arc<SnapshotStore>,
        service: NegotiationService,
    }

    fn harness() -> Harness {
        let api = Arc::new(InMemoryPlatformApi::new());
        let store = Arc::new(SnapshotStore::new());
        let service = NegotiationService::new(
            Arc::clone(&api) as Arc<dyn PlatformApi>,
            Arc::clone(&store),
            Arc::new(IdempotencyRegistry::new()),
        );
        Harness {
            api,
            store,
            service,
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn kg(value: f64) -> Quantity {
        Quantity::new(value).unwrap()
    }

    fn fee(value: i64) -> FeePerKg {
        FeePerKg::new(Decimal::new(value, 0)).unwrap()
    }

    fn listing_builder(owner: &UserId) -> ProposalBuilder {
        ProposalBuilder::new(
            TradeModule::Marketplace,
            owner.clone(),
            "Archivo blanco",
            kg(1000.0),
            PriceTerms::Flat(Decimal::new(1200, 0)),
            date(2024, 1, 1),
            date(2024, 6, 30),
        )
        .accept_management_fee()
    }

    async fn register(api: &InMemoryPlatformApi, id: &str, role: Role) -> UserId {
        let user_id = UserId::new(id);
        let user = User::register(
            user_id.clone(),
            role,
            "Recicladora Andina",
            format!("{id}@andina.co"),
            "3001112233",
            "Cl 10 # 4-21",
            "Medellín",
            "Antioquia",
            "900123456-7",
        )
        .unwrap();
        api.save_user(&user).await.unwrap();
        user_id
    }

    /// Seller, buyer, admin, and one approved marketplace listing.
    async fn listed_harness() -> (Harness, UserId, UserId, UserId, EntityId) {
        let h = harness();
        let seller = register(&h.api, "u-seller", Role::Seller).await;
        let buyer = register(&h.api, "u-buyer", Role::Buyer).await;
        let admin = register(&h.api, "u-admin", Role::Admin).await;

        let mut listing = listing_builder(&seller).build().unwrap();
        listing.approve(&admin).unwrap();
        let id = listing.id().clone();
        h.api.save_proposal(&listing).await.unwrap();
        (h, seller, buyer, admin, id)
    }

    async fn pending_bid(
        h: &Harness,
        buyer: &UserId,
        listing_id: &EntityId,
        volume: f64,
    ) -> EntityId {
        let bid = h
            .service
            .submit_response(
                buyer,
                listing_id,
                kg(volume),
                NegotiationTerms::accept_all(),
                fee(200),
                true,
            )
            .await
            .unwrap();
        bid.id().clone()
    }

    /// Bid vetted by the admin, sitting in the seller's decision queue.
    async fn decided_bid(
        h: &Harness,
        admin: &UserId,
        buyer: &UserId,
        listing_id: &EntityId,
        volume: f64,
    ) -> EntityId {
        let id = pending_bid(h, buyer, listing_id, volume).await;
        let mut bid = h.api.get_response(&id).await.unwrap().unwrap();
        bid.approve(admin).unwrap();
        h.api.save_response(&bid).await.unwrap();
        id
    }

    // Proposal lifecycle

    #[tokio::test]
    async fn create_proposal_persists_and_patches_snapshot() {
        let h = harness();
        let seller = register(&h.api, "u-seller", Role::Seller).await;

        let listing = h
            .service
            .create_proposal(&seller, listing_builder(&seller))
            .await
            .unwrap();

        assert!(h.api.get_proposal(listing.id()).await.unwrap().is_some());
        assert!(h.store.current().proposal(listing.id()).is_some());
    }

    #[tokio::test]
    async fn create_proposal_rejects_wrong_role() {
        let h = harness();
        let buyer = register(&h.api, "u-buyer", Role::Buyer).await;

        let err = h
            .service
            .create_proposal(&buyer, listing_builder(&buyer))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn create_proposal_rejects_mismatched_actor() {
        let h = harness();
        let seller = register(&h.api, "u-seller", Role::Seller).await;
        let other = register(&h.api, "u-other", Role::Seller).await;

        let err = h
            .service
            .create_proposal(&other, listing_builder(&seller))
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn revise_proposal_requires_ownership() {
        let h = harness();
        let seller = register(&h.api, "u-seller", Role::Seller).await;
        let other = register(&h.api, "u-other", Role::Seller).await;
        let listing = h
            .service
            .create_proposal(&seller, listing_builder(&seller))
            .await
            .unwrap();

        let revision = ProposalRevision {
            price: Some(PriceTerms::Flat(Decimal::new(1500, 0))),
            ..ProposalRevision::default()
        };
        let err = h
            .service
            .revise_proposal(&other, listing.id(), revision)
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn revise_proposal_applies_all_fields() {
        let h = harness();
        let seller = register(&h.api, "u-seller", Role::Seller).await;
        let listing = h
            .service
            .create_proposal(&seller, listing_builder(&seller))
            .await
            .unwrap();

        let revision = ProposalRevision {
            price: Some(PriceTerms::Flat(Decimal::new(1500, 0))),
            total_quantity: Some(kg(2000.0)),
            validity_window: Some((date(2024, 2, 1), date(2024, 12, 31))),
        };
        let revised = h
            .service
            .revise_proposal(&seller, listing.id(), revision)
            .await
            .unwrap();

        assert_eq!(revised.total_quantity(), kg(2000.0));
        assert_eq!(revised.valid_until(), date(2024, 12, 31));
        // A volume change re-derives the fee and resets the acceptance.
        assert!(!revised.management_fee_accepted());
    }

    #[tokio::test]
    async fn empty_revision_is_rejected() {
        let h = harness();
        let seller = register(&h.api, "u-seller", Role::Seller).await;
        let listing = h
            .service
            .create_proposal(&seller, listing_builder(&seller))
            .await
            .unwrap();

        let err = h
            .service
            .revise_proposal(&seller, listing.id(), ProposalRevision::default())
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    // Response lifecycle

    #[tokio::test]
    async fn submit_response_mirrors_penalty_and_persists() {
        let (h, _seller, buyer, _admin, listing_id) = listed_harness().await;

        let bid = h
            .service
            .submit_response(
                &buyer,
                &listing_id,
                kg(400.0),
                NegotiationTerms::accept_all(),
                fee(200),
                true,
            )
            .await
            .unwrap();

        assert_eq!(bid.penalty_fee_per_kg(), fee(200));
        assert_eq!(bid.state(), ResponseState::PendingAdmin);
        assert!(h.store.current().response(bid.id()).is_some());
    }

    #[tokio::test]
    async fn submit_response_rejects_owner_side_role() {
        let (h, seller, _buyer, _admin, listing_id) = listed_harness().await;

        let err = h
            .service
            .submit_response(
                &seller,
                &listing_id,
                kg(400.0),
                NegotiationTerms::accept_all(),
                fee(200),
                true,
            )
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn submit_response_requires_registered_responder() {
        let (h, _seller, _buyer, _admin, listing_id) = listed_harness().await;

        let err = h
            .service
            .submit_response(
                &UserId::new("u-ghost"),
                &listing_id,
                kg(400.0),
                NegotiationTerms::accept_all(),
                fee(200),
                true,
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn reject_response_requires_proposal_owner() {
        let (h, _seller, buyer, admin, listing_id) = listed_harness().await;
        let bid_id = decided_bid(&h, &admin, &buyer, &listing_id, 400.0).await;

        let err = h
            .service
            .reject_response(&buyer, &bid_id, "Precio fuera de rango", RejectionKind::Returned)
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn rejected_response_can_be_resubmitted_by_responder() {
        let (h, seller, buyer, admin, listing_id) = listed_harness().await;
        let bid_id = decided_bid(&h, &admin, &buyer, &listing_id, 400.0).await;

        h.service
            .reject_response(&seller, &bid_id, "Volumen muy alto", RejectionKind::Returned)
            .await
            .unwrap();

        let revision = ResponseRevision {
            terms: NegotiationTerms::accept_all(),
            quantity_requested: Some(kg(300.0)),
        };
        let corrected = h
            .service
            .resubmit_response(&buyer, &bid_id, revision)
            .await
            .unwrap();

        assert_eq!(corrected.quantity_requested(), kg(300.0));
        assert_eq!(corrected.state(), ResponseState::PendingSeller);
        assert!(corrected.rejection_reason().is_none());
    }

    // Acceptance and commitment derivation

    #[tokio::test]
    async fn accept_response_derives_commitment_and_reserves_stock() {
        let (h, seller, buyer, admin, listing_id) = listed_harness().await;
        let bid_id = decided_bid(&h, &admin, &buyer, &listing_id, 400.0).await;

        let commitment = h
            .service
            .accept_response(&seller, &bid_id, IdempotencyKey::generate())
            .await
            .unwrap();

        assert_eq!(commitment.volume(), kg(400.0));
        assert_eq!(commitment.response_id(), &bid_id);

        let listing = h.api.get_proposal(&listing_id).await.unwrap().unwrap();
        assert_eq!(listing.remaining_quantity(), kg(600.0));

        let bid = h.api.get_response(&bid_id).await.unwrap().unwrap();
        assert_eq!(bid.state(), ResponseState::Accepted);
    }

    #[tokio::test]
    async fn accept_response_requires_owner() {
        let (h, _seller, buyer, admin, listing_id) = listed_harness().await;
        let bid_id = decided_bid(&h, &admin, &buyer, &listing_id, 400.0).await;

        let err = h
            .service
            .accept_response(&buyer, &bid_id, IdempotencyKey::generate())
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn accept_replay_with_same_key_returns_same_commitment() {
        let (h, seller, buyer, admin, listing_id) = listed_harness().await;
        let bid_id = decided_bid(&h, &admin, &buyer, &listing_id, 400.0).await;
        let key = IdempotencyKey::generate();

        let first = h.service.accept_response(&seller, &bid_id, key).await.unwrap();
        let second = h.service.accept_response(&seller, &bid_id, key).await.unwrap();

        assert_eq!(first.id(), second.id());
        // The stock was only reserved once.
        let listing = h.api.get_proposal(&listing_id).await.unwrap().unwrap();
        assert_eq!(listing.remaining_quantity(), kg(600.0));
    }

    #[tokio::test]
    async fn accept_replay_with_fresh_key_short_circuits_on_commitment() {
        let (h, seller, buyer, admin, listing_id) = listed_harness().await;
        let bid_id = decided_bid(&h, &admin, &buyer, &listing_id, 400.0).await;

        let first = h
            .service
            .accept_response(&seller, &bid_id, IdempotencyKey::generate())
            .await
            .unwrap();
        let second = h
            .service
            .accept_response(&seller, &bid_id, IdempotencyKey::generate())
            .await
            .unwrap();

        assert_eq!(first.id(), second.id());
        let listing = h.api.get_proposal(&listing_id).await.unwrap().unwrap();
        assert_eq!(listing.remaining_quantity(), kg(600.0));
    }

    #[tokio::test]
    async fn accept_rechecks_stock_against_fresh_record() {
        let (h, seller, buyer, admin, listing_id) = listed_harness().await;
        let first_bid = decided_bid(&h, &admin, &buyer, &listing_id, 700.0).await;
        let second_bid = decided_bid(&h, &admin, &buyer, &listing_id, 700.0).await;

        h.service
            .accept_response(&seller, &first_bid, IdempotencyKey::generate())
            .await
            .unwrap();

        // Both bids passed submission checks against 1000 kg, but only
        // 300 kg remain by the time the second acceptance runs.
        let err = h
            .service
            .accept_response(&seller, &second_bid, IdempotencyKey::generate())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(
                crate::domain::errors::DomainError::QuantityExceedsAvailable { .. }
            )
        ));
    }

    #[tokio::test]
    async fn reconcile_materializes_missing_commitment() {
        let (h, seller, buyer, admin, listing_id) = listed_harness().await;
        let bid_id = decided_bid(&h, &admin, &buyer, &listing_id, 400.0).await;

        // Simulate a crash window: the response was accepted but the
        // commitment write never happened.
        let mut bid = h.api.get_response(&bid_id).await.unwrap().unwrap();
        bid.accept(&seller).unwrap();
        h.api.save_response(&bid).await.unwrap();

        let repaired = h.service.reconcile_commitments().await.unwrap();
        assert_eq!(repaired.len(), 1);
        assert_eq!(repaired[0].response_id(), &bid_id);

        // Running the sweep again finds nothing to repair.
        let repaired = h.service.reconcile_commitments().await.unwrap();
        assert!(repaired.is_empty());
    }

    // Messaging

    #[tokio::test]
    async fn response_thread_accepts_participants_only() {
        let (h, seller, buyer, _admin, listing_id) = listed_harness().await;
        let outsider = register(&h.api, "u-outsider", Role::Buyer).await;
        let bid_id = pending_bid(&h, &buyer, &listing_id, 400.0).await;

        h.service
            .post_response_message(&seller, &bid_id, "¿Puede entregar en febrero?")
            .await
            .unwrap();
        h.service
            .post_response_message(&buyer, &bid_id, "Sí, sin problema")
            .await
            .unwrap();

        let err = h
            .service
            .post_response_message(&outsider, &bid_id, "yo también quiero")
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }
}
