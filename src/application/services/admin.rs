//! Administrative use cases: review queues, overrides, and proxy authoring.
//!
//! Every operation here is gated on the caller holding the admin role. The
//! domain entities record who acted; this layer makes sure only admins get
//! that far.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::{Proposal, ProposalBuilder, Response, User};
use crate::domain::value_objects::{
    EntityId, FeePerKg, NegotiationTerms, ProposalState, Quantity, RejectionKind, Role, UserId,
};
use crate::infrastructure::api::traits::PlatformApi;
use crate::infrastructure::snapshot::SnapshotStore;
use std::sync::Arc;

/// Admin-facing platform operations.
#[derive(Debug)]
pub struct AdminService {
    api: Arc<dyn PlatformApi>,
    store: Arc<SnapshotStore>,
}

impl AdminService {
    /// Creates a new admin service.
    #[must_use]
    pub fn new(api: Arc<dyn PlatformApi>, store: Arc<SnapshotStore>) -> Self {
        Self { api, store }
    }

    // ========== Proposal review ==========

    /// Approves a pending proposal, publishing it.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admin callers and a domain error when
    /// the record is not awaiting review or its fee is unaccepted.
    pub async fn approve_proposal(
        &self,
        actor: &UserId,
        id: &EntityId,
    ) -> ApplicationResult<Proposal> {
        self.require_admin(actor).await?;
        let mut proposal = self.require_proposal(id).await?;
        proposal.approve(actor)?;
        self.save_proposal(&proposal).await?;
        Ok(proposal)
    }

    /// Rejects a pending proposal with a reason.
    ///
    /// `RejectionKind::Returned` leaves the record correctable by its
    /// owner; `RejectionKind::Final` ends the negotiation.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admin callers and a domain error for
    /// a blank reason or a record past review.
    pub async fn reject_proposal(
        &self,
        actor: &UserId,
        id: &EntityId,
        reason: &str,
        kind: RejectionKind,
    ) -> ApplicationResult<Proposal> {
        self.require_admin(actor).await?;
        let mut proposal = self.require_proposal(id).await?;
        proposal.reject(reason, kind, actor)?;
        self.save_proposal(&proposal).await?;
        Ok(proposal)
    }

    /// Approves a pending response, forwarding it to the proposal owner.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admin callers and a domain error when
    /// the record is not awaiting vetting.
    pub async fn approve_response(
        &self,
        actor: &UserId,
        id: &EntityId,
    ) -> ApplicationResult<Response> {
        self.require_admin(actor).await?;
        let mut response = self.require_response(id).await?;
        response.approve(actor)?;
        self.save_response(&response).await?;
        Ok(response)
    }

    /// Rejects a pending response with a reason during vetting.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admin callers and a domain error for
    /// a blank reason or a terminal record.
    pub async fn reject_response(
        &self,
        actor: &UserId,
        id: &EntityId,
        reason: &str,
        kind: RejectionKind,
    ) -> ApplicationResult<Response> {
        self.require_admin(actor).await?;
        let mut response = self.require_response(id).await?;
        response.reject(reason, kind, actor)?;
        self.save_response(&response).await?;
        Ok(response)
    }

    // ========== Overrides ==========

    /// Withdraws a record from public circulation.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admin callers and a domain error for
    /// a terminal record.
    pub async fn hide_proposal(
        &self,
        actor: &UserId,
        id: &EntityId,
    ) -> ApplicationResult<Proposal> {
        self.require_admin(actor).await?;
        let mut proposal = self.require_proposal(id).await?;
        proposal.hide(actor)?;
        self.save_proposal(&proposal).await?;
        Ok(proposal)
    }

    /// Returns a hidden record to circulation.
    ///
    /// The record comes back `ACTIVE` directly, never through a review
    /// state.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admin callers and a domain error when
    /// the record is not hidden.
    pub async fn unhide_proposal(
        &self,
        actor: &UserId,
        id: &EntityId,
    ) -> ApplicationResult<Proposal> {
        self.require_admin(actor).await?;
        let mut proposal = self.require_proposal(id).await?;
        proposal.unhide(actor)?;
        self.save_proposal(&proposal).await?;
        Ok(proposal)
    }

    /// Forces a proposal into an arbitrary state, skipping transition rules.
    ///
    /// The escape hatch for records wedged by out-of-band changes. Every
    /// use lands in the record's history.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admin callers.
    pub async fn force_proposal_state(
        &self,
        actor: &UserId,
        id: &EntityId,
        target: ProposalState,
    ) -> ApplicationResult<Proposal> {
        self.require_admin(actor).await?;
        let mut proposal = self.require_proposal(id).await?;
        proposal.force_state(target, actor);
        self.save_proposal(&proposal).await?;
        Ok(proposal)
    }

    /// Arbitrates a pending quantity increase.
    ///
    /// Approval raises both total and remaining stock and re-derives the
    /// management fee; denial returns the record unchanged. Either way the
    /// record goes back to circulation.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admin callers and a domain error when
    /// no increase is pending.
    pub async fn resolve_quantity_increase(
        &self,
        actor: &UserId,
        id: &EntityId,
        approve: bool,
    ) -> ApplicationResult<Proposal> {
        self.require_admin(actor).await?;
        let mut proposal = self.require_proposal(id).await?;
        proposal.resolve_quantity_increase(approve, actor)?;
        self.save_proposal(&proposal).await?;
        Ok(proposal)
    }

    // ========== Proxy authoring ==========

    /// Publishes a proposal on a user's behalf.
    ///
    /// The record starts in the owner's ratification state instead of the
    /// admin review queue; the nominal owner must ratify it before it goes
    /// live.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admin callers, a validation error
    /// when the nominal owner's role does not match the module side, and
    /// domain errors from draft validation.
    pub async fn create_proposal_for(
        &self,
        actor: &UserId,
        builder: ProposalBuilder,
    ) -> ApplicationResult<Proposal> {
        self.require_admin(actor).await?;
        let proposal = builder.created_by(actor.clone()).build()?;
        let owner = self.require_user(proposal.owner()).await?;
        let expected = proposal.module().proposal_owner_role();
        if owner.role() != expected {
            return Err(ApplicationError::validation(format!(
                "role {} cannot own a {} record",
                owner.role(),
                proposal.module()
            )));
        }
        self.save_proposal(&proposal).await?;
        Ok(proposal)
    }

    /// Submits a response on a user's behalf.
    ///
    /// The record starts in the responder's ratification state; the
    /// nominal responder must ratify it before the proposal owner sees it.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admin callers, a validation error
    /// when the responder's role does not match the module side, and the
    /// full set of submission rules from the domain.
    #[allow(clippy::too_many_arguments)]
    pub async fn submit_response_for(
        &self,
        actor: &UserId,
        proposal_id: &EntityId,
        responder: &UserId,
        quantity_requested: Quantity,
        terms: NegotiationTerms,
        declared_penalty: FeePerKg,
        penalty_fee_accepted: bool,
    ) -> ApplicationResult<Response> {
        self.require_admin(actor).await?;
        let proposal = self.require_proposal(proposal_id).await?;
        let responder_user = self.require_user(responder).await?;
        let expected = proposal.module().responder_role();
        if responder_user.role() != expected {
            return Err(ApplicationError::validation(format!(
                "role {} cannot respond in {}",
                responder_user.role(),
                proposal.module()
            )));
        }

        let response = Response::submit_proxy(
            &proposal,
            responder.clone(),
            actor.clone(),
            quantity_requested,
            terms,
            declared_penalty,
            penalty_fee_accepted,
        )?;
        self.save_response(&response).await?;
        Ok(response)
    }

    // ========== Account review ==========

    /// Marks an account as identity-verified.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admin callers.
    pub async fn verify_user(&self, actor: &UserId, id: &UserId) -> ApplicationResult<User> {
        self.require_admin(actor).await?;
        let mut user = self.require_user(id).await?;
        user.verify();
        self.save_user(&user).await?;
        Ok(user)
    }

    /// Applies every staged identity change on an account.
    ///
    /// Returns the updated account and how many fields changed. Applying
    /// drops the verified badge; the account re-enters the review queue.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admin callers.
    pub async fn apply_identity_changes(
        &self,
        actor: &UserId,
        id: &UserId,
    ) -> ApplicationResult<(User, usize)> {
        self.require_admin(actor).await?;
        let mut user = self.require_user(id).await?;
        let applied = user.apply_pending_changes();
        self.save_user(&user).await?;
        Ok((user, applied))
    }

    /// Discards every staged identity change on an account.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admin callers.
    pub async fn discard_identity_changes(
        &self,
        actor: &UserId,
        id: &UserId,
    ) -> ApplicationResult<User> {
        self.require_admin(actor).await?;
        let mut user = self.require_user(id).await?;
        user.discard_pending_changes();
        self.save_user(&user).await?;
        Ok(user)
    }

    // ========== Helpers ==========

    async fn require_admin(&self, actor: &UserId) -> ApplicationResult<()> {
        let user = self.require_user(actor).await?;
        if user.role() != Role::Admin {
            return Err(ApplicationError::unauthorized());
        }
        Ok(())
    }

    async fn require_proposal(&self, id: &EntityId) -> ApplicationResult<Proposal> {
        self.api
            .get_proposal(id)
            .await?
            .ok_or_else(|| ApplicationError::proposal_not_found(id.as_str()))
    }

    async fn require_response(&self, id: &EntityId) -> ApplicationResult<Response> {
        self.api
            .get_response(id)
            .await?
            .ok_or_else(|| ApplicationError::response_not_found(id.as_str()))
    }

    async fn require_user(&self, id: &UserId) -> ApplicationResult<User> {
        self.api
            .get_user(id)
            .await?
            .ok_or_else(|| ApplicationError::user_not_found(id.as_str()))
    }

    async fn save_proposal(&self, proposal: &Proposal) -> ApplicationResult<()> {
        self.api.save_proposal(proposal).await?;
        self.store.patch_proposal(proposal);
        Ok(())
    }

    async fn save_response(&self, response: &Response) -> ApplicationResult<()> {
        self.api.save_response(response).await?;
        self.store.patch_response(response);
        Ok(())
    }

    async fn save_user(&self, user: &User) -> ApplicationResult<()> {
        self.api.save_user(user).await?;
        self.store.patch_user(user);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::{IdentityField, PriceTerms};
    use crate::domain::value_objects::{ResponseState, TradeModule};
    use crate::infrastructure::api::in_memory::InMemoryPlatformApi;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    struct Harness {
        api: Arc<InMemoryPlatformApi>,
        service: AdminService,
    }

    fn harness() -> Harness {
        let api = Arc::new(InMemoryPlatformApi::new());
        let service = AdminService::new(
            Arc::clone(&api) as Arc<dyn PlatformApi>,
            Arc::new(SnapshotStore::new()),
        );
        Harness { api, service }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn kg(value: f64) -> Quantity {
        Quantity::new(value).unwrap()
    }

    async fn register(api: &InMemoryPlatformApi, id: &str, role: Role) -> UserId {
        let user_id = UserId::new(id);
        let user = User::register(
            user_id.clone(),
            role,
            "Pulpa y Cartón SAS",
            format!("{id}@pulpa.co"),
            "3014445566",
            "Cra 50 # 12-30",
            "Bogotá",
            "Cundinamarca",
            "901234567-1",
        )
        .unwrap();
        api.save_user(&user).await.unwrap();
        user_id
    }

    fn listing_builder(owner: &UserId) -> ProposalBuilder {
        ProposalBuilder::new(
            TradeModule::Marketplace,
            owner.clone(),
            "PET molido",
            kg(5000.0),
            PriceTerms::Flat(Decimal::new(2300, 0)),
            date(2024, 1, 1),
            date(2099, 12, 31),
        )
        .accept_management_fee()
    }

    async fn pending_listing(h: &Harness, owner: &UserId) -> EntityId {
        let listing = listing_builder(owner).build().unwrap();
        let id = listing.id().clone();
        h.api.save_proposal(&listing).await.unwrap();
        id
    }

    // Review queue

    #[tokio::test]
    async fn approve_proposal_activates_record() {
        let h = harness();
        let admin = register(&h.api, "u-admin", Role::Admin).await;
        let seller = register(&h.api, "u-seller", Role::Seller).await;
        let id = pending_listing(&h, &seller).await;

        let approved = h.service.approve_proposal(&admin, &id).await.unwrap();
        assert_eq!(approved.state(), ProposalState::Active);
    }

    #[tokio::test]
    async fn non_admin_cannot_review() {
        let h = harness();
        let seller = register(&h.api, "u-seller", Role::Seller).await;
        let id = pending_listing(&h, &seller).await;

        let err = h.service.approve_proposal(&seller, &id).await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn reject_proposal_stores_reason() {
        let h = harness();
        let admin = register(&h.api, "u-admin", Role::Admin).await;
        let seller = register(&h.api, "u-seller", Role::Seller).await;
        let id = pending_listing(&h, &seller).await;

        let rejected = h
            .service
            .reject_proposal(&admin, &id, "Falta ficha técnica", RejectionKind::Returned)
            .await
            .unwrap();
        assert_eq!(rejected.state(), ProposalState::Rejected);
        assert_eq!(
            rejected.rejection_reason(),
            Some("DEVUELTO: Falta ficha técnica")
        );
    }

    // Overrides

    #[tokio::test]
    async fn hide_then_unhide_restores_active() {
        let h = harness();
        let admin = register(&h.api, "u-admin", Role::Admin).await;
        let seller = register(&h.api, "u-seller", Role::Seller).await;
        let id = pending_listing(&h, &seller).await;
        h.service.approve_proposal(&admin, &id).await.unwrap();

        let hidden = h.service.hide_proposal(&admin, &id).await.unwrap();
        assert_eq!(hidden.state(), ProposalState::HiddenByAdmin);

        let restored = h.service.unhide_proposal(&admin, &id).await.unwrap();
        assert_eq!(restored.state(), ProposalState::Active);
    }

    #[tokio::test]
    async fn force_state_skips_transition_rules() {
        let h = harness();
        let admin = register(&h.api, "u-admin", Role::Admin).await;
        let seller = register(&h.api, "u-seller", Role::Seller).await;
        let id = pending_listing(&h, &seller).await;

        let forced = h
            .service
            .force_proposal_state(&admin, &id, ProposalState::Sold)
            .await
            .unwrap();
        assert_eq!(forced.state(), ProposalState::Sold);
    }

    #[tokio::test]
    async fn approved_quantity_increase_updates_stock_and_fee() {
        let h = harness();
        let admin = register(&h.api, "u-admin", Role::Admin).await;
        let seller = register(&h.api, "u-seller", Role::Seller).await;
        let id = pending_listing(&h, &seller).await;
        h.service.approve_proposal(&admin, &id).await.unwrap();

        let mut listing = h.api.get_proposal(&id).await.unwrap().unwrap();
        listing.request_quantity_increase(kg(6000.0), &seller).unwrap();
        h.api.save_proposal(&listing).await.unwrap();

        let resolved = h
            .service
            .resolve_quantity_increase(&admin, &id, true)
            .await
            .unwrap();
        assert_eq!(resolved.state(), ProposalState::Active);
        assert_eq!(resolved.total_quantity(), kg(11_000.0));
        // 11 t crosses from the 10 t bracket into the 25 t bracket.
        assert_eq!(
            resolved.management_fee_per_kg().unwrap().as_decimal(),
            Decimal::new(140, 0)
        );
        // The owner has to accept the re-derived fee again.
        assert!(!resolved.management_fee_accepted());
    }

    #[tokio::test]
    async fn denied_quantity_increase_keeps_stock() {
        let h = harness();
        let admin = register(&h.api, "u-admin", Role::Admin).await;
        let seller = register(&h.api, "u-seller", Role::Seller).await;
        let id = pending_listing(&h, &seller).await;
        h.service.approve_proposal(&admin, &id).await.unwrap();

        let mut listing = h.api.get_proposal(&id).await.unwrap().unwrap();
        listing.request_quantity_increase(kg(6000.0), &seller).unwrap();
        h.api.save_proposal(&listing).await.unwrap();

        let resolved = h
            .service
            .resolve_quantity_increase(&admin, &id, false)
            .await
            .unwrap();
        assert_eq!(resolved.state(), ProposalState::Active);
        assert_eq!(resolved.total_quantity(), kg(5000.0));
    }

    // Proxy authoring

    #[tokio::test]
    async fn proxy_proposal_awaits_owner_ratification() {
        let h = harness();
        let admin = register(&h.api, "u-admin", Role::Admin).await;
        let seller = register(&h.api, "u-seller", Role::Seller).await;

        let listing = h
            .service
            .create_proposal_for(&admin, listing_builder(&seller))
            .await
            .unwrap();
        assert!(listing.is_proxy_authored());
        assert_eq!(listing.state(), ProposalState::PendingSellerApproval);
    }

    #[tokio::test]
    async fn proxy_proposal_rejects_wrong_owner_role() {
        let h = harness();
        let admin = register(&h.api, "u-admin", Role::Admin).await;
        let buyer = register(&h.api, "u-buyer", Role::Buyer).await;

        let err = h
            .service
            .create_proposal_for(&admin, listing_builder(&buyer))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn proxy_response_awaits_responder_ratification() {
        let h = harness();
        let admin = register(&h.api, "u-admin", Role::Admin).await;
        let seller = register(&h.api, "u-seller", Role::Seller).await;
        let buyer = register(&h.api, "u-buyer", Role::Buyer).await;
        let id = pending_listing(&h, &seller).await;
        h.service.approve_proposal(&admin, &id).await.unwrap();

        let bid = h
            .service
            .submit_response_for(
                &admin,
                &id,
                &buyer,
                kg(1000.0),
                NegotiationTerms::accept_all(),
                FeePerKg::new(Decimal::new(180, 0)).unwrap(),
                true,
            )
            .await
            .unwrap();
        assert!(bid.is_proxy_authored());
        assert_eq!(bid.state(), ResponseState::PendingBuyerApproval);
    }

    // Account review

    #[tokio::test]
    async fn verify_user_sets_badge() {
        let h = harness();
        let admin = register(&h.api, "u-admin", Role::Admin).await;
        let seller = register(&h.api, "u-seller", Role::Seller).await;

        let verified = h.service.verify_user(&admin, &seller).await.unwrap();
        assert!(verified.verified());
    }

    #[tokio::test]
    async fn apply_identity_changes_counts_fields() {
        let h = harness();
        let admin = register(&h.api, "u-admin", Role::Admin).await;
        let seller = register(&h.api, "u-seller", Role::Seller).await;
        h.service.verify_user(&admin, &seller).await.unwrap();

        let mut user = h.api.get_user(&seller).await.unwrap().unwrap();
        user.request_identity_change(IdentityField::Name, "Cartones del Norte SAS")
            .unwrap();
        user.request_identity_change(IdentityField::LegalId, "900555444-3")
            .unwrap();
        h.api.save_user(&user).await.unwrap();

        let (updated, applied) = h
            .service
            .apply_identity_changes(&admin, &seller)
            .await
            .unwrap();
        assert_eq!(applied, 2);
        assert_eq!(updated.name(), "Cartones del Norte SAS");
        assert_eq!(updated.legal_id(), "900555444-3");
        // Changed identity drops the badge until re-review.
        assert!(!updated.verified());
    }

    #[tokio::test]
    async fn discard_identity_changes_keeps_original() {
        let h = harness();
        let admin = register(&h.api, "u-admin", Role::Admin).await;
        let seller = register(&h.api, "u-seller", Role::Seller).await;

        let mut user = h.api.get_user(&seller).await.unwrap().unwrap();
        user.request_identity_change(IdentityField::Name, "Otro Nombre")
            .unwrap();
        h.api.save_user(&user).await.unwrap();

        let updated = h
            .service
            .discard_identity_changes(&admin, &seller)
            .await
            .unwrap();
        assert_eq!(updated.name(), "Pulpa y Cartón SAS");
        assert!(!updated.has_pending_changes());
    }
}
