//! # Notification Counts
//!
//! Pending-action badges per viewer, recomputed wholesale from the current
//! snapshot on every refresh.
//!
//! The counts are derived, never stored: there is no read/unread state to
//! keep consistent, and a record leaving a pending state clears its badge
//! on the next poll without bookkeeping.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::{Proposal, Response, User};
use crate::domain::value_objects::{ProposalState, ResponseState, Role, TradeModule, UserId};
use crate::infrastructure::api::traits::PlatformApi;
use crate::infrastructure::snapshot::{PlatformSnapshot, SnapshotStore};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Pending-action counts for one viewer, bucketed by module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationCounts {
    /// Records in the sourcing module awaiting this viewer.
    pub sourcing: usize,
    /// Records in the marketplace module awaiting this viewer.
    pub marketplace: usize,
    /// Accounts awaiting admin review; zero for non-admin viewers.
    pub admin_users: usize,
    /// Sum of the three buckets.
    pub total: usize,
}

impl NotificationCounts {
    fn tally(sourcing: usize, marketplace: usize, admin_users: usize) -> Self {
        Self {
            sourcing,
            marketplace,
            admin_users,
            total: sourcing + marketplace + admin_users,
        }
    }
}

/// Computes the pending-action counts `viewer` would see on `snapshot`.
///
/// Admins see global review queues; buyers and sellers see only records
/// awaiting their own decision or ratification.
#[must_use]
pub fn counts_for(snapshot: &PlatformSnapshot, viewer: &User) -> NotificationCounts {
    match viewer.role() {
        Role::Admin => admin_counts(snapshot),
        Role::Buyer => buyer_counts(snapshot, viewer.id()),
        Role::Seller => seller_counts(snapshot, viewer.id()),
    }
}

fn admin_counts(snapshot: &PlatformSnapshot) -> NotificationCounts {
    let mut sourcing = 0;
    let mut marketplace = 0;
    for proposal in snapshot.proposals() {
        if matches!(
            proposal.state(),
            ProposalState::PendingAdmin | ProposalState::PendingQuantityIncrease
        ) {
            bump(proposal.module(), &mut sourcing, &mut marketplace);
        }
    }
    for response in snapshot.responses() {
        if response.state() == ResponseState::PendingAdmin {
            bump(response.module(), &mut sourcing, &mut marketplace);
        }
    }
    let admin_users = snapshot
        .users()
        .iter()
        .filter(|user| user.needs_admin_attention())
        .count();
    NotificationCounts::tally(sourcing, marketplace, admin_users)
}

fn buyer_counts(snapshot: &PlatformSnapshot, viewer: &UserId) -> NotificationCounts {
    // Offers on the buyer's requirements awaiting a decision, plus the
    // buyer's own proxy-authored records awaiting ratification.
    let sourcing = decidable_responses(snapshot, TradeModule::Sourcing, viewer)
        + own_pending(
            snapshot.proposals_in(TradeModule::Sourcing),
            viewer,
            ProposalState::PendingBuyerApproval,
        );
    let marketplace = own_response_pending(
        snapshot.responses_in(TradeModule::Marketplace),
        viewer,
        &[ResponseState::PendingBuyerApproval],
    );
    NotificationCounts::tally(sourcing, marketplace, 0)
}

fn seller_counts(snapshot: &PlatformSnapshot, viewer: &UserId) -> NotificationCounts {
    let sourcing = own_response_pending(
        snapshot.responses_in(TradeModule::Sourcing),
        viewer,
        &[ResponseState::PendingSellerApproval, ResponseState::PendingSeller],
    );
    // Purchase offers on the seller's listings awaiting a decision, plus
    // the seller's own proxy-authored listings awaiting ratification.
    let marketplace = decidable_responses(snapshot, TradeModule::Marketplace, viewer)
        + own_pending(
            snapshot.proposals_in(TradeModule::Marketplace),
            viewer,
            ProposalState::PendingSellerApproval,
        );
    NotificationCounts::tally(sourcing, marketplace, 0)
}

/// Responses in `module` sitting in the owner-decision state on records the
/// viewer owns.
fn decidable_responses(
    snapshot: &PlatformSnapshot,
    module: TradeModule,
    viewer: &UserId,
) -> usize {
    let decision = ResponseState::decision_for(module);
    snapshot
        .responses_in(module)
        .filter(|response| response.state() == decision)
        .filter(|response| {
            snapshot
                .proposal(response.proposal_id())
                .is_some_and(|proposal| proposal.owner() == viewer)
        })
        .count()
}

fn own_pending<'a>(
    proposals: impl Iterator<Item = &'a Proposal>,
    viewer: &UserId,
    state: ProposalState,
) -> usize {
    proposals
        .filter(|proposal| proposal.owner() == viewer && proposal.state() == state)
        .count()
}

fn own_response_pending<'a>(
    responses: impl Iterator<Item = &'a Response>,
    viewer: &UserId,
    states: &[ResponseState],
) -> usize {
    responses
        .filter(|response| response.responder() == viewer && states.contains(&response.state()))
        .count()
}

fn bump(module: TradeModule, sourcing: &mut usize, marketplace: &mut usize) {
    match module {
        TradeModule::Sourcing => *sourcing += 1,
        TradeModule::Marketplace => *marketplace += 1,
    }
}

/// Snapshot-backed notification counts for a viewer id.
#[derive(Debug)]
pub struct NotificationService {
    api: Arc<dyn PlatformApi>,
    store: Arc<SnapshotStore>,
}

impl NotificationService {
    /// Creates a new notification service.
    #[must_use]
    pub fn new(api: Arc<dyn PlatformApi>, store: Arc<SnapshotStore>) -> Self {
        Self { api, store }
    }

    /// Returns the viewer's current pending-action counts.
    ///
    /// Counts come from the local snapshot; only the viewer's own account
    /// may need a backend lookup when the last poll has not seen it yet.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` for an unknown viewer.
    pub async fn counts(&self, viewer: &UserId) -> ApplicationResult<NotificationCounts> {
        let snapshot = self.store.current();
        let user = match snapshot.user(viewer) {
            Some(user) => user.clone(),
            None => self
                .api
                .get_user(viewer)
                .await?
                .ok_or_else(|| ApplicationError::user_not_found(viewer.as_str()))?,
        };
        Ok(counts_for(&snapshot, &user))
    }
}
