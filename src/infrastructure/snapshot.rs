//! # Platform Snapshot
//!
//! Polled, last-known-good view of the whole platform.
//!
//! Clients do not receive pushes from the backend. A background
//! [`SnapshotRefresher`] re-fetches every record family on a fixed cadence
//! and installs the result in a [`SnapshotStore`]. Readers always see the
//! most recent complete snapshot; when a poll fails the previous snapshot
//! stays in place and is flagged as degraded so views can show a staleness
//! indicator instead of going blank.
//!
//! # Examples
//!
//! ```no_run
//! use recimat::config::PlatformConfig;
//! use recimat::infrastructure::api::http::HttpPlatformApi;
//! use recimat::infrastructure::snapshot::{SnapshotRefresher, SnapshotStore};
//! use std::sync::Arc;
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PlatformConfig::load()?;
//! let api = Arc::new(HttpPlatformApi::new(
//!     config.backend.base_url.clone(),
//!     config.backend.timeout_ms,
//! )?);
//! let store = Arc::new(SnapshotStore::new());
//! let _poller = SnapshotRefresher::new(api, Arc::clone(&store))
//!     .with_period(config.refresh.period())
//!     .spawn();
//! # Ok(())
//! # }
//! ```

use crate::domain::entities::{Commitment, Proposal, Response, User};
use crate::domain::value_objects::{EntityId, Timestamp, TradeModule, UserId};
use crate::infrastructure::api::error::ApiResult;
use crate::infrastructure::api::traits::PlatformApi;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Default refresh cadence.
pub const REFRESH_PERIOD: Duration = Duration::from_secs(5);

/// One complete, immutable view of the platform.
///
/// Holds every record of every family as fetched in a single poll cycle.
/// Snapshots are cheap to share via `Arc` and are replaced wholesale, never
/// patched.
#[derive(Debug, Clone)]
pub struct PlatformSnapshot {
    proposals: Vec<Proposal>,
    responses: Vec<Response>,
    commitments: Vec<Commitment>,
    users: Vec<User>,
    taken_at: Timestamp,
    degraded: bool,
}

impl PlatformSnapshot {
    /// Creates the empty snapshot served before the first successful poll.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            proposals: Vec::new(),
            responses: Vec::new(),
            commitments: Vec::new(),
            users: Vec::new(),
            taken_at: Timestamp::now(),
            degraded: false,
        }
    }

    /// Creates a snapshot from one poll cycle's results.
    #[must_use]
    pub fn fresh(
        proposals: Vec<Proposal>,
        responses: Vec<Response>,
        commitments: Vec<Commitment>,
        users: Vec<User>,
    ) -> Self {
        Self {
            proposals,
            responses,
            commitments,
            users,
            taken_at: Timestamp::now(),
            degraded: false,
        }
    }

    // ========== Accessors ==========

    /// Returns all proposal records across both modules.
    #[must_use]
    pub fn proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    /// Returns all response records across both modules.
    #[must_use]
    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    /// Returns all commitment records.
    #[must_use]
    pub fn commitments(&self) -> &[Commitment] {
        &self.commitments
    }

    /// Returns all user records.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Returns when this snapshot was taken.
    #[must_use]
    pub const fn taken_at(&self) -> Timestamp {
        self.taken_at
    }

    /// Returns true when at least one poll has failed since this snapshot
    /// was taken.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.degraded
    }

    // ========== Lookups ==========

    /// Finds a proposal by ID.
    #[must_use]
    pub fn proposal(&self, id: &EntityId) -> Option<&Proposal> {
        self.proposals.iter().find(|p| p.id() == id)
    }

    /// Finds a response by ID.
    #[must_use]
    pub fn response(&self, id: &EntityId) -> Option<&Response> {
        self.responses.iter().find(|r| r.id() == id)
    }

    /// Finds a user by ID.
    #[must_use]
    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id() == id)
    }

    /// Iterates the proposals of one module.
    pub fn proposals_in(&self, module: TradeModule) -> impl Iterator<Item = &Proposal> {
        self.proposals.iter().filter(move |p| p.module() == module)
    }

    /// Iterates the responses of one module.
    pub fn responses_in(&self, module: TradeModule) -> impl Iterator<Item = &Response> {
        self.responses.iter().filter(move |r| r.module() == module)
    }

    /// Returns all responses answering one proposal.
    #[must_use]
    pub fn responses_for(&self, proposal_id: &EntityId) -> Vec<&Response> {
        self.responses
            .iter()
            .filter(|r| r.proposal_id() == proposal_id)
            .collect()
    }
}

/// Shared cell holding the last complete snapshot.
///
/// Reads are lock-cheap and never block on a refresh in progress. The
/// refresher swaps the inner `Arc` wholesale, so a reader keeps a coherent
/// view for as long as it holds the returned handle.
#[derive(Debug)]
pub struct SnapshotStore {
    current: RwLock<Arc<PlatformSnapshot>>,
}

impl SnapshotStore {
    /// Creates a store primed with the empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(PlatformSnapshot::empty())),
        }
    }

    /// Returns a handle to the current snapshot.
    #[must_use]
    pub fn current(&self) -> Arc<PlatformSnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Installs a freshly fetched snapshot.
    pub fn install(&self, snapshot: PlatformSnapshot) {
        *self.current.write() = Arc::new(snapshot);
    }

    /// Flags the current snapshot as degraded, keeping its records.
    pub fn mark_degraded(&self) {
        let mut guard = self.current.write();
        if !guard.degraded {
            let mut stale = PlatformSnapshot::clone(&guard);
            stale.degraded = true;
            *guard = Arc::new(stale);
        }
    }

    // ========== Optimistic patches ==========
    //
    // Successful mutations land here immediately instead of waiting out the
    // poll cycle. Patches upsert by ID and leave the degraded flag alone.

    /// Upserts one proposal into the current snapshot.
    pub fn patch_proposal(&self, proposal: &Proposal) {
        let mut guard = self.current.write();
        let mut next = PlatformSnapshot::clone(&guard);
        match next.proposals.iter_mut().find(|p| p.id() == proposal.id()) {
            Some(slot) => *slot = proposal.clone(),
            None => next.proposals.push(proposal.clone()),
        }
        *guard = Arc::new(next);
    }

    /// Upserts one response into the current snapshot.
    pub fn patch_response(&self, response: &Response) {
        let mut guard = self.current.write();
        let mut next = PlatformSnapshot::clone(&guard);
        match next.responses.iter_mut().find(|r| r.id() == response.id()) {
            Some(slot) => *slot = response.clone(),
            None => next.responses.push(response.clone()),
        }
        *guard = Arc::new(next);
    }

    /// Upserts one commitment into the current snapshot.
    pub fn patch_commitment(&self, commitment: &Commitment) {
        let mut guard = self.current.write();
        let mut next = PlatformSnapshot::clone(&guard);
        match next
            .commitments
            .iter_mut()
            .find(|c| c.id() == commitment.id())
        {
            Some(slot) => *slot = commitment.clone(),
            None => next.commitments.push(commitment.clone()),
        }
        *guard = Arc::new(next);
    }

    /// Upserts one user into the current snapshot.
    pub fn patch_user(&self, user: &User) {
        let mut guard = self.current.write();
        let mut next = PlatformSnapshot::clone(&guard);
        match next.users.iter_mut().find(|u| u.id() == user.id()) {
            Some(slot) => *slot = user.clone(),
            None => next.users.push(user.clone()),
        }
        *guard = Arc::new(next);
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Background worker polling the backend into a [`SnapshotStore`].
#[derive(Debug)]
pub struct SnapshotRefresher {
    api: Arc<dyn PlatformApi>,
    store: Arc<SnapshotStore>,
    period: Duration,
}

impl SnapshotRefresher {
    /// Creates a refresher with the default cadence.
    #[must_use]
    pub fn new(api: Arc<dyn PlatformApi>, store: Arc<SnapshotStore>) -> Self {
        Self {
            api,
            store,
            period: REFRESH_PERIOD,
        }
    }

    /// Overrides the refresh cadence.
    #[must_use]
    pub const fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Fetches every record family once and installs the result.
    ///
    /// All six collection fetches run concurrently. A failure in any of
    /// them aborts the cycle without touching the store.
    ///
    /// # Errors
    ///
    /// Returns the first backend error encountered.
    pub async fn refresh_once(&self) -> ApiResult<()> {
        let (mut proposals, listings, mut responses, bids, commitments, users) = tokio::try_join!(
            self.api.list_proposals(TradeModule::Sourcing),
            self.api.list_proposals(TradeModule::Marketplace),
            self.api.list_responses(TradeModule::Sourcing),
            self.api.list_responses(TradeModule::Marketplace),
            self.api.list_commitments(),
            self.api.list_users(),
        )?;
        proposals.extend(listings);
        responses.extend(bids);
        self.store
            .install(PlatformSnapshot::fresh(proposals, responses, commitments, users));
        Ok(())
    }

    /// Runs one poll cycle, degrading the current snapshot on failure.
    pub async fn poll(&self) {
        if let Err(e) = self.refresh_once().await {
            tracing::warn!(error = %e, "platform refresh failed, keeping last known snapshot");
            self.store.mark_degraded();
        }
    }

    /// Polls forever at the configured cadence.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.poll().await;
        }
    }

    /// Spawns the polling loop on the current runtime.
    #[must_use]
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
