//! # In-Memory Platform API
//!
//! In-memory implementation of [`PlatformApi`] for testing.
//!
//! This implementation uses thread-safe `HashMap`s for storage, making it
//! suitable for unit tests and offline flows without a backend dependency.
//!
//! # Examples
//!
//! ```
//! use recimat::domain::entities::User;
//! use recimat::domain::value_objects::{Role, UserId};
//! use recimat::infrastructure::api::{InMemoryPlatformApi, PlatformApi};
//!
//! let api = InMemoryPlatformApi::new();
//! let user = User::register(
//!     UserId::new("u-1"),
//!     Role::Seller,
//!     "Recicladora Andina",
//!     "ventas@andina.co",
//!     "3001234567",
//!     "Cra 45 # 12-30",
//!     "Medellín",
//!     "Antioquia",
//!     "900123456-7",
//! )?;
//!
//! tokio_test::block_on(async {
//!     api.save_user(&user).await?;
//!     let found = api.find_user_by_email("ventas@andina.co").await?;
//!     assert!(found.is_some());
//!     Ok::<_, recimat::infrastructure::api::ApiError>(())
//! })?;
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

use crate::domain::entities::{Commitment, Proposal, Response, User};
use crate::domain::value_objects::{EntityId, TradeModule, UserId};
use crate::infrastructure::api::error::ApiResult;
use crate::infrastructure::api::traits::PlatformApi;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`PlatformApi`].
///
/// Keeps one thread-safe `HashMap` per record family. Suitable for unit
/// tests without a backend dependency.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlatformApi {
    proposals: Arc<RwLock<HashMap<EntityId, Proposal>>>,
    responses: Arc<RwLock<HashMap<EntityId, Response>>>,
    commitments: Arc<RwLock<HashMap<EntityId, Commitment>>>,
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryPlatformApi {
    /// Creates a new empty in-memory platform API.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of records across all families.
    #[must_use]
    pub fn len(&self) -> usize {
        let proposals = self
            .proposals
            .try_read()
            .map(|guard| guard.len())
            .unwrap_or(0);
        let responses = self
            .responses
            .try_read()
            .map(|guard| guard.len())
            .unwrap_or(0);
        let commitments = self
            .commitments
            .try_read()
            .map(|guard| guard.len())
            .unwrap_or(0);
        let users = self.users.try_read().map(|guard| guard.len()).unwrap_or(0);
        proposals + responses + commitments + users
    }

    /// Returns true if no records are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all records from all families.
    pub async fn clear(&self) {
        self.proposals.write().await.clear();
        self.responses.write().await.clear();
        self.commitments.write().await.clear();
        self.users.write().await.clear();
    }
}

#[async_trait]
impl PlatformApi for InMemoryPlatformApi {
    async fn save_proposal(&self, proposal: &Proposal) -> ApiResult<()> {
        let mut storage = self.proposals.write().await;
        storage.insert(proposal.id().clone(), proposal.clone());
        Ok(())
    }

    async fn get_proposal(&self, id: &EntityId) -> ApiResult<Option<Proposal>> {
        let storage = self.proposals.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn list_proposals(&self, module: TradeModule) -> ApiResult<Vec<Proposal>> {
        let storage = self.proposals.read().await;
        let matching: Vec<Proposal> = storage
            .values()
            .filter(|p| p.module() == module)
            .cloned()
            .collect();
        Ok(matching)
    }

    async fn save_response(&self, response: &Response) -> ApiResult<()> {
        let mut storage = self.responses.write().await;
        storage.insert(response.id().clone(), response.clone());
        Ok(())
    }

    async fn get_response(&self, id: &EntityId) -> ApiResult<Option<Response>> {
        let storage = self.responses.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn list_responses(&self, module: TradeModule) -> ApiResult<Vec<Response>> {
        let storage = self.responses.read().await;
        let matching: Vec<Response> = storage
            .values()
            .filter(|r| r.module() == module)
            .cloned()
            .collect();
        Ok(matching)
    }

    async fn find_responses_for(&self, proposal_id: &EntityId) -> ApiResult<Vec<Response>> {
        let storage = self.responses.read().await;
        let matching: Vec<Response> = storage
            .values()
            .filter(|r| r.proposal_id() == proposal_id)
            .cloned()
            .collect();
        Ok(matching)
    }

    async fn save_commitment(&self, commitment: &Commitment) -> ApiResult<()> {
        let mut storage = self.commitments.write().await;
        storage.insert(commitment.id().clone(), commitment.clone());
        Ok(())
    }

    async fn get_commitment(&self, id: &EntityId) -> ApiResult<Option<Commitment>> {
        let storage = self.commitments.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn list_commitments(&self) -> ApiResult<Vec<Commitment>> {
        let storage = self.commitments.read().await;
        Ok(storage.values().cloned().collect())
    }

    async fn save_user(&self, user: &User) -> ApiResult<()> {
        let mut storage = self.users.write().await;
        storage.insert(user.id().clone(), user.clone());
        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> ApiResult<Option<User>> {
        let storage = self.users.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn list_users(&self) -> ApiResult<Vec<User>> {
        let storage = self.users.read().await;
        Ok(storage.values().cloned().collect())
    }

    async fn find_user_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        let storage = self.users.read().await;
        let found = storage
            .values()
            .find(|u| u.email().eq_ignore_ascii_case(email))
            .cloned();
        Ok(found)
    }
}
