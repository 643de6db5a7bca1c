//! # Platform API Port
//!
//! Port definition for the remote platform backend.
//!
//! This module defines the [`PlatformApi`] trait that abstracts the hosted
//! document store holding all trading records. Implementations can target
//! the real HTTP backend or in-memory storage for tests.
//!
//! Records are never deleted through this port. Withdrawing a record from
//! circulation is a state change (hiding) performed by the domain, so the
//! port only exposes reads and upserts.
//!
//! # Examples
//!
//! ```ignore
//! use recimat::domain::value_objects::TradeModule;
//! use recimat::infrastructure::api::traits::PlatformApi;
//!
//! async fn open_listings(api: &impl PlatformApi) {
//!     let listings = api.list_proposals(TradeModule::Marketplace).await?;
//!     println!("Found {} listings", listings.len());
//! }
//! ```

use crate::domain::entities::{Commitment, Proposal, Response, User};
use crate::domain::value_objects::{EntityId, TradeModule, UserId};
use crate::infrastructure::api::error::ApiResult;
use async_trait::async_trait;
use std::fmt;

/// Port for the remote platform backend.
///
/// All trading state lives in a hosted document store shared by every
/// client. The port groups the four record families (proposals, responses,
/// commitments, users) behind one facade so callers can refresh the whole
/// platform view in a single cycle.
///
/// # Examples
///
/// ```ignore
/// use recimat::infrastructure::api::traits::PlatformApi;
///
/// async fn example(api: &impl PlatformApi) {
///     // Load one record
///     let listing = api.get_proposal(&id).await?;
///
///     // Persist a modified record
///     api.save_proposal(&listing).await?;
/// }
/// ```
#[async_trait]
pub trait PlatformApi: Send + Sync + fmt::Debug {
    /// Saves a proposal record.
    ///
    /// If the record already exists it is replaced wholesale. The backend
    /// stores full documents and performs no partial updates.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write or is unreachable.
    async fn save_proposal(&self, proposal: &Proposal) -> ApiResult<()>;

    /// Gets a proposal record by ID.
    ///
    /// Returns `None` if the record does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or the payload cannot
    /// be decoded.
    async fn get_proposal(&self, id: &EntityId) -> ApiResult<Option<Proposal>>;

    /// Lists all proposal records in a module.
    ///
    /// Returns requirements for [`TradeModule::Sourcing`] and listings for
    /// [`TradeModule::Marketplace`], in no particular order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or the payload cannot
    /// be decoded.
    async fn list_proposals(&self, module: TradeModule) -> ApiResult<Vec<Proposal>>;

    /// Saves a response record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write or is unreachable.
    async fn save_response(&self, response: &Response) -> ApiResult<()>;

    /// Gets a response record by ID.
    ///
    /// Returns `None` if the record does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or the payload cannot
    /// be decoded.
    async fn get_response(&self, id: &EntityId) -> ApiResult<Option<Response>>;

    /// Lists all response records in a module.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or the payload cannot
    /// be decoded.
    async fn list_responses(&self, module: TradeModule) -> ApiResult<Vec<Response>>;

    /// Finds all responses answering one proposal.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or the payload cannot
    /// be decoded.
    async fn find_responses_for(&self, proposal_id: &EntityId) -> ApiResult<Vec<Response>>;

    /// Saves a commitment record.
    ///
    /// Commitments are immutable once written; saving the same commitment
    /// twice is a harmless overwrite with identical content.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write or is unreachable.
    async fn save_commitment(&self, commitment: &Commitment) -> ApiResult<()>;

    /// Gets a commitment record by ID.
    ///
    /// Returns `None` if the record does not exist. Acceptance flows probe
    /// this before deriving, so a `None` here means the commitment has not
    /// been materialized yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or the payload cannot
    /// be decoded.
    async fn get_commitment(&self, id: &EntityId) -> ApiResult<Option<Commitment>>;

    /// Lists all commitment records across both modules.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or the payload cannot
    /// be decoded.
    async fn list_commitments(&self) -> ApiResult<Vec<Commitment>>;

    /// Saves a user record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write or is unreachable.
    async fn save_user(&self, user: &User) -> ApiResult<()>;

    /// Gets a user record by ID.
    ///
    /// Returns `None` if the record does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or the payload cannot
    /// be decoded.
    async fn get_user(&self, id: &UserId) -> ApiResult<Option<User>>;

    /// Lists all user records.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or the payload cannot
    /// be decoded.
    async fn list_users(&self) -> ApiResult<Vec<User>>;

    /// Finds a user by email address.
    ///
    /// The match is case-insensitive. Returns `None` if no account uses
    /// the address.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or the payload cannot
    /// be decoded.
    async fn find_user_by_email(&self, email: &str) -> ApiResult<Option<User>>;
}
