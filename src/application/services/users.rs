//! Account registration, self-service edits, and profile views.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::{IdentityField, User};
use crate::domain::services::visibility::{PublicProfile, public_view};
use crate::domain::value_objects::{Role, UserId};
use crate::infrastructure::api::traits::PlatformApi;
use crate::infrastructure::snapshot::SnapshotStore;
use std::sync::Arc;
use uuid::Uuid;

/// A registration request, before the platform assigns an id.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Which side of the market the account trades on.
    pub role: Role,
    /// Legal or display name.
    pub name: String,
    /// Login and contact email; unique across the platform.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Street address.
    pub address: String,
    /// City, also shown in the anonymized public label.
    pub city: String,
    /// Department (state) of residence.
    pub department: String,
    /// Tax or registration identifier.
    pub legal_id: String,
}

/// Account-facing use cases.
#[derive(Debug)]
pub struct UserService {
    api: Arc<dyn PlatformApi>,
    store: Arc<SnapshotStore>,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(api: Arc<dyn PlatformApi>, store: Arc<SnapshotStore>) -> Self {
        Self { api, store }
    }

    /// Registers a new account.
    ///
    /// The platform assigns the id. New accounts start unverified and land
    /// in the admin review queue.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateEmail` when the address is already registered
    /// (compared case-insensitively) and domain errors for invalid fields.
    pub async fn register(&self, registration: Registration) -> ApplicationResult<User> {
        if let Some(existing) = self.api.find_user_by_email(&registration.email).await? {
            return Err(ApplicationError::duplicate_email(existing.email()));
        }

        let user = User::register(
            UserId::new(format!("u-{}", Uuid::new_v4())),
            registration.role,
            registration.name,
            registration.email,
            registration.phone,
            registration.address,
            registration.city,
            registration.department,
            registration.legal_id,
        )?;

        self.api.save_user(&user).await?;
        self.store.patch_user(&user);
        Ok(user)
    }

    /// Updates the caller's contact details, effective immediately.
    ///
    /// Phone and address are operational data, not identity, so no review
    /// is involved.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` for an unknown caller.
    pub async fn update_contact(
        &self,
        actor: &UserId,
        phone: impl Into<String> + Send,
        address: impl Into<String> + Send,
    ) -> ApplicationResult<User> {
        let mut user = self.require_user(actor).await?;
        user.update_contact(phone, address);

        self.api.save_user(&user).await?;
        self.store.patch_user(&user);
        Ok(user)
    }

    /// Stages an identity field change for admin review.
    ///
    /// The current value stays in effect until an admin applies the staged
    /// set. Staging the same field twice keeps the latest proposal.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` for an unknown caller and a domain error for
    /// a blank or invalid proposed value.
    pub async fn request_identity_change(
        &self,
        actor: &UserId,
        field: IdentityField,
        value: impl Into<String> + Send,
    ) -> ApplicationResult<User> {
        let mut user = self.require_user(actor).await?;
        user.request_identity_change(field, value)?;

        self.api.save_user(&user).await?;
        self.store.patch_user(&user);
        Ok(user)
    }

    /// Returns what `viewer` may see about `target`.
    ///
    /// Serves from the local snapshot, falling back to the backend for
    /// accounts the last poll has not seen yet.
    ///
    /// # Errors
    ///
    /// Returns `UserNotFound` when either account is unknown.
    pub async fn profile_of(
        &self,
        target: &UserId,
        viewer: &UserId,
    ) -> ApplicationResult<PublicProfile> {
        let viewer_role = self.lookup_user(viewer).await?.role();
        let target_user = self.lookup_user(target).await?;
        Ok(public_view(&target_user, viewer, viewer_role))
    }

    async fn lookup_user(&self, id: &UserId) -> ApplicationResult<User> {
        if let Some(user) = self.store.current().user(id) {
            return Ok(user.clone());
        }
        self.require_user(id).await
    }

    async fn require_user(&self, id: &UserId) -> ApplicationResult<User> {
        self.api
            .get_user(id)
            .await?
            .ok_or_else(|| ApplicationError::user_not_found(id.as_str()))
    }
}
