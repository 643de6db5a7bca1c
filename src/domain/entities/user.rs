//! # User Entity
//!
//! Platform participants: buyers, sellers, and admins.
//!
//! Contact fields (phone, address) are self-service and apply directly.
//! Identity fields (name, email, city, department, legal id) are staged
//! into `pending_changes` and only take effect when an admin applies them.
//! Verification is an admin-only action.
//!
//! # Examples
//!
//! ```
//! use recimat::domain::entities::user::{IdentityField, User};
//! use recimat::domain::value_objects::{Role, UserId};
//!
//! let mut user = User::register(
//!     UserId::new("user-1"),
//!     Role::Seller,
//!     "Recuperadora Andina SAS",
//!     "ventas@andina.co",
//!     "3100000000",
//!     "Cra 10 # 20-30",
//!     "Bogotá",
//!     "Cundinamarca",
//!     "NIT-900123456",
//! )
//! .unwrap();
//!
//! user.request_identity_change(IdentityField::Email, "compras@andina.co")
//!     .unwrap();
//! assert_eq!(user.email(), "ventas@andina.co");
//! assert!(user.has_pending_changes());
//!
//! user.apply_pending_changes();
//! assert_eq!(user.email(), "compras@andina.co");
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Role, Timestamp, UserId};

/// Identity fields whose edits require admin approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum IdentityField {
    /// Legal or display name.
    Name,
    /// Login and contact email.
    Email,
    /// City shown in the anonymized public label.
    City,
    /// Department (state) of residence.
    Department,
    /// Tax or registration identifier.
    LegalId,
}

impl IdentityField {
    /// Returns the key used in the `pending_changes` map.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::City => "city",
            Self::Department => "department",
            Self::LegalId => "legalId",
        }
    }

    /// Resolves a `pending_changes` key back to a field.
    #[must_use]
    pub fn from_wire(key: &str) -> Option<Self> {
        match key {
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            "city" => Some(Self::City),
            "department" => Some(Self::Department),
            "legalId" => Some(Self::LegalId),
            _ => None,
        }
    }
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

/// A registered platform participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    id: UserId,
    /// Buyer, seller, or admin.
    role: Role,
    /// Whether an admin has verified this user.
    verified: bool,
    /// Legal or display name.
    name: String,
    /// Login and contact email.
    email: String,
    /// Contact phone, self-service.
    phone: String,
    /// Street address, self-service.
    address: String,
    /// City shown in the anonymized public label.
    city: String,
    /// Department (state) of residence.
    department: String,
    /// Tax or registration identifier.
    legal_id: String,
    /// Staged identity edits awaiting admin approval, keyed by wire name.
    pending_changes: BTreeMap<String, String>,
    /// When the user registered.
    registered_at: Timestamp,
    /// When the user last mutated their record.
    last_activity: Timestamp,
    /// Bumped on every mutation.
    version: u64,
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("user name must not be empty"));
    }
    Ok(())
}

fn validate_email(email: &str) -> DomainResult<()> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(DomainError::validation(format!(
            "invalid email address: {email}"
        )));
    }
    Ok(())
}

impl User {
    /// Registers a new, unverified user.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the name is blank or the email is
    /// malformed.
    #[allow(clippy::too_many_arguments)]
    pub fn register(
        id: UserId,
        role: Role,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
        city: impl Into<String>,
        department: impl Into<String>,
        legal_id: impl Into<String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        let email = email.into();
        validate_name(&name)?;
        validate_email(&email)?;
        let now = Timestamp::now();
        Ok(Self {
            id,
            role,
            verified: false,
            name,
            email,
            phone: phone.into(),
            address: address.into(),
            city: city.into(),
            department: department.into(),
            legal_id: legal_id.into(),
            pending_changes: BTreeMap::new(),
            registered_at: now,
            last_activity: now,
            version: 0,
        })
    }

    fn touch(&mut self) {
        self.last_activity = Timestamp::now();
        self.version = self.version.saturating_add(1);
    }

    // ========== Accessors ==========

    /// Returns the user identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Returns the user's role.
    #[inline]
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns whether an admin has verified this user.
    #[inline]
    #[must_use]
    pub const fn verified(&self) -> bool {
        self.verified
    }

    /// Returns the legal or display name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the contact email.
    #[inline]
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the contact phone.
    #[inline]
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Returns the street address.
    #[inline]
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the city.
    #[inline]
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Returns the department.
    #[inline]
    #[must_use]
    pub fn department(&self) -> &str {
        &self.department
    }

    /// Returns the tax or registration identifier.
    #[inline]
    #[must_use]
    pub fn legal_id(&self) -> &str {
        &self.legal_id
    }

    /// Returns the staged identity edits, keyed by wire name.
    #[inline]
    #[must_use]
    pub const fn pending_changes(&self) -> &BTreeMap<String, String> {
        &self.pending_changes
    }

    /// Returns whether any identity edit awaits admin approval.
    #[inline]
    #[must_use]
    pub fn has_pending_changes(&self) -> bool {
        !self.pending_changes.is_empty()
    }

    /// Returns whether this user should appear in the admin work queue.
    #[must_use]
    pub fn needs_admin_attention(&self) -> bool {
        !self.verified || self.has_pending_changes()
    }

    /// Returns when the user registered.
    #[inline]
    #[must_use]
    pub const fn registered_at(&self) -> Timestamp {
        self.registered_at
    }

    /// Returns when the user last mutated their record.
    #[inline]
    #[must_use]
    pub const fn last_activity(&self) -> Timestamp {
        self.last_activity
    }

    /// Returns the mutation counter.
    #[inline]
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    // ========== Mutations ==========

    /// Applies a self-service contact update directly.
    pub fn update_contact(&mut self, phone: impl Into<String>, address: impl Into<String>) {
        self.phone = phone.into();
        self.address = address.into();
        self.touch();
    }

    /// Stages an identity edit for admin approval.
    ///
    /// The current value stays in effect until an admin calls
    /// [`Self::apply_pending_changes`]. Staging the same field twice
    /// replaces the earlier proposal.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the proposed value is blank, or a
    /// malformed email when the field is [`IdentityField::Email`].
    pub fn request_identity_change(
        &mut self,
        field: IdentityField,
        value: impl Into<String>,
    ) -> DomainResult<()> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::validation(format!(
                "proposed value for '{field}' must not be empty"
            )));
        }
        if field == IdentityField::Email {
            validate_email(&value)?;
        }
        self.pending_changes
            .insert(field.wire_name().to_string(), value);
        self.touch();
        Ok(())
    }

    /// Applies every staged identity edit and clears the map.
    ///
    /// Keys that do not name a known identity field are dropped, tolerating
    /// entries written by older clients. When at least one field changed the
    /// verified badge is cleared until an admin re-reviews the account.
    /// Returns the number of fields actually changed.
    pub fn apply_pending_changes(&mut self) -> usize {
        let staged = std::mem::take(&mut self.pending_changes);
        let mut applied = 0;
        for (key, value) in staged {
            let Some(field) = IdentityField::from_wire(&key) else {
                continue;
            };
            match field {
                IdentityField::Name => self.name = value,
                IdentityField::Email => self.email = value,
                IdentityField::City => self.city = value,
                IdentityField::Department => self.department = value,
                IdentityField::LegalId => self.legal_id = value,
            }
            applied += 1;
        }
        if applied > 0 {
            self.verified = false;
        }
        self.touch();
        applied
    }

    /// Discards every staged identity edit.
    pub fn discard_pending_changes(&mut self) {
        self.pending_changes.clear();
        self.touch();
    }

    /// Marks the user as verified.
    pub fn verify(&mut self) {
        self.verified = true;
        self.touch();
    }

    /// Admin edit of the display name.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the name is blank.
    pub fn set_name(&mut self, name: impl Into<String>) -> DomainResult<()> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        self.touch();
        Ok(())
    }

    /// Admin edit of the email.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the email is malformed.
    pub fn set_email(&mut self, email: impl Into<String>) -> DomainResult<()> {
        let email = email.into();
        validate_email(&email)?;
        self.email = email;
        self.touch();
        Ok(())
    }

    /// Admin edit of city and department.
    pub fn set_location(&mut self, city: impl Into<String>, department: impl Into<String>) {
        self.city = city.into();
        self.department = department.into();
        self.touch();
    }

    /// Admin edit of the legal identifier.
    pub fn set_legal_id(&mut self, legal_id: impl Into<String>) {
        self.legal_id = legal_id.into();
        self.touch();
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User[{}] role={} verified={}",
            self.id, self.role, self.verified
        )
    }
}
