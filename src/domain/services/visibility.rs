//! # Visibility Policy
//!
//! Anonymization of counterparty identity. The platform's core promise is
//! that parties stay anonymous to each other until a deal is struck; this
//! module is the single place that decides what one user may see about
//! another.
//!
//! [`public_view`] must be applied at every point a counterparty is rendered
//! or serialized for another role. The returned [`PublicProfile`] carries
//! plain strings only and holds no reference to the underlying [`User`], so
//! identity cannot leak through an object graph.
//!
//! # Examples
//!
//! ```
//! use recimat::domain::entities::user::User;
//! use recimat::domain::services::visibility::{PROTECTED_SUBTEXT, public_view};
//! use recimat::domain::value_objects::{Role, UserId};
//!
//! let seller = User::register(
//!     UserId::new("u-7"),
//!     Role::Seller,
//!     "Recicladora Andina SAS",
//!     "ventas@andina.co",
//!     "3001112233",
//!     "Cl 10 # 4-21",
//!     "Medellín",
//!     "Antioquia",
//!     "900123456",
//! )
//! .unwrap();
//!
//! let seen_by_buyer = public_view(&seller, &UserId::new("u-9"), Role::Buyer);
//! assert_eq!(seen_by_buyer.display_name(), "Proveedor (Medellín)");
//! assert_eq!(seen_by_buyer.subtext(), Some(PROTECTED_SUBTEXT));
//! assert!(seen_by_buyer.contact_hidden());
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::entities::user::User;
use crate::domain::value_objects::{Role, UserId};

/// Explanatory line shown under an anonymized counterparty.
pub const PROTECTED_SUBTEXT: &str = "Identidad protegida por la plataforma";

/// What a viewer is allowed to see about another user.
///
/// Strings only: the profile never holds the [`User`] it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    /// The name shown to this viewer: the real name on the full view, a
    /// role-and-city label otherwise.
    display_name: String,
    /// City, surfaced separately only on the full view.
    #[serde(skip_serializing_if = "Option::is_none")]
    city: Option<String>,
    /// Explanatory line under the name when identity is protected.
    #[serde(skip_serializing_if = "Option::is_none")]
    subtext: Option<String>,
    /// Whether contact details are withheld from this viewer.
    contact_hidden: bool,
    /// Verification badge, surfaced only on the full view.
    #[serde(skip_serializing_if = "Option::is_none")]
    verified_badge: Option<bool>,
}

impl PublicProfile {
    /// Returns the name shown to the viewer.
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the separately surfaced city, if the view includes one.
    #[inline]
    #[must_use]
    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    /// Returns the protection subtext, if the view is anonymized.
    #[inline]
    #[must_use]
    pub fn subtext(&self) -> Option<&str> {
        self.subtext.as_deref()
    }

    /// Returns whether contact details are withheld.
    #[inline]
    #[must_use]
    pub const fn contact_hidden(&self) -> bool {
        self.contact_hidden
    }

    /// Returns the verification badge, if the view includes one.
    #[inline]
    #[must_use]
    pub const fn verified_badge(&self) -> Option<bool> {
        self.verified_badge
    }

    /// Returns whether this is the anonymized rendering.
    #[must_use]
    pub const fn is_anonymized(&self) -> bool {
        self.contact_hidden
    }
}

impl fmt::Display for PublicProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name)
    }
}

/// Derives what `viewer` may see about `target`.
///
/// Admins and the user themself get the full view: real name, city and
/// verification badge, with contact details available. Everyone else gets a
/// role-and-city label ("Comprador (Bogotá)" / "Proveedor (Medellín)") with
/// the protection subtext and contact withheld.
#[must_use]
pub fn public_view(target: &User, viewer_id: &UserId, viewer_role: Role) -> PublicProfile {
    if viewer_role.is_admin() || viewer_id == target.id() {
        return PublicProfile {
            display_name: target.name().to_string(),
            city: Some(target.city().to_string()),
            subtext: None,
            contact_hidden: false,
            verified_badge: Some(target.verified()),
        };
    }

    let label = match target.role() {
        Role::Buyer => Role::Buyer.label_es(),
        Role::Seller | Role::Admin => Role::Seller.label_es(),
    };
    let city = target.city().trim();
    let display_name = if city.is_empty() {
        label.to_string()
    } else {
        format!("{label} ({city})")
    };

    PublicProfile {
        display_name,
        city: None,
        subtext: Some(PROTECTED_SUBTEXT.to_string()),
        contact_hidden: true,
        verified_badge: None,
    }
}
