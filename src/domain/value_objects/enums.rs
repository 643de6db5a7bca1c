//! # Domain Enums
//!
//! Enumeration types for domain concepts.
//!
//! This module provides core domain enumerations used throughout the trading
//! platform:
//!
//! - [`Role`] - Participant role (buyer, seller, admin)
//! - [`TradeModule`] - Transaction mode (sourcing agreements vs. marketplace)
//! - [`EntityKind`] - Record kind embedded in entity identifiers
//! - [`Unit`] - Quantity unit for material volumes
//! - [`Currency`] - Settlement currency
//! - [`RejectionKind`] - Returned-for-adjustment vs. final rejection
//!
//! All enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display`, `FromStr`, and Serde traits.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Participant role on the platform.
///
/// Buyers author sourcing requirements and bid on marketplace listings;
/// sellers author listings and respond to requirements; admins arbitrate
/// every negotiation gate.
///
/// # Examples
///
/// ```
/// use recimat::domain::value_objects::enums::Role;
///
/// let buyer = Role::Buyer;
/// assert_eq!(buyer.to_string(), "BUYER");
/// assert_eq!(buyer.counterpart(), Some(Role::Seller));
/// assert_eq!(buyer.label_es(), "Comprador");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Role {
    /// Buyer - sources recycled material.
    Buyer = 0,
    /// Seller - supplies recycled material.
    Seller = 1,
    /// Admin - platform operator arbitrating negotiations.
    Admin = 2,
}

impl Role {
    /// Returns the trading counterpart of this role.
    ///
    /// Admins have no counterpart.
    ///
    /// # Examples
    ///
    /// ```
    /// use recimat::domain::value_objects::enums::Role;
    ///
    /// assert_eq!(Role::Buyer.counterpart(), Some(Role::Seller));
    /// assert_eq!(Role::Admin.counterpart(), None);
    /// ```
    #[inline]
    #[must_use]
    pub const fn counterpart(self) -> Option<Self> {
        match self {
            Self::Buyer => Some(Self::Seller),
            Self::Seller => Some(Self::Buyer),
            Self::Admin => None,
        }
    }

    /// Returns true if this is the admin role.
    #[inline]
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns true if this is the buyer role.
    #[inline]
    #[must_use]
    pub const fn is_buyer(self) -> bool {
        matches!(self, Self::Buyer)
    }

    /// Returns true if this is the seller role.
    #[inline]
    #[must_use]
    pub const fn is_seller(self) -> bool {
        matches!(self, Self::Seller)
    }

    /// Returns the Spanish-facing label used wherever a counterparty is
    /// surfaced anonymously.
    #[inline]
    #[must_use]
    pub const fn label_es(self) -> &'static str {
        match self {
            Self::Buyer => "Comprador",
            Self::Seller => "Proveedor",
            Self::Admin => "Administrador",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buyer => write!(f, "BUYER"),
            Self::Seller => write!(f, "SELLER"),
            Self::Admin => write!(f, "ADMIN"),
        }
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BUYER" => Ok(Self::Buyer),
            "SELLER" => Ok(Self::Seller),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(ParseEnumError::InvalidValue("Role", s.to_string())),
        }
    }
}

/// Transaction mode the platform runs in parallel.
///
/// Sourcing covers planned, recurring supply agreements initiated by buyers;
/// Marketplace covers immediate spot sales of in-stock material initiated by
/// sellers. Both share the same negotiation machinery.
///
/// # Examples
///
/// ```
/// use recimat::domain::value_objects::enums::{Role, TradeModule};
///
/// let sourcing = TradeModule::Sourcing;
/// assert_eq!(sourcing.id_prefix(), "M1");
/// assert_eq!(sourcing.proposal_owner_role(), Role::Buyer);
/// assert_eq!(sourcing.responder_role(), Role::Seller);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum TradeModule {
    /// Planned/recurring supply agreements (buyer-initiated requirements).
    Sourcing = 0,
    /// Immediate spot trading of in-stock material (seller-initiated listings).
    Marketplace = 1,
}

impl TradeModule {
    /// Returns the identifier prefix for records in this module.
    #[inline]
    #[must_use]
    pub const fn id_prefix(self) -> &'static str {
        match self {
            Self::Sourcing => "M1",
            Self::Marketplace => "M2",
        }
    }

    /// Returns the record kind of proposals authored in this module.
    #[inline]
    #[must_use]
    pub const fn proposal_kind(self) -> EntityKind {
        match self {
            Self::Sourcing => EntityKind::Req,
            Self::Marketplace => EntityKind::Lst,
        }
    }

    /// Returns the record kind of responses submitted in this module.
    #[inline]
    #[must_use]
    pub const fn response_kind(self) -> EntityKind {
        match self {
            Self::Sourcing => EntityKind::Off,
            Self::Marketplace => EntityKind::Bid,
        }
    }

    /// Returns the role that authors proposals in this module.
    #[inline]
    #[must_use]
    pub const fn proposal_owner_role(self) -> Role {
        match self {
            Self::Sourcing => Role::Buyer,
            Self::Marketplace => Role::Seller,
        }
    }

    /// Returns the role that responds to proposals in this module.
    #[inline]
    #[must_use]
    pub const fn responder_role(self) -> Role {
        match self {
            Self::Sourcing => Role::Seller,
            Self::Marketplace => Role::Buyer,
        }
    }
}

impl fmt::Display for TradeModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sourcing => write!(f, "SOURCING"),
            Self::Marketplace => write!(f, "MARKETPLACE"),
        }
    }
}

impl FromStr for TradeModule {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SOURCING" | "M1" => Ok(Self::Sourcing),
            "MARKETPLACE" | "M2" => Ok(Self::Marketplace),
            _ => Err(ParseEnumError::InvalidValue("TradeModule", s.to_string())),
        }
    }
}

/// Record kind embedded in entity identifiers.
///
/// # Examples
///
/// ```
/// use recimat::domain::value_objects::enums::{EntityKind, TradeModule};
///
/// assert_eq!(EntityKind::Req.to_string(), "REQ");
/// assert_eq!(EntityKind::Req.expected_module(), Some(TradeModule::Sourcing));
/// assert_eq!(EntityKind::Com.expected_module(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum EntityKind {
    /// Sourcing requirement (buyer-authored proposal).
    Req = 0,
    /// Offer against a requirement (seller-authored response).
    Off = 1,
    /// Marketplace listing (seller-authored proposal).
    Lst = 2,
    /// Purchase offer against a listing (buyer-authored response).
    Bid = 3,
    /// Commitment derived from an accepted response.
    Com = 4,
}

impl EntityKind {
    /// Returns the module this kind belongs to, if it is module-bound.
    ///
    /// Commitments exist in both modules.
    #[inline]
    #[must_use]
    pub const fn expected_module(self) -> Option<TradeModule> {
        match self {
            Self::Req | Self::Off => Some(TradeModule::Sourcing),
            Self::Lst | Self::Bid => Some(TradeModule::Marketplace),
            Self::Com => None,
        }
    }

    /// Returns true if this kind denotes a proposal record.
    #[inline]
    #[must_use]
    pub const fn is_proposal(self) -> bool {
        matches!(self, Self::Req | Self::Lst)
    }

    /// Returns true if this kind denotes a response record.
    #[inline]
    #[must_use]
    pub const fn is_response(self) -> bool {
        matches!(self, Self::Off | Self::Bid)
    }

    /// Returns true if this kind denotes a commitment record.
    #[inline]
    #[must_use]
    pub const fn is_commitment(self) -> bool {
        matches!(self, Self::Com)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Req => write!(f, "REQ"),
            Self::Off => write!(f, "OFF"),
            Self::Lst => write!(f, "LST"),
            Self::Bid => write!(f, "BID"),
            Self::Com => write!(f, "COM"),
        }
    }
}

impl FromStr for EntityKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "REQ" => Ok(Self::Req),
            "OFF" => Ok(Self::Off),
            "LST" => Ok(Self::Lst),
            "BID" => Ok(Self::Bid),
            "COM" => Ok(Self::Com),
            _ => Err(ParseEnumError::InvalidValue("EntityKind", s.to_string())),
        }
    }
}

/// Quantity unit for material volumes.
///
/// All derived arithmetic (fees, remaining stock, per-delivery splits) is
/// carried out in kilograms; tons are a display/input convenience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Unit {
    /// Kilograms.
    Kg = 0,
    /// Metric tons (1000 kg).
    Ton = 1,
}

impl Unit {
    /// Returns the multiplier that converts this unit into kilograms.
    #[inline]
    #[must_use]
    pub const fn kg_factor(self) -> i64 {
        match self {
            Self::Kg => 1,
            Self::Ton => 1000,
        }
    }
}

impl Default for Unit {
    fn default() -> Self {
        Self::Kg
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kg => write!(f, "KG"),
            Self::Ton => write!(f, "TON"),
        }
    }
}

impl FromStr for Unit {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "KG" | "KILOGRAMO" | "KILOGRAMOS" => Ok(Self::Kg),
            "TON" | "TONELADA" | "TONELADAS" | "T" => Ok(Self::Ton),
            _ => Err(ParseEnumError::InvalidValue("Unit", s.to_string())),
        }
    }
}

/// Settlement currency for negotiated prices and fees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Currency {
    /// Colombian peso.
    Cop = 0,
    /// United States dollar.
    Usd = 1,
}

impl Currency {
    /// Returns the ISO 4217 code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Cop => "COP",
            Self::Usd => "USD",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::Cop
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "COP" => Ok(Self::Cop),
            "USD" => Ok(Self::Usd),
            _ => Err(ParseEnumError::InvalidValue("Currency", s.to_string())),
        }
    }
}

/// Distinguishes a record returned for adjustment from one rejected outright.
///
/// Both land in the same rejected state; the distinction survives as a prefix
/// on the stored rejection reason, and resubmission stays available either
/// way.
///
/// # Examples
///
/// ```
/// use recimat::domain::value_objects::enums::RejectionKind;
///
/// let reason = RejectionKind::Returned.annotate("falta ficha técnica");
/// assert_eq!(reason, "DEVUELTO: falta ficha técnica");
/// assert_eq!(RejectionKind::detect(&reason), Some(RejectionKind::Returned));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum RejectionKind {
    /// Returned for adjustment; the author is expected to fix and resubmit.
    Returned = 0,
    /// Rejected outright.
    Final = 1,
}

impl RejectionKind {
    /// Prefix stored ahead of the reason text.
    #[inline]
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Returned => "DEVUELTO: ",
            Self::Final => "RECHAZADO: ",
        }
    }

    /// Prepends this kind's prefix to a reason, unless one is already there.
    #[must_use]
    pub fn annotate(self, reason: &str) -> String {
        if Self::detect(reason).is_some() {
            reason.to_string()
        } else {
            format!("{}{}", self.prefix(), reason)
        }
    }

    /// Recovers the kind from a stored reason, if it carries a prefix.
    #[must_use]
    pub fn detect(reason: &str) -> Option<Self> {
        if reason.starts_with(Self::Returned.prefix()) {
            Some(Self::Returned)
        } else if reason.starts_with(Self::Final.prefix()) {
            Some(Self::Final)
        } else {
            None
        }
    }
}

impl fmt::Display for RejectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Returned => write!(f, "RETURNED"),
            Self::Final => write!(f, "FINAL"),
        }
    }
}

/// Error type for parsing enum values from strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The provided string value is not valid for the enum.
    InvalidValue(&'static str, String),
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(enum_name, value) => {
                write!(f, "invalid {} value: '{}'", enum_name, value)
            }
        }
    }
}

impl std::error::Error for ParseEnumError {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod role {
        use super::*;

        #[test]
        fn counterpart_pairs_buyer_and_seller() {
            assert_eq!(Role::Buyer.counterpart(), Some(Role::Seller));
            assert_eq!(Role::Seller.counterpart(), Some(Role::Buyer));
            assert_eq!(Role::Admin.counterpart(), None);
        }

        #[test]
        fn predicates() {
            assert!(Role::Admin.is_admin());
            assert!(Role::Buyer.is_buyer());
            assert!(Role::Seller.is_seller());
            assert!(!Role::Buyer.is_admin());
        }

        #[test]
        fn spanish_labels() {
            assert_eq!(Role::Buyer.label_es(), "Comprador");
            assert_eq!(Role::Seller.label_es(), "Proveedor");
            assert_eq!(Role::Admin.label_es(), "Administrador");
        }

        #[test]
        fn display_uppercase() {
            assert_eq!(Role::Buyer.to_string(), "BUYER");
            assert_eq!(Role::Seller.to_string(), "SELLER");
            assert_eq!(Role::Admin.to_string(), "ADMIN");
        }

        #[test]
        fn from_str_works() {
            assert_eq!("BUYER".parse::<Role>().unwrap(), Role::Buyer);
            assert_eq!("seller".parse::<Role>().unwrap(), Role::Seller);
            assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        }

        #[test]
        fn from_str_invalid() {
            assert!("BROKER".parse::<Role>().is_err());
        }

        #[test]
        fn serde_roundtrip() {
            let role = Role::Seller;
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, "\"SELLER\"");
            let deserialized: Role = serde_json::from_str(&json).unwrap();
            assert_eq!(role, deserialized);
        }
    }

    mod trade_module {
        use super::*;

        #[test]
        fn id_prefixes() {
            assert_eq!(TradeModule::Sourcing.id_prefix(), "M1");
            assert_eq!(TradeModule::Marketplace.id_prefix(), "M2");
        }

        #[test]
        fn record_kinds() {
            assert_eq!(TradeModule::Sourcing.proposal_kind(), EntityKind::Req);
            assert_eq!(TradeModule::Sourcing.response_kind(), EntityKind::Off);
            assert_eq!(TradeModule::Marketplace.proposal_kind(), EntityKind::Lst);
            assert_eq!(TradeModule::Marketplace.response_kind(), EntityKind::Bid);
        }

        #[test]
        fn role_routing() {
            assert_eq!(TradeModule::Sourcing.proposal_owner_role(), Role::Buyer);
            assert_eq!(TradeModule::Sourcing.responder_role(), Role::Seller);
            assert_eq!(TradeModule::Marketplace.proposal_owner_role(), Role::Seller);
            assert_eq!(TradeModule::Marketplace.responder_role(), Role::Buyer);
        }

        #[test]
        fn from_str_accepts_prefixes() {
            assert_eq!("M1".parse::<TradeModule>().unwrap(), TradeModule::Sourcing);
            assert_eq!(
                "M2".parse::<TradeModule>().unwrap(),
                TradeModule::Marketplace
            );
            assert_eq!(
                "sourcing".parse::<TradeModule>().unwrap(),
                TradeModule::Sourcing
            );
        }

        #[test]
        fn serde_roundtrip() {
            let module = TradeModule::Marketplace;
            let json = serde_json::to_string(&module).unwrap();
            assert_eq!(json, "\"MARKETPLACE\"");
            let deserialized: TradeModule = serde_json::from_str(&json).unwrap();
            assert_eq!(module, deserialized);
        }
    }

    mod entity_kind {
        use super::*;

        #[test]
        fn expected_modules() {
            assert_eq!(
                EntityKind::Req.expected_module(),
                Some(TradeModule::Sourcing)
            );
            assert_eq!(
                EntityKind::Off.expected_module(),
                Some(TradeModule::Sourcing)
            );
            assert_eq!(
                EntityKind::Lst.expected_module(),
                Some(TradeModule::Marketplace)
            );
            assert_eq!(
                EntityKind::Bid.expected_module(),
                Some(TradeModule::Marketplace)
            );
            assert_eq!(EntityKind::Com.expected_module(), None);
        }

        #[test]
        fn record_classification() {
            assert!(EntityKind::Req.is_proposal());
            assert!(EntityKind::Lst.is_proposal());
            assert!(EntityKind::Off.is_response());
            assert!(EntityKind::Bid.is_response());
            assert!(EntityKind::Com.is_commitment());
            assert!(!EntityKind::Com.is_proposal());
        }

        #[test]
        fn display_and_parse() {
            for kind in [
                EntityKind::Req,
                EntityKind::Off,
                EntityKind::Lst,
                EntityKind::Bid,
                EntityKind::Com,
            ] {
                let parsed: EntityKind = kind.to_string().parse().unwrap();
                assert_eq!(parsed, kind);
            }
        }

        #[test]
        fn from_str_invalid() {
            assert!("ORD".parse::<EntityKind>().is_err());
        }
    }

    mod unit {
        use super::*;

        #[test]
        fn kg_factors() {
            assert_eq!(Unit::Kg.kg_factor(), 1);
            assert_eq!(Unit::Ton.kg_factor(), 1000);
        }

        #[test]
        fn default_is_kg() {
            assert_eq!(Unit::default(), Unit::Kg);
        }

        #[test]
        fn from_str_spanish_aliases() {
            assert_eq!("TONELADA".parse::<Unit>().unwrap(), Unit::Ton);
            assert_eq!("kilogramos".parse::<Unit>().unwrap(), Unit::Kg);
        }
    }

    mod currency {
        use super::*;

        #[test]
        fn codes() {
            assert_eq!(Currency::Cop.code(), "COP");
            assert_eq!(Currency::Usd.code(), "USD");
        }

        #[test]
        fn default_is_cop() {
            assert_eq!(Currency::default(), Currency::Cop);
        }

        #[test]
        fn serde_roundtrip() {
            let currency = Currency::Cop;
            let json = serde_json::to_string(&currency).unwrap();
            assert_eq!(json, "\"COP\"");
            let deserialized: Currency = serde_json::from_str(&json).unwrap();
            assert_eq!(currency, deserialized);
        }
    }

    mod rejection_kind {
        use super::*;

        #[test]
        fn annotate_prepends_prefix() {
            let reason = RejectionKind::Returned.annotate("falta ficha técnica");
            assert_eq!(reason, "DEVUELTO: falta ficha técnica");

            let reason = RejectionKind::Final.annotate("material no permitido");
            assert_eq!(reason, "RECHAZADO: material no permitido");
        }

        #[test]
        fn annotate_is_idempotent() {
            let once = RejectionKind::Final.annotate("fuera de alcance");
            let twice = RejectionKind::Final.annotate(&once);
            assert_eq!(once, twice);
        }

        #[test]
        fn detect_recovers_kind() {
            assert_eq!(
                RejectionKind::detect("DEVUELTO: revisar precio"),
                Some(RejectionKind::Returned)
            );
            assert_eq!(
                RejectionKind::detect("RECHAZADO: incompleto"),
                Some(RejectionKind::Final)
            );
            assert_eq!(RejectionKind::detect("sin prefijo"), None);
        }
    }

    mod parse_enum_error {
        use super::*;

        #[test]
        fn display_format() {
            let err = ParseEnumError::InvalidValue("Role", "BROKER".to_string());
            assert_eq!(err.to_string(), "invalid Role value: 'BROKER'");
        }
    }
}
