//! # Proposal Aggregate
//!
//! The initiating side of a negotiation: a sourcing Requirement (buyer posts
//! what it needs) or a marketplace Listing (seller posts what it has). Both
//! share one shape tagged by [`TradeModule`].
//!
//! # State Machine
//!
//! ```text
//! PENDING_ADMIN ──approve──→ ACTIVE ──quantity 0──→ SOLD
//!      │  ↑                   │  ↑
//! reject│  │resubmit      hide│  │unhide
//!      ↓  │                   ↓  │
//!   REJECTED            HIDDEN_BY_ADMIN
//!
//! PENDING_BUYER_APPROVAL / PENDING_SELLER_APPROVAL ──ratify──→ ACTIVE
//! ACTIVE ⇄ PENDING_QUANTITY_INCREASE  (owner requests, admin resolves)
//! ```
//!
//! The management fee is derived from total volume at build time and
//! re-derived whenever the volume changes. A record cannot reach `ACTIVE`
//! until its owner has accepted that fee.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use recimat::domain::entities::proposal::{PriceTerms, ProposalBuilder};
//! use recimat::domain::value_objects::{ProposalState, Quantity, TradeModule, UserId};
//! use rust_decimal::Decimal;
//!
//! let listing = ProposalBuilder::new(
//!     TradeModule::Marketplace,
//!     UserId::new("seller-1"),
//!     "PET molido cristal",
//!     Quantity::new(1000.0).unwrap(),
//!     PriceTerms::Flat(Decimal::new(1200, 0)),
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
//! )
//! .accept_management_fee()
//! .build()
//! .unwrap();
//!
//! assert_eq!(listing.state(), ProposalState::PendingAdmin);
//! assert_eq!(listing.management_fee_per_kg().unwrap().as_decimal(), Decimal::new(200, 0));
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::entities::communication_log::{CommunicationLog, LogEventType};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::services::fee_schedule::FeeSchedule;
use crate::domain::value_objects::{
    ArithmeticResult, Attachment, Currency, DeliveryFrequency, EntityId, EntityKind, FeePerKg,
    ProposalState, Quantity, RejectionKind, StructuredPrice, Timestamp, TradeModule, Unit, UserId,
};

/// The price a proposal asks for, flat per unit or broken into components.
///
/// On the wire this is either a bare number or a structured price object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum PriceTerms {
    /// Single per-unit price.
    Flat(Decimal),
    /// Named components summing to a total.
    Structured(StructuredPrice),
}

impl PriceTerms {
    /// Returns the headline price value.
    #[must_use]
    pub fn total(&self) -> Decimal {
        match self {
            Self::Flat(value) => *value,
            Self::Structured(price) => price.total(),
        }
    }

    /// Returns whether the price carries a component breakdown.
    #[inline]
    #[must_use]
    pub const fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }

    /// Checks that the price is well formed.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a negative flat price, or
    /// [`DomainError::PriceTotalMismatch`] when a structured price's declared
    /// total does not match its component sum.
    pub fn validate(&self) -> DomainResult<()> {
        match self {
            Self::Flat(value) => {
                if value.is_sign_negative() && !value.is_zero() {
                    return Err(DomainError::validation(format!(
                        "price cannot be negative: {value}"
                    )));
                }
                Ok(())
            }
            Self::Structured(price) => {
                if price.is_consistent() {
                    Ok(())
                } else {
                    Err(DomainError::PriceTotalMismatch {
                        declared: price.total(),
                        computed: price.computed_total(),
                    })
                }
            }
        }
    }
}

/// A tradable posting: a sourcing Requirement or a marketplace Listing.
///
/// # Invariants
///
/// - `management_fee_per_kg` is derived from total volume, never hand-set.
/// - The record cannot leave a pending state until the fee is accepted.
/// - `remaining_quantity` only decreases through [`Self::reserve`] and only
///   increases through an approved quantity amendment.
/// - Reaching zero remaining quantity forces `SOLD`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    /// Canonical entity identifier.
    id: EntityId,
    /// Sourcing or marketplace.
    module: TradeModule,
    /// The party the posting belongs to.
    owner: UserId,
    /// Who actually authored the record; differs from `owner` for
    /// admin-proxy records.
    created_by: UserId,
    /// Material on offer or sought.
    material: String,
    /// Total volume in kilograms.
    total_quantity: Quantity,
    /// Volume not yet committed.
    remaining_quantity: Quantity,
    /// Unit the author entered the volume in.
    unit: Unit,
    /// Currency of all price values.
    currency: Currency,
    /// Asked price, flat or structured.
    price: PriceTerms,
    /// Start of the validity window.
    valid_from: NaiveDate,
    /// End of the validity window.
    valid_until: NaiveDate,
    /// Delivery cadence over the validity window.
    frequency: DeliveryFrequency,
    /// Free-text quality requirements.
    quality_description: String,
    /// Free-text logistics arrangements.
    logistics_description: String,
    /// Free-text payment terms.
    payment_terms: String,
    /// Delivery or pickup location.
    location: String,
    /// Quality certificates and data sheets.
    quality_files: Vec<Attachment>,
    /// Logistics documents.
    logistics_files: Vec<Attachment>,
    /// Material photos.
    photos: Vec<Attachment>,
    /// Derived platform fee; `None` on records predating fee storage.
    management_fee_per_kg: Option<FeePerKg>,
    /// Whether the owner accepted the derived fee.
    management_fee_accepted: bool,
    /// Schedule version that produced the stored fee.
    fee_schedule_version: Option<u16>,
    /// Lifecycle state.
    state: ProposalState,
    /// Why the record was rejected or returned, if it was.
    rejection_reason: Option<String>,
    /// Volume increase awaiting admin arbitration.
    pending_quantity_increase: Option<Quantity>,
    /// Append-only negotiation history.
    log: CommunicationLog,
    /// Bumped on every mutation.
    version: u64,
    /// When the record was created.
    created_at: Timestamp,
    /// When the record last changed.
    updated_at: Timestamp,
}

/// Builder for [`Proposal`].
///
/// Required terms go into [`ProposalBuilder::new`]; everything else has a
/// neutral default.
#[derive(Debug, Clone)]
pub struct ProposalBuilder {
    module: TradeModule,
    owner: UserId,
    created_by: Option<UserId>,
    material: String,
    total_quantity: Quantity,
    price: PriceTerms,
    valid_from: NaiveDate,
    valid_until: NaiveDate,
    unit: Unit,
    currency: Currency,
    frequency: DeliveryFrequency,
    quality_description: String,
    logistics_description: String,
    payment_terms: String,
    location: String,
    quality_files: Vec<Attachment>,
    logistics_files: Vec<Attachment>,
    photos: Vec<Attachment>,
    management_fee_accepted: bool,
}

impl ProposalBuilder {
    /// Starts a builder from the required terms.
    #[must_use]
    pub fn new(
        module: TradeModule,
        owner: UserId,
        material: impl Into<String>,
        total_quantity: Quantity,
        price: PriceTerms,
        valid_from: NaiveDate,
        valid_until: NaiveDate,
    ) -> Self {
        Self {
            module,
            owner,
            created_by: None,
            material: material.into(),
            total_quantity,
            price,
            valid_from,
            valid_until,
            unit: Unit::default(),
            currency: Currency::default(),
            frequency: DeliveryFrequency::default(),
            quality_description: String::new(),
            logistics_description: String::new(),
            payment_terms: String::new(),
            location: String::new(),
            quality_files: Vec::new(),
            logistics_files: Vec::new(),
            photos: Vec::new(),
            management_fee_accepted: false,
        }
    }

    /// Sets the unit the volume was entered in.
    #[must_use]
    pub const fn unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    /// Sets the price currency.
    #[must_use]
    pub const fn currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Sets the delivery cadence.
    #[must_use]
    pub const fn frequency(mut self, frequency: DeliveryFrequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Sets the quality description.
    #[must_use]
    pub fn quality_description(mut self, text: impl Into<String>) -> Self {
        self.quality_description = text.into();
        self
    }

    /// Sets the logistics description.
    #[must_use]
    pub fn logistics_description(mut self, text: impl Into<String>) -> Self {
        self.logistics_description = text.into();
        self
    }

    /// Sets the payment terms.
    #[must_use]
    pub fn payment_terms(mut self, text: impl Into<String>) -> Self {
        self.payment_terms = text.into();
        self
    }

    /// Sets the delivery or pickup location.
    #[must_use]
    pub fn location(mut self, text: impl Into<String>) -> Self {
        self.location = text.into();
        self
    }

    /// Attaches quality documents.
    #[must_use]
    pub fn quality_files(mut self, files: Vec<Attachment>) -> Self {
        self.quality_files = files;
        self
    }

    /// Attaches logistics documents.
    #[must_use]
    pub fn logistics_files(mut self, files: Vec<Attachment>) -> Self {
        self.logistics_files = files;
        self
    }

    /// Attaches material photos.
    #[must_use]
    pub fn photos(mut self, photos: Vec<Attachment>) -> Self {
        self.photos = photos;
        self
    }

    /// Records a different author than the owner, marking a proxy record.
    #[must_use]
    pub fn created_by(mut self, author: UserId) -> Self {
        self.created_by = Some(author);
        self
    }

    /// Marks the derived management fee as accepted by the owner.
    #[must_use]
    pub const fn accept_management_fee(mut self) -> Self {
        self.management_fee_accepted = true;
        self
    }

    /// Validates the terms and creates the proposal.
    ///
    /// The management fee is derived from the total volume here. Records
    /// authored by someone other than the owner start in the owner's
    /// ratification state instead of `PENDING_ADMIN`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank material, an
    /// [`DomainError::InvalidQuantity`] for zero volume, an
    /// [`DomainError::InvalidDateRange`] for an inverted validity window, or
    /// the price's own validation error.
    pub fn build(self) -> DomainResult<Proposal> {
        if self.material.trim().is_empty() {
            return Err(DomainError::validation("material must not be empty"));
        }
        if self.total_quantity.is_zero() {
            return Err(DomainError::invalid_quantity(
                "total quantity must be positive",
            ));
        }
        if self.valid_from > self.valid_until {
            return Err(DomainError::InvalidDateRange {
                from: self.valid_from,
                until: self.valid_until,
            });
        }
        self.price.validate()?;

        let created_by = self.created_by.unwrap_or_else(|| self.owner.clone());
        let is_proxy = created_by != self.owner;
        let state = if is_proxy {
            ProposalState::ratification_for(self.module)
        } else {
            ProposalState::PendingAdmin
        };

        let now = Timestamp::now();
        let mut log = CommunicationLog::new();
        let message = if is_proxy {
            "Publicación creada por administración en nombre del usuario"
        } else {
            "Publicación creada"
        };
        log.log(created_by.clone(), LogEventType::Created, message);

        Ok(Proposal {
            id: EntityId::generate(self.module, self.module.proposal_kind()),
            module: self.module,
            owner: self.owner,
            created_by,
            material: self.material,
            total_quantity: self.total_quantity,
            remaining_quantity: self.total_quantity,
            unit: self.unit,
            currency: self.currency,
            price: self.price,
            valid_from: self.valid_from,
            valid_until: self.valid_until,
            frequency: self.frequency,
            quality_description: self.quality_description,
            logistics_description: self.logistics_description,
            payment_terms: self.payment_terms,
            location: self.location,
            quality_files: self.quality_files,
            logistics_files: self.logistics_files,
            photos: self.photos,
            management_fee_per_kg: Some(FeeSchedule::fee_per_kg(self.total_quantity)),
            management_fee_accepted: self.management_fee_accepted,
            fee_schedule_version: Some(FeeSchedule::VERSION),
            state,
            rejection_reason: None,
            pending_quantity_increase: None,
            log,
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }
}

impl Proposal {
    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
        self.version = self.version.saturating_add(1);
    }

    fn transition_to(&mut self, target: ProposalState) -> DomainResult<()> {
        if !self.state.can_transition_to(target) {
            return Err(DomainError::InvalidProposalStateTransition {
                from: self.state,
                to: target,
            });
        }
        self.state = target;
        self.touch();
        Ok(())
    }

    fn ensure_fee_accepted(&self) -> DomainResult<()> {
        if self.management_fee_accepted {
            Ok(())
        } else {
            Err(DomainError::ManagementFeeNotAccepted)
        }
    }

    fn ensure_editable(&self) -> DomainResult<()> {
        if matches!(
            self.state,
            ProposalState::PendingAdmin | ProposalState::Rejected
        ) {
            Ok(())
        } else {
            Err(DomainError::validation(format!(
                "proposal {} cannot be edited in state {}",
                self.id, self.state
            )))
        }
    }

    fn rederive_fee(&mut self) {
        self.management_fee_per_kg = Some(FeeSchedule::fee_per_kg(self.total_quantity));
        self.fee_schedule_version = Some(FeeSchedule::VERSION);
    }

    // ========== Accessors ==========

    /// Returns the entity identifier.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> &EntityId {
        &self.id
    }

    /// Returns the trade module.
    #[inline]
    #[must_use]
    pub const fn module(&self) -> TradeModule {
        self.module
    }

    /// Returns the entity kind (`REQ` or `LST`).
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.module.proposal_kind()
    }

    /// Returns the owning party.
    #[inline]
    #[must_use]
    pub const fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Returns who authored the record.
    #[inline]
    #[must_use]
    pub const fn created_by(&self) -> &UserId {
        &self.created_by
    }

    /// Returns whether an admin authored this record on the owner's behalf.
    #[must_use]
    pub fn is_proxy_authored(&self) -> bool {
        self.created_by != self.owner
    }

    /// Returns the material.
    #[inline]
    #[must_use]
    pub fn material(&self) -> &str {
        &self.material
    }

    /// Returns the total volume in kilograms.
    #[inline]
    #[must_use]
    pub const fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    /// Returns the volume not yet committed.
    #[inline]
    #[must_use]
    pub const fn remaining_quantity(&self) -> Quantity {
        self.remaining_quantity
    }

    /// Returns the entry unit.
    #[inline]
    #[must_use]
    pub const fn unit(&self) -> Unit {
        self.unit
    }

    /// Returns the price currency.
    #[inline]
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the asked price.
    #[inline]
    #[must_use]
    pub const fn price(&self) -> &PriceTerms {
        &self.price
    }

    /// Returns the start of the validity window.
    #[inline]
    #[must_use]
    pub const fn valid_from(&self) -> NaiveDate {
        self.valid_from
    }

    /// Returns the end of the validity window.
    #[inline]
    #[must_use]
    pub const fn valid_until(&self) -> NaiveDate {
        self.valid_until
    }

    /// Returns the delivery cadence.
    #[inline]
    #[must_use]
    pub const fn frequency(&self) -> DeliveryFrequency {
        self.frequency
    }

    /// Returns the quality description.
    #[inline]
    #[must_use]
    pub fn quality_description(&self) -> &str {
        &self.quality_description
    }

    /// Returns the logistics description.
    #[inline]
    #[must_use]
    pub fn logistics_description(&self) -> &str {
        &self.logistics_description
    }

    /// Returns the payment terms.
    #[inline]
    #[must_use]
    pub fn payment_terms(&self) -> &str {
        &self.payment_terms
    }

    /// Returns the delivery or pickup location.
    #[inline]
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns the quality documents.
    #[inline]
    #[must_use]
    pub fn quality_files(&self) -> &[Attachment] {
        &self.quality_files
    }

    /// Returns the logistics documents.
    #[inline]
    #[must_use]
    pub fn logistics_files(&self) -> &[Attachment] {
        &self.logistics_files
    }

    /// Returns the material photos.
    #[inline]
    #[must_use]
    pub fn photos(&self) -> &[Attachment] {
        &self.photos
    }

    /// Returns the stored management fee, if the record has one.
    #[inline]
    #[must_use]
    pub const fn management_fee_per_kg(&self) -> Option<FeePerKg> {
        self.management_fee_per_kg
    }

    /// Returns whether the owner accepted the derived fee.
    #[inline]
    #[must_use]
    pub const fn management_fee_accepted(&self) -> bool {
        self.management_fee_accepted
    }

    /// Returns the schedule version that produced the stored fee.
    #[inline]
    #[must_use]
    pub const fn fee_schedule_version(&self) -> Option<u16> {
        self.fee_schedule_version
    }

    /// Returns whether the record carries a stored fee.
    #[inline]
    #[must_use]
    pub const fn has_stored_fee(&self) -> bool {
        self.management_fee_per_kg.is_some()
    }

    /// Returns the fee a response's penalty must mirror.
    ///
    /// Prefers the stored fee. Records written before fee storage fall back
    /// to recomputing from total volume; callers log that branch.
    #[must_use]
    pub fn expected_penalty_fee(&self) -> FeePerKg {
        self.management_fee_per_kg
            .unwrap_or_else(|| FeeSchedule::fee_per_kg(self.total_quantity))
    }

    /// Returns the lifecycle state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> ProposalState {
        self.state
    }

    /// Returns the stored rejection reason, if any.
    #[inline]
    #[must_use]
    pub fn rejection_reason(&self) -> Option<&str> {
        self.rejection_reason.as_deref()
    }

    /// Returns the volume increase awaiting arbitration, if any.
    #[inline]
    #[must_use]
    pub const fn pending_quantity_increase(&self) -> Option<Quantity> {
        self.pending_quantity_increase
    }

    /// Returns the negotiation history.
    #[inline]
    #[must_use]
    pub const fn log(&self) -> &CommunicationLog {
        &self.log
    }

    /// Returns the mutation counter.
    #[inline]
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Returns when the record was created.
    #[inline]
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when the record last changed.
    #[inline]
    #[must_use]
    pub const fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns whether responses may currently be taken against this record.
    #[must_use]
    pub fn is_tradeable(&self) -> bool {
        self.state.accepts_responses() && !self.remaining_quantity.is_zero()
    }

    /// Derives the quantity per delivery from the validity window.
    ///
    /// # Errors
    ///
    /// Returns an arithmetic error when the division fails.
    pub fn per_delivery_quantity(&self) -> ArithmeticResult<Quantity> {
        self.frequency
            .per_delivery_quantity(self.total_quantity, self.valid_from, self.valid_until)
    }

    // ========== Owner Actions ==========

    /// Records the owner's acceptance of the derived management fee.
    pub fn accept_management_fee(&mut self) {
        self.management_fee_accepted = true;
        self.touch();
    }

    /// Ratifies an admin-authored record, activating it.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidProposalStateTransition`] when the
    /// record is not awaiting ratification, or
    /// [`DomainError::ManagementFeeNotAccepted`] when the fee is still
    /// unaccepted.
    pub fn ratify(&mut self, owner: &UserId) -> DomainResult<()> {
        if !self.state.awaits_ratification() {
            return Err(DomainError::InvalidProposalStateTransition {
                from: self.state,
                to: ProposalState::Active,
            });
        }
        self.ensure_fee_accepted()?;
        self.transition_to(ProposalState::Active)?;
        self.log.log(
            owner.clone(),
            LogEventType::Ratified,
            "Publicación ratificada por el titular",
        );
        Ok(())
    }

    /// Returns a rejected record to the admin review queue.
    ///
    /// The id is preserved and the rejection reason cleared, so the owner's
    /// corrections go through a fresh review cycle on the same record.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidProposalStateTransition`] when the
    /// record is not rejected.
    pub fn resubmit(&mut self, actor: &UserId) -> DomainResult<()> {
        self.transition_to(ProposalState::PendingAdmin)?;
        self.rejection_reason = None;
        self.log.log(
            actor.clone(),
            LogEventType::Resubmitted,
            "Publicación corregida y reenviada a revisión",
        );
        Ok(())
    }

    /// Asks for more volume on an active record.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidQuantity`] for a zero increase or
    /// [`DomainError::InvalidProposalStateTransition`] when the record is
    /// not active.
    pub fn request_quantity_increase(
        &mut self,
        additional: Quantity,
        actor: &UserId,
    ) -> DomainResult<()> {
        if additional.is_zero() {
            return Err(DomainError::invalid_quantity(
                "quantity increase must be positive",
            ));
        }
        self.transition_to(ProposalState::PendingQuantityIncrease)?;
        self.pending_quantity_increase = Some(additional);
        self.log.log(
            actor.clone(),
            LogEventType::QuantityAmended,
            format!("Solicitud de aumento de cantidad: +{additional} kg"),
        );
        Ok(())
    }

    // ========== Pre-approval Edits ==========

    /// Replaces the total volume, re-deriving the fee.
    ///
    /// Allowed while the record is pending review or rejected. The fee
    /// changes with the volume, so the owner's earlier acceptance is reset.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidQuantity`] for zero volume or a
    /// validation error when the record is past review.
    pub fn set_total_quantity(&mut self, quantity: Quantity) -> DomainResult<()> {
        self.ensure_editable()?;
        if quantity.is_zero() {
            return Err(DomainError::invalid_quantity(
                "total quantity must be positive",
            ));
        }
        self.total_quantity = quantity;
        self.remaining_quantity = quantity;
        self.rederive_fee();
        self.management_fee_accepted = false;
        self.touch();
        Ok(())
    }

    /// Replaces the asked price.
    ///
    /// # Errors
    ///
    /// Returns the price's validation error or a validation error when the
    /// record is past review.
    pub fn set_price(&mut self, price: PriceTerms) -> DomainResult<()> {
        self.ensure_editable()?;
        price.validate()?;
        self.price = price;
        self.touch();
        Ok(())
    }

    /// Replaces the validity window.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidDateRange`] for an inverted window or a
    /// validation error when the record is past review.
    pub fn set_validity_window(&mut self, from: NaiveDate, until: NaiveDate) -> DomainResult<()> {
        self.ensure_editable()?;
        if from > until {
            return Err(DomainError::InvalidDateRange { from, until });
        }
        self.valid_from = from;
        self.valid_until = until;
        self.touch();
        Ok(())
    }

    // ========== Admin Actions ==========

    /// Approves a pending record, activating it.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidProposalStateTransition`] when the
    /// record is not pending admin review, or
    /// [`DomainError::ManagementFeeNotAccepted`] when the fee is still
    /// unaccepted.
    pub fn approve(&mut self, admin: &UserId) -> DomainResult<()> {
        if self.state != ProposalState::PendingAdmin {
            return Err(DomainError::InvalidProposalStateTransition {
                from: self.state,
                to: ProposalState::Active,
            });
        }
        self.ensure_fee_accepted()?;
        self.transition_to(ProposalState::Active)?;
        self.log.log(
            admin.clone(),
            LogEventType::AdminApproved,
            "Publicación aprobada",
        );
        Ok(())
    }

    /// Rejects or returns a pending record with a mandatory reason.
    ///
    /// Both outcomes land in `REJECTED`; the reason is stored with the
    /// rejection kind's prefix so the distinction survives on the record.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyRejectionReason`] for a blank reason or
    /// [`DomainError::InvalidProposalStateTransition`] when the record
    /// cannot be rejected from its current state.
    pub fn reject(&mut self, reason: &str, kind: RejectionKind, admin: &UserId) -> DomainResult<()> {
        if reason.trim().is_empty() {
            return Err(DomainError::EmptyRejectionReason);
        }
        self.transition_to(ProposalState::Rejected)?;
        let annotated = kind.annotate(reason);
        let event = match kind {
            RejectionKind::Returned => LogEventType::Returned,
            RejectionKind::Final => LogEventType::Rejected,
        };
        self.log.log(admin.clone(), event, annotated.clone());
        self.rejection_reason = Some(annotated);
        Ok(())
    }

    /// Hides an active record from the platform.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidProposalStateTransition`] when the
    /// record is not active.
    pub fn hide(&mut self, admin: &UserId) -> DomainResult<()> {
        self.transition_to(ProposalState::HiddenByAdmin)?;
        self.log.log(
            admin.clone(),
            LogEventType::Message,
            "Publicación ocultada por administración",
        );
        Ok(())
    }

    /// Restores a hidden record.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidProposalStateTransition`] when the
    /// record is not hidden.
    pub fn unhide(&mut self, admin: &UserId) -> DomainResult<()> {
        if self.state != ProposalState::HiddenByAdmin {
            return Err(DomainError::InvalidProposalStateTransition {
                from: self.state,
                to: ProposalState::Active,
            });
        }
        self.transition_to(ProposalState::Active)?;
        self.log.log(
            admin.clone(),
            LogEventType::Message,
            "Publicación restablecida",
        );
        Ok(())
    }

    /// Resolves a pending quantity increase.
    ///
    /// Approval adds the requested volume to both totals, re-derives the
    /// fee from the new volume and resets the owner's fee acceptance. Either
    /// outcome returns the record to `ACTIVE`; a record whose remaining
    /// volume is already exhausted moves straight on to `SOLD`.
    ///
    /// # Errors
    ///
    /// Returns a validation error when no increase is pending, an
    /// [`DomainError::InvalidProposalStateTransition`] when the record is
    /// not in arbitration, or an arithmetic error when the addition fails.
    pub fn resolve_quantity_increase(&mut self, approve: bool, admin: &UserId) -> DomainResult<()> {
        let Some(additional) = self.pending_quantity_increase else {
            return Err(DomainError::validation("no quantity increase is pending"));
        };
        let applied = if approve {
            let total = self.total_quantity.safe_add(additional)?;
            let remaining = self.remaining_quantity.safe_add(additional)?;
            Some((total, remaining))
        } else {
            None
        };

        self.transition_to(ProposalState::Active)?;
        self.pending_quantity_increase = None;
        if let Some((total, remaining)) = applied {
            self.total_quantity = total;
            self.remaining_quantity = remaining;
            self.rederive_fee();
            self.management_fee_accepted = false;
            self.log.log(
                admin.clone(),
                LogEventType::QuantityAmended,
                format!("Aumento de cantidad aprobado: +{additional} kg"),
            );
        } else {
            self.log.log(
                admin.clone(),
                LogEventType::QuantityAmended,
                "Aumento de cantidad denegado",
            );
        }
        if self.remaining_quantity.is_zero() {
            self.transition_to(ProposalState::Sold)?;
        }
        Ok(())
    }

    /// Administrative override that skips transition validation.
    ///
    /// Every use is recorded in the history.
    pub fn force_state(&mut self, target: ProposalState, admin: &UserId) {
        self.state = target;
        self.touch();
        self.log.log(
            admin.clone(),
            LogEventType::Message,
            format!("Estado forzado a {target} por administración"),
        );
    }

    // ========== Commitment Side Effects ==========

    /// Consumes committed volume, forcing `SOLD` at zero remaining.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the record is not taking responses,
    /// or [`DomainError::QuantityExceedsAvailable`] when the volume exceeds
    /// what is left.
    pub fn reserve(&mut self, volume: Quantity, actor: &UserId) -> DomainResult<()> {
        if !self.state.accepts_responses() {
            return Err(DomainError::validation(format!(
                "proposal {} cannot take commitments in state {}",
                self.id, self.state
            )));
        }
        if volume > self.remaining_quantity {
            return Err(DomainError::QuantityExceedsAvailable {
                requested: volume.as_decimal(),
                available: self.remaining_quantity.as_decimal(),
            });
        }
        self.remaining_quantity = self.remaining_quantity.safe_sub(volume)?;
        self.log.log(
            actor.clone(),
            LogEventType::QuantityAmended,
            format!("Volumen comprometido: {volume} kg"),
        );
        if self.remaining_quantity.is_zero() && self.state == ProposalState::Active {
            self.transition_to(ProposalState::Sold)?;
        } else {
            self.touch();
        }
        Ok(())
    }

    // ========== Messaging ==========

    /// Appends a free-text message to the negotiation history.
    pub fn post_message(&mut self, author: &UserId, text: impl Into<String>) {
        self.log.log(author.clone(), LogEventType::Message, text);
        self.touch();
    }
}

impl fmt::Display for Proposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Proposal[{}] {} state={} remaining={} kg",
            self.id, self.module, self.state, self.remaining_quantity
        )
    }
}
