//! # Negotiation Clause Types
//!
//! Value objects for the five negotiable clauses carried by a response:
//! price, quality, logistics, payment, and delivery location.
//!
//! This module provides:
//! - [`ClauseKind`]: identifies one negotiable clause
//! - [`PriceVariable`] and [`StructuredPrice`]: named price components summing to a total
//! - [`CounterProposal`]: free-text or structured-price alternative to a clause
//! - [`ClauseDecision`]: the accept/counter pair for a single clause
//! - [`NegotiationTerms`]: the full five-clause decision set on a response
//!
//! A clause is either accepted verbatim or countered; countering without a
//! substantive counter-proposal is rejected at validation time.
//!
//! # Examples
//!
//! ```
//! use recimat::domain::value_objects::clause::{
//!     ClauseDecision, ClauseKind, CounterProposal, NegotiationTerms,
//! };
//!
//! let terms = NegotiationTerms::accept_all().with_clause(
//!     ClauseKind::Logistics,
//!     ClauseDecision::counter(CounterProposal::text("Recogida en planta, no en bodega")),
//! );
//! assert!(terms.validate().is_ok());
//! assert_eq!(terms.countered_clauses(), vec![ClauseKind::Logistics]);
//! ```

use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::errors::{DomainError, DomainResult};

/// Maximum drift tolerated between a declared price total and the sum of its
/// variables, in currency units.
fn total_tolerance() -> Decimal {
    Decimal::new(1, 2)
}

/// Identifies one of the five negotiable clauses of a proposal.
///
/// # Examples
///
/// ```
/// use recimat::domain::value_objects::clause::ClauseKind;
///
/// assert_eq!(ClauseKind::Payment.label_es(), "Forma de pago");
/// assert_eq!(ClauseKind::ALL.len(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum ClauseKind {
    /// Unit price, flat or structured.
    Price = 0,
    /// Material quality requirements.
    Quality = 1,
    /// Transport and handling arrangements.
    Logistics = 2,
    /// Payment terms.
    Payment = 3,
    /// Delivery location.
    Location = 4,
}

impl ClauseKind {
    /// Every clause, in wire order.
    pub const ALL: [Self; 5] = [
        Self::Price,
        Self::Quality,
        Self::Logistics,
        Self::Payment,
        Self::Location,
    ];

    /// Returns the Spanish display label for this clause.
    #[must_use]
    pub const fn label_es(self) -> &'static str {
        match self {
            Self::Price => "Precio",
            Self::Quality => "Calidad",
            Self::Logistics => "Logística",
            Self::Payment => "Forma de pago",
            Self::Location => "Lugar de entrega",
        }
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Price => write!(f, "price"),
            Self::Quality => write!(f, "quality"),
            Self::Logistics => write!(f, "logistics"),
            Self::Payment => write!(f, "payment"),
            Self::Location => write!(f, "location"),
        }
    }
}

/// One named component of a structured price.
///
/// `is_new` marks a component the responder added that was not part of the
/// proposal's original breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PriceVariable {
    /// Component name as shown to both parties.
    name: String,
    /// Component value in the proposal's currency.
    value: Decimal,
    /// Whether the responder introduced this component.
    #[serde(default, rename = "isNew")]
    is_new: bool,
}

impl PriceVariable {
    /// Creates a component carried over from the proposal's breakdown.
    pub fn new(name: impl Into<String>, value: Decimal) -> Self {
        Self {
            name: name.into(),
            value,
            is_new: false,
        }
    }

    /// Creates a component the responder introduced.
    pub fn added(name: impl Into<String>, value: Decimal) -> Self {
        Self {
            name: name.into(),
            value,
            is_new: true,
        }
    }

    /// Returns the component name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the component value.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> Decimal {
        self.value
    }

    /// Returns whether the responder introduced this component.
    #[inline]
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.is_new
    }
}

/// A price expressed as named components summing to a total.
///
/// The declared total must match the component sum to within a cent. Client
/// arithmetic is not trusted at submission time; [`Self::with_recomputed_total`]
/// replaces the declared total with the component sum.
///
/// # Examples
///
/// ```
/// use recimat::domain::value_objects::clause::{PriceVariable, StructuredPrice};
/// use rust_decimal::Decimal;
///
/// let price = StructuredPrice::new(
///     vec![
///         PriceVariable::new("Material", Decimal::new(1200, 0)),
///         PriceVariable::added("Flete", Decimal::new(150, 0)),
///     ],
///     Decimal::new(1350, 0),
///     Some("Incluye transporte hasta planta".to_string()),
/// )
/// .unwrap();
/// assert_eq!(price.total(), Decimal::new(1350, 0));
/// assert!(price.is_consistent());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StructuredPrice {
    /// Named price components.
    variables: Vec<PriceVariable>,
    /// Declared total of all components.
    total: Decimal,
    /// Optional free-text note attached to the breakdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    observation: Option<String>,
}

impl StructuredPrice {
    /// Creates a structured price, checking the declared total against the
    /// component sum.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::PriceTotalMismatch`] when the declared total
    /// differs from the component sum by more than a cent.
    pub fn new(
        variables: Vec<PriceVariable>,
        total: Decimal,
        observation: Option<String>,
    ) -> DomainResult<Self> {
        let price = Self {
            variables,
            total,
            observation,
        };
        if price.is_consistent() {
            Ok(price)
        } else {
            Err(DomainError::PriceTotalMismatch {
                declared: price.total,
                computed: price.computed_total(),
            })
        }
    }

    /// Creates a structured price whose total is the component sum.
    #[must_use]
    pub fn from_variables(variables: Vec<PriceVariable>, observation: Option<String>) -> Self {
        let total = variables.iter().map(PriceVariable::value).sum();
        Self {
            variables,
            total,
            observation,
        }
    }

    /// Returns the named price components.
    #[inline]
    #[must_use]
    pub fn variables(&self) -> &[PriceVariable] {
        &self.variables
    }

    /// Returns the declared total.
    #[inline]
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.total
    }

    /// Returns the optional note attached to the breakdown.
    #[inline]
    #[must_use]
    pub fn observation(&self) -> Option<&str> {
        self.observation.as_deref()
    }

    /// Returns the sum of all component values.
    #[must_use]
    pub fn computed_total(&self) -> Decimal {
        self.variables.iter().map(PriceVariable::value).sum()
    }

    /// Returns whether the declared total matches the component sum to
    /// within a cent.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        (self.total - self.computed_total()).abs() <= total_tolerance()
    }

    /// Replaces the declared total with the component sum.
    #[must_use]
    pub fn with_recomputed_total(mut self) -> Self {
        self.total = self.computed_total();
        self
    }
}

impl fmt::Display for StructuredPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StructuredPrice({} variables, total={})",
            self.variables.len(),
            self.total,
        )
    }
}

/// The alternative a responder proposes when a clause is not accepted.
///
/// On the wire this is either a bare string or a structured price object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum CounterProposal {
    /// Free-text counter describing the alternative terms.
    Text(String),
    /// Structured price breakdown replacing the proposal's price.
    Price(StructuredPrice),
}

impl CounterProposal {
    /// Creates a free-text counter-proposal.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Returns the free-text content, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Price(_) => None,
        }
    }

    /// Returns the structured price, if any.
    #[must_use]
    pub const fn as_price(&self) -> Option<&StructuredPrice> {
        match self {
            Self::Text(_) => None,
            Self::Price(price) => Some(price),
        }
    }

    /// Returns whether this counter carries actual content.
    ///
    /// Blank text does not count as a justification.
    #[must_use]
    pub fn is_substantive(&self) -> bool {
        match self {
            Self::Text(text) => !text.trim().is_empty(),
            Self::Price(_) => true,
        }
    }

    /// Recomputes the total when the counter is a structured price.
    #[must_use]
    pub fn with_recomputed_total(self) -> Self {
        match self {
            Self::Text(text) => Self::Text(text),
            Self::Price(price) => Self::Price(price.with_recomputed_total()),
        }
    }
}

/// The accept/counter pair for a single clause.
///
/// Rejecting a clause silently is disallowed: `acepta=false` requires a
/// substantive counter-proposal.
///
/// # Examples
///
/// ```
/// use recimat::domain::value_objects::clause::{ClauseDecision, ClauseKind, CounterProposal};
///
/// let decision = ClauseDecision::counter(CounterProposal::text("Pago a 60 días"));
/// assert!(!decision.accepted());
/// assert!(decision.validate(ClauseKind::Payment).is_ok());
///
/// let silent = ClauseDecision::counter(CounterProposal::text("   "));
/// assert!(silent.validate(ClauseKind::Payment).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClauseDecision {
    /// Whether the responder accepts the clause as proposed.
    #[serde(rename = "acepta")]
    accepted: bool,
    /// The alternative offered when the clause is not accepted.
    #[serde(
        default,
        rename = "contrapropuesta",
        skip_serializing_if = "Option::is_none"
    )]
    counter_proposal: Option<CounterProposal>,
}

impl ClauseDecision {
    /// Accepts the clause as proposed.
    #[must_use]
    pub const fn accept() -> Self {
        Self {
            accepted: true,
            counter_proposal: None,
        }
    }

    /// Counters the clause with an alternative.
    #[must_use]
    pub const fn counter(proposal: CounterProposal) -> Self {
        Self {
            accepted: false,
            counter_proposal: Some(proposal),
        }
    }

    /// Returns whether the responder accepts the clause as proposed.
    #[inline]
    #[must_use]
    pub const fn accepted(&self) -> bool {
        self.accepted
    }

    /// Returns the counter-proposal, if any.
    #[inline]
    #[must_use]
    pub const fn counter_proposal(&self) -> Option<&CounterProposal> {
        self.counter_proposal.as_ref()
    }

    /// Checks that a countered clause carries a substantive counter-proposal.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingJustification`] when the clause is not
    /// accepted and no substantive counter-proposal is present.
    pub fn validate(&self, kind: ClauseKind) -> DomainResult<()> {
        if self.accepted {
            return Ok(());
        }
        let substantive = self
            .counter_proposal
            .as_ref()
            .is_some_and(CounterProposal::is_substantive);
        if substantive {
            Ok(())
        } else {
            Err(DomainError::MissingJustification(kind))
        }
    }

    /// Recomputes the total of a structured-price counter, if present.
    #[must_use]
    pub fn with_recomputed_total(mut self) -> Self {
        self.counter_proposal = self
            .counter_proposal
            .map(CounterProposal::with_recomputed_total);
        self
    }
}

impl Default for ClauseDecision {
    /// A clause left unaddressed is treated as accepted.
    fn default() -> Self {
        Self::accept()
    }
}

/// The full clause decision set carried by a response.
///
/// Wire field names carry the Spanish labels used across the platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct NegotiationTerms {
    /// Decision on the price clause.
    #[serde(rename = "precio")]
    price: ClauseDecision,
    /// Decision on the quality clause.
    #[serde(rename = "calidad")]
    quality: ClauseDecision,
    /// Decision on the logistics clause.
    #[serde(rename = "logistica")]
    logistics: ClauseDecision,
    /// Decision on the payment clause.
    #[serde(rename = "formaPago")]
    payment: ClauseDecision,
    /// Decision on the delivery location clause.
    #[serde(rename = "lugarEntrega")]
    location: ClauseDecision,
}

impl NegotiationTerms {
    /// Creates a decision set accepting every clause as proposed.
    #[must_use]
    pub fn accept_all() -> Self {
        Self::default()
    }

    /// Creates a decision set from one decision per clause.
    #[must_use]
    pub const fn new(
        price: ClauseDecision,
        quality: ClauseDecision,
        logistics: ClauseDecision,
        payment: ClauseDecision,
        location: ClauseDecision,
    ) -> Self {
        Self {
            price,
            quality,
            logistics,
            payment,
            location,
        }
    }

    /// Returns the decision on the given clause.
    #[must_use]
    pub const fn clause(&self, kind: ClauseKind) -> &ClauseDecision {
        match kind {
            ClauseKind::Price => &self.price,
            ClauseKind::Quality => &self.quality,
            ClauseKind::Logistics => &self.logistics,
            ClauseKind::Payment => &self.payment,
            ClauseKind::Location => &self.location,
        }
    }

    /// Replaces the decision on the given clause.
    #[must_use]
    pub fn with_clause(mut self, kind: ClauseKind, decision: ClauseDecision) -> Self {
        match kind {
            ClauseKind::Price => self.price = decision,
            ClauseKind::Quality => self.quality = decision,
            ClauseKind::Logistics => self.logistics = decision,
            ClauseKind::Payment => self.payment = decision,
            ClauseKind::Location => self.location = decision,
        }
        self
    }

    /// Returns whether every clause is accepted as proposed.
    #[must_use]
    pub fn all_accepted(&self) -> bool {
        ClauseKind::ALL
            .iter()
            .all(|kind| self.clause(*kind).accepted())
    }

    /// Returns the clauses the responder countered, in wire order.
    #[must_use]
    pub fn countered_clauses(&self) -> Vec<ClauseKind> {
        ClauseKind::ALL
            .iter()
            .copied()
            .filter(|kind| !self.clause(*kind).accepted())
            .collect()
    }

    /// Checks that every countered clause carries a substantive
    /// counter-proposal.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingJustification`] naming the first clause
    /// rejected without one.
    pub fn validate(&self) -> DomainResult<()> {
        for kind in ClauseKind::ALL {
            self.clause(kind).validate(kind)?;
        }
        Ok(())
    }

    /// Recomputes structured-price totals across all countered clauses.
    #[must_use]
    pub fn with_recomputed_totals(self) -> Self {
        Self {
            price: self.price.with_recomputed_total(),
            quality: self.quality.with_recomputed_total(),
            logistics: self.logistics.with_recomputed_total(),
            payment: self.payment.with_recomputed_total(),
            location: self.location.with_recomputed_total(),
        }
    }
}
