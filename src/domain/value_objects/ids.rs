//! # Entity and User Identifiers
//!
//! String identifiers for platform records.
//!
//! Every negotiation record carries an id of the form
//! `{MODULE}-{KIND}-{yyyymmdd}-{random4}`, e.g. `M2-LST-20240115-K3F9`.
//! Parsing is total: any string the remote API hands back is carried as-is,
//! and [`EntityId::validate`] reports format findings without rejecting, so
//! legacy records keep flowing. Services log those findings at WARN.
//!
//! # Examples
//!
//! ```
//! use recimat::domain::value_objects::enums::{EntityKind, TradeModule};
//! use recimat::domain::value_objects::ids::EntityId;
//!
//! let id = EntityId::generate(TradeModule::Marketplace, EntityKind::Lst);
//! assert!(id.as_str().starts_with("M2-LST-"));
//! assert!(id.validate().is_empty());
//! ```

use crate::domain::value_objects::enums::{EntityKind, TradeModule};
use chrono::{NaiveDate, Utc};
use rand::{Rng, RngExt};
use rand::distr::Alphanumeric;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the random suffix segment.
const SUFFIX_LEN: usize = 4;

/// Date segment format inside identifiers.
const DATE_FORMAT: &str = "%Y%m%d";

/// Identifier of a platform user.
///
/// Opaque to this crate; the remote API owns its shape.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a user id from any string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The parsed segments of a canonical entity id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdParts {
    /// Module segment (`M1` / `M2`).
    pub module: TradeModule,
    /// Record kind segment (`REQ` / `OFF` / `LST` / `BID` / `COM`).
    pub kind: EntityKind,
    /// Creation date segment (`yyyymmdd`).
    pub date: NaiveDate,
    /// Random four-character suffix.
    pub suffix: String,
}

/// A single advisory finding from [`EntityId::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdFinding {
    /// The id does not have the four dash-separated segments.
    NotCanonical,
    /// The module segment is not `M1` or `M2`.
    UnknownModule(String),
    /// The kind segment is not a recognized 3-letter code.
    UnknownKind(String),
    /// The date segment is not a valid `yyyymmdd` date.
    BadDate(String),
    /// The suffix is not four alphanumeric characters.
    BadSuffix(String),
    /// The kind does not belong to the module (e.g. `M1-LST`).
    ModuleKindMismatch(TradeModule, EntityKind),
}

impl fmt::Display for IdFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotCanonical => write!(f, "id is not in MODULE-KIND-DATE-SUFFIX form"),
            Self::UnknownModule(s) => write!(f, "unknown module segment '{s}'"),
            Self::UnknownKind(s) => write!(f, "unknown kind segment '{s}'"),
            Self::BadDate(s) => write!(f, "invalid date segment '{s}'"),
            Self::BadSuffix(s) => write!(f, "invalid suffix segment '{s}'"),
            Self::ModuleKindMismatch(module, kind) => {
                write!(f, "kind {kind} does not belong to module {module}")
            }
        }
    }
}

/// Identifier of a proposal, response, or commitment record.
///
/// Construction never fails: ids received from the wire are carried
/// verbatim, canonical ids are produced by [`generate`](EntityId::generate).
/// Format conformance is checked separately and advisorily by
/// [`validate`](EntityId::validate).
///
/// # Examples
///
/// ```
/// use recimat::domain::value_objects::ids::EntityId;
///
/// let id = EntityId::from("M1-REQ-20240115-A7K2");
/// let parts = id.parts().unwrap();
/// assert_eq!(parts.suffix, "A7K2");
///
/// let legacy = EntityId::from("req-42");
/// assert!(legacy.parts().is_none());
/// assert!(!legacy.validate().is_empty());
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Generates a canonical id for a record created now.
    #[must_use]
    pub fn generate(module: TradeModule, kind: EntityKind) -> Self {
        Self::generate_on(module, kind, Utc::now().date_naive(), &mut rand::rng())
    }

    /// Generates a canonical id with an explicit date and randomness source.
    #[must_use]
    pub fn generate_on(
        module: TradeModule,
        kind: EntityKind,
        date: NaiveDate,
        rng: &mut impl Rng,
    ) -> Self {
        let suffix: String = rng
            .sample_iter(Alphanumeric)
            .take(SUFFIX_LEN)
            .map(|b| char::from(b).to_ascii_uppercase())
            .collect();
        Self(format!(
            "{}-{}-{}-{}",
            module.id_prefix(),
            kind,
            date.format(DATE_FORMAT),
            suffix
        ))
    }

    /// Builds a canonical id from explicit segments.
    ///
    /// Used to derive ids deterministically (commitments reuse the date and
    /// suffix of the response they settle).
    #[must_use]
    pub fn from_parts(
        module: TradeModule,
        kind: EntityKind,
        date: NaiveDate,
        suffix: &str,
    ) -> Self {
        Self(format!(
            "{}-{}-{}-{}",
            module.id_prefix(),
            kind,
            date.format(DATE_FORMAT),
            suffix
        ))
    }

    /// Returns the id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the id, returning the underlying string.
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Parses the id into its canonical segments, if it has them.
    ///
    /// Returns `None` for legacy or foreign ids; those are still valid
    /// identifiers, they just cannot participate in segment-based derivation.
    #[must_use]
    pub fn parts(&self) -> Option<IdParts> {
        let mut segments = self.0.split('-');
        let module = segments.next()?.parse::<TradeModule>().ok()?;
        let kind = segments.next()?.parse::<EntityKind>().ok()?;
        let date = NaiveDate::parse_from_str(segments.next()?, DATE_FORMAT).ok()?;
        let suffix = segments.next()?;
        if segments.next().is_some() || suffix.len() != SUFFIX_LEN {
            return None;
        }
        if !suffix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(IdParts {
            module,
            kind,
            date,
            suffix: suffix.to_string(),
        })
    }

    /// Checks the id against the canonical format, returning advisory
    /// findings.
    ///
    /// An empty result means the id is canonical. Findings never make the
    /// record unusable; callers log them and continue.
    #[must_use]
    pub fn validate(&self) -> Vec<IdFinding> {
        let segments: Vec<&str> = self.0.split('-').collect();
        let [module_seg, kind_seg, date_seg, suffix_seg] = segments.as_slice() else {
            return vec![IdFinding::NotCanonical];
        };

        let mut findings = Vec::new();
        let module = module_seg.parse::<TradeModule>().ok();
        if module.is_none() {
            findings.push(IdFinding::UnknownModule((*module_seg).to_string()));
        }
        let kind = kind_seg.parse::<EntityKind>().ok();
        if kind.is_none() {
            findings.push(IdFinding::UnknownKind((*kind_seg).to_string()));
        }
        if NaiveDate::parse_from_str(date_seg, DATE_FORMAT).is_err() {
            findings.push(IdFinding::BadDate((*date_seg).to_string()));
        }
        if suffix_seg.len() != SUFFIX_LEN
            || !suffix_seg.chars().all(|c| c.is_ascii_alphanumeric())
        {
            findings.push(IdFinding::BadSuffix((*suffix_seg).to_string()));
        }
        if let (Some(module), Some(kind)) = (module, kind)
            && let Some(expected) = kind.expected_module()
            && expected != module
        {
            findings.push(IdFinding::ModuleKindMismatch(module, kind));
        }
        findings
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
