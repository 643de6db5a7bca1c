//! # Acceptance Idempotency
//!
//! Replay protection for commitment derivation.
//!
//! Clients on unreliable connections retry acceptance requests. Correctness
//! rests on the deterministic commitment ID (deriving twice produces the
//! same record), so the registry here is a fast path: it remembers which
//! acceptance attempts already completed and short-circuits replays without
//! touching the backend.

use crate::domain::value_objects::EntityId;
use dashmap::DashMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque key identifying one acceptance attempt.
///
/// The client generates a fresh key per user action and reuses it across
/// retries of that action.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct IdempotencyKey(Uuid);

impl IdempotencyKey {
    /// Generates a fresh random key.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn new(key: Uuid) -> Self {
        Self(key)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// In-process registry of completed acceptance attempts.
///
/// Maps each seen [`IdempotencyKey`] to the commitment it produced.
/// Duplicate materialization is already harmless because the commitment ID
/// is derived from the response ID; this registry only avoids the redundant
/// round trip on an obvious replay.
#[derive(Debug, Default)]
pub struct IdempotencyRegistry {
    outcomes: DashMap<IdempotencyKey, EntityId>,
}

impl IdempotencyRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the commitment produced by an acceptance attempt.
    pub fn record(&self, key: IdempotencyKey, commitment_id: EntityId) {
        self.outcomes.insert(key, commitment_id);
    }

    /// Returns the commitment a previous attempt with this key produced.
    #[must_use]
    pub fn lookup(&self, key: &IdempotencyKey) -> Option<EntityId> {
        self.outcomes.get(key).map(|entry| entry.value().clone())
    }

    /// Returns the number of recorded attempts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Returns true if no attempts have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn generated_keys_are_unique() {
        let first = IdempotencyKey::generate();
        let second = IdempotencyKey::generate();
        assert_ne!(first, second);
    }

    #[test]
    fn lookup_unknown_key_returns_none() {
        let registry = IdempotencyRegistry::new();
        assert!(registry.lookup(&IdempotencyKey::generate()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn record_then_lookup_round_trips() {
        let registry = IdempotencyRegistry::new();
        let key = IdempotencyKey::generate();
        let commitment_id = EntityId::from("M2-COM-20240115-K3F9");

        registry.record(key, commitment_id.clone());

        assert_eq!(registry.lookup(&key), Some(commitment_id));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn key_serializes_transparently() {
        let key = IdempotencyKey::new(Uuid::nil());
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000000\"");

        let back: IdempotencyKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
