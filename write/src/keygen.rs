//! Primary-key generation.

use std::collections::BTreeMap;

use tracing::trace;
use uuid::Uuid;
use vellum_core::{ConditionSet, Datum, DatumResult, MergeStrategy};

use crate::env::WriteEnv;

/// Source of fresh unique primary-key values.
///
/// Keys need only be unique, not ordered, so the source is free to be
/// process-wide shared state without coordination.
pub trait KeySource {
    fn fresh_key(&self) -> String;
}

/// Random v4 UUID keys rendered as strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidKeys;

impl KeySource for UuidKeys {
    fn fresh_key(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Per-request key generation state: the generated-keys collection capped
/// at `limits.max_generated_keys`, plus the count of keys generated past
/// the cap. Both accumulate across every batch of one request, never per
/// batch.
#[derive(Debug)]
pub struct KeyGenerator {
    pkey: String,
    generated: Vec<String>,
    skipped: usize,
}

impl KeyGenerator {
    pub fn new(pkey: impl Into<String>) -> Self {
        Self {
            pkey: pkey.into(),
            generated: Vec::new(),
            skipped: 0,
        }
    }

    /// Add a fresh key to `doc` if it lacks one at the table's primary-key
    /// field. Returns the possibly-augmented document and whether a key
    /// was generated.
    ///
    /// Errors from the underlying merge are returned to the caller, which
    /// discards them: the table engine reports the same failure in that
    /// document's error accounting, and reporting it here too would
    /// double-count it.
    pub fn maybe_generate_key(
        &mut self,
        env: &WriteEnv,
        doc: &Datum,
    ) -> DatumResult<(Datum, bool)> {
        if doc.get_field(&self.pkey).is_some() {
            return Ok((doc.clone(), false));
        }

        let key = env.fresh_key();
        let patch = Datum::Object(BTreeMap::from([(
            self.pkey.clone(),
            Datum::Str(key.clone()),
        )]));
        let mut conditions = ConditionSet::new();
        let merged = doc.merge_with(&patch, MergeStrategy::Disjoint, env.limits(), &mut conditions)?;
        // The disjoint strategy cannot produce warning conditions.
        debug_assert!(conditions.is_empty());

        if self.generated.len() < env.limits().max_generated_keys() {
            trace!(key = %key, "generated primary key");
            self.generated.push(key);
        } else {
            self.skipped += 1;
        }
        Ok((merged, true))
    }

    pub fn generated_keys(&self) -> &[String] {
        &self.generated
    }

    pub fn keys_skipped(&self) -> usize {
        self.skipped
    }

    /// Consume into (generated keys, skipped count).
    pub fn into_parts(self) -> (Vec<String>, usize) {
        (self.generated, self.skipped)
    }
}
