//! In-memory reference engine.
//!
//! `MemTable` implements the full mutation contract against an ordinary
//! map, so the write path can be exercised end to end. Per-document
//! failures are absorbed into the returned stats (`errors` counter plus a
//! `first_error` message); the `Err` channel carries only malformed batch
//! arguments.

use std::collections::BTreeMap;

use vellum_core::{obj, Datum, DatumType};

use crate::error::{TableError, TableResult};
use crate::func::WriteFunction;
use crate::options::{ConflictPolicy, Durability, ReturnChanges};
use crate::table::{SingleSelection, Table};

/// An in-memory table keyed by the canonical rendering of the primary-key
/// value.
pub struct MemTable {
    pkey: String,
    rows: BTreeMap<String, Datum>,
    last_durability: Option<Durability>,
}

impl MemTable {
    pub fn new(pkey: impl Into<String>) -> Self {
        Self {
            pkey: pkey.into(),
            rows: BTreeMap::new(),
            last_durability: None,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The stored document at `key`, if any.
    pub fn get(&self, key: &Datum) -> Option<&Datum> {
        self.rows.get(&encode_key(key))
    }

    /// Durability requested by the most recent mutation call.
    pub fn last_durability(&self) -> Option<Durability> {
        self.last_durability
    }

    /// Select one row by primary key.
    pub fn selection(&mut self, key: Datum) -> MemSelection<'_> {
        MemSelection { table: self, key }
    }

    fn insert_one(&mut self, doc: Datum, generated: bool, conflict: ConflictPolicy, acc: &mut StatsAcc) {
        if !doc.is_object() {
            acc.error(format!(
                "Expected type OBJECT but found {}.",
                doc.datum_type()
            ));
            return;
        }
        let key = match doc.get_field(&self.pkey) {
            Some(key) => key.clone(),
            None => {
                acc.error(format!("No attribute `{}` in object.", self.pkey));
                return;
            }
        };
        if matches!(
            key.datum_type(),
            DatumType::Null | DatumType::Array | DatumType::Object
        ) {
            acc.error(format!(
                "Primary key `{}` cannot be {}.",
                self.pkey,
                key.datum_type()
            ));
            return;
        }

        let enc = encode_key(&key);
        let Some(old) = self.rows.get(&enc).cloned() else {
            acc.inserted += 1;
            acc.record(false, &Datum::Null, &doc);
            self.rows.insert(enc, doc);
            return;
        };

        match conflict {
            ConflictPolicy::Error => {
                if generated {
                    acc.error(format!(
                        "Generated key conflicts with an existing primary key `{}`: {key}.",
                        self.pkey
                    ));
                } else {
                    acc.error(format!("Duplicate primary key `{}`: {key}.", self.pkey));
                }
            }
            ConflictPolicy::Replace => {
                if old == doc {
                    acc.unchanged += 1;
                    acc.record(true, &old, &doc);
                } else {
                    acc.replaced += 1;
                    acc.record(false, &old, &doc);
                    self.rows.insert(enc, doc);
                }
            }
            ConflictPolicy::Update => {
                let merged = old.merge(&doc);
                if merged == old {
                    acc.unchanged += 1;
                    acc.record(true, &old, &merged);
                } else {
                    acc.replaced += 1;
                    acc.record(false, &old, &merged);
                    self.rows.insert(enc, merged);
                }
            }
        }
    }

    /// Apply one transformed row. `old` is what the table stored at `key`
    /// (Null when absent), `new` the transform's output.
    fn apply_write(&mut self, key: &Datum, old: Datum, new: Datum, acc: &mut StatsAcc) {
        let enc = encode_key(key);
        if new.is_null() {
            if old.is_null() {
                acc.skipped += 1;
            } else {
                self.rows.remove(&enc);
                acc.deleted += 1;
                acc.record(false, &old, &new);
            }
            return;
        }
        if !new.is_object() {
            acc.error(format!(
                "Expected type OBJECT but found {}.",
                new.datum_type()
            ));
            return;
        }
        if new.get_field(&self.pkey) != Some(key) {
            acc.error(format!(
                "Primary key `{}` cannot be changed: {old} to {new}.",
                self.pkey
            ));
            return;
        }
        if old.is_null() {
            acc.inserted += 1;
            acc.record(false, &old, &new);
            self.rows.insert(enc, new);
        } else if old == new {
            acc.unchanged += 1;
            acc.record(true, &old, &new);
        } else {
            acc.replaced += 1;
            acc.record(false, &old, &new);
            self.rows.insert(enc, new);
        }
    }

    fn replace_one(&mut self, key: &Datum, pulled: &Datum, transform: &dyn WriteFunction, acc: &mut StatsAcc) {
        let old = self
            .rows
            .get(&encode_key(key))
            .cloned()
            .unwrap_or(Datum::Null);
        // A deterministic transform is re-evaluated against the stored row;
        // a non-deterministic one already ran conceptually once over the
        // pulled row, so the pulled row is its input.
        let input = if transform.is_deterministic() {
            &old
        } else {
            pulled
        };
        match transform.call(input) {
            Ok(new) => self.apply_write(key, old, new, acc),
            Err(err) => acc.error(err.to_string()),
        }
    }
}

impl Table for MemTable {
    fn primary_key(&self) -> &str {
        &self.pkey
    }

    fn batched_insert(
        &mut self,
        docs: Vec<Datum>,
        generated_flags: Vec<bool>,
        conflict: ConflictPolicy,
        durability: Durability,
        return_changes: ReturnChanges,
    ) -> TableResult<Datum> {
        if docs.len() != generated_flags.len() {
            return Err(TableError::FlagArity {
                docs: docs.len(),
                flags: generated_flags.len(),
            });
        }
        self.last_durability = Some(durability);
        let mut acc = StatsAcc::new(return_changes);
        for (doc, generated) in docs.into_iter().zip(generated_flags) {
            self.insert_one(doc, generated, conflict, &mut acc);
        }
        Ok(acc.into_datum())
    }

    fn batched_replace(
        &mut self,
        docs: Vec<Datum>,
        keys: Vec<Datum>,
        transform: &dyn WriteFunction,
        _non_atomic: bool,
        durability: Durability,
        return_changes: ReturnChanges,
    ) -> TableResult<Datum> {
        if docs.len() != keys.len() {
            return Err(TableError::KeyArity {
                docs: docs.len(),
                keys: keys.len(),
            });
        }
        self.last_durability = Some(durability);
        let mut acc = StatsAcc::new(return_changes);
        for (doc, key) in docs.iter().zip(&keys) {
            self.replace_one(key, doc, transform, &mut acc);
        }
        Ok(acc.into_datum())
    }
}

/// One row of a `MemTable`, identified by primary key.
pub struct MemSelection<'t> {
    table: &'t mut MemTable,
    key: Datum,
}

impl SingleSelection for MemSelection<'_> {
    fn replace(
        &mut self,
        transform: &dyn WriteFunction,
        _non_atomic: bool,
        durability: Durability,
        return_changes: ReturnChanges,
    ) -> TableResult<Datum> {
        self.table.last_durability = Some(durability);
        let mut acc = StatsAcc::new(return_changes);
        let old = self
            .table
            .rows
            .get(&encode_key(&self.key))
            .cloned()
            .unwrap_or(Datum::Null);
        match transform.call(&old) {
            Ok(new) => self.table.apply_write(&self.key, old, new, &mut acc),
            Err(err) => acc.error(err.to_string()),
        }
        Ok(acc.into_datum())
    }
}

fn encode_key(key: &Datum) -> String {
    key.to_string()
}

/// Per-batch stats accumulation.
struct StatsAcc {
    inserted: u64,
    deleted: u64,
    skipped: u64,
    replaced: u64,
    unchanged: u64,
    errors: u64,
    first_error: Option<String>,
    return_changes: ReturnChanges,
    changes: Vec<Datum>,
}

impl StatsAcc {
    fn new(return_changes: ReturnChanges) -> Self {
        Self {
            inserted: 0,
            deleted: 0,
            skipped: 0,
            replaced: 0,
            unchanged: 0,
            errors: 0,
            first_error: None,
            return_changes,
            changes: Vec::new(),
        }
    }

    fn error(&mut self, message: String) {
        self.errors += 1;
        if self.first_error.is_none() {
            self.first_error = Some(message);
        }
    }

    fn record(&mut self, unchanged: bool, old: &Datum, new: &Datum) {
        let include = match self.return_changes {
            ReturnChanges::No => false,
            ReturnChanges::Yes => !unchanged,
            ReturnChanges::Always => true,
        };
        if include {
            self.changes
                .push(obj! { "old_val" => old.clone(), "new_val" => new.clone() });
        }
    }

    fn into_datum(self) -> Datum {
        let mut out = BTreeMap::new();
        out.insert("inserted".to_string(), Datum::from(self.inserted as f64));
        out.insert("deleted".to_string(), Datum::from(self.deleted as f64));
        out.insert("skipped".to_string(), Datum::from(self.skipped as f64));
        out.insert("replaced".to_string(), Datum::from(self.replaced as f64));
        out.insert("unchanged".to_string(), Datum::from(self.unchanged as f64));
        out.insert("errors".to_string(), Datum::from(self.errors as f64));
        if let Some(message) = self.first_error {
            out.insert("first_error".to_string(), Datum::Str(message));
        }
        if self.return_changes != ReturnChanges::No {
            out.insert("changes".to_string(), Datum::Array(self.changes));
        }
        Datum::Object(out)
    }
}
