//! Write request options and their parsers.
//!
//! Every recognized option has exactly one parsing rule. Invalid and
//! deprecated values fail parsing; nothing silently defaults.

use std::collections::BTreeMap;

use vellum_core::Datum;
use vellum_table::{ConflictPolicy, Durability, ReturnChanges};

use crate::error::{WriteError, WriteResult};

/// Named optional arguments attached to a write request.
#[derive(Debug, Clone, Default)]
pub struct OptArgs(BTreeMap<String, Datum>);

impl OptArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Datum>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Datum> {
        self.0.get(name)
    }
}

/// Parse the `conflict` option. Accepts exactly "error", "replace" and
/// "update"; absence means `Error`.
pub fn parse_conflict(arg: Option<&Datum>) -> WriteResult<ConflictPolicy> {
    let Some(arg) = arg else {
        return Ok(ConflictPolicy::Error);
    };
    match arg.try_as_str()? {
        "error" => Ok(ConflictPolicy::Error),
        "replace" => Ok(ConflictPolicy::Replace),
        "update" => Ok(ConflictPolicy::Update),
        other => Err(WriteError::UnrecognizedConflict(other.to_string())),
    }
}

/// Parse the `durability` option. Accepts exactly "hard" and "soft";
/// absence means `Default`.
pub fn parse_durability(arg: Option<&Datum>) -> WriteResult<Durability> {
    let Some(arg) = arg else {
        return Ok(Durability::Default);
    };
    match arg.try_as_str()? {
        "hard" => Ok(Durability::Hard),
        "soft" => Ok(Durability::Soft),
        other => Err(WriteError::UnrecognizedDurability(other.to_string())),
    }
}

/// Parse `return_changes`. Accepts `true`, `false` and the string
/// "always"; the deprecated `return_vals` alias is rejected outright.
pub fn parse_return_changes(optargs: &OptArgs) -> WriteResult<ReturnChanges> {
    if optargs.get("return_vals").is_some() {
        return Err(WriteError::ObsoleteReturnVals);
    }
    let Some(value) = optargs.get("return_changes") else {
        return Ok(ReturnChanges::No);
    };
    match value {
        Datum::Str(s) if s == "always" => Ok(ReturnChanges::Always),
        Datum::Str(s) => Err(WriteError::InvalidReturnChanges(s.clone())),
        other => Ok(if other.try_as_bool()? {
            ReturnChanges::Yes
        } else {
            ReturnChanges::No
        }),
    }
}

/// Validated options of an insert request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertOptions {
    pub conflict: ConflictPolicy,
    pub durability: Durability,
    pub return_changes: ReturnChanges,
}

impl InsertOptions {
    pub fn parse(optargs: &OptArgs) -> WriteResult<Self> {
        Ok(Self {
            conflict: parse_conflict(optargs.get("conflict"))?,
            durability: parse_durability(optargs.get("durability"))?,
            return_changes: parse_return_changes(optargs)?,
        })
    }
}

/// Validated options of a replace request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceOptions {
    pub non_atomic: bool,
    pub durability: Durability,
    pub return_changes: ReturnChanges,
}

impl ReplaceOptions {
    pub fn parse(optargs: &OptArgs) -> WriteResult<Self> {
        let non_atomic = match optargs.get("non_atomic") {
            Some(value) => value.try_as_bool()?,
            None => false,
        };
        Ok(Self {
            non_atomic,
            durability: parse_durability(optargs.get("durability"))?,
            return_changes: parse_return_changes(optargs)?,
        })
    }
}
