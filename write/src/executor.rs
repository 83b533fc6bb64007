//! Write request dispatch.
//!
//! A write request is a tagged variant over the three operations. Each
//! variant carries its own validated option set and evaluates to a stats
//! object through a single entrypoint.

use vellum_core::Datum;
use vellum_table::{DatumStream, Table, WriteFunction};

use crate::env::WriteEnv;
use crate::error::WriteResult;
use crate::ops;
use crate::ops::replace::ReplaceTarget;
use crate::options::{InsertOptions, ReplaceOptions};
use crate::source::WriteSource;

/// A batched insert request.
pub struct InsertRequest<'a> {
    pub table: &'a mut dyn Table,
    pub source: WriteSource<'a>,
    pub options: InsertOptions,
}

/// A replace/update request.
pub struct ReplaceRequest<'a> {
    pub target: ReplaceTarget<'a>,
    pub transform: &'a dyn WriteFunction,
    pub options: ReplaceOptions,
}

/// A per-row side-effect aggregation request.
pub struct ForeachRequest<'a> {
    pub rows: &'a mut dyn DatumStream,
    pub func: &'a dyn WriteFunction,
}

/// A validated write request.
pub enum WriteRequest<'a> {
    Insert(InsertRequest<'a>),
    Replace(ReplaceRequest<'a>),
    Foreach(ForeachRequest<'a>),
}

impl WriteRequest<'_> {
    /// Evaluate the request to its stats object.
    pub fn evaluate(self, env: &WriteEnv) -> WriteResult<Datum> {
        match self {
            WriteRequest::Insert(req) => {
                ops::execute_insert(env, req.table, req.source, &req.options)
            }
            WriteRequest::Replace(req) => {
                ops::execute_replace(env, req.target, req.transform, &req.options)
            }
            WriteRequest::Foreach(req) => ops::execute_foreach(env, req.rows, req.func),
        }
    }
}
