//! Document streams and batch bounds.

use vellum_core::{Datum, DatumResult};

use crate::error::TableResult;

/// Bounds how many documents a single stream pull may yield.
///
/// Write execution consumes terminal batches: each pull is an atomic
/// consumption unit, never interrupted mid-batch, and the same spec is the
/// atomic unit size for one table call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSpec {
    max_rows: usize,
}

impl BatchSpec {
    pub const DEFAULT_MAX_ROWS: usize = 256;

    /// The terminal batch bound write execution uses.
    pub fn terminal() -> Self {
        Self {
            max_rows: Self::DEFAULT_MAX_ROWS,
        }
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows.max(1);
        self
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }
}

impl Default for BatchSpec {
    fn default() -> Self {
        Self::terminal()
    }
}

/// A key-extraction transform pushed ahead of stream consumption: rows
/// pulled after attachment are replaced by the named field's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    field: String,
}

impl Projection {
    pub fn field(name: impl Into<String>) -> Self {
        Self { field: name.into() }
    }

    pub fn field_name(&self) -> &str {
        &self.field
    }

    /// Apply to one row.
    pub fn apply(&self, row: &Datum) -> DatumResult<Datum> {
        row.field(&self.field).cloned()
    }
}

/// A lazy source of documents consumed in bounded batches.
pub trait DatumStream {
    /// Pull the next batch. An empty batch means the stream is exhausted.
    fn next_batch(&mut self, spec: &BatchSpec) -> TableResult<Vec<Datum>>;

    /// Pull a single document.
    fn next(&mut self) -> TableResult<Option<Datum>>;

    /// Push a key-extraction transform ahead of consumption.
    fn add_projection(&mut self, projection: Projection);
}

/// An in-memory stream over a fixed sequence of documents.
pub struct VecStream {
    rows: std::vec::IntoIter<Datum>,
    projections: Vec<Projection>,
}

impl VecStream {
    pub fn new(rows: Vec<Datum>) -> Self {
        Self {
            rows: rows.into_iter(),
            projections: Vec::new(),
        }
    }

    /// Projections attached so far, in attachment order.
    pub fn projections(&self) -> &[Projection] {
        &self.projections
    }

    fn project(&self, row: Datum) -> DatumResult<Datum> {
        let mut row = row;
        for projection in &self.projections {
            row = projection.apply(&row)?;
        }
        Ok(row)
    }
}

impl DatumStream for VecStream {
    fn next_batch(&mut self, spec: &BatchSpec) -> TableResult<Vec<Datum>> {
        let mut batch = Vec::with_capacity(spec.max_rows());
        while batch.len() < spec.max_rows() {
            match self.rows.next() {
                Some(row) => batch.push(self.project(row)?),
                None => break,
            }
        }
        Ok(batch)
    }

    fn next(&mut self) -> TableResult<Option<Datum>> {
        match self.rows.next() {
            Some(row) => Ok(Some(self.project(row)?)),
            None => Ok(None),
        }
    }

    fn add_projection(&mut self, projection: Projection) {
        self.projections.push(projection);
    }
}
