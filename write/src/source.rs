//! Literal-or-stream batch source.

use vellum_core::Datum;
use vellum_table::{BatchSpec, DatumStream, TableResult};

/// Adapts either one literal document or a lazy stream into a uniform
/// sequence of bounded batches. A literal document yields exactly one
/// batch of size 1, bypassing stream machinery for the common case.
pub struct WriteSource<'a> {
    repr: Repr<'a>,
}

enum Repr<'a> {
    Literal(Option<Datum>),
    Stream(&'a mut dyn DatumStream),
}

impl<'a> WriteSource<'a> {
    pub fn literal(doc: Datum) -> WriteSource<'a> {
        WriteSource {
            repr: Repr::Literal(Some(doc)),
        }
    }

    pub fn stream(stream: &'a mut dyn DatumStream) -> WriteSource<'a> {
        WriteSource {
            repr: Repr::Stream(stream),
        }
    }

    /// The literal document, when this source is one and it has not been
    /// consumed yet.
    pub(crate) fn literal_doc(&self) -> Option<&Datum> {
        match &self.repr {
            Repr::Literal(slot) => slot.as_ref(),
            Repr::Stream(_) => None,
        }
    }

    /// Pull the next batch; empty means exhausted.
    pub(crate) fn next_batch(&mut self, spec: &BatchSpec) -> TableResult<Vec<Datum>> {
        match &mut self.repr {
            Repr::Literal(slot) => Ok(slot.take().into_iter().collect()),
            Repr::Stream(stream) => stream.next_batch(spec),
        }
    }
}
