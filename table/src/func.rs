//! Transform function evaluation.
//!
//! A write function is the compiled per-document function supplied with a
//! replace/update or foreach request. The compiler's determinism verdict
//! travels with it; the write engine gates on that verdict.

use vellum_core::{Datum, DatumResult};

/// A per-document transform or side-effect function.
pub trait WriteFunction {
    /// Apply the function to one document.
    fn call(&self, doc: &Datum) -> DatumResult<Datum>;

    /// Whether the compiler proved this function deterministic.
    fn is_deterministic(&self) -> bool;
}

/// The constant shortcut: a literal replacement document standing in for a
/// function. Always deterministic.
#[derive(Debug, Clone)]
pub struct ConstFn {
    value: Datum,
}

impl ConstFn {
    pub fn new(value: Datum) -> Self {
        Self { value }
    }
}

impl WriteFunction for ConstFn {
    fn call(&self, _doc: &Datum) -> DatumResult<Datum> {
        Ok(self.value.clone())
    }

    fn is_deterministic(&self) -> bool {
        true
    }
}

/// A closure-backed function carrying an explicit determinism verdict.
pub struct MapFn<F> {
    f: F,
    deterministic: bool,
}

impl<F> MapFn<F>
where
    F: Fn(&Datum) -> DatumResult<Datum>,
{
    /// A function the compiler proved deterministic.
    pub fn deterministic(f: F) -> Self {
        Self {
            f,
            deterministic: true,
        }
    }

    /// A function the compiler could not prove deterministic.
    pub fn non_deterministic(f: F) -> Self {
        Self {
            f,
            deterministic: false,
        }
    }
}

impl<F> WriteFunction for MapFn<F>
where
    F: Fn(&Datum) -> DatumResult<Datum>,
{
    fn call(&self, doc: &Datum) -> DatumResult<Datum> {
        (self.f)(doc)
    }

    fn is_deterministic(&self) -> bool {
        self.deterministic
    }
}
