//! Per-request write environment.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use vellum_core::Limits;
use vellum_table::BatchSpec;

use crate::keygen::{KeySource, UuidKeys};

/// Cooperative cancellation flag, checked at batch boundaries only. A
/// tripped flag stops the batch loop; stats from completed batches remain
/// the result.
#[derive(Debug, Clone, Default)]
pub struct Interruptor(Arc<AtomicBool>);

impl Interruptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the running write to stop at its next batch boundary.
    pub fn interrupt(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_interrupted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Environment owned by one executing write request: limits, the batch
/// bound, the key source and the interrupt flag.
pub struct WriteEnv {
    limits: Limits,
    batch: BatchSpec,
    keys: Box<dyn KeySource>,
    interruptor: Interruptor,
}

impl Default for WriteEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteEnv {
    pub fn new() -> Self {
        Self {
            limits: Limits::default(),
            batch: BatchSpec::terminal(),
            keys: Box::new(UuidKeys),
            interruptor: Interruptor::new(),
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_batch_spec(mut self, batch: BatchSpec) -> Self {
        self.batch = batch;
        self
    }

    pub fn with_key_source(mut self, keys: impl KeySource + 'static) -> Self {
        self.keys = Box::new(keys);
        self
    }

    pub fn with_interruptor(mut self, interruptor: Interruptor) -> Self {
        self.interruptor = interruptor;
        self
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn batch_spec(&self) -> &BatchSpec {
        &self.batch
    }

    /// A handle onto this request's interrupt flag.
    pub fn interruptor(&self) -> Interruptor {
        self.interruptor.clone()
    }

    pub(crate) fn fresh_key(&self) -> String {
        self.keys.fresh_key()
    }

    pub(crate) fn interrupted(&self) -> bool {
        self.interruptor.is_interrupted()
    }
}
