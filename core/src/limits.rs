//! Configured limits for write execution.

const DEFAULT_LIMIT: usize = 100_000;

/// Size bounds a request runs under.
///
/// `array_size_limit` bounds arrays produced by merging (change records and
/// the like); `max_generated_keys` caps how many generated primary keys are
/// reported back per request. Documents past the cap still get a key, the
/// key just goes unreported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    array_size_limit: usize,
    max_generated_keys: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            array_size_limit: DEFAULT_LIMIT,
            max_generated_keys: DEFAULT_LIMIT,
        }
    }
}

impl Limits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_array_size_limit(mut self, limit: usize) -> Self {
        self.array_size_limit = limit;
        self
    }

    pub fn with_max_generated_keys(mut self, limit: usize) -> Self {
        self.max_generated_keys = limit;
        self
    }

    pub fn array_size_limit(&self) -> usize {
        self.array_size_limit
    }

    pub fn max_generated_keys(&self) -> usize {
        self.max_generated_keys
    }
}
