//! Policy values of the table mutation contract.
//!
//! Parsing of the request-option strings lives in the write crate; these
//! are the validated values a table call receives.

/// How an insert resolves a document whose primary key already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Report the collision as a per-document error.
    #[default]
    Error,
    /// Overwrite the stored document.
    Replace,
    /// Deep-merge the new document into the stored one.
    Update,
}

/// Requested persistence strength for a write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Durability {
    /// Whatever the table is configured with.
    #[default]
    Default,
    /// Acknowledge only after the write is durable.
    Hard,
    /// Acknowledge from memory.
    Soft,
}

/// Whether per-document before/after records are attached to write stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReturnChanges {
    #[default]
    No,
    /// Record documents that actually changed.
    Yes,
    /// Record every document, unchanged ones included.
    Always,
}
