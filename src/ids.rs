//! Identifier sources for nodes synthesized during Markdown parsing.
//!
//! Task lists and task items need a `localId`. The source is passed into
//! every parse so tests can use [`SequentialIds`] and get stable output.

use uuid::Uuid;

/// Produces unique identifiers on demand.
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs, for documents sent back to the remote store.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `prefix-1`, `prefix-2`, ... identifiers.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

impl<F> IdSource for F
where
    F: FnMut() -> String,
{
    fn next_id(&mut self) -> String {
        self()
    }
}
