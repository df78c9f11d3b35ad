//! Built-in node type handlers.
//!
//! Each submodule contributes the handlers for one family of node types;
//! [`register_defaults`] installs all of them.

mod blocks;
mod containers;
mod inline;
mod lists;
mod table;
mod tasks;

pub use containers::NESTED_EXPAND;
pub use tasks::{STATE_DECIDED, STATE_DONE, STATE_TODO};

use crate::registry::ComponentRegistry;

/// Register every built-in handler, replacing any existing ones.
pub fn register_defaults(registry: &mut ComponentRegistry) {
    let handlers = blocks::handlers()
        .into_iter()
        .chain(inline::handlers())
        .chain(lists::handlers())
        .chain(tasks::handlers())
        .chain(table::handlers())
        .chain(containers::handlers());
    for handler in handlers {
        registry.register(handler);
    }
    tracing::trace!(count = registry.node_types().len(), "registered built-in handlers");
}
