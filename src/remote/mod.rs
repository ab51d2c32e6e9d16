//! Remote override store for the `translations` table.

/// In-process store
mod memory;
/// REST (PostgREST-compatible) store
mod rest;
/// Row and error types
mod types;

pub use memory::MemoryTranslationStore;
pub use rest::RestTranslationStore;
pub use types::{
    RemoteOverrideRow,
    StoreError,
    TranslationStore,
};
