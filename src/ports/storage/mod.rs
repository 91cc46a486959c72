mod document_store;
mod reference_resolver;

pub use document_store::DocumentStore;
pub use reference_resolver::ReferenceResolver;
