mod in_memory_document_store;
mod sql_document_store;
mod store_reference_resolver;

pub use in_memory_document_store::InMemoryDocumentStore;
pub use sql_document_store::SqlDocumentStore;
pub use store_reference_resolver::StoreReferenceResolver;
