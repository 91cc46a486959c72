pub mod services;
pub mod storage;

// Re-export all port traits for convenience
pub use services::{AttachmentService, BulkService, RecordService};
pub use storage::{DocumentStore, ReferenceResolver};
