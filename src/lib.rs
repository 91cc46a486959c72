pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - records, value objects and errors
pub use domain::{
    // Errors
    AttachmentError,
    ErrorKind,
    RecordError,
    RecordResult,
    StoreError,
    StoreResult,
    ValidationError,
    // Models
    Attachment,
    AttachmentContent,
    AttachmentType,
    AttachmentUpload,
    BulkDeleteReport,
    BulkUpdateItem,
    BulkUpdateReport,
    EntityDetails,
    EntityKind,
    ItemFailure,
    Package,
    PackageDetails,
    PackageDraft,
    PackagePatch,
    PackageStatus,
    Recipient,
    RecipientDetails,
    RecipientDraft,
    RecipientPatch,
    Record,
    // Value objects
    Identifier,
    IdentifierBlock,
    RecordKey,
};

// Port types - interfaces for external systems
pub use ports::{AttachmentService, BulkService, DocumentStore, RecordService, ReferenceResolver};

// Service implementations - business logic
pub use services::{
    AllocatorConfig, AttachmentServiceImpl, BulkServiceImpl, RecordServiceImpl, SequenceAllocator,
};

// Application factory and configuration
pub use app::{
    AppBuilder, AppConfig, AppDependencies, AppError, AppServices, RepositoryBackend,
    create_app_from_env, create_in_memory_app, create_sqlite_app,
};

// Adapter types - infrastructure implementations
pub use adapters::inbound::http::router::{AppState, create_router};
pub use adapters::outbound::persistence::{
    InMemoryDocumentStore, SqlDocumentStore, StoreReferenceResolver,
};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        AppBuilder, AppServices, AttachmentService, AttachmentUpload, BulkService,
        DocumentStore, Identifier, InMemoryDocumentStore, PackageDraft, PackagePatch,
        PackageStatus, RecipientDraft, RecipientPatch, RecordError, RecordKey, RecordService,
        SqlDocumentStore, create_in_memory_app, create_sqlite_app,
    };
}
