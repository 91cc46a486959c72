mod attachment_service_impl;
mod bulk_service_impl;
mod record_service_impl;
mod sequence_allocator;

pub use attachment_service_impl::AttachmentServiceImpl;
pub use bulk_service_impl::BulkServiceImpl;
pub use record_service_impl::RecordServiceImpl;
pub use sequence_allocator::{
    AllocatorConfig, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_BACKOFF, SequenceAllocator,
};
