mod attachment_service;
mod bulk_service;
mod record_service;

pub use attachment_service::AttachmentService;
pub use bulk_service::BulkService;
pub use record_service::RecordService;
