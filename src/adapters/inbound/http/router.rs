use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{
    dto::SuccessResponseDto,
    handlers::{
        bulk_create, bulk_delete, bulk_update, clear_id_proof, create_record, delete_record,
        download_id_proof, get_record, import_records, list_records, partial_update_record,
        update_record, upload_id_proof,
    },
};
use crate::{
    app::AppServices,
    domain::models::{EntityDetails, MAX_ATTACHMENT_SIZE, PackageDetails, RecipientDetails},
    ports::services::{AttachmentService, BulkService, RecordService},
};

/// Body limit for identity-proof uploads; leaves room for multipart framing so
/// oversized files reach validation instead of being cut off
pub const ID_PROOF_BODY_LIMIT: usize = MAX_ATTACHMENT_SIZE as usize + 1024 * 1024;

/// Body limit for JSON imports
pub const IMPORT_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Services for one entity kind
pub struct EntityServices<D: EntityDetails> {
    pub records: Arc<dyn RecordService<D>>,
    pub bulk: Arc<dyn BulkService<D>>,
    pub attachments: Arc<dyn AttachmentService<D>>,
}

impl<D: EntityDetails> Clone for EntityServices<D> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
            bulk: self.bulk.clone(),
            attachments: self.attachments.clone(),
        }
    }
}

/// Application state containing all services
#[derive(Clone)]
pub struct AppState {
    pub recipients: EntityServices<RecipientDetails>,
    pub packages: EntityServices<PackageDetails>,
}

impl From<AppServices> for AppState {
    fn from(services: AppServices) -> Self {
        AppState {
            recipients: EntityServices {
                records: Arc::new(services.recipient_service),
                bulk: Arc::new(services.recipient_bulk_service),
                attachments: Arc::new(services.recipient_attachment_service),
            },
            packages: EntityServices {
                records: Arc::new(services.package_service),
                bulk: Arc::new(services.package_bulk_service),
                attachments: Arc::new(services.package_attachment_service),
            },
        }
    }
}

/// Create the main application router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest(
            "/recipients",
            create_entity_router::<RecipientDetails>().with_state(state.recipients),
        )
        .nest(
            "/packages",
            create_entity_router::<PackageDetails>().with_state(state.packages),
        )
        .layer(TraceLayer::new_for_http())
}

/// Create the router serving one entity kind
pub fn create_entity_router<D: EntityDetails>() -> Router<EntityServices<D>> {
    Router::new()
        .route("/", get(list_records::<D>).post(create_record::<D>))
        .route(
            "/bulk",
            post(bulk_create::<D>)
                .patch(bulk_update::<D>)
                .delete(bulk_delete::<D>),
        )
        .route(
            "/import",
            post(import_records::<D>).layer(DefaultBodyLimit::max(IMPORT_BODY_LIMIT)),
        )
        .route(
            "/{id}",
            get(get_record::<D>)
                .put(update_record::<D>)
                .patch(partial_update_record::<D>)
                .delete(delete_record::<D>),
        )
        .route(
            "/{id}/id-proof",
            post(upload_id_proof::<D>)
                .get(download_id_proof::<D>)
                .delete(clear_id_proof::<D>)
                .layer(DefaultBodyLimit::max(ID_PROOF_BODY_LIMIT)),
        )
}

async fn health() -> Json<SuccessResponseDto> {
    Json(SuccessResponseDto::new("ok"))
}
