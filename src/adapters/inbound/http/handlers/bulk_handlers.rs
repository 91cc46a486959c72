use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};

use crate::{
    adapters::inbound::http::{
        dto::{BulkDeleteRequestDto, BulkDeleteResponseDto, BulkUpdateResponseDto, RecordDto},
        handlers::{ApiError, bad_request, record_error},
        router::EntityServices,
    },
    domain::models::{BulkUpdateItem, EntityDetails},
};

/// Multipart field carrying the JSON file of an import
pub const IMPORT_FIELD: &str = "file";

/// Handle bulk creation from a JSON array of drafts
pub async fn bulk_create<D: EntityDetails>(
    State(services): State<EntityServices<D>>,
    Json(drafts): Json<Vec<D::Draft>>,
) -> Result<(StatusCode, Json<Vec<RecordDto<D>>>), ApiError> {
    let records = services
        .bulk
        .bulk_create(drafts)
        .await
        .map_err(record_error)?;

    Ok((
        StatusCode::CREATED,
        Json(
            records
                .into_iter()
                .map(|record| record.without_attachment_data().into())
                .collect(),
        ),
    ))
}

/// Handle bulk partial update
pub async fn bulk_update<D: EntityDetails>(
    State(services): State<EntityServices<D>>,
    Json(items): Json<Vec<BulkUpdateItem<D::Patch>>>,
) -> Result<Json<BulkUpdateResponseDto>, ApiError> {
    let report = services
        .bulk
        .bulk_update(items)
        .await
        .map_err(record_error)?;
    Ok(Json(report.into()))
}

/// Handle bulk deletion by identifier
pub async fn bulk_delete<D: EntityDetails>(
    State(services): State<EntityServices<D>>,
    Json(request): Json<BulkDeleteRequestDto>,
) -> Result<Json<BulkDeleteResponseDto>, ApiError> {
    let report = services
        .bulk
        .bulk_delete(request.identifiers)
        .await
        .map_err(record_error)?;
    Ok(Json(report.into()))
}

/// Handle import of an uploaded `.json` file
pub async fn import_records<D: EntityDetails>(
    State(services): State<EntityServices<D>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Vec<RecordDto<D>>>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(&format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some(IMPORT_FIELD) {
            continue;
        }

        let is_json = field
            .content_type()
            .is_some_and(|ct| ct.starts_with("application/json"))
            || field
                .file_name()
                .is_some_and(|name| name.to_ascii_lowercase().ends_with(".json"));
        if !is_json {
            return Err(bad_request("Only JSON files are allowed"));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| bad_request(&format!("Failed to read uploaded file: {}", e)))?;

        let records = services
            .bulk
            .import_json(&bytes)
            .await
            .map_err(record_error)?;

        return Ok((
            StatusCode::CREATED,
            Json(
                records
                    .into_iter()
                    .map(|record| record.without_attachment_data().into())
                    .collect(),
            ),
        ));
    }

    Err(bad_request("No file uploaded"))
}
