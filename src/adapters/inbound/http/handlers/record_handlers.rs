use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    adapters::inbound::http::{
        dto::{RecordDto, SuccessResponseDto},
        handlers::{ApiError, record_error},
        router::EntityServices,
    },
    domain::{models::EntityDetails, value_objects::Identifier},
};

/// Handle listing all records of a kind
pub async fn list_records<D: EntityDetails>(
    State(services): State<EntityServices<D>>,
) -> Result<Json<Vec<RecordDto<D>>>, ApiError> {
    let records = services.records.list().await.map_err(record_error)?;
    Ok(Json(records.into_iter().map(RecordDto::from).collect()))
}

/// Handle record creation
pub async fn create_record<D: EntityDetails>(
    State(services): State<EntityServices<D>>,
    Json(draft): Json<D::Draft>,
) -> Result<(StatusCode, Json<RecordDto<D>>), ApiError> {
    let record = services.records.create(draft).await.map_err(record_error)?;
    Ok((StatusCode::CREATED, Json(record.without_attachment_data().into())))
}

/// Handle record retrieval
pub async fn get_record<D: EntityDetails>(
    State(services): State<EntityServices<D>>,
    Path(identifier): Path<Identifier>,
) -> Result<Json<RecordDto<D>>, ApiError> {
    let record = services
        .records
        .get(identifier)
        .await
        .map_err(record_error)?;
    Ok(Json(record.into()))
}

/// Handle full replacement of record details
pub async fn update_record<D: EntityDetails>(
    State(services): State<EntityServices<D>>,
    Path(identifier): Path<Identifier>,
    Json(draft): Json<D::Draft>,
) -> Result<Json<RecordDto<D>>, ApiError> {
    let record = services
        .records
        .update(identifier, draft)
        .await
        .map_err(record_error)?;
    Ok(Json(record.into()))
}

/// Handle partial update of record details
pub async fn partial_update_record<D: EntityDetails>(
    State(services): State<EntityServices<D>>,
    Path(identifier): Path<Identifier>,
    Json(patch): Json<D::Patch>,
) -> Result<Json<RecordDto<D>>, ApiError> {
    let record = services
        .records
        .partial_update(identifier, patch)
        .await
        .map_err(record_error)?;
    Ok(Json(record.into()))
}

/// Handle record deletion
pub async fn delete_record<D: EntityDetails>(
    State(services): State<EntityServices<D>>,
    Path(identifier): Path<Identifier>,
) -> Result<Json<SuccessResponseDto>, ApiError> {
    services
        .records
        .delete(identifier)
        .await
        .map_err(record_error)?;

    Ok(Json(SuccessResponseDto::new(&format!(
        "{} {} deleted successfully",
        D::KIND.title(),
        identifier
    ))))
}
