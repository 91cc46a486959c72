use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::header,
    response::IntoResponse,
};

use bytes::Bytes;

use crate::{
    adapters::inbound::http::{
        dto::{IdProofUploadResponseDto, RecordDto},
        handlers::{ApiError, bad_request, record_error},
        router::EntityServices,
    },
    domain::{
        models::{AttachmentUpload, EntityDetails},
        value_objects::Identifier,
    },
};

/// Multipart fields accepted for an identity proof
pub const ID_PROOF_FIELDS: [&str; 2] = ["image", "file"];

/// Handle identity-proof upload
pub async fn upload_id_proof<D: EntityDetails>(
    State(services): State<EntityServices<D>>,
    Path(identifier): Path<Identifier>,
    mut multipart: Multipart,
) -> Result<Json<IdProofUploadResponseDto>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(&format!("Malformed multipart body: {}", e)))?
    {
        if !field.name().is_some_and(|name| ID_PROOF_FIELDS.contains(&name)) {
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let original_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| bad_request(&format!("Failed to read uploaded file: {}", e)))?;

        let mut upload = AttachmentUpload::new(bytes.to_vec(), content_type);
        upload.original_name = original_name.clone();

        let record = services
            .attachments
            .upload(identifier, upload)
            .await
            .map_err(record_error)?;

        return Ok(Json(IdProofUploadResponseDto {
            message: "ID proof uploaded successfully".to_string(),
            original_name,
            content_type: record.attachment.content_type.as_mime().to_string(),
            size: record.attachment.size,
            etag: record.attachment.etag,
            revision: record.attachment.revision,
        }));
    }

    Err(bad_request("No file uploaded"))
}

/// Handle identity-proof download; responds with the raw bytes
pub async fn download_id_proof<D: EntityDetails>(
    State(services): State<EntityServices<D>>,
    Path(identifier): Path<Identifier>,
) -> Result<impl IntoResponse, ApiError> {
    let content = services
        .attachments
        .get(identifier)
        .await
        .map_err(record_error)?;

    let etag = content
        .etag
        .map(|etag| format!("\"{}\"", etag))
        .unwrap_or_default();

    Ok((
        [
            (header::CONTENT_TYPE, content.content_type.as_mime().to_string()),
            (header::ETAG, etag),
        ],
        Bytes::from(content.bytes),
    ))
}

/// Handle identity-proof removal
pub async fn clear_id_proof<D: EntityDetails>(
    State(services): State<EntityServices<D>>,
    Path(identifier): Path<Identifier>,
) -> Result<Json<RecordDto<D>>, ApiError> {
    let record = services
        .attachments
        .clear(identifier)
        .await
        .map_err(record_error)?;
    Ok(Json(record.into()))
}
