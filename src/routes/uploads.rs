use axum::{
    Json,
    extract::{Multipart, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState,
    error::{AppError, Result},
    services::cloudinary_service::{self, UploadedImage},
};

/// Oversized uploads are rejected here, before contacting Cloudinary.
const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

pub async fn status() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<Vec<u8>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Archivo inválido: {}", e)))?
    {
        if field.name() == Some("file") {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Archivo inválido: {}", e)))?;
            return Ok(data.to_vec());
        }
    }

    Err(AppError::BadRequest(
        "Se requiere un archivo \"file\".".to_string(),
    ))
}

async fn upload_to_folder(
    state: &AppState,
    folder: &str,
    multipart: &mut Multipart,
) -> Result<Json<UploadedImage>> {
    let bytes = read_file_field(multipart).await?;

    if bytes.len() > MAX_FILE_SIZE {
        return Err(AppError::BadRequest(
            "La imagen supera el tamaño máximo de 10MB.".to_string(),
        ));
    }

    let uploaded = state.cloudinary.upload_image(folder, bytes).await?;

    Ok(Json(uploaded))
}

pub async fn upload_product_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadedImage>> {
    upload_to_folder(&state, cloudinary_service::PRODUCT_FOLDER, &mut multipart).await
}

pub async fn upload_drop_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadedImage>> {
    upload_to_folder(&state, cloudinary_service::DROP_FOLDER, &mut multipart).await
}

#[derive(Debug, Deserialize)]
pub struct DeleteUploadRequest {
    #[serde(rename = "publicId")]
    pub public_id: Option<String>,
}

pub async fn delete_image(
    State(state): State<AppState>,
    Json(payload): Json<DeleteUploadRequest>,
) -> Result<impl IntoResponse> {
    let public_id = payload
        .public_id
        .ok_or_else(|| AppError::BadRequest("publicId requerido".to_string()))?;

    state.cloudinary.destroy(&public_id).await?;

    Ok(Json(json!({ "ok": true })))
}
