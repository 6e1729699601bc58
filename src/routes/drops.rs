use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{CreateDropRequest, Drop, UpdateDropRequest},
    queries::drop_queries,
};

pub async fn list_drops(State(state): State<AppState>) -> Result<Json<Vec<Drop>>> {
    let drops = drop_queries::list_drops(&state.db, false).await?;

    Ok(Json(drops))
}

pub async fn list_all_drops(State(state): State<AppState>) -> Result<Json<Vec<Drop>>> {
    let drops = drop_queries::list_drops(&state.db, true).await?;

    Ok(Json(drops))
}

pub async fn get_drop(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Drop>> {
    let drop = drop_queries::find_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound("Drop no encontrado.".to_string()))?;

    Ok(Json(drop))
}

pub async fn create_drop(
    State(state): State<AppState>,
    Json(payload): Json<CreateDropRequest>,
) -> Result<(StatusCode, Json<Drop>)> {
    if payload.id.is_none()
        || payload.number.is_none()
        || payload.label.is_none()
        || payload.tagline.is_none()
        || payload.description.is_none()
        || payload.hero_image.is_none()
        || payload.release_date.is_none()
    {
        return Err(AppError::BadRequest(
            "Faltan campos obligatorios.".to_string(),
        ));
    }

    let drop = drop_queries::create_drop(&state.db, &payload).await?;

    Ok((StatusCode::CREATED, Json(drop)))
}

pub async fn update_drop(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateDropRequest>,
) -> Result<Json<Drop>> {
    let drop = drop_queries::update_drop(&state.db, &id, &payload)
        .await?
        .ok_or(AppError::NotFound("Drop no encontrado.".to_string()))?;

    Ok(Json(drop))
}

pub async fn delete_drop(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if !drop_queries::delete_drop(&state.db, &id).await? {
        return Err(AppError::NotFound("Drop no encontrado.".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
