use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{
        AddImageRequest, CreateProductRequest, ImagesResponse, Product, ProductQuery,
        RemoveImageRequest, ReorderImagesRequest,
    },
    queries::product_queries,
};

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = product_queries::list_products(&state.db, params).await?;

    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let product = product_queries::find_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound("Producto no encontrado.".to_string()))?;

    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    let new_product = payload.validate()?;
    let product = product_queries::create_product(&state.db, &new_product).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if !product_queries::delete_product(&state.db, &id).await? {
        return Err(AppError::NotFound("Producto no encontrado.".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AddImageRequest>,
) -> Result<Json<ImagesResponse>> {
    let url = payload
        .url
        .ok_or_else(|| AppError::BadRequest("Se requiere { url }.".to_string()))?;

    let images = product_queries::add_image(&state.db, &id, &url)
        .await?
        .ok_or(AppError::NotFound("Producto no encontrado.".to_string()))?;

    Ok(Json(ImagesResponse { images }))
}

pub async fn remove_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<RemoveImageRequest>,
) -> Result<Json<ImagesResponse>> {
    let images = match (payload.url, payload.index) {
        (Some(url), _) => product_queries::remove_image_by_url(&state.db, &id, &url).await?,
        (None, Some(index)) => {
            let index = i32::try_from(index).ok().filter(|i| *i >= 0).ok_or_else(|| {
                AppError::BadRequest("\"index\" debe ser un entero ≥ 0.".to_string())
            })?;
            product_queries::remove_image_by_index(&state.db, &id, index).await?
        }
        (None, None) => {
            return Err(AppError::BadRequest(
                "Se requiere { url } o { index }.".to_string(),
            ));
        }
    };

    let images = images.ok_or(AppError::NotFound("Producto no encontrado.".to_string()))?;

    Ok(Json(ImagesResponse { images }))
}

pub async fn reorder_images(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ReorderImagesRequest>,
) -> Result<Json<ImagesResponse>> {
    let images = payload
        .images
        .ok_or_else(|| AppError::BadRequest("Se requiere { images: [] }.".to_string()))?;

    let images = product_queries::replace_images(&state.db, &id, &images)
        .await?
        .ok_or(AppError::NotFound("Producto no encontrado.".to_string()))?;

    Ok(Json(ImagesResponse { images }))
}
