use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{ProductStock, ReplaceStockRequest, UpdateStockRequest, validate_stock_entry},
    queries::stock_queries,
};

pub async fn list_stock(State(state): State<AppState>) -> Result<Json<Vec<ProductStock>>> {
    let stock = stock_queries::list_all(&state.db).await?;

    Ok(Json(stock))
}

pub async fn get_stock(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<ProductStock>> {
    let stock = stock_queries::get_for_product(&state.db, &product_id)
        .await?
        .ok_or(AppError::NotFound(
            "Producto no encontrado en stock.".to_string(),
        ))?;

    Ok(Json(stock))
}

pub async fn update_stock(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(payload): Json<UpdateStockRequest>,
) -> Result<Json<ProductStock>> {
    let (size, quantity) = validate_stock_entry(payload.size.as_deref(), payload.quantity)?;

    stock_queries::upsert_one(
        &state.db,
        &product_id,
        &size,
        payload.color.as_deref(),
        quantity,
    )
    .await?;

    let stock = stock_queries::get_for_product(&state.db, &product_id)
        .await?
        .ok_or(AppError::NotFound(
            "Producto no encontrado en stock.".to_string(),
        ))?;

    Ok(Json(stock))
}

pub async fn replace_stock(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(payload): Json<ReplaceStockRequest>,
) -> Result<Json<ProductStock>> {
    let sizes = payload.sizes.unwrap_or_default();
    if sizes.is_empty() {
        return Err(AppError::BadRequest(
            "\"sizes\" debe ser un array no vacío.".to_string(),
        ));
    }

    // every element validated before any mutation
    let mut entries = Vec::with_capacity(sizes.len());
    for entry in sizes {
        let (size, quantity) = validate_stock_entry(entry.size.as_deref(), entry.quantity)
            .map_err(|_| {
                AppError::BadRequest(
                    "Cada talla requiere \"size\" (string) y \"quantity\" (entero ≥ 0)."
                        .to_string(),
                )
            })?;
        entries.push((size, entry.color, quantity));
    }

    stock_queries::replace_all(&state.db, &product_id, &entries).await?;

    let stock = stock_queries::get_for_product(&state.db, &product_id)
        .await?
        .ok_or(AppError::NotFound(
            "Producto no encontrado en stock.".to_string(),
        ))?;

    Ok(Json(stock))
}
