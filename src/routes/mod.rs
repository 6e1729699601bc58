mod checkout;
mod drops;
mod health;
mod products;
mod stock;
mod uploads;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(health::health_check))
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::readiness_check))
        .route(
            "/api/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/products/{id}",
            get(products::get_product).delete(products::delete_product),
        )
        .route(
            "/api/products/{id}/images",
            post(products::add_image)
                .delete(products::remove_image)
                .put(products::reorder_images),
        )
        .route("/api/drops", get(drops::list_drops).post(drops::create_drop))
        .route("/api/drops/admin/all", get(drops::list_all_drops))
        .route(
            "/api/drops/{id}",
            get(drops::get_drop)
                .put(drops::update_drop)
                .delete(drops::delete_drop),
        )
        .route("/api/stock", get(stock::list_stock))
        .route(
            "/api/stock/{product_id}",
            get(stock::get_stock)
                .patch(stock::update_stock)
                .put(stock::replace_stock),
        )
        .route(
            "/api/uploads",
            get(uploads::status).delete(uploads::delete_image),
        )
        .route("/api/uploads/product", post(uploads::upload_product_image))
        .route("/api/uploads/drop", post(uploads::upload_drop_image))
        .route("/api/checkout", post(checkout::create_checkout))
        .route("/api/webhook", post(checkout::webhook))
}
