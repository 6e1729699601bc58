use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductColor {
    pub name: String,
    pub hex: String,
}

/// One (size, color) inventory entry as embedded in product payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductStockEntry {
    pub size: String,
    pub color: Option<String>,
    pub stock: i32,
}

/// Product row with its aggregated colors and stock, as served to clients.
/// Storage names are snake_case; the JSON boundary is camelCase.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub cat: String,
    #[serde(rename = "drop")]
    #[sqlx(rename = "drop")]
    pub drop_id: String,
    pub price: Decimal,
    pub original_price: Decimal,
    pub is_new: bool,
    pub is_sale: bool,
    pub images: Vec<String>,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub colors: Json<Vec<ProductColor>>,
    pub stock: Json<Vec<ProductStockEntry>>,
}

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub drop: Option<String>,
    pub cat: Option<String>,
}

/// Required fields are Option so their absence maps to a 400 instead of a
/// deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub cat: Option<String>,
    #[serde(rename = "drop")]
    pub drop_id: Option<String>,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    #[serde(default)]
    pub is_new: bool,
    #[serde(default)]
    pub is_sale: bool,
    #[serde(default)]
    pub images: Vec<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub colors: Vec<ProductColor>,
    pub sizes: Option<Vec<String>>,
}

/// Sizes seeded with zero stock when the caller does not supply a list.
pub const DEFAULT_SIZES: [&str; 4] = ["S", "M", "L", "XL"];

impl CreateProductRequest {
    pub fn validate(self) -> Result<NewProduct> {
        let (Some(id), Some(name), Some(cat), Some(drop_id), Some(price), Some(original_price)) = (
            self.id,
            self.name,
            self.cat,
            self.drop_id,
            self.price,
            self.original_price,
        ) else {
            return Err(AppError::BadRequest(
                "Campos requeridos: id, name, cat, drop, price, originalPrice.".to_string(),
            ));
        };

        Ok(NewProduct {
            id,
            name,
            cat,
            drop_id,
            price,
            original_price,
            is_new: self.is_new,
            is_sale: self.is_sale,
            images: self.images,
            description: self.description,
            colors: self.colors,
            sizes: self
                .sizes
                .unwrap_or_else(|| DEFAULT_SIZES.iter().map(|s| s.to_string()).collect()),
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub id: String,
    pub name: String,
    pub cat: String,
    pub drop_id: String,
    pub price: Decimal,
    pub original_price: Decimal,
    pub is_new: bool,
    pub is_sale: bool,
    pub images: Vec<String>,
    pub description: Option<String>,
    pub colors: Vec<ProductColor>,
    pub sizes: Vec<String>,
}

impl NewProduct {
    /// Zero-quantity (size, color) rows to seed: one per size when there are
    /// no colors, one per size×color otherwise. The empty string is the
    /// "no color" sentinel used by the stock table.
    pub fn stock_seed(&self) -> Vec<(String, String)> {
        let color_names: Vec<String> = if self.colors.is_empty() {
            vec![String::new()]
        } else {
            self.colors.iter().map(|c| c.name.clone()).collect()
        };

        let mut seed = Vec::with_capacity(self.sizes.len() * color_names.len());
        for size in &self.sizes {
            for color in &color_names {
                seed.push((size.clone(), color.clone()));
            }
        }
        seed
    }
}

#[derive(Debug, Deserialize)]
pub struct AddImageRequest {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveImageRequest {
    pub url: Option<String>,
    pub index: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderImagesRequest {
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct ImagesResponse {
    pub images: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn request(colors: Vec<ProductColor>, sizes: Option<Vec<String>>) -> CreateProductRequest {
        CreateProductRequest {
            id: Some("hoodie-01".to_string()),
            name: Some("Hoodie".to_string()),
            cat: Some("hoodies".to_string()),
            drop_id: Some("drop01".to_string()),
            price: Some(Decimal::new(45000, 2)),
            original_price: Some(Decimal::new(52000, 2)),
            is_new: true,
            is_sale: false,
            images: vec![],
            description: None,
            colors,
            sizes,
        }
    }

    #[test]
    fn seeds_one_row_per_size_without_colors() {
        let product = request(vec![], None).validate().unwrap();
        let seed = product.stock_seed();
        assert_eq!(seed.len(), DEFAULT_SIZES.len());
        assert!(seed.iter().all(|(_, color)| color.is_empty()));
    }

    #[test]
    fn seeds_size_cross_color() {
        let colors = vec![
            ProductColor {
                name: "Negro".to_string(),
                hex: "#000000".to_string(),
            },
            ProductColor {
                name: "Crema".to_string(),
                hex: "#e8e4dc".to_string(),
            },
        ];
        let sizes = vec!["M".to_string(), "L".to_string(), "XL".to_string()];
        let product = request(colors, Some(sizes)).validate().unwrap();
        assert_eq!(product.stock_seed().len(), 3 * 2);
    }

    #[test]
    fn missing_required_field_is_a_bad_request() {
        let mut req = request(vec![], None);
        req.price = None;
        assert!(matches!(
            req.validate(),
            Err(crate::error::AppError::BadRequest(_))
        ));
    }
}
