use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Inventory for one (size, color) combination of a product.
#[derive(Debug, Clone, Serialize)]
pub struct SizeStock {
    pub size: String,
    pub color: Option<String>,
    pub quantity: i32,
    pub reserved: i32,
    pub available: i32,
}

impl SizeStock {
    pub fn new(size: String, color: Option<String>, quantity: i32, reserved: i32) -> Self {
        Self {
            size,
            color,
            quantity,
            reserved,
            available: (quantity - reserved).max(0),
        }
    }
}

/// Canonical per-product stock shape returned to callers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStock {
    pub product_id: String,
    pub product_name: String,
    pub sizes: Vec<SizeStock>,
    pub total_available: i32,
}

impl ProductStock {
    pub fn new(product_id: String, product_name: String, mut sizes: Vec<SizeStock>) -> Self {
        sizes.sort_by(|a, b| compare_sizes(&a.size, &b.size));
        let total_available = sizes.iter().map(|s| s.available).sum();
        Self {
            product_id,
            product_name,
            sizes,
            total_available,
        }
    }
}

const LETTER_SIZE_ORDER: [&str; 7] = ["XS", "S", "M", "L", "XL", "XXL", "XXXL"];

/// Size ordering: numeric sizes ascending first, then the fixed letter
/// vocabulary (XS..XXXL, case-insensitive), then everything else
/// lexicographically.
pub fn compare_sizes(a: &str, b: &str) -> Ordering {
    let num_a = a.parse::<f64>().ok().filter(|n| n.is_finite());
    let num_b = b.parse::<f64>().ok().filter(|n| n.is_finite());

    match (num_a, num_b) {
        (Some(x), Some(y)) => return x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => return Ordering::Less,
        (None, Some(_)) => return Ordering::Greater,
        (None, None) => {}
    }

    let idx_a = LETTER_SIZE_ORDER
        .iter()
        .position(|s| s.eq_ignore_ascii_case(a));
    let idx_b = LETTER_SIZE_ORDER
        .iter()
        .position(|s| s.eq_ignore_ascii_case(b));

    match (idx_a, idx_b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStockRequest {
    pub size: Option<String>,
    pub quantity: Option<i64>,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceStockRequest {
    pub sizes: Option<Vec<ReplaceStockEntry>>,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceStockEntry {
    pub size: Option<String>,
    pub quantity: Option<i64>,
    pub color: Option<String>,
}

/// Validated before any storage call: non-empty size, integer quantity ≥ 0.
pub fn validate_stock_entry(size: Option<&str>, quantity: Option<i64>) -> Result<(String, i32)> {
    let size = size
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("Se requieren \"size\" y \"quantity\".".to_string()))?;

    let quantity = quantity
        .ok_or_else(|| AppError::BadRequest("Se requieren \"size\" y \"quantity\".".to_string()))?;

    if quantity < 0 || quantity > i32::MAX as i64 {
        return Err(AppError::BadRequest(
            "\"quantity\" debe ser un entero ≥ 0.".to_string(),
        ));
    }

    Ok((size.to_string(), quantity as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut sizes: Vec<&str>) -> Vec<String> {
        sizes.sort_by(|a, b| compare_sizes(a, b));
        sizes.into_iter().map(String::from).collect()
    }

    #[test]
    fn numeric_sizes_precede_letter_sizes() {
        assert_eq!(sorted(vec!["L", "36", "XS", "42"]), ["36", "42", "XS", "L"]);
    }

    #[test]
    fn letter_sizes_follow_fixed_vocabulary() {
        assert_eq!(
            sorted(vec!["XXL", "M", "XS", "XXXL", "S", "XL", "L"]),
            ["XS", "S", "M", "L", "XL", "XXL", "XXXL"]
        );
    }

    #[test]
    fn letter_sizes_are_case_insensitive() {
        assert_eq!(sorted(vec!["m", "xs", "L"]), ["xs", "m", "L"]);
    }

    #[test]
    fn unknown_sizes_sort_last_lexicographically() {
        assert_eq!(
            sorted(vec!["UNICO", "M", "38", "CUSTOM"]),
            ["38", "M", "CUSTOM", "UNICO"]
        );
    }

    #[test]
    fn available_never_negative() {
        let s = SizeStock::new("M".to_string(), None, 2, 5);
        assert_eq!(s.available, 0);

        let s = SizeStock::new("M".to_string(), None, 5, 2);
        assert_eq!(s.available, 3);
    }

    #[test]
    fn total_available_sums_sizes() {
        let stock = ProductStock::new(
            "hoodie-01".to_string(),
            "Hoodie".to_string(),
            vec![
                SizeStock::new("M".to_string(), None, 3, 1),
                SizeStock::new("L".to_string(), None, 4, 0),
            ],
        );
        assert_eq!(stock.total_available, 6);
    }

    #[test]
    fn rejects_missing_or_negative_quantity() {
        assert!(validate_stock_entry(Some("M"), None).is_err());
        assert!(validate_stock_entry(Some("M"), Some(-1)).is_err());
        assert!(validate_stock_entry(None, Some(3)).is_err());
        assert!(validate_stock_entry(Some("  "), Some(3)).is_err());
        assert_eq!(
            validate_stock_entry(Some("M"), Some(3)).unwrap(),
            ("M".to_string(), 3)
        );
    }
}
