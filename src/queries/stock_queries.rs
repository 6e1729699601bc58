use std::collections::HashMap;

use sqlx::PgPool;

use crate::{
    error::{AppError, Result, is_foreign_key_violation},
    models::{ProductStock, SizeStock},
};

#[derive(Debug, sqlx::FromRow)]
struct StockRow {
    product_id: String,
    product_name: String,
    size: String,
    color: String,
    quantity: i32,
    reserved: i32,
}

impl StockRow {
    fn into_size_stock(self) -> SizeStock {
        let color = (!self.color.is_empty()).then_some(self.color);
        SizeStock::new(self.size, color, self.quantity, self.reserved)
    }
}

/// Rows come back ordered by product, so grouping is a sequential fold.
fn group_rows(rows: Vec<StockRow>) -> Vec<ProductStock> {
    let mut result: Vec<ProductStock> = Vec::new();
    let mut current: Option<(String, String, Vec<SizeStock>)> = None;

    for row in rows {
        let same_product = current
            .as_ref()
            .is_some_and(|(product_id, _, _)| *product_id == row.product_id);

        if same_product {
            if let Some((_, _, sizes)) = current.as_mut() {
                sizes.push(row.into_size_stock());
            }
        } else {
            if let Some((id, name, sizes)) = current.take() {
                result.push(ProductStock::new(id, name, sizes));
            }
            let id = row.product_id.clone();
            let name = row.product_name.clone();
            current = Some((id, name, vec![row.into_size_stock()]));
        }
    }

    if let Some((id, name, sizes)) = current {
        result.push(ProductStock::new(id, name, sizes));
    }

    result
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<ProductStock>> {
    let rows = sqlx::query_as::<_, StockRow>(
        "SELECT ps.product_id, p.name AS product_name, ps.size, ps.color, ps.quantity, ps.reserved
         FROM product_stock ps
         JOIN products p ON p.id = ps.product_id
         ORDER BY ps.product_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(group_rows(rows))
}

pub async fn get_for_product(pool: &PgPool, product_id: &str) -> Result<Option<ProductStock>> {
    let rows = sqlx::query_as::<_, StockRow>(
        "SELECT ps.product_id, p.name AS product_name, ps.size, ps.color, ps.quantity, ps.reserved
         FROM product_stock ps
         JOIN products p ON p.id = ps.product_id
         WHERE ps.product_id = $1",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(group_rows(rows).into_iter().next())
}

/// Upsert: creates the (size, color) row if absent, overwrites quantity
/// otherwise.
pub async fn upsert_one(
    pool: &PgPool,
    product_id: &str,
    size: &str,
    color: Option<&str>,
    quantity: i32,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO product_stock (product_id, size, color, quantity)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (product_id, size, color)
         DO UPDATE SET quantity = EXCLUDED.quantity",
    )
    .bind(product_id)
    .bind(size)
    .bind(color.unwrap_or_default())
    .bind(quantity)
    .execute(pool)
    .await
    .map_err(|e| {
        if is_foreign_key_violation(&e) {
            AppError::NotFound("Producto no encontrado.".to_string())
        } else {
            AppError::DatabaseError(e)
        }
    })?;

    Ok(())
}

/// Atomically replaces every stock row of the product, preserving the stored
/// `reserved` count of each surviving (size, color).
pub async fn replace_all(
    pool: &PgPool,
    product_id: &str,
    entries: &[(String, Option<String>, i32)],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<_, i32>("SELECT 1 FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?;

    if exists.is_none() {
        return Err(AppError::NotFound(
            "Producto no encontrado en stock.".to_string(),
        ));
    }

    let existing: Vec<(String, String, i32)> = sqlx::query_as(
        "SELECT size, color, reserved FROM product_stock WHERE product_id = $1",
    )
    .bind(product_id)
    .fetch_all(&mut *tx)
    .await?;

    let reserved_map: HashMap<(String, String), i32> = existing
        .into_iter()
        .map(|(size, color, reserved)| ((size, color), reserved))
        .collect();

    sqlx::query("DELETE FROM product_stock WHERE product_id = $1")
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

    let sizes: Vec<&str> = entries.iter().map(|(size, _, _)| size.as_str()).collect();
    let colors: Vec<&str> = entries
        .iter()
        .map(|(_, color, _)| color.as_deref().unwrap_or_default())
        .collect();
    let quantities: Vec<i32> = entries.iter().map(|(_, _, quantity)| *quantity).collect();
    let reserveds: Vec<i32> = entries
        .iter()
        .map(|(size, color, _)| {
            let key = (
                size.clone(),
                color.clone().unwrap_or_default(),
            );
            reserved_map.get(&key).copied().unwrap_or(0)
        })
        .collect();

    sqlx::query(
        "INSERT INTO product_stock (product_id, size, color, quantity, reserved)
         SELECT $1, unnest($2::text[]), unnest($3::text[]), unnest($4::int[]), unnest($5::int[])",
    )
    .bind(product_id)
    .bind(&sizes)
    .bind(&colors)
    .bind(&quantities)
    .bind(&reserveds)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Internal-only, called from the payment webhook. Single-statement clamped
/// decrement so concurrent calls never lose updates; a missing row is a
/// logged no-op.
pub async fn decrement_stock(
    pool: &PgPool,
    product_id: &str,
    size: &str,
    color: Option<&str>,
    quantity: i32,
) -> Result<()> {
    let result = sqlx::query(
        "UPDATE product_stock
         SET quantity = GREATEST(0, quantity - $1)
         WHERE product_id = $2 AND size = $3 AND color = $4",
    )
    .bind(quantity)
    .bind(product_id)
    .bind(size)
    .bind(color.unwrap_or_default())
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        tracing::warn!(
            "No stock row for product {} size {} color {:?}, decrement skipped",
            product_id,
            size,
            color
        );
    }

    Ok(())
}
