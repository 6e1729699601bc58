use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, Result, is_unique_violation},
    models::{NewProduct, Product, ProductQuery},
};

const PRODUCT_SELECT: &str = r#"SELECT
    p.id, p.name, p.cat, p."drop", p.price, p.original_price,
    p.is_new, p.is_sale, p.images, p.description, p.active, p.created_at,
    COALESCE(
        json_agg(DISTINCT jsonb_build_object('name', pc.name, 'hex', pc.hex))
        FILTER (WHERE pc.name IS NOT NULL),
        '[]'
    ) AS colors,
    COALESCE(
        json_agg(DISTINCT jsonb_build_object(
            'size', ps.size,
            'color', NULLIF(ps.color, ''),
            'stock', ps.quantity
        )) FILTER (WHERE ps.size IS NOT NULL),
        '[]'
    ) AS stock
FROM products p
LEFT JOIN product_colors pc ON pc.product_id = p.id
LEFT JOIN product_stock ps ON ps.product_id = p.id
WHERE p.active = true"#;

pub async fn list_products(pool: &PgPool, params: ProductQuery) -> Result<Vec<Product>> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new(PRODUCT_SELECT);

    // "all" disables a filter, same as omitting it
    if let Some(drop) = params.drop.filter(|d| d != "all") {
        query.push(" AND p.\"drop\" = ");
        query.push_bind(drop);
    }

    if let Some(cat) = params.cat.filter(|c| c != "all") {
        query.push(" AND p.cat = ");
        query.push_bind(cat);
    }

    query.push(" GROUP BY p.id ORDER BY p.created_at DESC");

    let products = query.build_query_as::<Product>().fetch_all(pool).await?;

    Ok(products)
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Product>> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new(PRODUCT_SELECT);
    query.push(" AND p.id = ");
    query.push_bind(id);
    query.push(" GROUP BY p.id");

    let product = query
        .build_query_as::<Product>()
        .fetch_optional(pool)
        .await?;

    Ok(product)
}

/// Inserts the product, its colors and the zero-quantity stock seed in one
/// transaction; any failure rolls the whole thing back.
pub async fn create_product(pool: &PgPool, product: &NewProduct) -> Result<Product> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"INSERT INTO products (id, name, cat, "drop", price, original_price, is_new, is_sale, images, description)
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"#,
    )
    .bind(&product.id)
    .bind(&product.name)
    .bind(&product.cat)
    .bind(&product.drop_id)
    .bind(product.price)
    .bind(product.original_price)
    .bind(product.is_new)
    .bind(product.is_sale)
    .bind(&product.images)
    .bind(&product.description)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!("Ya existe un producto con id \"{}\".", product.id))
        } else {
            AppError::DatabaseError(e)
        }
    })?;

    if !product.colors.is_empty() {
        let names: Vec<&str> = product.colors.iter().map(|c| c.name.as_str()).collect();
        let hexes: Vec<&str> = product.colors.iter().map(|c| c.hex.as_str()).collect();

        sqlx::query(
            "INSERT INTO product_colors (product_id, name, hex)
             SELECT $1, unnest($2::text[]), unnest($3::text[])",
        )
        .bind(&product.id)
        .bind(&names)
        .bind(&hexes)
        .execute(&mut *tx)
        .await?;
    }

    let seed = product.stock_seed();
    if !seed.is_empty() {
        let sizes: Vec<&str> = seed.iter().map(|(size, _)| size.as_str()).collect();
        let colors: Vec<&str> = seed.iter().map(|(_, color)| color.as_str()).collect();

        sqlx::query(
            "INSERT INTO product_stock (product_id, size, color)
             SELECT $1, unnest($2::text[]), unnest($3::text[])",
        )
        .bind(&product.id)
        .bind(&sizes)
        .bind(&colors)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    find_by_id(pool, &product.id)
        .await?
        .ok_or_else(|| AppError::InternalError("Error al crear el producto.".to_string()))
}

/// Removes the product and its dependent color/stock rows atomically.
/// Returns false when the product does not exist.
pub async fn delete_product(pool: &PgPool, id: &str) -> Result<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM product_stock WHERE product_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM product_colors WHERE product_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    tx.commit().await?;
    Ok(true)
}

pub async fn add_image(pool: &PgPool, id: &str, url: &str) -> Result<Option<Vec<String>>> {
    let images = sqlx::query_scalar::<_, Vec<String>>(
        "UPDATE products SET images = array_append(images, $1) WHERE id = $2 RETURNING images",
    )
    .bind(url)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(images)
}

pub async fn remove_image_by_url(pool: &PgPool, id: &str, url: &str) -> Result<Option<Vec<String>>> {
    let images = sqlx::query_scalar::<_, Vec<String>>(
        "UPDATE products SET images = array_remove(images, $1) WHERE id = $2 RETURNING images",
    )
    .bind(url)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(images)
}

/// Postgres arrays are 1-based: dropping the 0-based `index` keeps
/// `images[1:index]` and `images[index+2:]`.
fn slice_bounds(index: i32) -> (i32, i32) {
    (index, index + 2)
}

pub async fn remove_image_by_index(
    pool: &PgPool,
    id: &str,
    index: i32,
) -> Result<Option<Vec<String>>> {
    let (keep_until, resume_from) = slice_bounds(index);

    let images = sqlx::query_scalar::<_, Vec<String>>(
        "UPDATE products SET images = images[1:$1] || images[$2:] WHERE id = $3 RETURNING images",
    )
    .bind(keep_until)
    .bind(resume_from)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(images)
}

pub async fn replace_images(
    pool: &PgPool,
    id: &str,
    images: &[String],
) -> Result<Option<Vec<String>>> {
    let images = sqlx::query_scalar::<_, Vec<String>>(
        "UPDATE products SET images = $1 WHERE id = $2 RETURNING images",
    )
    .bind(images)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_removal_maps_onto_one_based_slices() {
        // removing element 0 keeps images[1:0] (empty) and images[2:]
        assert_eq!(slice_bounds(0), (0, 2));
        // removing element 2 keeps images[1:2] and images[4:]
        assert_eq!(slice_bounds(2), (2, 4));
    }
}
