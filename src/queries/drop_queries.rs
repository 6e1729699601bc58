use sqlx::PgPool;

use crate::{
    error::{AppError, Result, is_unique_violation},
    models::{CreateDropRequest, Drop, UpdateDropRequest},
};

const DEFAULT_ACCENT_COLOR: &str = "#e8e4dc";

pub async fn list_drops(pool: &PgPool, include_inactive: bool) -> Result<Vec<Drop>> {
    let sql = if include_inactive {
        "SELECT * FROM drops ORDER BY number ASC"
    } else {
        "SELECT * FROM drops WHERE active = true ORDER BY number ASC"
    };

    let drops = sqlx::query_as::<_, Drop>(sql).fetch_all(pool).await?;

    Ok(drops)
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Drop>> {
    let drop = sqlx::query_as::<_, Drop>("SELECT * FROM drops WHERE id = $1 AND active = true")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(drop)
}

pub async fn create_drop(pool: &PgPool, req: &CreateDropRequest) -> Result<Drop> {
    let id = req.id.as_deref().unwrap_or_default();

    let drop = sqlx::query_as::<_, Drop>(
        "INSERT INTO drops (id, number, label, tagline, description, hero_image, hero_image2,
                            accent_color, release_date, total_pieces, active)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
         RETURNING *",
    )
    .bind(id)
    .bind(req.number)
    .bind(&req.label)
    .bind(&req.tagline)
    .bind(&req.description)
    .bind(&req.hero_image)
    .bind(&req.hero_image2)
    .bind(req.accent_color.as_deref().unwrap_or(DEFAULT_ACCENT_COLOR))
    .bind(req.release_date)
    .bind(req.total_pieces.unwrap_or(0))
    .bind(req.active.unwrap_or(true))
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(format!("Ya existe un drop con id \"{}\".", id))
        } else {
            AppError::DatabaseError(e)
        }
    })?;

    Ok(drop)
}

/// COALESCE merge: omitted fields keep their stored value. hero_image2 is
/// the deliberate exception, written verbatim so an absent field clears it.
pub async fn update_drop(pool: &PgPool, id: &str, req: &UpdateDropRequest) -> Result<Option<Drop>> {
    let drop = sqlx::query_as::<_, Drop>(
        "UPDATE drops SET
            number       = COALESCE($1, number),
            label        = COALESCE($2, label),
            tagline      = COALESCE($3, tagline),
            description  = COALESCE($4, description),
            hero_image   = COALESCE($5, hero_image),
            hero_image2  = $6,
            accent_color = COALESCE($7, accent_color),
            release_date = COALESCE($8, release_date),
            total_pieces = COALESCE($9, total_pieces),
            active       = COALESCE($10, active)
         WHERE id = $11
         RETURNING *",
    )
    .bind(req.number)
    .bind(&req.label)
    .bind(&req.tagline)
    .bind(&req.description)
    .bind(&req.hero_image)
    .bind(&req.hero_image2)
    .bind(&req.accent_color)
    .bind(req.release_date)
    .bind(req.total_pieces)
    .bind(req.active)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(drop)
}

pub async fn delete_drop(pool: &PgPool, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM drops WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
