use sqlx::PgPool;
use uuid::Uuid;

use crate::models::PortfolioEntry;

pub async fn fetch_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<PortfolioEntry>, sqlx::Error> {
    sqlx::query_as::<_, PortfolioEntry>(
        r#"
        SELECT id, user_id, coin_id, coin_name, amount, avg_buy_price, buy_date, created_at
        FROM portfolio_entries
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn insert(pool: &PgPool, entry: PortfolioEntry) -> Result<PortfolioEntry, sqlx::Error> {
    sqlx::query_as::<_, PortfolioEntry>(
        r#"
        INSERT INTO portfolio_entries (id, user_id, coin_id, coin_name, amount, avg_buy_price, buy_date, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, user_id, coin_id, coin_name, amount, avg_buy_price, buy_date, created_at
        "#,
    )
    .bind(entry.id)
    .bind(entry.user_id)
    .bind(entry.coin_id)
    .bind(entry.coin_name)
    .bind(entry.amount)
    .bind(entry.avg_buy_price)
    .bind(entry.buy_date)
    .bind(entry.created_at)
    .fetch_one(pool)
    .await
}

/// Deletes an entry only if it belongs to `user_id`.
pub async fn delete(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM portfolio_entries WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
