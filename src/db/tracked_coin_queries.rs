use sqlx::PgPool;
use uuid::Uuid;

use crate::models::TrackedCoin;

pub async fn fetch_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<TrackedCoin>, sqlx::Error> {
    sqlx::query_as::<_, TrackedCoin>(
        r#"
        SELECT id, user_id, coin_id, coin_name, created_at
        FROM tracked_coins
        WHERE user_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn insert(pool: &PgPool, coin: TrackedCoin) -> Result<TrackedCoin, sqlx::Error> {
    sqlx::query_as::<_, TrackedCoin>(
        r#"
        INSERT INTO tracked_coins (id, user_id, coin_id, coin_name, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, user_id, coin_id, coin_name, created_at
        "#,
    )
    .bind(coin.id)
    .bind(coin.user_id)
    .bind(coin.coin_id)
    .bind(coin.coin_name)
    .bind(coin.created_at)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, user_id: Uuid, coin_id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tracked_coins WHERE user_id = $1 AND coin_id = $2")
        .bind(user_id)
        .bind(coin_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
