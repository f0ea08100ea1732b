use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::{ChatRole, ChatTurn, ContextSnapshot};

#[derive(Debug, FromRow)]
struct ChatTurnRow {
    id: Uuid,
    user_id: Uuid,
    role: String,
    message: String,
    context: Json<ContextSnapshot>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ChatTurnRow> for ChatTurn {
    type Error = sqlx::Error;

    fn try_from(row: ChatTurnRow) -> Result<Self, Self::Error> {
        let role = row.role.parse::<ChatRole>().map_err(|e| sqlx::Error::Decode(e.into()))?;
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            role,
            message: row.message,
            context: row.context.0,
            created_at: row.created_at,
        })
    }
}

pub async fn insert(pool: &PgPool, turn: ChatTurn) -> Result<ChatTurn, sqlx::Error> {
    let row = sqlx::query_as::<_, ChatTurnRow>(
        r#"
        INSERT INTO chat_messages (id, user_id, role, message, context, created_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, role, message, context, created_at
        "#,
    )
    .bind(turn.id)
    .bind(turn.user_id)
    .bind(turn.role.to_string())
    .bind(turn.message)
    .bind(Json(turn.context))
    .bind(turn.created_at)
    .fetch_one(pool)
    .await?;

    ChatTurn::try_from(row)
}

/// Full transcript of a user, oldest turn first.
pub async fn fetch_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<ChatTurn>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ChatTurnRow>(
        r#"
        SELECT id, user_id, role, message, context, created_at
        FROM chat_messages
        WHERE user_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(ChatTurn::try_from).collect()
}

/// The latest `limit` turns of a user, returned oldest first.
pub async fn fetch_recent_for_user(pool: &PgPool, user_id: Uuid, limit: usize) -> Result<Vec<ChatTurn>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ChatTurnRow>(
        r#"
        SELECT id, user_id, role, message, context, created_at
        FROM chat_messages
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(i64::try_from(limit).unwrap_or(i64::MAX))
    .fetch_all(pool)
    .await?;

    rows.into_iter().rev().map(ChatTurn::try_from).collect()
}
