use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{Notification, NotificationInput},
    utils::sql,
};

#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: NotificationInput) -> Result<Notification> {
        let notification = sqlx::query_as::<_, Notification>(&sql(r#"
            INSERT INTO
                notifications (member_id, title, body, read, created_at)
            VALUES
                (?, ?, ?, FALSE, ?)
            RETURNING
                id,
                member_id,
                title,
                body,
                read,
                created_at,
                read_at
        "#))
        .bind(input.member_id)
        .bind(input.title)
        .bind(input.body)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    pub async fn find_for_member(&self, member_id: Uuid) -> Result<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(&sql(r#"
            SELECT
                id,
                member_id,
                title,
                body,
                read,
                created_at,
                read_at
            FROM
                notifications
            WHERE
                member_id = ?
            ORDER BY
                created_at DESC
        "#))
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    pub async fn unread_count(&self, member_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(&sql(
            "SELECT COUNT(*) FROM notifications WHERE member_id = ? AND read = FALSE",
        ))
        .bind(member_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Marks one of `member_id`'s notifications read. Returns `None` when the
    /// notification does not exist or belongs to someone else.
    pub async fn mark_read(&self, id: Uuid, member_id: Uuid) -> Result<Option<Notification>> {
        let notification = sqlx::query_as::<_, Notification>(&sql(r#"
            UPDATE
                notifications
            SET
                read = TRUE,
                read_at = COALESCE(read_at, ?)
            WHERE
                id = ?
                AND member_id = ?
            RETURNING
                id,
                member_id,
                title,
                body,
                read,
                created_at,
                read_at
        "#))
        .bind(Utc::now())
        .bind(id)
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notification)
    }

    pub async fn mark_all_read(&self, member_id: Uuid) -> Result<u64> {
        let result = sqlx::query(&sql(r#"
            UPDATE
                notifications
            SET
                read = TRUE,
                read_at = ?
            WHERE
                member_id = ?
                AND read = FALSE
        "#))
        .bind(Utc::now())
        .bind(member_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
