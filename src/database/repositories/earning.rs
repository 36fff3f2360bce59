use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{EarningInput, EarningRecord},
    utils::sql,
};

#[derive(Clone)]
pub struct EarningRepository {
    pool: PgPool,
}

impl EarningRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        created_by: Uuid,
        user_id: Uuid,
        input: EarningInput,
    ) -> Result<EarningRecord> {
        let now = Utc::now();
        let record = sqlx::query_as::<_, EarningRecord>(&sql(r#"
            INSERT INTO
                earnings (
                    date,
                    user_id,
                    participants,
                    amount,
                    pool_amount,
                    note,
                    created_by,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id,
                date,
                user_id,
                participants,
                amount,
                pool_amount,
                note,
                created_by,
                created_at,
                updated_at
        "#))
        .bind(input.date)
        .bind(user_id)
        .bind(input.participants)
        .bind(input.amount)
        .bind(input.pool_amount)
        .bind(input.note)
        .bind(created_by)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EarningRecord>> {
        let record = sqlx::query_as::<_, EarningRecord>(&sql(r#"
            SELECT
                id,
                date,
                user_id,
                participants,
                amount,
                pool_amount,
                note,
                created_by,
                created_at,
                updated_at
            FROM
                earnings
            WHERE
                id = ?
        "#))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// The full working set, newest first.
    pub async fn find_all(&self) -> Result<Vec<EarningRecord>> {
        let records = sqlx::query_as::<_, EarningRecord>(&sql(r#"
            SELECT
                id,
                date,
                user_id,
                participants,
                amount,
                pool_amount,
                note,
                created_by,
                created_at,
                updated_at
            FROM
                earnings
            ORDER BY
                date DESC,
                created_at DESC
        "#))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Records where `member_id` is the owner or a listed participant.
    pub async fn find_involving(&self, member_id: Uuid) -> Result<Vec<EarningRecord>> {
        let records = sqlx::query_as::<_, EarningRecord>(&sql(r#"
            SELECT
                id,
                date,
                user_id,
                participants,
                amount,
                pool_amount,
                note,
                created_by,
                created_at,
                updated_at
            FROM
                earnings
            WHERE
                user_id = ?
                OR ? = ANY(participants)
            ORDER BY
                date DESC,
                created_at DESC
        "#))
        .bind(member_id)
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    pub async fn update(
        &self,
        id: Uuid,
        user_id: Uuid,
        input: EarningInput,
    ) -> Result<Option<EarningRecord>> {
        let now = Utc::now();
        let record = sqlx::query_as::<_, EarningRecord>(&sql(r#"
            UPDATE
                earnings
            SET
                date = ?,
                user_id = ?,
                participants = ?,
                amount = ?,
                pool_amount = ?,
                note = ?,
                updated_at = ?
            WHERE
                id = ?
            RETURNING
                id,
                date,
                user_id,
                participants,
                amount,
                pool_amount,
                note,
                created_by,
                created_at,
                updated_at
        "#))
        .bind(input.date)
        .bind(user_id)
        .bind(input.participants)
        .bind(input.amount)
        .bind(input.pool_amount)
        .bind(input.note)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query(&sql("DELETE FROM earnings WHERE id = ?"))
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
