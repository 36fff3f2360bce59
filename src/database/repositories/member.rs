use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{Member, MemberRole},
    utils::sql,
};

#[derive(Clone)]
pub struct MemberRepository {
    pool: PgPool,
}

impl MemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        email: &str,
        display_name: &str,
        password_hash: &str,
        role: MemberRole,
    ) -> Result<Member> {
        let now = Utc::now();
        let member = sqlx::query_as::<_, Member>(&sql(r#"
            INSERT INTO
                members (
                    email,
                    display_name,
                    role,
                    active,
                    password_hash,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, TRUE, ?, ?, ?)
            RETURNING
                id,
                email,
                display_name,
                role,
                active,
                password_hash,
                created_at,
                updated_at
        "#))
        .bind(email)
        .bind(display_name)
        .bind(role)
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(member)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Member>> {
        let member = sqlx::query_as::<_, Member>(&sql(r#"
            SELECT
                id,
                email,
                display_name,
                role,
                active,
                password_hash,
                created_at,
                updated_at
            FROM
                members
            WHERE
                id = ?
        "#))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Member>> {
        let member = sqlx::query_as::<_, Member>(&sql(r#"
            SELECT
                id,
                email,
                display_name,
                role,
                active,
                password_hash,
                created_at,
                updated_at
            FROM
                members
            WHERE
                LOWER(email) = LOWER(?)
        "#))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(&sql(
            "SELECT EXISTS (SELECT 1 FROM members WHERE LOWER(email) = LOWER(?))",
        ))
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Active members in display order; this is the team roster.
    pub async fn find_active(&self) -> Result<Vec<Member>> {
        let members = sqlx::query_as::<_, Member>(&sql(r#"
            SELECT
                id,
                email,
                display_name,
                role,
                active,
                password_hash,
                created_at,
                updated_at
            FROM
                members
            WHERE
                active = TRUE
            ORDER BY
                display_name
        "#))
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<Option<Member>> {
        let member = sqlx::query_as::<_, Member>(&sql(r#"
            UPDATE
                members
            SET
                active = ?,
                updated_at = ?
            WHERE
                id = ?
            RETURNING
                id,
                email,
                display_name,
                role,
                active,
                password_hash,
                created_at,
                updated_at
        "#))
        .bind(active)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }
}
