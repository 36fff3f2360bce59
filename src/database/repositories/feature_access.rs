use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{Feature, FeatureGrant},
    utils::sql,
};

#[derive(Clone)]
pub struct FeatureAccessRepository {
    pool: PgPool,
}

impl FeatureAccessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn grants_for(&self, member_id: Uuid) -> Result<Vec<FeatureGrant>> {
        let grants = sqlx::query_as::<_, FeatureGrant>(&sql(r#"
            SELECT
                member_id,
                feature,
                enabled,
                updated_at
            FROM
                feature_access
            WHERE
                member_id = ?
            ORDER BY
                feature
        "#))
        .bind(member_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(grants)
    }

    pub async fn set_grant(
        &self,
        member_id: Uuid,
        feature: Feature,
        enabled: bool,
    ) -> Result<FeatureGrant> {
        let grant = sqlx::query_as::<_, FeatureGrant>(&sql(r#"
            INSERT INTO
                feature_access (member_id, feature, enabled, updated_at)
            VALUES
                (?, ?, ?, ?)
            ON CONFLICT (member_id, feature) DO UPDATE
            SET
                enabled = EXCLUDED.enabled,
                updated_at = EXCLUDED.updated_at
            RETURNING
                member_id,
                feature,
                enabled,
                updated_at
        "#))
        .bind(member_id)
        .bind(feature)
        .bind(enabled)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(grant)
    }

    pub async fn clear_grant(&self, member_id: Uuid, feature: Feature) -> Result<bool> {
        let result = sqlx::query(&sql(
            "DELETE FROM feature_access WHERE member_id = ? AND feature = ?",
        ))
        .bind(member_id)
        .bind(feature)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
