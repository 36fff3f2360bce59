use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;

string_enum! {
    /// Dashboard areas whose visibility is gated per member.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Feature {
        Earnings => "earnings",
        Pool => "pool",
        Schedule => "schedule",
        Ratings => "ratings",
        Tasks => "tasks",
        Events => "events",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FeatureGrant {
    pub member_id: Uuid,
    pub feature: Feature,
    pub enabled: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SetGrantInput {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureCheck {
    pub member_id: Uuid,
    pub feature: Feature,
    pub allowed: bool,
}
