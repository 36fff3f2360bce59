use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored earning. `pool_amount` and `participants` are kept exactly as
/// entered; defaulting happens in `services::aggregation::ResolvedEarning`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EarningRecord {
    pub id: Uuid,
    pub date: NaiveDate,           // DATE
    pub user_id: Uuid,             // primary participant
    pub participants: Vec<Uuid>,   // UUID[], empty when not split
    pub amount: BigDecimal,        // NUMERIC(14,2)
    pub pool_amount: Option<BigDecimal>,
    pub note: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningInput {
    pub date: NaiveDate,
    /// Defaults to the effective member when omitted. Only admins may
    /// record on behalf of someone else.
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub participants: Vec<Uuid>,
    pub amount: BigDecimal,
    pub pool_amount: Option<BigDecimal>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningListQuery {
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
