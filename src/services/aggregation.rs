//! Earnings and pool aggregation.
//!
//! Stored records are first normalized into [`ResolvedEarning`]s, which carry
//! no optional fields: the pool amount is defaulted from the pool rate and the
//! net amount is floored at zero. [`EarningsAggregator`] then folds resolved
//! records into per-member and team totals. Nothing here touches I/O.

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::EarningRecord;
use crate::services::period::DateRange;

/// Share of a gross amount diverted to the pool when a record has no
/// explicit pool amount: 0.45.
pub fn default_pool_rate() -> BigDecimal {
    BigDecimal::new(45.into(), 2)
}

/// An earning record with every default applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedEarning {
    pub id: Uuid,
    pub date: NaiveDate,
    pub owner: Uuid,
    pub participants: Vec<Uuid>,
    pub net: BigDecimal,
    pub pool: BigDecimal,
}

impl ResolvedEarning {
    pub fn resolve(record: &EarningRecord, pool_rate: &BigDecimal) -> Self {
        let pool = match &record.pool_amount {
            Some(pool) => pool.clone(),
            None => &record.amount * pool_rate,
        };

        let net = &record.amount - &pool;
        let net = if net < BigDecimal::zero() {
            BigDecimal::zero()
        } else {
            net
        };

        Self {
            id: record.id,
            date: record.date,
            owner: record.user_id,
            participants: record.participants.clone(),
            net,
            pool,
        }
    }

    pub fn involves(&self, member_id: Uuid) -> bool {
        self.owner == member_id || self.participants.contains(&member_id)
    }

    /// Number of equal shares the record is split into. The owner is not an
    /// extra share when participants are listed.
    pub fn divisor(&self) -> usize {
        self.participants.len().max(1)
    }

    /// The owner is credited for inclusion but absent from the divisor, so
    /// their share comes on top of the participants' full split.
    pub fn owner_outside_split(&self) -> bool {
        !self.participants.is_empty() && !self.participants.contains(&self.owner)
    }

    /// `(net, pool)` credited to a single member.
    pub fn share(&self) -> (BigDecimal, BigDecimal) {
        let divisor = self.divisor();
        if divisor == 1 {
            return (self.net.clone(), self.pool.clone());
        }

        let divisor = BigDecimal::from(divisor as u64);
        (&self.net / &divisor, &self.pool / &divisor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsSummary {
    pub user_id: Uuid,
    pub total_earnings: BigDecimal,
    pub total_pool: BigDecimal,
    pub count: usize,
    /// Included records this member owns without being in their participant
    /// list.
    pub owner_outside_split: usize,
}

impl EarningsSummary {
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            total_earnings: BigDecimal::zero(),
            total_pool: BigDecimal::zero(),
            count: 0,
            owner_outside_split: 0,
        }
    }
}

/// One member of the roster the team totals are folded over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub member_id: Uuid,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRow {
    pub display_name: String,
    #[serde(flatten)]
    pub summary: EarningsSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub range: DateRange,
    pub members: Vec<TeamRow>,
    pub total_earnings: BigDecimal,
    pub total_pool: BigDecimal,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct EarningsAggregator {
    pool_rate: BigDecimal,
}

impl Default for EarningsAggregator {
    fn default() -> Self {
        Self::new(default_pool_rate())
    }
}

impl EarningsAggregator {
    pub fn new(pool_rate: BigDecimal) -> Self {
        Self { pool_rate }
    }

    pub fn pool_rate(&self) -> &BigDecimal {
        &self.pool_rate
    }

    pub fn resolve(&self, record: &EarningRecord) -> ResolvedEarning {
        ResolvedEarning::resolve(record, &self.pool_rate)
    }

    pub fn resolve_all(&self, records: &[EarningRecord]) -> Vec<ResolvedEarning> {
        records.iter().map(|record| self.resolve(record)).collect()
    }

    /// Net and pool totals credited to `user_id` within `range`.
    pub fn summarize(
        &self,
        records: &[ResolvedEarning],
        user_id: Uuid,
        range: &DateRange,
    ) -> EarningsSummary {
        records
            .iter()
            .filter(|record| record.involves(user_id) && range.contains(record.date))
            .fold(EarningsSummary::empty(user_id), |mut summary, record| {
                let (net, pool) = record.share();
                summary.total_earnings += net;
                summary.total_pool += pool;
                summary.count += 1;
                if record.owner == user_id && record.owner_outside_split() {
                    summary.owner_outside_split += 1;
                }
                summary
            })
    }

    /// Resolves and summarizes in one step.
    pub fn summarize_records(
        &self,
        records: &[EarningRecord],
        user_id: Uuid,
        range: &DateRange,
    ) -> EarningsSummary {
        self.summarize(&self.resolve_all(records), user_id, range)
    }

    /// Per-member summaries over `roster` and their sum.
    pub fn team_summary(
        &self,
        records: &[ResolvedEarning],
        roster: &[RosterEntry],
        range: &DateRange,
    ) -> TeamSummary {
        let members: Vec<TeamRow> = roster
            .iter()
            .map(|entry| TeamRow {
                display_name: entry.display_name.clone(),
                summary: self.summarize(records, entry.member_id, range),
            })
            .collect();

        let mut total_earnings = BigDecimal::zero();
        let mut total_pool = BigDecimal::zero();
        let mut count = 0;
        for row in &members {
            total_earnings += &row.summary.total_earnings;
            total_pool += &row.summary.total_pool;
            count += row.summary.count;
        }

        TeamSummary {
            range: *range,
            members,
            total_earnings,
            total_pool,
            count,
        }
    }
}
