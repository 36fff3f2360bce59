use chrono::NaiveDate;
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use uuid::Uuid;

use crate::database::models::{EarningInput, EarningRecord, NotificationInput};
use crate::database::repositories::{
    EarningRepository, MemberRepository, NotificationRepository,
};
use crate::error::AppError;
use crate::services::aggregation::{
    EarningsAggregator, EarningsSummary, RosterEntry, TeamSummary,
};
use crate::services::period::DateRange;
use crate::services::validation::validate_earning_input;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDashboard {
    pub today: NaiveDate,
    pub week: TeamSummary,
    pub month: TeamSummary,
}

/// Earnings persistence plus the aggregation read side.
///
/// Team summaries are cached under `(generation, range)`. Every write bumps the
/// generation, so a summary computed from records read before a write is
/// stored under a key no later read asks for.
#[derive(Clone)]
pub struct EarningsService {
    earnings: EarningRepository,
    members: MemberRepository,
    notifications: NotificationRepository,
    aggregator: EarningsAggregator,
    team_cache: Cache<(u64, DateRange), TeamSummary>,
    generation: Arc<AtomicU64>,
}

impl EarningsService {
    pub fn new(
        earnings: EarningRepository,
        members: MemberRepository,
        notifications: NotificationRepository,
        aggregator: EarningsAggregator,
        cache_ttl: Duration,
    ) -> Self {
        let team_cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(cache_ttl)
            .build();

        Self {
            earnings,
            members,
            notifications,
            aggregator,
            team_cache,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn list(&self, involving: Option<Uuid>) -> Result<Vec<EarningRecord>, AppError> {
        let records = match involving {
            Some(member_id) => self.earnings.find_involving(member_id).await?,
            None => self.earnings.find_all().await?,
        };
        Ok(records)
    }

    pub async fn get(&self, id: Uuid) -> Result<EarningRecord, AppError> {
        self.earnings
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Earning {} not found", id)))
    }

    pub async fn create(
        &self,
        author: Uuid,
        owner: Uuid,
        input: EarningInput,
    ) -> Result<EarningRecord, AppError> {
        validate_earning_input(&input)?;
        self.ensure_member_exists(owner).await?;

        let record = self.earnings.create(author, owner, input).await?;
        self.invalidate_team_cache();

        log::info!(
            "Earning {} recorded by {} for {} on {} ({} participants)",
            record.id,
            author,
            owner,
            record.date,
            record.participants.len()
        );
        self.warn_if_owner_outside_split(&record);
        self.notify_participants(author, &record).await;

        Ok(record)
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        input: EarningInput,
    ) -> Result<EarningRecord, AppError> {
        validate_earning_input(&input)?;
        self.ensure_member_exists(owner).await?;

        let record = self
            .earnings
            .update(id, owner, input)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Earning {} not found", id)))?;
        self.invalidate_team_cache();

        log::info!("Earning {} updated", record.id);
        self.warn_if_owner_outside_split(&record);

        Ok(record)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.earnings.delete(id).await? {
            return Err(AppError::NotFound(format!("Earning {} not found", id)));
        }
        self.invalidate_team_cache();

        log::info!("Earning {} deleted", id);
        Ok(())
    }

    /// One member's totals over the full working set.
    pub async fn summary_for(
        &self,
        member_id: Uuid,
        range: &DateRange,
    ) -> Result<EarningsSummary, AppError> {
        let records = self.earnings.find_all().await?;
        Ok(self
            .aggregator
            .summarize_records(&records, member_id, range))
    }

    pub async fn team_summary(&self, range: DateRange) -> Result<TeamSummary, AppError> {
        let generation = self.generation.load(Ordering::Acquire);
        if let Some(cached) = self.team_cache.get(&(generation, range)).await {
            log::debug!("Team summary cache hit for {}", range);
            return Ok(cached);
        }

        let roster: Vec<RosterEntry> = self
            .members
            .find_active()
            .await?
            .into_iter()
            .map(|member| RosterEntry {
                member_id: member.id,
                display_name: member.display_name,
            })
            .collect();
        let records = self.aggregator.resolve_all(&self.earnings.find_all().await?);

        let summary = self.aggregator.team_summary(&records, &roster, &range);
        self.store_team_summary(generation, range, summary.clone()).await;

        Ok(summary)
    }

    /// Team totals for the calendar week and month containing `today`.
    pub async fn team_dashboard(&self, today: NaiveDate) -> Result<TeamDashboard, AppError> {
        let week = self.team_summary(DateRange::week_of(today)).await?;
        let month = self.team_summary(DateRange::month_of(today)).await?;

        Ok(TeamDashboard { today, week, month })
    }

    /// Drops every cached team summary, e.g. after the roster changes.
    pub fn invalidate_team_cache(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.team_cache.invalidate_all();
    }

    /// Caches a summary computed at `generation`. A write that landed since
    /// then makes the entry unreachable.
    async fn store_team_summary(&self, generation: u64, range: DateRange, summary: TeamSummary) {
        if generation != self.generation.load(Ordering::Acquire) {
            log::debug!("Discarding team summary for {} computed before a write", range);
            return;
        }
        self.team_cache.insert((generation, range), summary).await;
    }

    async fn ensure_member_exists(&self, member_id: Uuid) -> Result<(), AppError> {
        match self.members.find_by_id(member_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::BadRequest(format!(
                "Member {} does not exist",
                member_id
            ))),
        }
    }

    fn warn_if_owner_outside_split(&self, record: &EarningRecord) {
        if self.aggregator.resolve(record).owner_outside_split() {
            log::warn!(
                "Earning {}: owner {} is not among the {} participants; owner share is not part of the divisor",
                record.id,
                record.user_id,
                record.participants.len()
            );
        }
    }

    /// Best effort: a failed notification never fails the write.
    async fn notify_participants(&self, author: Uuid, record: &EarningRecord) {
        let resolved = self.aggregator.resolve(record);
        let (net_share, pool_share) = resolved.share();

        for participant in record.participants.iter().filter(|id| **id != author) {
            let input = NotificationInput {
                member_id: *participant,
                title: "Added to an earning split".to_string(),
                body: format!(
                    "An earning of {} on {} was split {} ways. Your share: {} net, {} to the pool.",
                    record.amount,
                    record.date,
                    resolved.divisor(),
                    net_share.round(2),
                    pool_share.round(2)
                ),
            };

            if let Err(e) = self.notifications.create(input).await {
                log::warn!(
                    "Failed to notify {} about earning {}: {}",
                    participant,
                    record.id,
                    e
                );
            }
        }
    }
}
