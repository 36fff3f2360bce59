use actix_web::web;
use sqlx::PgPool;
use std::time::Duration;

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

pub use config::Config;
pub use database::repositories::{
    EarningRepository, FeatureAccessRepository, MemberRepository, NotificationRepository,
};
pub use error::AppError;
pub use services::{AuthService, EarningsAggregator, EarningsService};

/// Everything the HTTP layer needs, built once by the composition root and
/// shared across workers.
#[derive(Clone)]
pub struct AppState {
    pub config: web::Data<Config>,
    pub auth_service: web::Data<AuthService>,
    pub earnings_service: web::Data<EarningsService>,
    pub member_repository: web::Data<MemberRepository>,
    pub feature_access_repository: web::Data<FeatureAccessRepository>,
    pub notification_repository: web::Data<NotificationRepository>,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        let member_repository = MemberRepository::new(pool.clone());
        let earning_repository = EarningRepository::new(pool.clone());
        let notification_repository = NotificationRepository::new(pool.clone());
        let feature_access_repository = FeatureAccessRepository::new(pool);

        let auth_service = AuthService::new(config.clone(), member_repository.clone());
        let earnings_service = EarningsService::new(
            earning_repository,
            member_repository.clone(),
            notification_repository.clone(),
            EarningsAggregator::new(config.pool_rate.clone()),
            Duration::from_secs(config.summary_cache_ttl_secs),
        );

        Self {
            config: web::Data::new(config),
            auth_service: web::Data::new(auth_service),
            earnings_service: web::Data::new(earnings_service),
            member_repository: web::Data::new(member_repository),
            feature_access_repository: web::Data::new(feature_access_repository),
            notification_repository: web::Data::new(notification_repository),
        }
    }

    /// Registers the shared state as app data.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.config.clone())
            .app_data(self.auth_service.clone())
            .app_data(self.earnings_service.clone())
            .app_data(self.member_repository.clone())
            .app_data(self.feature_access_repository.clone())
            .app_data(self.notification_repository.clone());
    }
}
