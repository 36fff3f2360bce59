#![allow(dead_code)]

use actix_web::{body::MessageBody, dev::ServiceResponse};
use chrono::Utc;
use fake::Fake;
use fake::faker::name::en::Name;
use serde::de::DeserializeOwned;
use std::env;
use uuid::Uuid;

use apevault::database::models::{Member, MemberRole};
use apevault::database::{init_database, lazy_pool};
use apevault::handlers::shared::ApiResponse;
use apevault::{AppState, Config, MemberRepository};

/// Builds the full service the way `main` does, minus CORS and logging.
macro_rules! init_app {
    ($state:expr) => {{
        let state = $state.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .configure(move |cfg| state.configure(cfg))
                .wrap(apevault::middleware::RequestId)
                .configure(apevault::routes::configure),
        )
        .await
    }};
}

pub struct TestApp {
    pub state: AppState,
    pub config: Config,
}

impl TestApp {
    /// App wired to a pool that never connects unless a handler reaches the
    /// database. Use for requests rejected before any query.
    pub fn lazy() -> Self {
        let config = Config::test_config();
        let pool = lazy_pool(&config.database_url).expect("test database url parses");
        Self {
            state: AppState::new(pool, config.clone()),
            config,
        }
    }

    /// App backed by `TEST_DATABASE_URL`, or `None` when it is not set.
    pub async fn with_database() -> Option<Self> {
        let url = env::var("TEST_DATABASE_URL").ok()?;
        let mut config = Config::test_config();
        config.database_url = url;

        let pool = init_database(&config.database_url)
            .await
            .expect("Failed to initialize test database");
        Some(Self {
            state: AppState::new(pool, config.clone()),
            config,
        })
    }

    pub fn members(&self) -> &MemberRepository {
        &self.state.member_repository
    }

    pub fn token_for(&self, member: &Member) -> String {
        self.state
            .auth_service
            .issue_token(member)
            .expect("Failed to issue test token")
    }

    /// Inserts a member with a generated name and unique email.
    pub async fn create_member(&self, role: MemberRole) -> Member {
        let name: String = Name().fake();
        let email = format!("{}@apevault.test", Uuid::new_v4());
        self.members()
            .create(&email, &name, "not-a-real-hash", role)
            .await
            .expect("Failed to insert test member")
    }
}

/// A member that only exists inside a token.
pub fn detached_member(role: MemberRole) -> Member {
    let now = Utc::now();
    Member {
        id: Uuid::new_v4(),
        email: "detached@apevault.test".to_string(),
        display_name: Name().fake(),
        role,
        active: true,
        password_hash: String::new(),
        created_at: now,
        updated_at: now,
    }
}

pub fn auth_header(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub async fn read_success<T, B>(resp: ServiceResponse<B>) -> T
where
    T: DeserializeOwned,
    B: MessageBody,
{
    let body = actix_web::test::read_body(resp).await;
    let response: ApiResponse<T> =
        serde_json::from_slice(&body).expect("Failed to parse JSON response");

    assert!(
        response.success,
        "Expected successful response but got error: {:?}",
        response.message
    );
    response.data.expect("Expected data in successful response")
}

pub async fn read_error<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    let body = actix_web::test::read_body(resp).await;
    let response: ApiResponse<serde_json::Value> =
        serde_json::from_slice(&body).expect("Failed to parse JSON response");

    assert!(!response.success, "Expected an error response");
    response.message.unwrap_or_default()
}

pub fn setup_test_env() {
    let _ = env_logger::builder().is_test(true).try_init();
}
