use actix_web::{http::StatusCode, test};
use serde_json::json;

#[macro_use]
mod common;

use common::TestApp;

macro_rules! unauthorized_test {
    ($name:ident, $method:ident, $uri:expr) => {
        #[actix_web::test]
        async fn $name() {
            common::setup_test_env();
            let app = TestApp::lazy();
            let service = init_app!(app.state);

            let req = test::TestRequest::$method()
                .uri($uri)
                .set_json(json!({}))
                .to_request();
            let resp = test::call_service(&service, req).await;

            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }
    };
}

unauthorized_test!(me_requires_token, get, "/api/v1/auth/me");
unauthorized_test!(list_earnings_requires_token, get, "/api/v1/earnings");
unauthorized_test!(create_earning_requires_token, post, "/api/v1/earnings");
unauthorized_test!(
    get_earning_requires_token,
    get,
    "/api/v1/earnings/7f0e2c1a-4b8e-4d8a-9a55-2f1d0b1e9c11"
);
unauthorized_test!(
    update_earning_requires_token,
    put,
    "/api/v1/earnings/7f0e2c1a-4b8e-4d8a-9a55-2f1d0b1e9c11"
);
unauthorized_test!(
    delete_earning_requires_token,
    delete,
    "/api/v1/earnings/7f0e2c1a-4b8e-4d8a-9a55-2f1d0b1e9c11"
);
unauthorized_test!(summary_requires_token, get, "/api/v1/earnings/summary");
unauthorized_test!(team_requires_token, get, "/api/v1/earnings/team");
unauthorized_test!(members_requires_token, get, "/api/v1/members");
unauthorized_test!(features_requires_token, get, "/api/v1/access");
unauthorized_test!(notifications_requires_token, get, "/api/v1/notifications");
unauthorized_test!(
    unread_count_requires_token,
    get,
    "/api/v1/notifications/unread-count"
);
unauthorized_test!(read_all_requires_token, post, "/api/v1/notifications/read-all");

#[actix_web::test]
async fn garbage_token_is_rejected() {
    common::setup_test_env();
    let app = TestApp::lazy();
    let service = init_app!(app.state);

    let req = test::TestRequest::get()
        .uri("/api/v1/earnings/summary")
        .insert_header(common::auth_header("not.a.jwt"))
        .to_request();
    let resp = test::call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn token_signed_with_other_secret_is_rejected() {
    common::setup_test_env();
    let app = TestApp::lazy();

    let mut foreign_config = apevault::Config::test_config();
    foreign_config.jwt_secret = "a-completely-different-secret-value".to_string();
    let pool = apevault::database::lazy_pool(&foreign_config.database_url).unwrap();
    let foreign = apevault::AppState::new(pool, foreign_config);
    let token = foreign
        .auth_service
        .issue_token(&common::detached_member(
            apevault::database::models::MemberRole::Admin,
        ))
        .unwrap();

    let service = init_app!(app.state);
    let req = test::TestRequest::get()
        .uri("/api/v1/earnings/summary")
        .insert_header(common::auth_header(&token))
        .to_request();
    let resp = test::call_service(&service, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
