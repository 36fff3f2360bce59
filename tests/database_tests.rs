//! End-to-end flows against a real Postgres. Set `TEST_DATABASE_URL` to run
//! them; they are skipped otherwise.

use actix_web::{http::StatusCode, test};
use bigdecimal::BigDecimal;
use pretty_assertions::assert_eq;
use serde_json::json;
use serial_test::serial;
use std::str::FromStr;
use uuid::Uuid;

#[macro_use]
mod common;

use apevault::database::models::{
    AuthResponse, EarningRecord, Feature, MemberRole, UnreadCount,
};
use apevault::services::aggregation::EarningsSummary;
use apevault::services::earnings::TeamDashboard;
use common::{TestApp, auth_header, read_success};

fn dec(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).unwrap()
}

macro_rules! database_or_skip {
    () => {
        match TestApp::with_database().await {
            Some(app) => app,
            None => {
                eprintln!("TEST_DATABASE_URL not set, skipping");
                return;
            }
        }
    };
}

macro_rules! record_earning {
    ($service:expr, $token:expr, $body:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/v1/earnings")
            .insert_header(auth_header($token))
            .set_json($body)
            .to_request();
        let resp = test::call_service($service, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        read_success::<EarningRecord, _>(resp).await
    }};
}

macro_rules! january_summary {
    ($service:expr, $token:expr, $viewed:expr) => {{
        let mut req = test::TestRequest::get()
            .uri("/api/v1/earnings/summary?startDate=2024-01-01&endDate=2024-01-31")
            .insert_header(auth_header($token));
        if let Some(viewed) = $viewed {
            req = req.insert_header(("X-Viewed-User", viewed.to_string()));
        }
        let resp = test::call_service($service, req.to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        read_success::<EarningsSummary, _>(resp).await
    }};
}

macro_rules! team_dashboard {
    ($service:expr, $token:expr) => {{
        let req = test::TestRequest::get()
            .uri("/api/v1/earnings/team")
            .insert_header(auth_header($token))
            .to_request();
        let resp = test::call_service($service, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        read_success::<TeamDashboard, _>(resp).await
    }};
}

#[actix_web::test]
#[serial]
async fn january_split_flow() {
    common::setup_test_env();
    let app = database_or_skip!();
    let u1 = app.create_member(MemberRole::Member).await;
    let u2 = app.create_member(MemberRole::Member).await;
    let admin = app.create_member(MemberRole::Admin).await;
    let (t1, t2, ta) = (app.token_for(&u1), app.token_for(&u2), app.token_for(&admin));
    let service = init_app!(app.state);

    let solo = record_earning!(
        &service,
        &t1,
        json!({ "date": "2024-01-10", "amount": "1000.00", "poolAmount": "400.00" })
    );
    let split = record_earning!(
        &service,
        &t1,
        json!({
            "date": "2024-01-12",
            "participants": [u1.id, u2.id],
            "amount": "500.00",
            "poolAmount": "225.00"
        })
    );
    assert_eq!(solo.created_by, u1.id);
    assert_eq!(split.participants, vec![u1.id, u2.id]);

    let first = january_summary!(&service, &t1, None::<Uuid>);
    assert_eq!(first.user_id, u1.id);
    assert_eq!(first.total_earnings, dec("737.5"));
    assert_eq!(first.total_pool, dec("512.5"));
    assert_eq!(first.count, 2);

    let second = january_summary!(&service, &t2, None::<Uuid>);
    assert_eq!(second.total_earnings, dec("137.5"));
    assert_eq!(second.total_pool, dec("112.5"));
    assert_eq!(second.count, 1);

    // admin reads u1's numbers through the override
    let viewed = january_summary!(&service, &ta, Some(u1.id));
    assert_eq!(viewed, first);

    // only the split notified u2; the author is never notified
    let req = test::TestRequest::get()
        .uri("/api/v1/notifications/unread-count")
        .insert_header(auth_header(&t2))
        .to_request();
    let unread: UnreadCount = read_success(test::call_service(&service, req).await).await;
    assert_eq!(unread.unread, 1);

    let req = test::TestRequest::get()
        .uri("/api/v1/notifications/unread-count")
        .insert_header(auth_header(&t1))
        .to_request();
    let unread: UnreadCount = read_success(test::call_service(&service, req).await).await;
    assert_eq!(unread.unread, 0);

    let req = test::TestRequest::post()
        .uri("/api/v1/notifications/read-all")
        .insert_header(auth_header(&t2))
        .to_request();
    let marked: serde_json::Value = read_success(test::call_service(&service, req).await).await;
    assert_eq!(marked["updated"], 1);

    let req = test::TestRequest::get()
        .uri("/api/v1/notifications/unread-count")
        .insert_header(auth_header(&t2))
        .to_request();
    let unread: UnreadCount = read_success(test::call_service(&service, req).await).await;
    assert_eq!(unread.unread, 0);

    // u2 neither owns nor authored the solo record
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/earnings/{}", solo.id))
        .insert_header(auth_header(&t2))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/earnings/{}", solo.id))
        .insert_header(auth_header(&t1))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let after = january_summary!(&service, &t1, None::<Uuid>);
    assert_eq!(after.total_earnings, dec("137.5"));
    assert_eq!(after.count, 1);
}

#[actix_web::test]
#[serial]
async fn update_moves_record_out_of_range() {
    common::setup_test_env();
    let app = database_or_skip!();
    let u1 = app.create_member(MemberRole::Member).await;
    let t1 = app.token_for(&u1);
    let service = init_app!(app.state);

    let record = record_earning!(
        &service,
        &t1,
        json!({ "date": "2024-01-20", "amount": "200.00" })
    );

    let before = january_summary!(&service, &t1, None::<Uuid>);
    assert_eq!(before.total_earnings, dec("110"));
    assert_eq!(before.total_pool, dec("90"));

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/earnings/{}", record.id))
        .insert_header(auth_header(&t1))
        .set_json(json!({ "date": "2024-02-01", "amount": "200.00" }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let after = january_summary!(&service, &t1, None::<Uuid>);
    assert_eq!(after, EarningsSummary::empty(u1.id));
}

#[actix_web::test]
#[serial]
async fn team_dashboard_includes_active_roster() {
    common::setup_test_env();
    let app = database_or_skip!();
    let member = app.create_member(MemberRole::Member).await;
    let token = app.token_for(&member);
    let service = init_app!(app.state);

    let req = test::TestRequest::get()
        .uri("/api/v1/earnings/team")
        .insert_header(auth_header(&token))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let dashboard: TeamDashboard = read_success(resp).await;
    assert!(dashboard.week.range.contains(dashboard.today));
    assert!(dashboard.month.range.contains(dashboard.today));
    assert!(
        dashboard
            .month
            .members
            .iter()
            .any(|row| row.summary.user_id == member.id)
    );
}

#[actix_web::test]
#[serial]
async fn feature_grant_hides_pool() {
    common::setup_test_env();
    let app = database_or_skip!();
    let member = app.create_member(MemberRole::Member).await;
    let admin = app.create_member(MemberRole::Admin).await;
    let (tm, ta) = (app.token_for(&member), app.token_for(&admin));
    let service = init_app!(app.state);

    let req = test::TestRequest::get()
        .uri("/api/v1/access")
        .insert_header(auth_header(&tm))
        .to_request();
    let visible: Vec<Feature> = read_success(test::call_service(&service, req).await).await;
    assert!(visible.contains(&Feature::Pool));

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/access/{}/pool", member.id))
        .insert_header(auth_header(&ta))
        .set_json(json!({ "enabled": false }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/v1/access")
        .insert_header(auth_header(&tm))
        .to_request();
    let visible: Vec<Feature> = read_success(test::call_service(&service, req).await).await;
    assert!(!visible.contains(&Feature::Pool));
    assert!(visible.contains(&Feature::Earnings));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/access/{}/pool", member.id))
        .insert_header(auth_header(&ta))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
#[serial]
async fn register_login_and_me() {
    common::setup_test_env();
    let app = database_or_skip!();
    let service = init_app!(app.state);
    let email = format!("{}@apevault.test", Uuid::new_v4());

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "email": email,
            "password": "bananas-all-day",
            "displayName": "Koko"
        }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "email": email.to_uppercase(),
            "password": "bananas-all-day",
            "displayName": "Koko Again"
        }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": email, "password": "wrong-password" }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": email, "password": "bananas-all-day" }))
        .to_request();
    let auth: AuthResponse = read_success(test::call_service(&service, req).await).await;
    assert_eq!(auth.member.display_name, "Koko");

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(auth_header(&auth.token))
        .to_request();
    let me: apevault::database::models::MemberInfo =
        read_success(test::call_service(&service, req).await).await;
    assert_eq!(me.id, auth.member.id);
}

#[actix_web::test]
#[serial]
async fn team_totals_follow_writes_after_being_cached() {
    common::setup_test_env();
    let app = database_or_skip!();
    let member = app.create_member(MemberRole::Member).await;
    let token = app.token_for(&member);
    let service = init_app!(app.state);

    let before = team_dashboard!(&service, &token);
    // second read is served from the cache
    let cached = team_dashboard!(&service, &token);
    assert_eq!(cached.month, before.month);

    let record = record_earning!(
        &service,
        &token,
        json!({ "date": before.today, "amount": "100.00" })
    );

    let after_create = team_dashboard!(&service, &token);
    assert_eq!(
        &after_create.month.total_earnings - &before.month.total_earnings,
        dec("55")
    );
    assert_eq!(
        &after_create.month.total_pool - &before.month.total_pool,
        dec("45")
    );
    assert_eq!(after_create.month.count, before.month.count + 1);
    assert_eq!(after_create.week.count, before.week.count + 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/earnings/{}", record.id))
        .insert_header(auth_header(&token))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let after_delete = team_dashboard!(&service, &token);
    assert_eq!(after_delete.month.total_earnings, before.month.total_earnings);
    assert_eq!(after_delete.month.total_pool, before.month.total_pool);
    assert_eq!(after_delete.month.count, before.month.count);
}

#[actix_web::test]
#[serial]
async fn registration_joins_cached_team_roster() {
    common::setup_test_env();
    let app = database_or_skip!();
    let member = app.create_member(MemberRole::Member).await;
    let token = app.token_for(&member);
    let service = init_app!(app.state);

    let before = team_dashboard!(&service, &token);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "email": format!("{}@apevault.test", Uuid::new_v4()),
            "password": "bananas-all-day",
            "displayName": "Newbie"
        }))
        .to_request();
    let resp = test::call_service(&service, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let registered: AuthResponse = read_success(resp).await;

    let after = team_dashboard!(&service, &token);
    assert_eq!(after.month.members.len(), before.month.members.len() + 1);
    assert!(
        after
            .month
            .members
            .iter()
            .any(|row| row.summary.user_id == registered.member.id)
    );
}
